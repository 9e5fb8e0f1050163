use std::fmt;

/// Defines a sorted keyword enum plus its `KEYWORDS`/`KEYWORD_STRINGS`
/// tables, used to reclassify identifiers via binary search.
///
/// **NOTE**: variants must be declared in ASCII-uppercase sorted order.
macro_rules! define_keywords {
    ($(#[$doc:meta])* $name:ident => { $($keyword:ident),* $(,)? }) => {
        $(#[$doc])*
        #[allow(non_camel_case_types)]
        #[allow(missing_docs)]
        #[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Debug)]
        pub enum $name {
            $($keyword),*
        }

        impl $name {
            /// All keyword variants, in the same order as [`Self::KEYWORD_STRINGS`].
            pub const KEYWORDS: &'static [Self] = &[$(Self::$keyword),*];
            /// All keyword spellings, sorted for binary search.
            pub const KEYWORD_STRINGS: &'static [&'static str] = &[$(stringify!($keyword)),*];

            /// Looks up a keyword by its (already-uppercased) spelling.
            pub fn lookup(word_uppercase: &str) -> Option<Self> {
                Self::KEYWORD_STRINGS
                    .binary_search(&word_uppercase)
                    .map(|idx| Self::KEYWORDS[idx])
                    .ok()
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(Self::KEYWORD_STRINGS[Self::KEYWORDS.iter().position(|k| k == self).unwrap()])
            }
        }
    };
}

define_keywords! {
    /// The reserved-word set of the permissive SQLite-compatible dialect this
    /// compiler analyzes, plus the `AS`/`USING` typed-column extension words.
    ///
    /// Keep this list ASCII-uppercase sorted; [`Keyword::lookup`] relies on it.
    Keyword => {
        ABORT, ACTION, ADD, AFTER, ALL, ALTER, ALWAYS, AND, ANY, AS, ASC, AUTOINCREMENT,
        BEFORE, BEGIN, BETWEEN, BY,
        CASCADE, CASE, CAST, CHECK, COLLATE, COLUMN, COMMIT, CONFLICT, CONSTRAINT,
        CREATE, CROSS, CURRENT_DATE, CURRENT_TIME, CURRENT_TIMESTAMP,
        DEFAULT, DEFERRABLE, DEFINE, DELETE, DESC, DISTINCT, DO, DROP,
        EACH, ELSE, END, ESCAPE, EXCEPT, EXCLUDED, EXISTS,
        FAIL, FALSE, FILTER, FIRST, FOR, FOREIGN, FROM, FULL,
        GENERATED, GLOB, GROUP,
        HAVING,
        IF, IGNORE, IN, INDEX, INNER, INSERT, INSTEAD, INTERSECT, INTO, IS, ISNULL,
        JOIN,
        KEY,
        LAST, LEFT, LIKE, LIMIT,
        MATCH,
        NATURAL, NO, NOT, NOTHING, NOTNULL, NULL, NULLS,
        OF, OFFSET, ON, OR, ORDER, OUTER, OVER,
        PRAGMA, PRIMARY,
        QUERY,
        RECURSIVE, REFERENCES, REGEXP, REINDEX, RENAME, REPLACE, RESTRICT, RETURNING, RIGHT,
        ROLLBACK, ROW, ROWID,
        SELECT, SET, STORED, STRICT,
        TABLE, TEMP, TEMPORARY, THEN, TO, TRANSACTION, TRIGGER, TRUE,
        UNION, UNIQUE, UPDATE, USING,
        VALUES, VIEW, VIRTUAL,
        WHEN, WHERE, WINDOW, WITH, WITHOUT,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keyword_strings_are_sorted() {
        let mut sorted = Keyword::KEYWORD_STRINGS.to_vec();
        sorted.sort_unstable();
        assert_eq!(Keyword::KEYWORD_STRINGS, sorted.as_slice());
    }

    #[test]
    fn lookup_roundtrips() {
        assert_eq!(Keyword::lookup("SELECT"), Some(Keyword::SELECT));
        assert_eq!(Keyword::lookup("select_typo"), None);
    }

    #[test]
    fn display_matches_spelling() {
        assert_eq!(Keyword::SELECT.to_string(), "SELECT");
    }
}
