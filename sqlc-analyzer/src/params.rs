use std::collections::HashMap;

use sqlc_ast::{BindParam, BindParamKind};
use sqlc_types::{Type, Unifier};

use sqlc_ir::Parameter as IrParameter;

/// A naming hint derived from the syntactic context a bind parameter
/// appeared in (spec.md §4.4's "Parameter naming" rules), used only for
/// anonymous `?` occurrences and as a fallback label for `?N`/`:name`
/// parameters that have no better name of their own.
#[derive(Clone, Debug)]
pub enum NameHint {
    /// `col = ?`: take the column's name.
    Column(String),
    /// `col IN ?`: take the pluralized column name.
    InList(String),
    /// The lower bound of `col BETWEEN ? AND ?`.
    BetweenLower(String),
    /// The upper bound of `col BETWEEN ? AND ?`.
    BetweenUpper(String),
    /// No applicable hint; synthesize `param`, `param2`, ...
    None,
}

impl NameHint {
    fn label(&self) -> Option<String> {
        match self {
            NameHint::Column(name) => Some(name.clone()),
            NameHint::InList(name) => Some(pluralize(name)),
            NameHint::BetweenLower(name) => Some(format!("{name}Lower")),
            NameHint::BetweenUpper(name) => Some(format!("{name}Upper")),
            NameHint::None => None,
        }
    }
}

fn pluralize(name: &str) -> String {
    if name.ends_with('s') {
        name.to_string()
    } else {
        format!("{name}s")
    }
}

struct Entry {
    key: String,
    explicit_index: Option<u32>,
    name: String,
    ty: Type,
    nullable: bool,
    variadic: bool,
}

/// Collects every bind parameter occurrence in one statement into a stable,
/// 1-indexed parameter list (spec.md §3/§4.4/§8's permutation invariant).
/// Named parameters (`:name`) occurring more than once share a single slot
/// (their types unify); `?N` pins a slot to that explicit index; anonymous
/// `?` each get their own slot, named from the calling context.
#[derive(Default)]
pub struct ParamCollector {
    entries: Vec<Entry>,
    key_positions: HashMap<String, usize>,
    fallback_count: u32,
}

impl ParamCollector {
    /// A fresh collector with no parameters seen yet.
    pub fn new() -> Self {
        Self::default()
    }

    /// Records (or re-unifies) one bind-parameter occurrence, returning its
    /// type (a fresh type variable the first time it is seen; the unified
    /// type on a repeat occurrence).
    pub fn record(&mut self, param: &BindParam, hint: NameHint, unifier: &mut Unifier) -> Type {
        let key = match param.kind {
            BindParamKind::Named => param.name.clone().unwrap_or_default(),
            BindParamKind::Indexed(n) => format!("#{n}"),
            BindParamKind::Anonymous => format!("$anon{}", self.entries.len()),
        };
        if let Some(&position) = self.key_positions.get(&key) {
            let existing_ty = self.entries[position].ty.clone();
            let fresh = unifier.new_var();
            let unified = unifier.unify(&existing_ty, &fresh).unwrap_or(Type::Error);
            self.entries[position].ty = unified.clone();
            return unified;
        }
        let ty = unifier.new_var();
        let explicit_index = match param.kind {
            BindParamKind::Indexed(n) => Some(n),
            _ => None,
        };
        let name = hint.label().unwrap_or_else(|| {
            self.fallback_count += 1;
            if self.fallback_count == 1 {
                "param".to_string()
            } else {
                format!("param{}", self.fallback_count)
            }
        });
        let name = match param.kind {
            BindParamKind::Named => param.name.clone().unwrap_or(name),
            _ => name,
        };
        self.key_positions.insert(key.clone(), self.entries.len());
        self.entries.push(Entry {
            key,
            explicit_index,
            name,
            ty: ty.clone(),
            nullable: false,
            variadic: false,
        });
        ty
    }

    /// Marks the slot `param` resolved to as nullable (used once its
    /// unified type has been seen to be `Optional`).
    pub fn mark_nullable(&mut self, param: &BindParam) {
        self.with_slot(param, |entry| entry.nullable = true);
    }

    /// Marks the slot `param` resolved to as variadic: it appeared in an
    /// `IN (...)` position and accepts zero or more values of its type
    /// rather than exactly one (spec.md §3).
    pub fn mark_variadic(&mut self, param: &BindParam) {
        self.with_slot(param, |entry| entry.variadic = true);
    }

    fn with_slot(&mut self, param: &BindParam, f: impl FnOnce(&mut Entry)) {
        let key = match param.kind {
            BindParamKind::Named => param.name.clone().unwrap_or_default(),
            BindParamKind::Indexed(n) => format!("#{n}"),
            BindParamKind::Anonymous => {
                let Some(last) = self.entries.len().checked_sub(1) else { return };
                f(&mut self.entries[last]);
                return;
            }
        };
        if let Some(&position) = self.key_positions.get(&key) {
            f(&mut self.entries[position]);
        }
    }

    /// Finalizes the collected parameters into spec.md §4.7's ordered,
    /// 1-indexed list: explicit `?N` indices are honored first, then every
    /// remaining slot is assigned the next free index in discovery order.
    pub fn finish(mut self, unifier: &mut Unifier) -> Vec<IrParameter> {
        let mut taken: Vec<bool> = vec![false; self.entries.len() + 1];
        for entry in &self.entries {
            if let Some(n) = entry.explicit_index {
                if (n as usize) < taken.len() {
                    taken[n as usize] = true;
                }
            }
        }
        let mut next_free = 1u32;
        let mut assigned_indices = Vec::with_capacity(self.entries.len());
        for entry in &self.entries {
            let index = match entry.explicit_index {
                Some(n) => n,
                None => {
                    while (next_free as usize) < taken.len() && taken[next_free as usize] {
                        next_free += 1;
                    }
                    let n = next_free;
                    if (n as usize) < taken.len() {
                        taken[n as usize] = true;
                    }
                    next_free += 1;
                    n
                }
            };
            assigned_indices.push(index);
        }
        self.entries
            .drain(..)
            .zip(assigned_indices)
            .map(|(entry, index)| {
                let ty = unifier.resolve_deep(&entry.ty);
                let nullable = entry.nullable || ty.is_optional();
                IrParameter { index, name: entry.name, ty, nullable, variadic: entry.variadic }
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sqlc_diagnostics::Span;

    fn anon() -> BindParam {
        BindParam { kind: BindParamKind::Anonymous, name: None, span: Span::new(0, 1) }
    }

    fn named(name: &str) -> BindParam {
        BindParam { kind: BindParamKind::Named, name: Some(name.to_string()), span: Span::new(0, 1) }
    }

    #[test]
    fn named_parameter_reused_across_occurrences_shares_one_slot() {
        let mut u = Unifier::new();
        let mut collector = ParamCollector::new();
        collector.record(&named("id"), NameHint::None, &mut u);
        collector.record(&named("id"), NameHint::None, &mut u);
        let params = collector.finish(&mut u);
        assert_eq!(params.len(), 1);
        assert_eq!(params[0].name, "id");
        assert_eq!(params[0].index, 1);
    }

    #[test]
    fn anonymous_parameters_each_get_their_own_slot() {
        let mut u = Unifier::new();
        let mut collector = ParamCollector::new();
        collector.record(&anon(), NameHint::Column("a".into()), &mut u);
        collector.record(&anon(), NameHint::Column("b".into()), &mut u);
        let params = collector.finish(&mut u);
        assert_eq!(params.len(), 2);
        assert_eq!(params[0].index, 1);
        assert_eq!(params[1].index, 2);
        assert_eq!(params[0].name, "a");
        assert_eq!(params[1].name, "b");
    }

    #[test]
    fn in_list_hint_pluralizes_the_column_name() {
        let mut u = Unifier::new();
        let mut collector = ParamCollector::new();
        collector.record(&anon(), NameHint::InList("bar".into()), &mut u);
        let params = collector.finish(&mut u);
        assert_eq!(params[0].name, "bars");
    }

    #[test]
    fn fallback_names_are_deduplicated() {
        let mut u = Unifier::new();
        let mut collector = ParamCollector::new();
        collector.record(&anon(), NameHint::None, &mut u);
        collector.record(&anon(), NameHint::None, &mut u);
        let params = collector.finish(&mut u);
        assert_eq!(params[0].name, "param");
        assert_eq!(params[1].name, "param2");
    }
}
