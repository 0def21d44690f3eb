//! Template-set resolver
//!
//! Expands a named set into concrete items per category by following its
//! `extends` chain.
//!
//! # Algorithm (copy-on-recurse)
//!
//! Each recursive call receives the chain of set names above it *by value*.
//! A set already on its own ancestor chain is skipped, which breaks cycles
//! such as `a -> b -> a`. Sibling branches get independent copies of the
//! chain, so a set reachable along two non-cyclic paths (a diamond) is
//! still expanded on each path; deduplication then folds the repeats.
//!
//! Taken literally, that doubles the work at every diamond: a stack of
//! twenty diamonds means about a million expansions. Expanding a set only
//! depends on the chain when one of its descendants is on it, i.e. when a
//! cycle passes through the chain. Otherwise the result is the same as
//! resolving it from the top, so it is computed once per call and reused.
//!
//! For every category the result is: the set's own items, then each
//! parent's resolved items in `extends` order, deduplicated by first
//! occurrence.
//!
//! Names missing from the catalog resolve to nothing. Reporting an unknown
//! top-level name is the caller's job (see [`Catalog::require`]).

use serde::Serialize;
use std::collections::{BTreeMap, HashMap, HashSet};

use crate::manifest::Catalog;
use crate::types::Category;

/// Items of a resolved set, one ordered list per category.
///
/// All six categories are always present, possibly empty.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ResolvedSet {
    items: BTreeMap<Category, Vec<String>>,
}

impl Default for ResolvedSet {
    fn default() -> Self {
        Self {
            items: Category::all().map(|c| (c, Vec::new())).collect(),
        }
    }
}

impl ResolvedSet {
    pub fn get(&self, category: Category) -> &[String] {
        self.items.get(&category).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Categories in installation order with their items.
    pub fn iter(&self) -> impl Iterator<Item = (Category, &[String])> {
        self.items.iter().map(|(c, v)| (*c, v.as_slice()))
    }

    /// Total item count across categories.
    pub fn total(&self) -> usize {
        self.items.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.total() == 0
    }

    fn extend(&mut self, other: ResolvedSet) {
        for (category, items) in other.items {
            self.items.entry(category).or_default().extend(items);
        }
    }

    fn dedup(&mut self) {
        for items in self.items.values_mut() {
            let mut seen = HashSet::new();
            items.retain(|item| seen.insert(item.clone()));
        }
    }
}

/// Resolve `set_name` against `catalog`, following `extends`.
pub fn resolve_set(catalog: &Catalog, set_name: &str) -> ResolvedSet {
    Resolver::new(catalog).resolve(set_name, HashSet::new())
}

/// Per-call resolution state.
///
/// A set whose descendants are disjoint from the current chain resolves the
/// same as it would from the top, so that result is memoized. In an acyclic
/// catalog every lookup qualifies and each set is expanded once.
struct Resolver<'a> {
    catalog: &'a Catalog,
    descendants: HashMap<&'a str, HashSet<&'a str>>,
    memo: HashMap<&'a str, ResolvedSet>,
}

impl<'a> Resolver<'a> {
    fn new(catalog: &'a Catalog) -> Self {
        Self {
            catalog,
            descendants: HashMap::new(),
            memo: HashMap::new(),
        }
    }

    fn resolve(&mut self, set_name: &'a str, mut chain: HashSet<&'a str>) -> ResolvedSet {
        if chain.contains(set_name) {
            tracing::debug!(set = set_name, "skipping cyclic extends");
            return ResolvedSet::default();
        }
        let catalog = self.catalog;
        let Some(def) = catalog.get(set_name) else {
            tracing::debug!(set = set_name, "extends references unknown set");
            return ResolvedSet::default();
        };

        let independent = self.is_chain_independent(set_name, &chain);
        if independent {
            if let Some(hit) = self.memo.get(set_name) {
                return hit.clone();
            }
        }
        chain.insert(set_name);

        let mut result = ResolvedSet {
            items: Category::all()
                .map(|c| (c, def.items(c).to_vec()))
                .collect(),
        };

        for parent in &def.extends {
            result.extend(self.resolve(parent, chain.clone()));
        }

        result.dedup();
        if independent {
            self.memo.insert(set_name, result.clone());
        }
        result
    }

    fn is_chain_independent(&mut self, set_name: &'a str, chain: &HashSet<&'a str>) -> bool {
        chain.is_empty() || self.descendants(set_name).is_disjoint(chain)
    }

    /// Every name reachable through `extends`, unknown names included.
    fn descendants(&mut self, set_name: &'a str) -> &HashSet<&'a str> {
        let catalog = self.catalog;
        self.descendants.entry(set_name).or_insert_with(|| {
            let mut seen = HashSet::new();
            let mut stack: Vec<&'a str> = catalog
                .get(set_name)
                .map(|def| def.extends.iter().map(String::as_str).collect())
                .unwrap_or_default();
            while let Some(current) = stack.pop() {
                if seen.insert(current) {
                    if let Some(def) = catalog.get(current) {
                        stack.extend(def.extends.iter().map(String::as_str));
                    }
                }
            }
            seen
        })
    }
}
