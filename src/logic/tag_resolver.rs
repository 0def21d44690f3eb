//! Tag resolver
//!
//! Expands requested tags into concrete template paths.
//!
//! # Algorithm (shared accumulator, mark-on-entry)
//!
//! One accumulator is threaded by `&mut` through the whole expansion. It
//! holds the resolved paths and the tags already entered. A tag is marked
//! *before* its values are walked, so a tag that reaches itself (directly,
//! or through other tags) is never entered twice and expansion always
//! terminates. Entering a tag only once also means shared sub-tags such as
//! `database` under both `backend` and `ml` are walked a single time.
//!
//! Requested tokens are matched case-insensitively. A token that names no
//! tag is taken as a literal path, spelled as given. Values inside
//! the table are matched exactly against the (lower-case) tag names.

use std::collections::{BTreeSet, HashSet};

use crate::tags::TagTable;

#[derive(Default)]
struct Accumulator {
    paths: BTreeSet<String>,
    entered: HashSet<String>,
}

/// Resolve tags (or literal paths) into a sorted set of template paths.
pub fn resolve_tags<S: AsRef<str>>(table: &TagTable, tags: &[S]) -> BTreeSet<String> {
    let mut acc = Accumulator::default();
    for tag in tags {
        let tag = tag.as_ref();
        let key = tag.to_lowercase();
        if table.contains_key(&key) {
            expand(table, &key, &mut acc);
        } else {
            acc.paths.insert(tag.to_string());
        }
    }
    acc.paths
}

fn expand(table: &TagTable, key: &str, acc: &mut Accumulator) {
    if !acc.entered.insert(key.to_string()) {
        return;
    }
    let Some(values) = table.get(key) else {
        return;
    };
    for value in values {
        if table.contains_key(value) {
            if acc.entered.contains(value) {
                tracing::trace!(tag = key, nested = value.as_str(), "already expanded");
            } else {
                expand(table, value, acc);
            }
        } else {
            acc.paths.insert(value.clone());
        }
    }
}
