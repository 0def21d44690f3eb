//! Search tags
//!
//! A tag is a shortcut for a list of template paths. Composite tags list
//! other tags instead, e.g. `fullstack` expands to `frontend`, `backend` and
//! `git`.
//!
//! | Kind      | Tags |
//! |-----------|------|
//! | Usage     | review, debug, test, security, git, database, ai, devops, docs, performance, backup |
//! | Composite | frontend, backend, fullstack, ml |
//!
//! The built-in table is plain data; resolution takes a `&TagTable` so tests
//! can hand in their own.

use std::collections::BTreeMap;

const BUILTIN_TAGS: &[(&str, &[&str])] = &[
    (
        "review",
        &[
            "agents/development-tools/code-reviewer",
            "agents/development-tools/code-simplifier",
            "skills/development/code-reviewer",
        ],
    ),
    (
        "debug",
        &[
            "agents/development-tools/debugger",
            "agents/development-tools/error-detective",
        ],
    ),
    (
        "test",
        &[
            "agents/development-tools/test-engineer",
            "skills/development/test-driven-development",
        ],
    ),
    (
        "security",
        &[
            "agents/security/security-auditor",
            "agents/security/api-security-audit",
            "hooks/security/security-scanner",
        ],
    ),
    (
        "git",
        &[
            "commands/git/feature",
            "commands/git/hotfix",
            "hooks/git/commit-message-validator",
        ],
    ),
    (
        "database",
        &[
            "mcps/database/postgresql-integration",
            "mcps/database/supabase",
            "mcps/database/mysql",
        ],
    ),
    (
        "ai",
        &[
            "agents/data-ai/data-scientist",
            "agents/data-ai/ml-engineer",
            "agents/data-ai/nlp-engineer",
            "agents/data-ai/computer-vision-engineer",
        ],
    ),
    (
        "devops",
        &[
            "agents/devops-infrastructure/docker-specialist",
            "agents/devops-infrastructure/kubernetes-expert",
            "commands/deployment/docker-deploy",
        ],
    ),
    (
        "docs",
        &[
            "agents/documentation/documentation-writer",
            "commands/documentation/generate-docs",
        ],
    ),
    (
        "performance",
        &[
            "agents/development-tools/performance-profiler",
            "hooks/performance/benchmark",
        ],
    ),
    ("backup", &["hooks/pre-tool/backup-before-edit"]),
    // Project types (composite)
    ("frontend", &["review", "test", "performance"]),
    ("backend", &["security", "database", "debug"]),
    ("fullstack", &["frontend", "backend", "git"]),
    ("ml", &["ai", "database", "test"]),
];

/// Immutable tag → values mapping. Keys are lower-case.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TagTable {
    tags: BTreeMap<String, Vec<String>>,
}

impl TagTable {
    /// The tags shipped with the tool.
    pub fn builtin() -> Self {
        Self::from_entries(
            BUILTIN_TAGS
                .iter()
                .map(|(tag, values)| (*tag, values.iter().copied())),
        )
    }

    /// Build a table; tag names are lower-cased, values are kept verbatim.
    pub fn from_entries<I, K, V, S>(entries: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let tags = entries
            .into_iter()
            .map(|(tag, values)| {
                (
                    tag.as_ref().to_lowercase(),
                    values.into_iter().map(Into::into).collect(),
                )
            })
            .collect();
        Self { tags }
    }

    /// Case-insensitive lookup of a requested tag.
    pub fn get(&self, tag: &str) -> Option<&[String]> {
        self.tags.get(&tag.to_lowercase()).map(Vec::as_slice)
    }

    /// Exact key test, used for values inside the table.
    pub fn contains_key(&self, key: &str) -> bool {
        self.tags.contains_key(key)
    }

    /// True when any of the tag's values is itself a tag.
    pub fn is_composite(&self, tag: &str) -> bool {
        self.get(tag)
            .is_some_and(|values| values.iter().any(|v| self.contains_key(v)))
    }

    /// Tags that map only to template paths, sorted.
    pub fn usage_tags(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.iter().filter(move |(tag, _)| !self.is_composite(tag))
    }

    /// Tags that reference other tags, sorted.
    pub fn composite_tags(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.iter().filter(move |(tag, _)| self.is_composite(tag))
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.tags.iter().map(|(k, v)| (k.as_str(), v.as_slice()))
    }

    pub fn len(&self) -> usize {
        self.tags.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tags.is_empty()
    }
}
