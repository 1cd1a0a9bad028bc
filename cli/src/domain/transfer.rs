//! Transfer mappings and prefix classification of command-line tokens.
//!
//! Pure string manipulation: remote paths are always POSIX paths, and local
//! paths are compared as literal strings, never canonicalised.

use std::collections::btree_map::{self, BTreeMap};
use std::collections::BTreeSet;

use crate::domain::error::ConfigError;

/// Separator stripped from the end of a source prefix before matching.
pub const PATH_SEPARATOR: char = '/';

/// Mapping from a local path to its remote counterpart.
///
/// Keys are unique by construction. Iteration order is sorted by local path
/// so generated transfer scripts are stable from run to run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TransferMap {
    entries: BTreeMap<String, String>,
}

impl TransferMap {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if `local` is a key of this mapping.
    #[must_use]
    pub fn contains(&self, local: &str) -> bool {
        self.entries.contains_key(local)
    }

    /// Remote path mapped to `local`, if any.
    #[must_use]
    pub fn get(&self, local: &str) -> Option<&str> {
        self.entries.get(local).map(String::as_str)
    }

    /// Iterate `(local, remote)` pairs in local-path order.
    pub fn iter(&self) -> Iter<'_> {
        Iter {
            inner: self.entries.iter(),
        }
    }

    /// Insert a new entry, rejecting a local path that is already mapped.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::DuplicateTransfer`] if `local` is already a key.
    pub fn insert(
        &mut self,
        local: impl Into<String>,
        remote: impl Into<String>,
    ) -> Result<(), ConfigError> {
        let local = local.into();
        let remote = remote.into();
        match self.entries.entry(local) {
            btree_map::Entry::Occupied(slot) => Err(ConfigError::DuplicateTransfer {
                path: slot.key().clone(),
                existing: slot.get().clone(),
                requested: remote,
            }),
            btree_map::Entry::Vacant(slot) => {
                slot.insert(remote);
                Ok(())
            }
        }
    }

    /// Union `other` into `self`. No key may appear in both.
    ///
    /// On error `self` is left unchanged.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::DuplicateTransfer`] for the first shared key.
    pub fn merge(&mut self, other: &TransferMap) -> Result<(), ConfigError> {
        if let Some((local, remote)) = other.iter().find(|(local, _)| self.contains(local)) {
            return Err(ConfigError::DuplicateTransfer {
                path: local.to_string(),
                existing: self.get(local).unwrap_or_default().to_string(),
                requested: remote.to_string(),
            });
        }
        for (local, remote) in other.iter() {
            self.entries.insert(local.to_string(), remote.to_string());
        }
        Ok(())
    }

    /// Distinct, non-empty parent directories of the remote paths.
    #[must_use]
    pub fn remote_parent_dirs(&self) -> Vec<String> {
        distinct_parents(self.entries.values())
    }

    /// Distinct, non-empty parent directories of the local paths.
    #[must_use]
    pub fn local_parent_dirs(&self) -> Vec<String> {
        distinct_parents(self.entries.keys())
    }
}

impl<'a> IntoIterator for &'a TransferMap {
    type Item = (&'a str, &'a str);
    type IntoIter = Iter<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Iterator over `(local, remote)` pairs of a [`TransferMap`].
pub struct Iter<'a> {
    inner: btree_map::Iter<'a, String, String>,
}

impl<'a> Iterator for Iter<'a> {
    type Item = (&'a str, &'a str);

    fn next(&mut self) -> Option<Self::Item> {
        self.inner
            .next()
            .map(|(local, remote)| (local.as_str(), remote.as_str()))
    }
}

fn distinct_parents<'a>(paths: impl Iterator<Item = &'a String>) -> Vec<String> {
    paths
        .map(|p| parent_dir(p))
        .filter(|dir| !dir.is_empty())
        .map(str::to_owned)
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

/// Classify `tokens` against `source_prefix`.
///
/// One trailing separator is stripped from `source_prefix`; every token that
/// starts with the result is mapped to `dest_prefix` followed by the rest of
/// the token, verbatim. The match is a literal string prefix, so
/// `/data/in` also claims `/data/input.txt`.
#[must_use]
pub fn find_transfers<S: AsRef<str>>(
    tokens: &[S],
    source_prefix: &str,
    dest_prefix: &str,
) -> TransferMap {
    let source_prefix = source_prefix
        .strip_suffix(PATH_SEPARATOR)
        .unwrap_or(source_prefix);

    let mut map = TransferMap::new();
    for token in tokens {
        let token = token.as_ref();
        if let Some(rest) = token.strip_prefix(source_prefix) {
            map.entries
                .entry(token.to_string())
                .or_insert_with(|| format!("{dest_prefix}{rest}"));
        }
    }
    map
}

/// Replace every token that is a key of one of `maps` with its remote path.
///
/// Tokens are looked up in `maps` order; other tokens pass through unchanged
/// and order is preserved.
#[must_use]
pub fn rewrite_command<S: AsRef<str>>(tokens: &[S], maps: &[&TransferMap]) -> Vec<String> {
    tokens
        .iter()
        .map(|token| {
            let token = token.as_ref();
            maps.iter()
                .find_map(|map| map.get(token))
                .unwrap_or(token)
                .to_string()
        })
        .collect()
}

/// Join two remote (POSIX) path components.
///
/// An absolute `child` replaces `base`, as a shell `cd` would.
#[must_use]
pub fn join_remote(base: &str, child: &str) -> String {
    if child.starts_with(PATH_SEPARATOR) || base.is_empty() {
        child.to_string()
    } else if base.ends_with(PATH_SEPARATOR) {
        format!("{base}{child}")
    } else {
        format!("{base}{PATH_SEPARATOR}{child}")
    }
}

/// Directory part of a POSIX path; empty when the path has no separator.
///
/// Trailing separators on the directory part are removed unless the
/// directory is the root itself.
#[must_use]
pub fn parent_dir(path: &str) -> &str {
    let Some(idx) = path.rfind(PATH_SEPARATOR) else {
        return "";
    };
    let head = &path[..=idx];
    let trimmed = head.trim_end_matches(PATH_SEPARATOR);
    if trimmed.is_empty() {
        head
    } else {
        trimmed
    }
}
