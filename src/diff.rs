// Copyright (C) 2026 by GiGa infosystems

//! Generate a diff between two [`Dependencies`] mappings, see [`Diff::between`].

use crate::Dependencies;
use crate::tags::{TagIndex, TagResolver};
use itertools::{EitherOrBoth, Itertools};
use serde::Serialize;
use std::fmt;

/// A dependency that only exists on one side
#[derive(Serialize, Clone, Copy, PartialEq, Eq, Debug)]
pub struct Entry<'a> {
    pub name: &'a str,
    pub version: &'a str,
}

/// A dependency that exists on both sides with different versions
#[derive(Serialize, Clone, Copy, PartialEq, Eq, Debug)]
pub struct Change<'a> {
    pub name: &'a str,
    pub old_version: &'a str,
    pub new_version: &'a str,
}

/// How a single dependency differs between the two sides
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Classification {
    Removed,
    Added,
    /// The version changed, and it wasn't possible to show that both versions are the same
    /// commit
    ChangedSignificant,
    /// The version changed, but both versions point to the same commit
    ChangedInsignificant,
}

/// Check if two different versions are aliases of the same commit according to `tags`
///
/// This is the case if both are tags of the same commit, or if one is a tag of the commit the
/// other one names directly.
pub fn is_aliased(tags: &TagIndex, old_version: &str, new_version: &str) -> bool {
    let old_commit = tags.get(old_version);
    let new_commit = tags.get(new_version);

    (old_commit.is_some() && old_commit == new_commit)
        || old_commit.is_some_and(|commit| commit == new_version)
        || new_commit.is_some_and(|commit| commit == old_version)
}

/// Classify a version change of `name` by looking up its tags
///
/// Resolution errors are logged & treated like a dependency without tags, meaning the change is
/// significant.
pub fn classify_change(
    resolver: &impl TagResolver,
    name: &str,
    old_version: &str,
    new_version: &str,
) -> Classification {
    let tags = match resolver.resolve(name) {
        Ok(Some(tags)) => tags,
        Ok(None) => return Classification::ChangedSignificant,
        Err(err) => {
            log::warn!("Error retrieving alternative tags for `{name}`: {err}");
            return Classification::ChangedSignificant;
        }
    };

    if is_aliased(&tags, old_version, new_version) {
        log::debug!("`{name}` {old_version} and {new_version} are the same commit");
        Classification::ChangedInsignificant
    } else {
        Classification::ChangedSignificant
    }
}

/// Classify a dependency by its version on either side, or [`None`] if it is unchanged
///
/// `resolver` is only asked if the dependency exists on both sides with different versions.
pub fn classify(
    resolver: &impl TagResolver,
    name: &str,
    old_version: Option<&str>,
    new_version: Option<&str>,
) -> Option<Classification> {
    match (old_version, new_version) {
        (Some(_), None) => Some(Classification::Removed),
        (None, Some(_)) => Some(Classification::Added),
        (Some(old_version), Some(new_version)) if old_version != new_version => {
            Some(classify_change(resolver, name, old_version, new_version))
        }
        _ => None,
    }
}

/// The differences between a `Gopkg.lock` (on the left) and `go list -m all` (on the right)
///
/// Every list is sorted by name.
#[derive(Serialize, Debug, Default, PartialEq, Eq)]
pub struct Diff<'a> {
    pub removed: Vec<Entry<'a>>,
    pub added: Vec<Entry<'a>>,
    pub changed: Vec<Change<'a>>,
    /// Version changes that only switch between aliases of the same commit
    pub aliased: Vec<Change<'a>>,
}

impl<'a> Diff<'a> {
    /// Returns the differences between two [`Dependencies`]
    ///
    /// `resolver` is only asked about dependencies whose version changed, one at a time.
    pub fn between(
        old: &'a Dependencies,
        new: &'a Dependencies,
        resolver: &impl TagResolver,
    ) -> Self {
        let mut diff = Diff::default();

        for item in old
            .iter()
            .merge_join_by(new.iter(), |(left, _), (right, _)| left.cmp(right))
        {
            let (name, old_version, new_version) = match item {
                EitherOrBoth::Left((name, version)) => (name, Some(version.as_str()), None),
                EitherOrBoth::Right((name, version)) => (name, None, Some(version.as_str())),
                EitherOrBoth::Both((name, old_version), (_, new_version)) => {
                    (name, Some(old_version.as_str()), Some(new_version.as_str()))
                }
            };

            let Some(classification) = classify(resolver, name, old_version, new_version) else {
                continue;
            };

            match (classification, old_version, new_version) {
                (Classification::Removed, Some(version), _) => {
                    diff.removed.push(Entry { name, version });
                }
                (Classification::Added, _, Some(version)) => {
                    diff.added.push(Entry { name, version });
                }
                (changed, Some(old_version), Some(new_version)) => {
                    let change = Change {
                        name,
                        old_version,
                        new_version,
                    };
                    if changed == Classification::ChangedInsignificant {
                        diff.aliased.push(change);
                    } else {
                        diff.changed.push(change);
                    }
                }
                _ => unreachable!("classified from the versions that are present"),
            }
        }

        diff
    }
}

/// The plain text report, with `Removed:`, `Added:` and `Changed:` sections in that order
impl fmt::Display for Diff<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Removed:")?;
        for Entry { name, version } in &self.removed {
            writeln!(f, "-  {name} {version}")?;
        }
        writeln!(f)?;

        writeln!(f, "Added:")?;
        for Entry { name, version } in &self.added {
            writeln!(f, "+  {name} {version}")?;
        }
        writeln!(f)?;

        writeln!(f, "Changed:")?;
        for Change {
            name,
            old_version,
            new_version,
        } in &self.changed
        {
            writeln!(f, "!  {name} {old_version} => {new_version}")?;
        }

        Ok(())
    }
}
