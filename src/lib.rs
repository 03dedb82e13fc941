// Copyright (C) 2026 by GiGa infosystems

//! `gopkg-moddiff` compares the dependencies locked by `dep` in a `Gopkg.lock` with the modules
//! resolved by Go modules (as listed by `go list -m all`), to review a migration from one to the
//! other.
//!
//! The order of operations is:
//! * Read both sides into [`Dependencies`] with [`gopkg`] & [`go_list`]
//! * Build a [`diff::Diff`] of removed, added & changed dependencies with [`diff::Diff::between`]
//! * For changed dependencies, look up tags with a [`tags::TagResolver`] to hide changes that
//!   only switch between a tag & the revision it points to
//!
//! Versions are compared as plain strings. Revisions are shortened to
//! [`util::SHORT_REVISION_LEN`] characters everywhere, so the same commit compares equal.

use std::collections::BTreeMap;

/// A mapping from import paths to versions (a tag or a shortened revision)
pub type Dependencies = BTreeMap<String, String>;

pub mod config;
pub mod diff;
pub mod error;
pub mod go_list;
pub mod gopkg;
pub mod tags;
pub mod toml_edit;
pub mod util;
