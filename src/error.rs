// Copyright (C) 2026 by GiGa infosystems

//! Errors while reading the two dependency manifests
//!
//! Both of these are fatal for a run. Failures while resolving tags are non-fatal and live in
//! [`crate::tags::ResolveError`] instead.

use std::io;
use std::path::PathBuf;

/// A manifest could not be turned into a [`crate::Dependencies`] mapping
#[derive(Debug, thiserror::Error)]
pub enum ManifestError {
    #[error("error reading {path:?}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("error decoding {path:?}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: ParseError,
    },
}

/// The structure of a `Gopkg.lock` file is invalid
#[derive(Debug, thiserror::Error)]
pub enum ParseError {
    #[error("TOML parsing error: {0}")]
    Toml(#[from] toml_edit::TomlError),
    #[error("`projects` should be an array of tables")]
    ProjectsNotTables,
    #[error("field `{field}` of project #{index} should be a string")]
    FieldNotString { index: usize, field: &'static str },
}
