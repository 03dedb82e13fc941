// Copyright (C) 2026 by GiGa infosystems

//! Reads the output of `go list -m all` into [`Dependencies`]
//!
//! Every line is `<module path> <version> [further fields]`. Lines with fewer fields (such as the
//! main module, which has no version) are skipped, this input is never rejected.

use crate::Dependencies;
use crate::error::ManifestError;
use std::fs;
use std::path::Path;

/// Normalize a module version so it compares equal to what `dep` locked
///
/// Build metadata after a `+` (e.g. `+incompatible`) is dropped. Pseudo-versions
/// (`vX.Y.Z-yyyymmddhhmmss-abcdefabcdef`) are reduced to their revision, which is the last
/// `-`-delimited segment. Versions with fewer than three segments, like `v2.0.0-rc1`, are plain
/// pre-releases and are kept as they are.
pub fn normalize_version(version: &str) -> &str {
    let version = version
        .split_once('+')
        .map_or(version, |(version, _metadata)| version);

    if version.split('-').nth(2).is_some() {
        version.rsplit('-').next().unwrap_or(version)
    } else {
        version
    }
}

/// Parse a single line, returning the module path & normalized version
pub fn parse_line(line: &str) -> Option<(&str, &str)> {
    let mut fields = line.split_whitespace();
    let name = fields.next()?;
    let version = fields.next()?;
    Some((name, normalize_version(version)))
}

/// Parse the full output of `go list -m all`
pub fn parse(contents: &str) -> Dependencies {
    let mut out = Dependencies::new();

    for line in contents.lines() {
        match parse_line(line) {
            Some((name, version)) => {
                out.insert(name.to_owned(), version.to_owned());
            }
            None if !line.trim().is_empty() => log::debug!("Skipping line {line:?}"),
            None => (),
        }
    }

    log::debug!("Read {} modules", out.len());
    out
}

/// Read & parse a file containing the output of `go list -m all`
pub fn from_path(path: &Path) -> Result<Dependencies, ManifestError> {
    let contents = fs::read_to_string(path).map_err(|source| ManifestError::Read {
        path: path.to_owned(),
        source,
    })?;
    Ok(parse(&contents))
}
