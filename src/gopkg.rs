// Copyright (C) 2026 by GiGa infosystems

//! Reads the locked projects of a `dep` `Gopkg.lock` into [`Dependencies`]

use crate::Dependencies;
use crate::error::{ManifestError, ParseError};
use crate::toml_edit::{TomlPathLookup, get_ignore_case, table_array};
use crate::util::short_revision;
use std::fs;
use std::path::Path;
use toml_edit::DocumentMut;

/// A single `[[projects]]` entry
#[derive(Clone, PartialEq, Eq, Debug, Default)]
pub struct Project {
    pub name: String,
    pub revision: Option<String>,
    pub version: Option<String>,
}

impl Project {
    /// The version this project is compared with: The tag if there is one, otherwise the
    /// shortened revision.
    ///
    /// Returns [`None`] if neither is set.
    pub fn version_token(&self) -> Option<&str> {
        match self.version.as_deref() {
            Some(version) if !version.is_empty() => Some(version),
            _ => self
                .revision
                .as_deref()
                .map(short_revision)
                .filter(|revision| !revision.is_empty()),
        }
    }
}

/// Parse all locked projects from the contents of a `Gopkg.lock`
///
/// A missing `projects` key is an empty lock file, missing fields are not an error.
pub fn projects(contents: &str) -> Result<Vec<Project>, ParseError> {
    let document = contents.parse::<DocumentMut>()?;

    let Some(projects) = document.path_lookup(["projects"]) else {
        return Ok(Vec::new());
    };
    let tables = table_array(projects).ok_or(ParseError::ProjectsNotTables)?;

    tables
        .into_iter()
        .enumerate()
        .map(|(index, table)| -> Result<Project, ParseError> {
            let field = |key: &'static str| match get_ignore_case(table, key) {
                None => Ok(None),
                Some(item) => item
                    .as_str()
                    .map(|value| Some(value.to_owned()))
                    .ok_or(ParseError::FieldNotString { index, field: key }),
            };

            Ok(Project {
                name: field("name")?.unwrap_or_default(),
                revision: field("revision")?,
                version: field("version")?,
            })
        })
        .collect()
}

/// Parse the contents of a `Gopkg.lock` into a mapping from import paths to versions
pub fn parse(contents: &str) -> Result<Dependencies, ParseError> {
    let mut out = Dependencies::new();

    for project in projects(contents)? {
        if project.name.is_empty() {
            log::warn!("Skipping a locked project without a name");
            continue;
        }

        match project.version_token() {
            Some(version) => {
                let version = version.to_owned();
                out.insert(project.name, version);
            }
            None => log::warn!(
                "Skipping locked project `{}` without a version or revision",
                project.name
            ),
        }
    }

    log::debug!("Read {} locked projects", out.len());
    Ok(out)
}

/// Read & parse a `Gopkg.lock` file
pub fn from_path(path: &Path) -> Result<Dependencies, ManifestError> {
    let contents = fs::read_to_string(path).map_err(|source| ManifestError::Read {
        path: path.to_owned(),
        source,
    })?;

    parse(&contents).map_err(|source| ManifestError::Parse {
        path: path.to_owned(),
        source,
    })
}
