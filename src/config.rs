// Copyright (C) 2026 by GiGa infosystems

//! The configuration of a single run & the function driving it, see [`run`]

use crate::diff::Diff;
use crate::tags::{Credentials, GitHubTags, Offline, TagResolver};
use crate::{gopkg, go_list};
use color_eyre::Result;
use serde::Serialize;
use std::io::Write;
use std::path::PathBuf;

/// How the report gets written
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum OutputFormat {
    /// `Removed:`, `Added:` and `Changed:` sections
    Text,
    /// A single line of JSON
    Json,
    /// Indented JSON
    PrettyJson,
}

/// Everything a run needs, built once from the command line
#[derive(Clone, Debug)]
pub struct Config {
    /// The `dep` `Gopkg.lock` file
    pub lock_path: PathBuf,
    /// A file containing the output of `go list -m all`
    pub list_path: PathBuf,
    pub credentials: Option<Credentials>,
    /// The base URL of the GitHub API
    pub github_api: String,
    /// Never look up tags, which treats every version change as significant
    pub offline: bool,
    pub format: OutputFormat,
}

impl Config {
    /// The [`TagResolver`] this configuration asks for
    pub fn resolver(&self) -> Result<Box<dyn TagResolver>> {
        if self.offline {
            return Ok(Box::new(Offline));
        }

        let github = GitHubTags::new(&self.github_api, self.credentials.clone())?;
        Ok(Box::new(github))
    }
}

fn write_json(out: &mut impl Write, value: &impl Serialize, pretty: bool) -> Result<()> {
    if pretty {
        serde_json::to_writer_pretty(&mut *out, value)?;
    } else {
        serde_json::to_writer(&mut *out, value)?;
    }
    writeln!(out)?;
    Ok(())
}

/// Read both manifests, diff them and write the report to `out`
///
/// Failing to read either manifest aborts before anything is written.
pub fn run(config: Config, resolver: &impl TagResolver, out: &mut impl Write) -> Result<()> {
    let old = gopkg::from_path(&config.lock_path)?;
    let new = go_list::from_path(&config.list_path)?;

    let diff = Diff::between(&old, &new, resolver);

    match config.format {
        OutputFormat::Text => write!(out, "{diff}")?,
        OutputFormat::Json => write_json(out, &diff, false)?,
        OutputFormat::PrettyJson => write_json(out, &diff, true)?,
    }
    out.flush()?;

    Ok(())
}
