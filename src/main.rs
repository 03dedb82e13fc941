// Copyright (C) 2026 by GiGa infosystems

use std::ffi::OsString;
use std::io::{self, IsTerminal};
use std::path::PathBuf;

use clap::Parser;
use color_eyre::{
    Result,
    eyre::{Report, bail},
};

use gopkg_moddiff::config::{Config, OutputFormat, run};
use gopkg_moddiff::tags::{Credentials, GITHUB_API};

/// This program compares the dependencies locked by `dep` in a `Gopkg.lock` with the output of
/// `go list -m all`, and lists removed, added & changed dependencies.
///
/// Changes between a tag and the revision it points to (or between two tags of the same commit)
/// are looked up on GitHub and left out.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// The `dep` Gopkg.lock file
    #[arg(short = 'd', value_name = "PATH")]
    dep_lock: Option<PathBuf>,
    /// A file containing the output of `go list -m all`
    #[arg(short = 'm', value_name = "PATH")]
    go_list: Option<PathBuf>,
    /// Username to authenticate with GitHub (optional)
    #[arg(short = 'u', value_name = "USERNAME", env = "GITHUB_USERNAME")]
    username: Option<String>,
    /// Password or personal access token to authenticate with GitHub (optional)
    #[arg(
        short = 'p',
        value_name = "PASSWORD",
        env = "GITHUB_TOKEN",
        hide_env_values = true
    )]
    password: Option<String>,
    /// Output the report as JSON, including changes that were left out as aliases
    #[arg(long)]
    json: bool,
    /// Don't look up tags, every version change is reported
    #[arg(long)]
    offline: bool,
    /// The base URL of the GitHub API
    #[arg(long, value_name = "URL", default_value = GITHUB_API)]
    github_api: String,
}

impl TryFrom<Args> for Config {
    type Error = Report;

    fn try_from(args: Args) -> Result<Self> {
        let Some(lock_path) = args.dep_lock else {
            bail!("No dep Gopkg.lock file provided.");
        };

        let Some(list_path) = args.go_list else {
            bail!("No file containing the output of 'go list -m all' provided.");
        };

        let format = match (args.json, io::stdout().is_terminal()) {
            (false, _) => OutputFormat::Text,
            (true, false) => OutputFormat::Json,
            (true, true) => OutputFormat::PrettyJson,
        };

        Ok(Config {
            lock_path,
            list_path,
            credentials: Credentials::new(args.username, args.password),
            github_api: args.github_api,
            offline: args.offline,
            format,
        })
    }
}

/// `-help` is accepted as well, since it is what this tool used to document
fn args() -> impl Iterator<Item = OsString> {
    std::env::args_os().map(|arg| {
        if arg == "-help" {
            OsString::from("--help")
        } else {
            arg
        }
    })
}

fn main() -> Result<()> {
    color_eyre::install()?;
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let config = Config::try_from(Args::parse_from(args()))?;
    let resolver = config.resolver()?;

    run(config, &resolver, &mut io::stdout().lock())?;

    Ok(())
}
