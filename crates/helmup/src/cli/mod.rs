use crate::config::Settings;
use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::Shell;
use std::ffi::OsString;
use std::io;
use std::path::PathBuf;

mod ensure;
mod run;

#[derive(Debug, Parser)]
#[command(
    name = "helmup",
    version,
    about = "Ensures a usable helm binary, installing one when the host has none"
)]
pub struct App {
    #[command(subcommand)]
    command: Command,

    /// Install root (defaults to HELMUP_HOME or the user cache directory)
    #[arg(long, global = true, value_name = "DIR")]
    home: Option<PathBuf>,

    /// helm version to install when the host has none
    #[arg(long = "tool-version", global = true, value_name = "X.Y.Z")]
    tool_version: Option<String>,

    /// Base URL release artifacts are downloaded from
    #[arg(long, global = true, value_name = "URL")]
    base_url: Option<String>,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Resolve the helm binary, installing it when missing, and print its path
    Ensure,
    /// Probe the host for an existing helm binary; never installs
    Which,
    /// Resolve the helm binary, then run it with the given arguments
    Run {
        #[arg(trailing_var_arg = true, allow_hyphen_values = true, value_name = "ARGS")]
        args: Vec<OsString>,
    },
    /// Generate shell completions
    Completion { shell: Shell },
}

pub async fn run(app: App) -> anyhow::Result<()> {
    let settings = Settings::load(app.home, app.tool_version, app.base_url)?;

    match app.command {
        Command::Ensure => ensure::ensure(&settings).await,
        Command::Which => which(),
        Command::Run { args } => run::run_tool(&settings, args).await,
        Command::Completion { shell } => {
            clap_complete::generate(shell, &mut App::command(), "helmup", &mut io::stdout());
            Ok(())
        }
    }
}

fn which() -> anyhow::Result<()> {
    match helmup_core::probe("helm") {
        Some(path) => {
            println!("{}", path.display());
            Ok(())
        }
        None => anyhow::bail!("helm is not installed on this machine"),
    }
}
