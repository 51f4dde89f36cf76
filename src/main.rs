use std::path::PathBuf;

use clap::Parser;

mod commands;
mod config;
mod directory;
mod error;
mod observability;
mod rules;
mod secrets;
mod services;

#[cfg(test)]
mod tests;

use config::{AppConfig, LogLevel};
use directory::OktaClient;
use error::AppResult;
use rules::FilterMode;

/// CLI arguments for okta-info
#[derive(Parser, Debug)]
#[command(version, about = "Query Okta group memberships and group rules", long_about = None)]
struct Args {
    #[command(subcommand)]
    command: Command,

    /// Path to a TOML config file (environment variables alone are enough otherwise)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Log debug output to stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Include deprovisioned users in member listings
    #[arg(long, global = true)]
    show_deprovisioned: bool,
}

#[derive(clap::Subcommand, Debug)]
enum Command {
    /// List the groups of a user (email or the part before `@`)
    User { name: String },
    /// List the members of one or more groups
    Group {
        #[arg(required = true)]
        names: Vec<String>,
    },
    /// Show users in one set of groups but not the other
    Diff {
        /// Comma-separated group names
        groups_a: String,
        /// Comma-separated group names
        groups_b: String,
    },
    /// Show group rules that reference a group, or a rule by name
    Rule {
        #[arg(value_enum)]
        mode: FilterMode,
        search_key: String,
    },
}

#[tokio::main]
async fn main() {
    let args = Args::parse();

    match run(args).await {
        Ok(output) => print!("{output}"),
        Err(e) => {
            eprintln!("Error: {e}");
            std::process::exit(1);
        }
    }
}

async fn run(args: Args) -> AppResult<String> {
    let mut config = AppConfig::load(args.config.as_deref())?;
    if args.verbose {
        config.observability.logging.level = LogLevel::Debug;
    }
    if args.show_deprovisioned {
        config.report.show_deprovisioned = true;
    }

    observability::init_tracing(&config.observability.logging)?;

    let api_token = secrets::resolve_api_token(&config).await?;
    let client = OktaClient::new(&config.directory, api_token)?;
    let show_deprovisioned = config.report.show_deprovisioned;

    let output = match args.command {
        Command::User { name } => commands::user_groups(&client, &name).await?,
        Command::Group { names } => {
            commands::group_members(&client, &names, show_deprovisioned).await?
        }
        Command::Diff { groups_a, groups_b } => {
            let groups_a = commands::split_group_list(&groups_a);
            let groups_b = commands::split_group_list(&groups_b);
            commands::group_diff(&client, &groups_a, &groups_b, show_deprovisioned).await?
        }
        Command::Rule { mode, search_key } => {
            commands::rule_report(&client, mode, &search_key).await?
        }
    };

    Ok(output)
}
