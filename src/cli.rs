//! Command line surface
//!
//! Parses arguments with clap and renders the reports returned by [`Gobrew`].

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::app::{
    Advice, Gobrew, InstallReport, InteractiveReport, SelfUpdateReport, UseOutcome, UseReport,
};
use crate::config::{NONE_VERSION, Overrides};
use crate::prompt::{AssumeYes, Prompter, StdinPrompter};
use crate::toolchain::InstallOutcome;

/// Command that reinstalls gobrew from the latest release
const SELF_UPDATE_COMMAND: &str =
    "curl -sL https://raw.githubusercontent.com/kevincobain2000/gobrew/master/git.io.sh | bash";

#[derive(Debug, Parser)]
#[command(name = "gobrew")]
#[command(version, about = "Go version manager")]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalArgs,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Debug, Args)]
pub struct GlobalArgs {
    /// Directory holding `.gobrew` (defaults to the home directory)
    #[arg(long, global = true, env = "GOBREW_ROOT")]
    pub root: Option<PathBuf>,

    /// Base URL release archives are downloaded from
    #[arg(long, global = true, env = "GOBREW_REGISTRY")]
    pub registry: Option<String>,

    /// Lifetime of the remote versions cache in seconds
    #[arg(long, global = true, value_name = "SECS")]
    pub ttl: Option<i64>,

    /// Always fetch remote versions instead of using the cache
    #[arg(long, global = true)]
    pub disable_cache: bool,

    /// Delete the remote versions cache before running
    #[arg(long, global = true)]
    pub clear_cache: bool,

    /// Log debug output to stderr
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

impl GlobalArgs {
    pub fn overrides(&self) -> Overrides {
        Overrides {
            root: self.root.clone(),
            registry_url: self.registry.clone(),
            ttl_seconds: self.ttl,
            disable_cache: self.disable_cache,
            clear_cache: self.clear_cache,
        }
    }
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Compare current, latest and go.mod versions and offer to switch
    Interactive {
        /// Apply the suggestion without asking
        #[arg(short, long)]
        yes: bool,
    },
    /// Install a version (e.g. 1.21.3, 1.21@latest, 1.21x, latest, mod)
    Install { version: String },
    /// Install if needed and make a version current
    Use { version: String },
    /// Remove an installed version
    Uninstall { version: String },
    /// Remove every installed version except the current one
    Prune,
    /// List installed versions
    #[command(alias = "list")]
    Ls,
    /// List versions available for download
    #[command(name = "ls-remote", alias = "list-remote")]
    LsRemote,
    /// Check whether a newer gobrew release exists
    SelfUpdate,
    /// Print the gobrew version
    Version,
}

pub fn run(command: Option<Command>, app: &Gobrew) -> anyhow::Result<()> {
    match command.unwrap_or(Command::Interactive { yes: false }) {
        Command::Interactive { yes } => {
            let prompter: &dyn Prompter = if yes { &AssumeYes } else { &StdinPrompter };
            let report = app.interactive(!yes, prompter)?;
            print_interactive(&report);
        }
        Command::Install { version } => print_install(&app.install(&version)?),
        Command::Use { version } => print_use(&app.use_version(&version)?),
        Command::Uninstall { version } => {
            let version = app.uninstall(&version)?;
            println!("Uninstalled version {}", version);
        }
        Command::Prune => {
            let removed = app.prune()?;
            if removed.is_empty() {
                println!("Nothing to prune");
            }
            for version in removed {
                println!("Uninstalled version {}", version);
            }
        }
        Command::Ls => {
            let entries = app.list()?;
            for entry in &entries {
                let marker = if entry.current { "*" } else { " " };
                println!("{} {}", marker, entry.version);
            }
            let current = entries
                .iter()
                .find(|e| e.current)
                .map_or(NONE_VERSION, |e| e.version.as_str());
            println!();
            println!("current: {}", current);
        }
        Command::LsRemote => {
            for group in app.list_remote()? {
                println!("{}\t{}", group.key, group.versions.join("  "));
            }
        }
        Command::SelfUpdate => print_self_update(&app.check_self_update(env!("CARGO_PKG_VERSION"))?),
        Command::Version => println!("gobrew {}", env!("CARGO_PKG_VERSION")),
    }

    Ok(())
}

fn print_install(report: &InstallReport) {
    match report.outcome {
        InstallOutcome::Installed => println!("Installed version {}", report.version),
        InstallOutcome::AlreadyInstalled => {
            println!("Version {} is already installed", report.version)
        }
    }
    if report.activated {
        println!("Now using version {}", report.version);
    }
}

fn print_use(report: &UseReport) {
    if report.installed {
        println!("Installed version {}", report.version);
    }
    match report.outcome {
        UseOutcome::Switched => println!("Now using version {}", report.version),
        UseOutcome::AlreadyCurrent => println!("Version {} is already in use", report.version),
    }
}

fn print_interactive(report: &InteractiveReport) {
    let current = report.current.as_deref().unwrap_or(NONE_VERSION);
    let mut labels = Vec::new();
    if report.differs_from_go_mod() {
        labels.push("not same as go.mod");
    }
    if report.current.is_some() && !report.is_latest() {
        labels.push("not latest");
    }
    let label = if labels.is_empty() {
        String::new()
    } else {
        format!(" ({})", labels.join(", "))
    };
    let declared = report
        .declared_group
        .map_or_else(|| NONE_VERSION.to_string(), |g| g.to_string());

    println!();
    println!("Go installed version ....... {}{}", current, label);
    println!("Go go.mod version    ....... {}", declared);
    println!("Go latest version    ....... {}", report.latest);
    println!();

    match (&report.advice, &report.applied) {
        (None, _) => println!("Everything is up to date"),
        (Some(advice), None) => println!("Skipped: {}", describe(advice)),
        (Some(_), Some(applied)) => print_use(applied),
    }
}

fn describe(advice: &Advice) -> String {
    match advice {
        Advice::InstallLatest { specifier } => format!("Go is not installed, latest is {}", specifier),
        Advice::MatchGoMod { specifier } => {
            format!("installed version differs from go.mod, suggested {}", specifier)
        }
        Advice::UpgradeToLatest { specifier } => format!("a newer version {} is available", specifier),
    }
}

fn print_self_update(report: &SelfUpdateReport) {
    if report.update_available() {
        println!(
            "gobrew {} is available (current v{})",
            report.latest_tag, report.current
        );
        println!("Update with:");
        println!("  {}", SELF_UPDATE_COMMAND);
    } else {
        println!("gobrew v{} is the latest version", report.current);
    }
}
