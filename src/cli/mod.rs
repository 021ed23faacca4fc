use std::io;
use std::io::IsTerminal;
use std::path::PathBuf;
use std::time::Duration;

use anyhow::Result;
use clap::{Args, CommandFactory, Parser, Subcommand};

use crate::engine::{Engine, EngineOptions};
use crate::ui::UiConfig;

#[derive(Debug, Parser)]
#[command(
    name = "mysql-preflight",
    version,
    about = "Pre-upgrade advisory check for MySQL server configuration compatibility"
)]
pub struct Cli {
    #[arg(long, global = true)]
    pub json: bool,
    #[arg(long = "no-color", global = true)]
    pub no_color: bool,
    #[arg(long, global = true)]
    pub verbose: bool,
    #[arg(long, global = true)]
    pub quiet: bool,
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,
    #[arg(long, default_value_t = 30, global = true)]
    pub timeout: u64,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    Check(CheckArgs),
    Catalog(CatalogArgs),
    Completion(CompletionArgs),
    Config(ConfigArgs),
}

#[derive(Debug, Args)]
pub struct CheckArgs {}

#[derive(Debug, Args)]
pub struct CatalogArgs {}

#[derive(Debug, Args)]
pub struct CompletionArgs {
    pub shell: String,
}

#[derive(Debug, Args)]
pub struct ConfigArgs {
    #[arg(long)]
    pub show: bool,
}

pub fn run() -> Result<()> {
    let cli = Cli::parse();

    let stdout_is_tty = io::stdout().is_terminal();
    let stderr_is_tty = io::stderr().is_terminal();

    let env_config_path = std::env::var_os("MYSQL_PREFLIGHT_CONFIG").map(PathBuf::from);
    let cfg = crate::config::load(cli.config.as_deref().or(env_config_path.as_deref()))
        .map_err(crate::exit::invalid_args_err)?;

    let color = stdout_is_tty && cfg.ui.color && !cli.no_color;

    let ui_cfg = UiConfig {
        color,
        stdout_is_tty,
        stderr_is_tty,
        quiet: cli.quiet,
        verbose: cli.verbose,
    };

    let timeout = Duration::from_secs(cli.timeout);

    match cli.command {
        Commands::Check(_args) => {
            let package_present = crate::platform::package_installed(&cfg.package.name, timeout);
            let engine = Engine::new(
                EngineOptions {
                    timeout,
                    show_progress: ui_cfg.stderr_is_tty && !cli.quiet && !cli.json,
                },
                cfg.clone(),
            );

            match engine.check(package_present) {
                Some(report) => {
                    if cli.json {
                        write_json(&report)?;
                    } else {
                        crate::ui::print_report(&report, &ui_cfg);
                    }
                }
                None => {
                    if !ui_cfg.quiet {
                        eprintln!("{} is not installed; no advisory emitted", cfg.package.name);
                    }
                }
            }
        }
        Commands::Catalog(_args) => {
            let mut entries: Vec<&str> = crate::catalog::entries().collect();
            entries.sort_unstable();
            if cli.json {
                let stdout = io::stdout();
                serde_json::to_writer_pretty(stdout.lock(), &entries)?;
                println!();
            } else {
                crate::ui::print_catalog(&entries, &ui_cfg);
            }
        }
        Commands::Completion(_args) => {
            let shell = parse_shell(&_args.shell)?;
            let mut cmd = Cli::command();
            let mut out = std::io::stdout().lock();
            clap_complete::generate(shell, &mut cmd, "mysql-preflight", &mut out);
        }
        Commands::Config(_args) => {
            if _args.show {
                if cli.json {
                    let stdout = io::stdout();
                    serde_json::to_writer_pretty(stdout.lock(), &cfg)?;
                    println!();
                } else {
                    println!("{}", toml::to_string_pretty(&cfg)?);
                }
            } else if !ui_cfg.quiet {
                eprintln!("config: use `mysql-preflight config --show`");
            }
        }
    }

    Ok(())
}

fn write_json(report: &crate::core::Report) -> Result<()> {
    use std::io::Write;

    let buf = serde_json::to_vec_pretty(report)?;

    let mut stdout = std::io::stdout().lock();
    match stdout.write_all(&buf) {
        Ok(()) => {}
        Err(err) if err.kind() == std::io::ErrorKind::BrokenPipe => return Ok(()),
        Err(err) => return Err(err.into()),
    }
    match stdout.write_all(b"\n") {
        Ok(()) => Ok(()),
        Err(err) if err.kind() == std::io::ErrorKind::BrokenPipe => Ok(()),
        Err(err) => Err(err.into()),
    }
}

fn parse_shell(s: &str) -> Result<clap_complete::Shell> {
    let s = s.trim().to_ascii_lowercase();
    match s.as_str() {
        "bash" => Ok(clap_complete::Shell::Bash),
        "zsh" => Ok(clap_complete::Shell::Zsh),
        "fish" => Ok(clap_complete::Shell::Fish),
        other => Err(crate::exit::invalid_args(format!(
            "unsupported shell: {other} (expected bash|zsh|fish)"
        ))),
    }
}
