//! `wp` — directory waypoint utility.
//!
//! Run `wp set <name>` in a directory to bookmark it and `wp <name>` to jump
//! back.  Run with `--init-bash` / `--init-zsh` to print a wrapper function
//! for shells whose terminal refuses injected keystrokes.

use std::io;
use std::path::PathBuf;

use anyhow::{Context as _, Result};
use clap::{Parser, Subcommand};

use waypoint::app::command::Command;
use waypoint::app::handler::{self, Context};
use waypoint::config::{self, AppConfig};
use waypoint::core::policy::TerminalConfirm;
use waypoint::core::store::Store;
use waypoint::shell::{inject, integration};

// ───────────────────────────────────────── CLI ───────────────

#[derive(Parser, Debug)]
#[command(name = "wp", version, about = "Directory waypoint utility")]
struct Cli {
    /// Store file to use instead of the configured one.
    #[arg(long, global = true, value_name = "FILE")]
    db: Option<PathBuf>,

    /// Print a cd payload for the shell wrapper instead of typing into the terminal.
    #[arg(long = "emit-cd", global = true, hide = true)]
    emit_cd: bool,

    /// Print the bash shell function and exit.
    #[arg(long = "init-bash")]
    init_bash: bool,

    /// Print the zsh shell function and exit.
    #[arg(long = "init-zsh")]
    init_zsh: bool,

    /// Write a commented config file (if none exists) and exit.
    #[arg(long = "init-config")]
    init_config: bool,

    #[command(subcommand)]
    command: Option<Sub>,
}

#[derive(Subcommand, Debug)]
enum Sub {
    /// Go to waypoint.
    Go { name: Option<String> },
    /// Set waypoint to the current directory.
    Set { name: Option<String> },
    /// Remove waypoint.
    Rem { name: Option<String> },
    /// Print the waypoint's directory without going there.
    Peek { name: Option<String> },
    /// List all waypoints.
    #[command(alias = "list")]
    Ls,
    #[command(external_subcommand)]
    Shorthand(Vec<String>),
}

impl Sub {
    fn into_command(self) -> Result<Command> {
        Ok(match self {
            Sub::Go { name } => Command::Go {
                name: name.unwrap_or_default(),
            },
            Sub::Set { name } => Command::Set {
                name: name.unwrap_or_default(),
                path: std::env::current_dir().context("reading current directory")?,
            },
            Sub::Rem { name } => Command::Rem {
                name: name.unwrap_or_default(),
            },
            Sub::Peek { name } => Command::Peek {
                name: name.unwrap_or_default(),
            },
            Sub::Ls => Command::Ls,
            Sub::Shorthand(args) => Command::Go {
                name: args.into_iter().next().unwrap_or_default(),
            },
        })
    }
}

// ───────────────────────────────────────── main ─────────────

fn main() -> Result<()> {
    // Quiet unless RUST_LOG is set.
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(io::stderr) // never pollute stdout
        .init();

    let cli = Cli::parse();

    // ── shell-integration mode ────────────────────────────────
    if cli.init_bash {
        print!("{}", integration::bash_function());
        return Ok(());
    }
    if cli.init_zsh {
        print!("{}", integration::zsh_function());
        return Ok(());
    }

    let user_config = AppConfig::load();

    if cli.init_config {
        let path = config::config_path();
        if path.exists() {
            println!("Config already exists at {}", path.display());
        } else {
            user_config.save()?;
            println!("Wrote {}", path.display());
        }
        return Ok(());
    }

    let command = match cli.command {
        Some(sub) => sub.into_command()?,
        None => Command::Hint,
    };

    // ── store + injector ──────────────────────────────────────
    let env_db = std::env::var(config::STORE_ENV).ok();
    let store_path = user_config.resolve_store_path(cli.db.as_deref(), env_db.as_deref());
    let store = Store::open(&store_path)?;
    let mode = user_config.resolve_inject(cli.emit_cd);
    tracing::debug!("store={} inject={mode}", store_path.display());
    let injector = inject::select(mode);

    let mut confirm = TerminalConfirm;
    let mut ctx = Context {
        store: &store,
        injector: injector.as_ref(),
        confirm: &mut confirm,
        out: io::stdout().lock(),
    };
    handler::handle(&mut ctx, command)?;

    Ok(())
}
