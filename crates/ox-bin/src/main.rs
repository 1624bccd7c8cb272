//! oxcommit entrypoint.
//!
//! Drives one editing session headlessly: the commit file comes from the
//! VCS as the first argument, the message comes from `--message` or stdin,
//! and the exit code tells the VCS whether to proceed.
use anyhow::{Context, Result};
use clap::Parser;
use core_config::{Settings, load_from};
use core_state::{ExitStatus, OpenOptions, Session};
use std::io::Read;
use std::path::PathBuf;
use std::sync::Once;
use std::time::Instant;
use tracing::{error, info};
use tracing_appender::non_blocking::WorkerGuard;

/// CLI arguments.
#[derive(Parser, Debug)]
#[command(name = "oxcommit", version, about = "Commit message editor")]
struct Args {
    /// Commit message file handed over by git, hg, svn or jj.
    pub path: PathBuf,
    /// Optional configuration file path (overrides discovery of `oxcommit.toml`).
    #[arg(long = "config")]
    pub config: Option<PathBuf>,
    /// Type this text into the message and commit.
    #[arg(long, conflicts_with = "cancel")]
    pub message: Option<String>,
    /// Cancel without touching the commit file.
    #[arg(long)]
    pub cancel: bool,
    /// Print the final annotation set as JSON on stdout.
    #[arg(long)]
    pub annotations: bool,
}

struct AppStartup {
    log_guard: Option<WorkerGuard>,
}

impl AppStartup {
    fn new() -> Self {
        Self { log_guard: None }
    }

    fn run(&mut self) -> i32 {
        if let Err(err) = self.configure_logging() {
            eprintln!("oxcommit: logging disabled: {err:#}");
        }
        Self::install_panic_hook();

        let args = Args::parse();
        info!(
            target: "runtime",
            path = %args.path.display(),
            config_override = args.config.is_some(),
            "startup"
        );

        match Self::edit(&args) {
            Ok(status) => status.code(),
            Err(err) => {
                error!(target: "runtime", error = %format!("{err:#}"), "session_failed");
                eprintln!("oxcommit: {err:#}");
                1
            }
        }
    }

    fn configure_logging(&mut self) -> Result<()> {
        let log_dir = dirs::data_dir()
            .map(|dir| dir.join("oxcommit"))
            .unwrap_or_else(|| PathBuf::from("."));
        std::fs::create_dir_all(&log_dir)
            .with_context(|| format!("creating {}", log_dir.display()))?;
        let log_path = log_dir.join("oxcommit.log");
        if log_path.exists() {
            let _ = std::fs::remove_file(&log_path);
        }

        let file_appender = tracing_appender::rolling::never(&log_dir, "oxcommit.log");
        let (nb_writer, guard) = tracing_appender::non_blocking(file_appender);
        match tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .with_writer(nb_writer)
            .with_ansi(false)
            .try_init()
        {
            Ok(_) => {
                self.log_guard = Some(guard);
            }
            Err(_err) => {
                // Global tracing subscriber already installed; drop guard so writer shuts down.
            }
        }

        Ok(())
    }

    fn install_panic_hook() {
        static HOOK: Once = Once::new();
        HOOK.call_once(|| {
            let default_panic = std::panic::take_hook();
            std::panic::set_hook(Box::new(move |info| {
                tracing::error!(target: "runtime.panic", ?info, "panic");
                default_panic(info);
            }));
        });
    }

    fn load_settings(args: &Args) -> Result<Settings> {
        let mut config = load_from(args.config.clone())?;
        config.apply_process_env();
        Ok(config.settings())
    }

    fn edit(args: &Args) -> Result<ExitStatus> {
        let settings = Self::load_settings(args)?;
        let mut session = Session::open(&args.path, OpenOptions::new(settings))
            .with_context(|| format!("opening {}", args.path.display()))?;

        let status = if args.cancel {
            session.cancel()
        } else {
            let message = match &args.message {
                Some(message) => message.clone(),
                None => read_message(&session)?,
            };
            // Either way the message replaces whatever the commit range holds.
            session.select_all();
            let message = message.trim_end_matches(['\n', '\r']);
            if message.is_empty() && args.message.is_none() {
                info!(target: "runtime", "empty_input_cancels");
                session.cancel()
            } else {
                session.type_text(message, Instant::now());
                commit_or_cancel(&mut session)
            }
        };

        if args.annotations {
            println!("{}", serde_json::to_string_pretty(session.annotations())?);
        }
        Ok(status)
    }
}

/// Show the current buffer on stderr and read the replacement message from
/// stdin.
fn read_message(session: &Session) -> Result<String> {
    eprint!("{}", session.text());
    let mut input = String::new();
    std::io::stdin()
        .read_to_string(&mut input)
        .context("reading message from stdin")?;
    Ok(input)
}

/// There is no one left to ask after a failed write, so take the cancel path.
fn commit_or_cancel(session: &mut Session) -> ExitStatus {
    match session.commit() {
        Ok(status) => status,
        Err(err) => {
            eprintln!("oxcommit: {err}");
            error!(target: "runtime", path = %err.path().display(), error = %err, "commit_failed_cancelling");
            session.cancel()
        }
    }
}

fn main() {
    let mut startup = AppStartup::new();
    let code = startup.run();
    // Flush the non-blocking log writer; `process::exit` skips destructors.
    drop(startup);
    std::process::exit(code);
}
