//! Libris console entry point.
//!
//! # Responsibility
//! - Resolve configuration, start logging and run the interactive loop.
//! - Catch top-level failures once and always exit with a closing message.

mod app;
mod config;
mod console;
mod view;

use app::App;
use clap::Parser;
use config::AppConfig;
use console::ConsoleInput;
use libris_core::{core_version, init_logging, CatalogService, SqliteGateway};
use log::{error, info, warn};
use std::any::Any;
use std::io;
use std::panic::{self, UnwindSafe};
use std::path::PathBuf;
use view::ConsoleView;

const REMEDIATION_HINT: &str = "Make sure the database exists and has been initialized.";

#[derive(Parser)]
#[command(name = "libris")]
#[command(about = "Console catalog for books and magazines", version)]
struct Cli {
    /// SQLite database file (default: $LIBRIS_DB_PATH or ./library.db)
    #[arg(long)]
    db: Option<PathBuf>,

    /// Directory for rolling log files (default: $LIBRIS_LOG_DIR or <temp>/libris-logs)
    #[arg(long)]
    log_dir: Option<PathBuf>,

    /// Log level: trace|debug|info|warn|error
    #[arg(long)]
    log_level: Option<String>,
}

fn main() {
    let cli = Cli::parse();
    let config = AppConfig::resolve(cli.db, cli.log_dir, cli.log_level);

    if let Err(err) = init_logging(&config.log_level, &config.log_dir) {
        eprintln!("warning: file logging disabled: {err}");
    }

    println!("Libris {} - library catalog for books and magazines", core_version());
    info!(
        "event=app_run module=cli status=start db_path={}",
        config.db_path.display()
    );

    if let Err(message) = run_guarded(|| run(&config)) {
        error!("event=app_run module=cli status=error error={message}");
        println!("\n\nAn error occurred: {message}");
        println!("{REMEDIATION_HINT}");
    }
    println!("\nGoodbye!\n");
}

fn run(config: &AppConfig) -> io::Result<()> {
    let (sender, input) = ConsoleInput::channel();
    if let Err(err) = console::install_interrupt_handler(sender.clone()) {
        warn!("event=interrupt_handler module=cli status=error error={err}");
    }
    console::spawn_stdin_pump(sender);

    let gateway = SqliteGateway::new(config.store_config());
    let view = ConsoleView::new(input, io::stdout().lock());
    App::new(CatalogService::new(gateway), view).run()
}

/// Runs `session` and folds both I/O errors and panics into one message.
///
/// A panic unwinds through the session first, so the store is released by
/// its `Drop` before the message is returned.
fn run_guarded<F>(session: F) -> Result<(), String>
where
    F: FnOnce() -> io::Result<()> + UnwindSafe,
{
    match panic::catch_unwind(session) {
        Ok(Ok(())) => Ok(()),
        Ok(Err(err)) => Err(err.to_string()),
        Err(payload) => Err(format!("unexpected failure: {}", panic_message(&*payload))),
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> &str {
    if let Some(message) = payload.downcast_ref::<&str>() {
        *message
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.as_str()
    } else {
        "non-string panic payload"
    }
}

#[cfg(test)]
mod tests {
    use super::run_guarded;
    use std::io;

    #[test]
    fn clean_session_is_ok() {
        assert_eq!(run_guarded(|| Ok(())), Ok(()));
    }

    #[test]
    fn io_error_becomes_message() {
        let result = run_guarded(|| Err(io::Error::other("console gone")));
        assert_eq!(result, Err("console gone".to_string()));
    }

    #[test]
    fn panic_is_caught_at_the_boundary() {
        let result = run_guarded(|| panic!("row cache poisoned"));
        assert_eq!(
            result,
            Err("unexpected failure: row cache poisoned".to_string())
        );
    }

    #[test]
    fn formatted_panic_payload_is_reported() {
        let id = 7;
        let result = run_guarded(move || panic!("bad item {id}"));
        assert_eq!(result, Err("unexpected failure: bad item 7".to_string()));
    }
}
