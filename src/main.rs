use clap::Parser;
use ruuvigate::app::{self, Options};
use std::panic::{self, PanicHookInfo};
use tracing_subscriber::{EnvFilter, fmt};

/// Exit codes for the application
const EXIT_SUCCESS: i32 = 0;
const EXIT_ERROR: i32 = 1;
const EXIT_PANIC: i32 = 2;

/// `RUST_LOG` wins; otherwise `info`, or `debug` with `--verbose`.
fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    let _ = fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

fn main() {
    // Set up panic hook to ensure clean exit codes for process managers
    // (e.g., systemd) that monitor exit status
    panic::set_hook(Box::new(move |info: &PanicHookInfo| {
        eprintln!("Panic! {}", info);
        std::process::exit(EXIT_PANIC);
    }));

    let options = Options::parse();
    init_tracing(options.verbose);

    let runtime = match tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
    {
        Ok(runtime) => runtime,
        Err(why) => {
            tracing::error!("failed to start runtime: {why}");
            std::process::exit(EXIT_ERROR);
        }
    };

    let code = match runtime.block_on(app::run(options)) {
        Ok(_) => EXIT_SUCCESS,
        Err(why) => {
            tracing::error!("{why}");
            EXIT_ERROR
        }
    };

    // Dropping the runtime drops the capture children, which kills them
    drop(runtime);
    std::process::exit(code);
}
