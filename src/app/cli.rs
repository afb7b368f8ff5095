use std::future::Future;
use std::str::FromStr;

use tokio::io::{BufWriter, Stdout};
use tracing::level_filters::LevelFilter;
use tracing::{error, info, warn};

use super::error::AppError;

/// Environment variable selecting the log level
pub const LOG_LEVEL_VAR: &str = "LOG_LEVEL";

/// Output handles passed to the application body
pub struct Writers {
    pub stdout: BufWriter<Stdout>,
}

/// Reusable CLI application runner that handles:
/// - Logging setup (stderr, level from `LOG_LEVEL`)
/// - Argument parsing before any work starts
/// - Signal handling (SIGINT, SIGTERM, SIGHUP)
/// - Exit codes (0 = success, 1 = error, 130 = SIGINT, 143 = SIGTERM, 129 = SIGHUP)
pub struct CliApp {
    name: String,
}

/// A [`CliApp`] whose arguments have been parsed
pub struct ConfiguredApp<T> {
    app: CliApp,
    args: Result<T, AppError>,
}

impl CliApp {
    /// Create a new CLI application runner
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
        }
    }

    /// Parse the process arguments with `parse`
    pub fn with_args<T, P>(self, parse: P) -> ConfiguredApp<T>
    where
        P: FnOnce(Vec<String>) -> Result<T, AppError>,
    {
        let args = parse(std::env::args().collect());
        ConfiguredApp { app: self, args }
    }
}

impl<T> ConfiguredApp<T> {
    /// Run the application body on a multi-threaded runtime
    ///
    /// The body races against termination signals. On error or signal nothing
    /// further is written to stdout.
    ///
    /// This function never returns - it calls std::process::exit with the appropriate code
    pub fn run<F, Fut>(self, main_fn: F) -> !
    where
        F: FnOnce(Writers, T) -> Fut,
        Fut: Future<Output = Result<(), AppError>>,
    {
        init_tracing();

        let args = match self.args {
            Ok(args) => args,
            Err(e) => {
                eprintln!("Error: {e}");
                std::process::exit(exit_code(&Err(e)));
            }
        };

        let runtime = match tokio::runtime::Builder::new_multi_thread()
            .enable_all()
            .build()
        {
            Ok(runtime) => runtime,
            Err(e) => {
                eprintln!("Error: {}", AppError::Io(e));
                std::process::exit(1);
            }
        };

        let name = self.app.name;
        let code = runtime.block_on(async move {
            let writers = Writers {
                stdout: BufWriter::new(tokio::io::stdout()),
            };

            tokio::select! {
                result = main_fn(writers, args) => {
                    if let Err(e) = &result {
                        error!(app = %name, error = %e, "Run failed");
                        eprintln!("Error: {e}");
                    }
                    exit_code(&result)
                }
                signal_code = wait_for_signal() => {
                    warn!(app = %name, code = signal_code, "Interrupted, no report written");
                    signal_code
                }
            }
        });

        // Abandon in-flight tasks rather than waiting on them
        runtime.shutdown_background();
        std::process::exit(code);
    }
}

/// Exit code for a finished run
pub fn exit_code(result: &Result<(), AppError>) -> i32 {
    match result {
        Ok(()) => 0,
        Err(_) => 1,
    }
}

/// Install the stderr subscriber; an unknown level falls back to INFO
fn init_tracing() {
    let level = std::env::var(LOG_LEVEL_VAR)
        .ok()
        .and_then(|value| LevelFilter::from_str(value.trim()).ok())
        .unwrap_or(LevelFilter::INFO);

    // A subscriber may already be installed, e.g. under test harnesses
    let _ = tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .try_init();

    info!(%level, "Logging initialised");
}

/// Wait for any Unix signal (SIGINT, SIGTERM, SIGHUP) or Ctrl+C
/// Returns the exit code to use (130 for SIGINT, 143 for SIGTERM, etc.)
async fn wait_for_signal() -> i32 {
    #[cfg(unix)]
    {
        use tokio::signal::unix::{SignalKind, signal};

        let handlers = (
            signal(SignalKind::terminate()),
            signal(SignalKind::interrupt()),
            signal(SignalKind::hangup()),
        );
        let (mut sigterm, mut sigint, mut sighup) = match handlers {
            (Ok(term), Ok(int), Ok(hup)) => (term, int, hup),
            _ => {
                warn!("Failed to install signal handlers");
                return std::future::pending().await;
            }
        };

        tokio::select! {
            _ = sigterm.recv() => {
                eprintln!("Received SIGTERM");
                143 // 128 + 15
            }
            _ = sigint.recv() => {
                eprintln!("Received SIGINT");
                130 // 128 + 2
            }
            _ = sighup.recv() => {
                eprintln!("Received SIGHUP");
                129 // 128 + 1
            }
        }
    }

    #[cfg(not(unix))]
    {
        if tokio::signal::ctrl_c().await.is_err() {
            warn!("Failed to install Ctrl+C handler");
            return std::future::pending().await;
        }
        eprintln!("Received Ctrl+C");
        130
    }
}
