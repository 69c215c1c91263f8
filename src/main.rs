//! dexec-askpass - one-shot secret capture helper.
//!
//! Reads one credential line from standard input inside locked memory and
//! writes it once to standard output. Takes no arguments; configuration
//! comes from `DEXEC_ASKPASS_CONFIG` or the default config path. Exit
//! status distinguishes timeout, malformed input, and resource failures.

use std::io::Write;
use std::process::ExitCode;
use std::time::Duration;

use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use dexec_core::config::Settings;
use dexec_core::error::CaptureError;
use dexec_core::secret::capture_secret;

const NAME: &str = "dexec-askpass";

/// Exit code when the captured secret cannot be written out.
const EXIT_EMIT: u8 = 4;
/// Exit code when loading an explicitly configured file fails.
///
/// Distinct from every [`CaptureError`] code so callers can tell a bad
/// config from a capture-time resource failure.
const EXIT_CONFIG: u8 = 5;

fn main() -> ExitCode {
    let settings = match Settings::discover() {
        Ok(s) => s,
        Err(e) => {
            eprintln!("{NAME}: {e}");
            return ExitCode::from(EXIT_CONFIG);
        }
    };

    init_logging(&settings);

    let timeout = Duration::from_millis(settings.askpass.timeout_millis);
    let secret = match capture_secret(timeout) {
        Ok(secret) => secret,
        Err(CaptureError::Timeout) => {
            eprintln!("Invalid sudo password");
            return ExitCode::from(CaptureError::Timeout.exit_code());
        }
        Err(e) => {
            eprintln!("{NAME}: {e}");
            return ExitCode::from(e.exit_code());
        }
    };

    // Emit the secret once, as a single line. The downstream askpass
    // protocol reads it from our stdout.
    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    let emitted = out
        .write_all(secret.as_bytes())
        .and_then(|()| out.write_all(b"\n"))
        .and_then(|()| out.flush());
    if let Err(e) = emitted {
        eprintln!("{NAME}: write failed: {e}");
        return ExitCode::from(EXIT_EMIT);
    }

    ExitCode::SUCCESS
}

/// Initialize the process-wide logging facility.
///
/// Diagnostics go to stderr; stdout carries only the secret.
fn init_logging(settings: &Settings) {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&settings.logging.level));

    let registry = tracing_subscriber::registry().with(env_filter);
    match settings.logging.format.to_lowercase().as_str() {
        "json" => {
            registry
                .with(fmt::layer().json().with_writer(std::io::stderr))
                .init();
        }
        _ => {
            registry
                .with(fmt::layer().with_writer(std::io::stderr))
                .init();
        }
    }
}
