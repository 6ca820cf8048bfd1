use std::process::ExitCode;

use clap::{Parser, Subcommand};
use color_eyre::{eyre::eyre, eyre::WrapErr, Result};
use otpkit::{code, encoding::Base32Mode, secret, uri, Verifier};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(version, about = "Generate and check TOTP codes (RFC 6238, SHA-1, 30s)")]
struct Cli {
    /// Decode secrets as plain RFC 4648 Base32 instead of the compatibility rules
    #[arg(long, global = true)]
    strict_base32: bool,

    /// Log filter, e.g. `debug` or `otpkit=trace`. Falls back to RUST_LOG, then `warn`.
    #[arg(long, global = true)]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Print a new random secret
    Generate {
        #[arg(long, default_value_t = 32, env = "OTPKIT_SECRET_LENGTH")]
        length: usize,
    },
    /// Print the code for a secret
    Code {
        #[arg(env = "OTPKIT_SECRET", hide_env_values = true)]
        secret: String,
        /// Unix time to compute the code for instead of now
        #[arg(long)]
        time: Option<i64>,
        /// Print the code as two groups, e.g. `123 456`
        #[arg(long)]
        grouped: bool,
    },
    /// Check a code; exits non-zero when it is not accepted
    Verify {
        code: String,
        #[arg(env = "OTPKIT_SECRET", hide_env_values = true)]
        secret: String,
        /// Steps accepted on either side of the current one
        #[arg(
            long,
            default_value_t = otpkit::verify::DEFAULT_WINDOW,
            env = "OTPKIT_WINDOW",
            value_parser = clap::value_parser!(u32).range(..=i64::from(otpkit::verify::MAX_WINDOW))
        )]
        window: u32,
        #[arg(long)]
        time: Option<i64>,
    },
    /// Print the otpauth:// provisioning URI
    Uri {
        label: String,
        #[arg(env = "OTPKIT_SECRET", hide_env_values = true)]
        secret: String,
        /// Print a QR image URL for the URI instead
        #[arg(long)]
        qr: bool,
        #[arg(long, default_value_t = uri::DEFAULT_QR_SIZE)]
        size: u32,
    },
}

fn init_tracing(level: Option<&str>) {
    let filter = match level {
        Some(level) => EnvFilter::new(level),
        None => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
    };
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

/// Authenticator apps show secrets in lowercase groups; accept them that way.
fn normalize_secret(secret: &str) -> String {
    secret
        .chars()
        .filter(|c| !c.is_whitespace() && *c != '-')
        .map(|c| c.to_ascii_uppercase())
        .collect()
}

fn main() -> Result<ExitCode> {
    color_eyre::install()?;

    let cli = Cli::parse();
    init_tracing(cli.log_level.as_deref());

    let mode = if cli.strict_base32 {
        Base32Mode::Strict
    } else {
        Base32Mode::Compat
    };

    match cli.command {
        Command::Generate { length } => {
            let secret = secret::generate(length).wrap_err("failed to generate a secret")?;
            println!("{secret}");
        }
        Command::Code {
            secret,
            time,
            grouped,
        } => {
            let secret = normalize_secret(&secret);
            let step = time.map(code::time_step_at);
            let current = code::calculate_code_with(&secret, step, code::DEFAULT_DIGITS, mode)
                .map_err(|err| eyre!("failed to understand secret (is it RFC4648 base32?): {err}"))?;
            if grouped {
                println!("{}", code::group_code(&current));
            } else {
                println!("{current}");
            }
        }
        Command::Verify {
            code: submitted,
            secret,
            window,
            time,
        } => {
            let secret = normalize_secret(&secret);
            let submitted: String = submitted.chars().filter(|c| !c.is_whitespace()).collect();
            let verifier = Verifier::new(code::DEFAULT_DIGITS, window).with_mode(mode);
            if verifier.compare_code(&secret, &submitted, time.map(code::time_step_at)) {
                println!("valid");
            } else {
                println!("invalid");
                return Ok(ExitCode::FAILURE);
            }
        }
        Command::Uri {
            label,
            secret,
            qr,
            size,
        } => {
            let secret = normalize_secret(&secret);
            if qr {
                println!("{}", uri::qr_code_url(&label, &secret, size));
            } else {
                println!("{}", uri::build_uri(&label, &secret));
            }
        }
    }

    Ok(ExitCode::SUCCESS)
}
