//! QRing command-line front-end.
//!
//! Configures the doorbell label and exports it, driving the same command
//! bridge a graphical front-end would use.
//!
//! # Usage
//!
//! ```text
//! qring [--data-dir <DIR>] [--settings <FILE>] <COMMAND>
//!
//! Commands:
//!   status     Show the landing screen and the saved configuration
//!   configure  Validate and save the contact number, address and preferences
//!   uri        Print the URI encoded in the QR code
//!   label      Print the label (QR code and address line) to the terminal
//!   export     Save the label as SVG into the export directory
//!   reset      Delete the saved configuration
//! ```
//!
//! # Environment variable overrides
//!
//! | Variable          | Description                                   |
//! |-------------------|-----------------------------------------------|
//! | `QRING_DATA_DIR`  | Directory holding the configuration blob      |
//! | `QRING_SETTINGS`  | Path of the `settings.toml` file              |
//! | `RUST_LOG`        | Log filter, overrides the settings' log level |
//!
//! Every command exits non-zero when validation, storage or export fails.

use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use anyhow::Context;
use clap::{Args, Parser, Subcommand};
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

use qring_app::infrastructure::settings::load_settings;
use qring_app::infrastructure::ui_bridge::{self, AppState, CommandResult, ConfigFormDto};

// ── CLI argument definitions ──────────────────────────────────────────────────

/// QRing smart doorbell label.
#[derive(Debug, Parser)]
#[command(name = "qring", about = "Configure and export a QRing doorbell label", version)]
struct Cli {
    /// Directory holding the saved configuration.
    ///
    /// Overrides `[storage] data_dir` from the settings file.
    #[arg(long, global = true, env = "QRING_DATA_DIR")]
    data_dir: Option<PathBuf>,

    /// Settings file to read instead of the platform default.
    #[arg(long, global = true, env = "QRING_SETTINGS")]
    settings: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Show the landing screen and the saved configuration.
    Status,
    /// Validate and save the configuration.
    Configure(ConfigureArgs),
    /// Print the URI encoded in the QR code.
    Uri,
    /// Print the label to the terminal.
    Label,
    /// Save the label as SVG into the export directory.
    Export,
    /// Delete the saved configuration.
    Reset,
}

/// Fields left out keep their saved value.
#[derive(Debug, Args)]
struct ConfigureArgs {
    /// Contact phone number, in any format (`11 1234-5678`, `+54 9 11 ...`).
    #[arg(long)]
    number: Option<String>,

    #[arg(long)]
    street: Option<String>,

    #[arg(long)]
    house_number: Option<String>,

    /// Apartment or unit; pass an empty string to clear it.
    #[arg(long)]
    unit: Option<String>,

    /// `call` or `whatsapp`.
    #[arg(long)]
    mode: Option<String>,

    /// Leave the address off the printed label.
    #[arg(long, conflicts_with = "show_address")]
    hide_address: bool,

    /// Print the address on the label.
    #[arg(long)]
    show_address: bool,
}

impl ConfigureArgs {
    /// Merges the arguments over the currently saved form values.
    fn into_form(self, current: Option<ui_bridge::ConfigDto>) -> ConfigFormDto {
        let base = current.map_or_else(ConfigFormDto::default, |c| ConfigFormDto {
            contact_number: c.contact_number.unwrap_or_default(),
            street: c.street,
            number: c.number,
            unit: c.unit.unwrap_or_default(),
            communication_mode: None,
            show_address_on_label: None,
        });

        let show_address_on_label = match (self.show_address, self.hide_address) {
            (true, _) => Some(true),
            (_, true) => Some(false),
            _ => None,
        };

        ConfigFormDto {
            contact_number: self.number.unwrap_or(base.contact_number),
            street: self.street.unwrap_or(base.street),
            number: self.house_number.unwrap_or(base.number),
            unit: self.unit.unwrap_or(base.unit),
            communication_mode: self.mode,
            show_address_on_label,
        }
    }
}

// ── Output helpers ────────────────────────────────────────────────────────────

/// Unwraps a command result, turning a failure into an `anyhow` error.
fn into_data<T: serde::Serialize>(result: CommandResult<T>) -> anyhow::Result<T> {
    match (result.success, result.data) {
        (true, Some(data)) => Ok(data),
        (_, _) => Err(anyhow::anyhow!(result
            .error
            .unwrap_or_else(|| "command returned no data".to_string()))),
    }
}

fn print_config(config: &ui_bridge::ConfigDto) {
    println!(
        "contact:   {}",
        config.contact_number.as_deref().unwrap_or("(not set)")
    );
    println!("mode:      {}", config.communication_mode);
    println!("uri:       {}", config.action_uri);
    if config.show_address_on_label {
        println!("address:   {}", config.address_display);
    } else {
        println!("address:   (hidden on label)");
    }
}

// ── Commands ──────────────────────────────────────────────────────────────────

async fn run(state: Arc<AppState>, command: Command) -> anyhow::Result<ExitCode> {
    match command {
        Command::Status => {
            let launch = into_data(ui_bridge::launch(state).await)?;
            println!("route:     {}", launch.route);
            match launch.config {
                Some(config) => print_config(&config),
                None => println!("no configuration saved; run `qring configure`"),
            }
        }
        Command::Configure(args) => {
            let current = into_data(ui_bridge::get_config(Arc::clone(&state)).await)?;
            let form = args.into_form(current);
            let result = ui_bridge::save_config(Arc::clone(&state), form).await;

            if !result.success {
                if let Some(saved) = &result.data {
                    eprintln!("configuration not saved:");
                    for (field, message) in saved.errors.iter() {
                        eprintln!("  {field}: {message}");
                    }
                    return Ok(ExitCode::FAILURE);
                }
            }
            let saved = into_data(result)?;
            if let Some(config) = saved.config {
                print_config(&config);
            }
            let route = ui_bridge::current_route(state).await;
            println!("route:     {}", route.as_str());
        }
        Command::Uri => {
            let label = into_data(ui_bridge::get_label(state).await)?;
            println!("{}", label.action_uri);
        }
        Command::Label => {
            let label = into_data(ui_bridge::get_label(state).await)?;
            println!("{}", label.qr_text);
            if let Some(line) = label.address_line {
                println!("{line}");
            }
            println!("{}", label.action_uri);
        }
        Command::Export => {
            let export = into_data(ui_bridge::export_label(state).await)?;
            println!("label saved to {}", export.location);
        }
        Command::Reset => {
            into_data(ui_bridge::reset_config(state).await)?;
            println!("configuration deleted");
        }
    }
    Ok(ExitCode::SUCCESS)
}

// ── Entry point ───────────────────────────────────────────────────────────────

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    let cli = Cli::parse();

    let mut settings = load_settings(cli.settings.as_deref()).context("failed to load settings")?;
    if let Some(dir) = cli.data_dir {
        settings.storage.data_dir = Some(dir);
    }

    // `RUST_LOG` wins over the settings file.
    let default_filter = settings.log_level.clone();
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter)),
        )
        .with_writer(std::io::stderr)
        .init();

    debug!(?settings, "settings loaded");
    let state = AppState::from_settings(settings).context("invalid settings")?;
    info!(command = ?cli.command, "qring starting");

    run(state, cli.command).await
}

// ── Tests ─────────────────────────────────────────────────────────────────────
