//! Capture Extract
//!
//! Turns a Wireshark export of a peripheral's HID SET_REPORT traffic and a
//! file of timestamped notes into a table of decoded commands, one row per
//! captured frame, grouped under the note that explains it.
//!
//! Wireshark filter used to produce the export:
//!
//! ```text
//! (_ws.col.protocol == "USBHID") && (_ws.col.info == "SET_REPORT Request") && usb.data_len > 20
//! ```

mod export;
mod ingest;
mod settings;

use std::path::PathBuf;

use anyhow::Context;
use cap_protocol::{DecodeMode, DecodedTable, TableSink};
use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use export::{ClipboardSink, ConsoleSink, FileSink};
use settings::Settings;

/// Decode captured feature reports into a command table
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Wireshark CSV export with Time and Data columns
    capture: PathBuf,

    /// Notes file, one `<seconds> <description>` per line
    annotations: PathBuf,

    /// Clamp short frames instead of failing on them
    #[arg(long, overrides_with = "strict")]
    lenient: bool,

    /// Fail on short or malformed frames (the default)
    #[arg(long, overrides_with = "lenient")]
    strict: bool,

    /// Copy the table to the clipboard
    #[arg(long, overrides_with = "no_clipboard")]
    clipboard: bool,

    /// Do not copy the table to the clipboard
    #[arg(long, overrides_with = "clipboard")]
    no_clipboard: bool,

    /// Also write the table to FILE (.csv, or .tsv for tab separated)
    #[arg(short, long, value_name = "FILE")]
    output: Option<PathBuf>,

    /// Do not print the table
    #[arg(short, long, overrides_with = "print")]
    quiet: bool,

    /// Print the table (the default)
    #[arg(long, overrides_with = "quiet")]
    print: bool,

    /// Persist the effective options as the new defaults
    #[arg(long)]
    save_settings: bool,
}

impl Cli {
    /// Layer command line switches over stored settings
    fn apply(&self, mut settings: Settings) -> Settings {
        if self.lenient {
            settings.decode_mode = DecodeMode::Lenient;
        }
        if self.strict {
            settings.decode_mode = DecodeMode::Strict;
        }
        if self.clipboard {
            settings.copy_to_clipboard = true;
        }
        if self.no_clipboard {
            settings.copy_to_clipboard = false;
        }
        if self.quiet {
            settings.print_table = false;
        }
        if self.print {
            settings.print_table = true;
        }
        settings
    }

    fn sinks(&self, settings: &Settings) -> Vec<Box<dyn TableSink>> {
        let mut sinks: Vec<Box<dyn TableSink>> = Vec::new();
        if settings.print_table {
            sinks.push(Box::new(ConsoleSink::stdout()));
        }
        if let Some(path) = &self.output {
            sinks.push(Box::new(FileSink::new(path.clone())));
        }
        if settings.copy_to_clipboard {
            sinks.push(Box::new(ClipboardSink));
        }
        sinks
    }
}

/// Read both inputs and build the table; nothing is written on failure
fn build_table(cli: &Cli, settings: &Settings) -> anyhow::Result<DecodedTable> {
    let frames = ingest::load_capture(&cli.capture)
        .with_context(|| format!("Failed to load capture {}", cli.capture.display()))?;
    let actions = ingest::load_annotations(&cli.annotations)
        .with_context(|| format!("Failed to load annotations {}", cli.annotations.display()))?;

    tracing::info!(
        frames = frames.len(),
        actions = actions.len(),
        mode = ?settings.decode_mode,
        "Decoding capture"
    );

    let rows = cap_protocol::join(&actions, &frames, settings.decode_mode)
        .context("Annotations and capture are out of sync")?;

    Ok(DecodedTable::with_min_arg_columns(
        rows,
        settings.min_arg_columns,
    ))
}

fn main() -> anyhow::Result<()> {
    // Logs go to stderr so stdout carries only the table
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "capextract=info,cap_protocol=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();
    let settings = cli.apply(Settings::load());

    if cli.save_settings {
        let path = settings.save().map_err(anyhow::Error::msg)?;
        tracing::info!("Saved settings to {}", path.display());
    }

    let table = build_table(&cli, &settings)?;
    tracing::info!(rows = table.len(), "Decoded capture");

    let mut sinks = cli.sinks(&settings);
    cap_protocol::write_all(&table, &mut sinks).context("Failed to export table")?;

    Ok(())
}
