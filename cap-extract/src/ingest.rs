//! Reading the capture export and the annotation file

use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};

use cap_protocol::{AnnotatedAction, AnnotationError, CapturedFrame, DecodeError, RawFrame};
use thiserror::Error;
use tracing::debug;

/// Capture column holding the time since capture start, in seconds
pub const TIME_COLUMN: &str = "Time";
/// Capture column holding the payload hex
pub const DATA_COLUMN: &str = "Data";

/// Errors that can occur while reading input files
#[derive(Debug, Error)]
pub enum IngestError {
    /// Failed to open or read a file
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Malformed CSV
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// The capture export lacks a required column
    #[error("capture export has no \"{0}\" column")]
    MissingColumn(&'static str),

    /// Capture time is not a number
    #[error("line {line}: invalid capture time {value:?}")]
    InvalidTime { line: u64, value: String },

    /// Payload could not be normalized
    #[error("line {line}: invalid payload: {source}")]
    InvalidFrame {
        line: u64,
        #[source]
        source: DecodeError,
    },

    /// Annotation record could not be parsed
    #[error("line {line}: {source}")]
    InvalidAnnotation {
        line: u64,
        #[source]
        source: AnnotationError,
    },
}

fn open(path: &Path) -> Result<File, IngestError> {
    File::open(path).map_err(|source| IngestError::Io {
        path: path.to_path_buf(),
        source,
    })
}

/// Read the Wireshark CSV export at `path`
pub fn load_capture(path: &Path) -> Result<Vec<CapturedFrame>, IngestError> {
    let frames = read_capture(open(path)?)?;
    debug!(path = %path.display(), frames = frames.len(), "Loaded capture");
    Ok(frames)
}

/// Read the annotation file at `path`
pub fn load_annotations(path: &Path) -> Result<Vec<AnnotatedAction>, IngestError> {
    let actions = read_annotations(open(path)?)?;
    debug!(path = %path.display(), actions = actions.len(), "Loaded annotations");
    Ok(actions)
}

/// Read a comma separated capture export with `Time` and `Data` columns
///
/// Other columns are ignored. Rows without payload are skipped.
pub fn read_capture<R: Read>(reader: R) -> Result<Vec<CapturedFrame>, IngestError> {
    let mut csv = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let headers = csv.headers()?.clone();
    let column = |name: &'static str| {
        headers
            .iter()
            .position(|h| h == name)
            .ok_or(IngestError::MissingColumn(name))
    };
    let time_idx = column(TIME_COLUMN)?;
    let data_idx = column(DATA_COLUMN)?;

    let mut frames = Vec::new();
    for record in csv.records() {
        let record = record?;
        let line = record.position().map(|p| p.line()).unwrap_or(0);

        let data = record.get(data_idx).unwrap_or("");
        if data.is_empty() {
            debug!(line, "Skipping capture row without payload");
            continue;
        }

        let time_text = record.get(time_idx).unwrap_or("");
        let time = time_text
            .parse::<f64>()
            .map_err(|_| IngestError::InvalidTime {
                line,
                value: time_text.to_string(),
            })?;

        let frame =
            RawFrame::parse(data).map_err(|source| IngestError::InvalidFrame { line, source })?;

        frames.push(CapturedFrame::new(time, frame));
    }

    Ok(frames)
}

/// Read a space separated `<seconds> <description>` file without header
///
/// Descriptions may be quoted (`12 "set fan mode"`) or left as bare words.
/// Blank lines and lines starting with `#` are skipped.
pub fn read_annotations<R: Read>(reader: R) -> Result<Vec<AnnotatedAction>, IngestError> {
    let mut csv = csv::ReaderBuilder::new()
        .delimiter(b' ')
        .has_headers(false)
        .flexible(true)
        .comment(Some(b'#'))
        .from_reader(reader);

    let mut actions = Vec::new();
    for record in csv.records() {
        let record = record?;
        if record.iter().all(|field| field.trim().is_empty()) {
            continue;
        }

        let line = record.position().map(|p| p.line()).unwrap_or(0);
        let action = AnnotatedAction::from_fields(record.iter())
            .map_err(|source| IngestError::InvalidAnnotation { line, source })?;
        actions.push(action);
    }

    Ok(actions)
}
