//! Table export: console, clipboard and file
//!
//! Delimited output goes through a `csv` writer, so cells holding the
//! delimiter, quotes or line breaks are quoted rather than altered.

use std::io::Write;
use std::path::PathBuf;

use cap_protocol::{DecodedTable, SinkError, TableSink};

/// Prints the aligned table
pub struct ConsoleSink<W: Write> {
    out: W,
}

impl ConsoleSink<std::io::Stdout> {
    pub fn stdout() -> Self {
        Self::with_writer(std::io::stdout())
    }
}

impl<W: Write> ConsoleSink<W> {
    pub fn with_writer(out: W) -> Self {
        Self { out }
    }

    #[cfg(test)]
    fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> TableSink for ConsoleSink<W> {
    fn name(&self) -> &str {
        "console"
    }

    fn write(&mut self, table: &DecodedTable) -> Result<(), SinkError> {
        self.out
            .write_all(table.to_text().as_bytes())
            .and_then(|_| self.out.flush())
            .map_err(|e| SinkError::new("console", e))
    }
}

/// Write the header and every padded row of `table` as delimited records
fn write_records<W: Write>(
    writer: &mut csv::Writer<W>,
    table: &DecodedTable,
) -> Result<(), csv::Error> {
    writer.write_record(table.header())?;
    for row in table.cells() {
        writer.write_record(&row)?;
    }
    writer.flush()?;
    Ok(())
}

/// Render `table` as tab separated text
pub fn to_tsv(table: &DecodedTable) -> Result<String, csv::Error> {
    let mut writer = csv::WriterBuilder::new()
        .delimiter(b'\t')
        .from_writer(Vec::new());
    write_records(&mut writer, table)?;

    let bytes = writer
        .into_inner()
        .map_err(|e| csv::Error::from(e.into_error()))?;
    // Every cell came from a String
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}

/// Places the table on the system clipboard as tab separated text
///
/// Spreadsheets and document editors split pasted TSV into cells.
///
/// On X11 and Wayland the clipboard is owned by the process that set it, so
/// the contents vanish when that process exits. There the sink blocks until
/// another application takes over the clipboard, e.g. by copying something
/// else. Other platforms hand the text to the system and return at once.
#[derive(Default)]
pub struct ClipboardSink;

#[cfg(all(
    unix,
    not(any(target_os = "macos", target_os = "android", target_os = "emscripten"))
))]
fn set_clipboard(clipboard: &mut arboard::Clipboard, text: String) -> Result<(), arboard::Error> {
    use arboard::SetExtLinux;

    tracing::info!("Serving clipboard until another application replaces it");
    clipboard.set().wait().text(text)
}

#[cfg(not(all(
    unix,
    not(any(target_os = "macos", target_os = "android", target_os = "emscripten"))
)))]
fn set_clipboard(clipboard: &mut arboard::Clipboard, text: String) -> Result<(), arboard::Error> {
    clipboard.set_text(text)
}

impl TableSink for ClipboardSink {
    fn name(&self) -> &str {
        "clipboard"
    }

    fn write(&mut self, table: &DecodedTable) -> Result<(), SinkError> {
        let text = to_tsv(table).map_err(|e| SinkError::new(self.name(), e))?;
        let mut clipboard =
            arboard::Clipboard::new().map_err(|e| SinkError::new(self.name(), e))?;
        set_clipboard(&mut clipboard, text)
            .map_err(|e| SinkError::new(self.name(), e))?;
        tracing::info!("Copied {} rows to clipboard", table.len());
        Ok(())
    }
}

/// Output format for [`FileSink`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileFormat {
    Csv,
    Tsv,
}

impl FileFormat {
    /// TSV for `.tsv`/`.txt` files, CSV otherwise
    pub fn from_path(path: &std::path::Path) -> Self {
        match path.extension().and_then(|e| e.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("tsv") || ext.eq_ignore_ascii_case("txt") => {
                FileFormat::Tsv
            }
            _ => FileFormat::Csv,
        }
    }

    fn delimiter(self) -> u8 {
        match self {
            FileFormat::Csv => b',',
            FileFormat::Tsv => b'\t',
        }
    }
}

/// Writes the table to a file
pub struct FileSink {
    path: PathBuf,
    format: FileFormat,
}

impl FileSink {
    pub fn new(path: PathBuf) -> Self {
        let format = FileFormat::from_path(&path);
        Self { path, format }
    }
}

impl TableSink for FileSink {
    fn name(&self) -> &str {
        "file"
    }

    fn write(&mut self, table: &DecodedTable) -> Result<(), SinkError> {
        let fail = |e: csv::Error| {
            SinkError::new(
                "file",
                format!("failed to write {}: {}", self.path.display(), e),
            )
        };

        let mut writer = csv::WriterBuilder::new()
            .delimiter(self.format.delimiter())
            .from_path(&self.path)
            .map_err(fail)?;
        write_records(&mut writer, table).map_err(fail)?;

        tracing::info!("Wrote {} rows to {}", table.len(), self.path.display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::{to_tsv, ConsoleSink, FileFormat, FileSink};
    use cap_protocol::{DecodedFrame, DecodedRow, DecodedTable, TableSink};
    use std::path::Path;

    fn table() -> DecodedTable {
        DecodedTable::from_rows(vec![DecodedRow {
            description: "perf mode silent".to_string(),
            frame: DecodedFrame {
                cmd: "0d02".to_string(),
                argc: 4,
                args: vec!["00".into(), "01".into(), "05".into(), "00".into()],
            },
        }])
    }

    #[test]
    fn test_console_sink_prints_text() {
        let mut sink = ConsoleSink::with_writer(Vec::new());
        sink.write(&table()).unwrap();
        let printed = String::from_utf8(sink.into_inner()).unwrap();
        assert_eq!(printed, table().to_text());
    }

    #[test]
    fn test_file_format_from_extension() {
        assert_eq!(FileFormat::from_path(Path::new("out.csv")), FileFormat::Csv);
        assert_eq!(FileFormat::from_path(Path::new("out.TSV")), FileFormat::Tsv);
        assert_eq!(FileFormat::from_path(Path::new("out")), FileFormat::Csv);
    }

    #[test]
    fn test_file_sink_writes_csv() {
        let path = std::env::temp_dir().join(format!("capextract-{}.csv", std::process::id()));
        let mut sink = FileSink::new(path.clone());
        sink.write(&table()).unwrap();

        let written = std::fs::read_to_string(&path).unwrap();
        assert_eq!(
            written,
            "action,cmd,argc,arg0,arg1,arg2,arg3\nperf mode silent,0d02,4,00,01,05,00\n"
        );
        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn test_file_sink_quotes_commas() {
        let path = std::env::temp_dir().join(format!("capextract-comma-{}.csv", std::process::id()));
        let mut table_rows = table().rows().to_vec();
        table_rows[0].description = "fan, \"manual\"".to_string();
        FileSink::new(path.clone())
            .write(&DecodedTable::from_rows(table_rows))
            .unwrap();

        let written = std::fs::read_to_string(&path).unwrap();
        assert_eq!(
            written.lines().nth(1).unwrap(),
            "\"fan, \"\"manual\"\"\",0d02,4,00,01,05,00"
        );
        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn test_tsv_quotes_tabs_and_newlines() {
        let mut rows = table().rows().to_vec();
        rows[0].description = "fan\tmode\nsilent".to_string();
        let tsv = to_tsv(&DecodedTable::from_rows(rows)).unwrap();

        assert!(tsv.starts_with("action\tcmd\targc\targ0\targ1\targ2\targ3\n"));
        assert!(tsv.contains("\"fan\tmode\nsilent\"\t0d02\t4\t00\t01\t05\t00\n"));

        let mut reader = csv::ReaderBuilder::new()
            .delimiter(b'\t')
            .from_reader(tsv.as_bytes());
        let record = reader.records().next().unwrap().unwrap();
        assert_eq!(&record[0], "fan\tmode\nsilent");
    }

    #[test]
    fn test_file_sink_reports_path() {
        let path = std::env::temp_dir()
            .join("capextract-missing-dir")
            .join("nested")
            .join("out.csv");
        let err = FileSink::new(path).write(&table()).unwrap_err();
        assert_eq!(err.sink, "file");
        assert!(err.reason.contains("out.csv"));
    }
}
