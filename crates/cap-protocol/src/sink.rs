//! Destinations for a finished table

use crate::error::SinkError;
use crate::table::DecodedTable;

/// Something a finished table can be written to
///
/// The console, the clipboard and files are all sinks, so the pipeline
/// can be exercised without a terminal or a desktop session.
pub trait TableSink {
    /// Short name used in logs and errors
    fn name(&self) -> &str;

    /// Write the whole table
    fn write(&mut self, table: &DecodedTable) -> Result<(), SinkError>;
}

/// Keeps every table written to it
#[derive(Debug, Default)]
pub struct MemorySink {
    pub tables: Vec<DecodedTable>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }
}

impl TableSink for MemorySink {
    fn name(&self) -> &str {
        "memory"
    }

    fn write(&mut self, table: &DecodedTable) -> Result<(), SinkError> {
        self.tables.push(table.clone());
        Ok(())
    }
}

/// Write `table` to each sink in order, stopping at the first failure
pub fn write_all(table: &DecodedTable, sinks: &mut [Box<dyn TableSink>]) -> Result<(), SinkError> {
    for sink in sinks.iter_mut() {
        tracing::debug!(sink = sink.name(), rows = table.len(), "Writing table");
        sink.write(table)?;
    }
    Ok(())
}
