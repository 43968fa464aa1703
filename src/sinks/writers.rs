use std::io::Write;

use tokio::sync::mpsc;

use crate::aggregate::GroupSummary;
use crate::args::OutputFormat;
use crate::error::{AppError, AppResult, SinkError};

/// Receives each completed group summary, in emission order.
pub trait SummaryWriter: Send {
    /// Writes one summary.
    ///
    /// # Errors
    ///
    /// Returns an error when the summary cannot be serialized or delivered.
    fn write_summary(&mut self, summary: &GroupSummary) -> AppResult<()>;
}

/// One human-readable line per group.
pub struct TextWriter<W> {
    out: W,
}

impl<W> TextWriter<W> {
    pub const fn new(out: W) -> Self {
        Self { out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write + Send> SummaryWriter for TextWriter<W> {
    fn write_summary(&mut self, summary: &GroupSummary) -> AppResult<()> {
        writeln!(self.out, "{}", summary)
            .and_then(|()| self.out.flush())
            .map_err(|err| AppError::sink(SinkError::WriteSummary { source: err }))
    }
}

/// One JSON object per line per group.
pub struct JsonLinesWriter<W> {
    out: W,
}

impl<W> JsonLinesWriter<W> {
    pub const fn new(out: W) -> Self {
        Self { out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write + Send> SummaryWriter for JsonLinesWriter<W> {
    fn write_summary(&mut self, summary: &GroupSummary) -> AppResult<()> {
        let line = serde_json::to_string(summary)
            .map_err(|err| AppError::sink(SinkError::SerializeSummary { source: err }))?;
        writeln!(self.out, "{}", line)
            .and_then(|()| self.out.flush())
            .map_err(|err| AppError::sink(SinkError::WriteSummary { source: err }))
    }
}

impl SummaryWriter for mpsc::UnboundedSender<GroupSummary> {
    fn write_summary(&mut self, summary: &GroupSummary) -> AppResult<()> {
        self.send(summary.clone())
            .map_err(|_send_err| AppError::sink(SinkError::ReceiverDropped))
    }
}

#[must_use]
pub fn stdout_writer(format: OutputFormat) -> Box<dyn SummaryWriter> {
    match format {
        OutputFormat::Text => Box::new(TextWriter::new(std::io::stdout())),
        OutputFormat::Json => Box::new(JsonLinesWriter::new(std::io::stdout())),
    }
}
