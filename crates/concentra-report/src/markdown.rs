//! Line-oriented markdown writer.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use crate::error::ReportError;

/// Writes markdown blocks to any [`Write`] sink.
///
/// Tables are checked: every row must have as many cells as the last
/// header.
pub struct MarkdownWriter<W: Write> {
    out: W,
    columns: Option<usize>,
}

impl MarkdownWriter<BufWriter<File>> {
    /// Create (or truncate) `path` and write to it through a buffer.
    pub fn create(path: &Path) -> Result<Self, ReportError> {
        let file = File::create(path)
            .map_err(|e| ReportError::Io(format!("{}: {e}", path.display())))?;
        Ok(Self::new(BufWriter::new(file)))
    }
}

impl<W: Write> MarkdownWriter<W> {
    pub fn new(out: W) -> Self {
        Self { out, columns: None }
    }

    /// `#`-style header; `level` is clamped to 1..=6.
    pub fn header(&mut self, text: &str, level: usize) -> Result<(), ReportError> {
        self.columns = None;
        let hashes = "#".repeat(level.clamp(1, 6));
        writeln!(self.out, "{hashes} {text}\n")?;
        Ok(())
    }

    /// A paragraph line. Two trailing spaces force a markdown line break.
    pub fn line(&mut self, text: &str) -> Result<(), ReportError> {
        self.columns = None;
        writeln!(self.out, "{text}  ")?;
        Ok(())
    }

    pub fn quoted(&mut self, text: &str) -> Result<(), ReportError> {
        self.columns = None;
        writeln!(self.out, "> {text}  ")?;
        Ok(())
    }

    pub fn blank(&mut self) -> Result<(), ReportError> {
        self.columns = None;
        writeln!(self.out)?;
        Ok(())
    }

    pub fn divider(&mut self) -> Result<(), ReportError> {
        self.columns = None;
        writeln!(self.out, "\n---\n")?;
        Ok(())
    }

    pub fn table_header(&mut self, headers: &[&str]) -> Result<(), ReportError> {
        writeln!(self.out, "| {} |", headers.join(" | "))?;
        let rule: Vec<&str> = headers.iter().map(|_| "---").collect();
        writeln!(self.out, "|{}|", rule.join("|"))?;
        self.columns = Some(headers.len());
        Ok(())
    }

    pub fn table_row<S: AsRef<str>>(&mut self, cells: &[S]) -> Result<(), ReportError> {
        let expected = self.columns.ok_or(ReportError::NoTable)?;
        if cells.len() != expected {
            return Err(ReportError::ColumnMismatch {
                expected,
                got: cells.len(),
            });
        }
        let cells: Vec<String> = cells.iter().map(|c| escape_cell(c.as_ref())).collect();
        writeln!(self.out, "| {} |", cells.join(" | "))?;
        Ok(())
    }

    /// Flush and hand back the sink.
    pub fn finish(mut self) -> Result<W, ReportError> {
        self.out.flush()?;
        Ok(self.out)
    }
}

/// Pipes would split a cell.
fn escape_cell(text: &str) -> String {
    text.replace('|', "\\|")
}
