//! CSV table writer
//!
//! Rows are written as UTF-8 CSV (comma separated, fields quoted only when
//! needed, `\n` after every record) and transcoded to the target encoding
//! when the table is finished.

use crate::domain::{Result, RowpackError};
use csv::{QuoteStyle, Terminator, WriterBuilder};
use encoding_rs::{Encoding, UTF_8};

/// Resolves an encoding label such as `windows-1252` or `latin1`
///
/// Falls back to UTF-8 with a warning when the label is absent or unknown.
pub fn resolve_encoding(label: Option<&str>) -> &'static Encoding {
    let Some(label) = label.map(str::trim).filter(|l| !l.is_empty()) else {
        return UTF_8;
    };

    match Encoding::for_label(label.as_bytes()) {
        Some(encoding) => encoding.output_encoding(),
        None => {
            tracing::warn!(encoding = %label, "Unknown encoding, falling back to UTF-8");
            UTF_8
        }
    }
}

/// CSV table under construction
pub struct CsvTable {
    writer: csv::Writer<Vec<u8>>,
    rows: usize,
}

impl CsvTable {
    /// Starts a table with its header row
    ///
    /// # Errors
    ///
    /// Returns [`RowpackError::Csv`] if the header cannot be written.
    pub fn new<I, T>(header: I) -> Result<Self>
    where
        I: IntoIterator<Item = T>,
        T: AsRef<[u8]>,
    {
        let mut writer = WriterBuilder::new()
            .delimiter(b',')
            .quote_style(QuoteStyle::Necessary)
            .terminator(Terminator::Any(b'\n'))
            .flexible(false)
            .from_writer(Vec::new());

        writer.write_record(header)?;

        Ok(Self {
            writer,
            rows: 0,
        })
    }

    /// Appends one data row
    ///
    /// # Errors
    ///
    /// Returns [`RowpackError::Csv`] if the row width differs from the header.
    pub fn push_row<I, T>(&mut self, row: I) -> Result<()>
    where
        I: IntoIterator<Item = T>,
        T: AsRef<[u8]>,
    {
        self.writer.write_record(row)?;
        self.rows += 1;
        Ok(())
    }

    /// Data rows written so far
    pub fn rows(&self) -> usize {
        self.rows
    }

    /// Finishes the table and encodes it
    ///
    /// Characters the encoding cannot represent are replaced by numeric
    /// character references and reported once as a warning.
    ///
    /// # Errors
    ///
    /// Returns [`RowpackError::Csv`] if the buffered text cannot be recovered.
    pub fn finish(self, encoding: &'static Encoding) -> Result<Vec<u8>> {
        let bytes = self
            .writer
            .into_inner()
            .map_err(|e| RowpackError::Csv(e.to_string()))?;

        if encoding == UTF_8 {
            return Ok(bytes);
        }

        let text =
            String::from_utf8(bytes).map_err(|e| RowpackError::Csv(format!("Invalid UTF-8: {e}")))?;
        let (encoded, used, had_errors) = encoding.encode(&text);
        if had_errors {
            tracing::warn!(
                encoding = used.name(),
                "Some characters are not representable and were replaced"
            );
        }
        Ok(encoded.into_owned())
    }
}
