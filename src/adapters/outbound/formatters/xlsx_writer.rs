use crate::package_audit::domain::PackageMetadata;
use crate::ports::outbound::MetadataTableWriter;
use crate::shared::error::PipelineError;
use crate::shared::Result;
use rust_xlsxwriter::{Format, Workbook};
use std::path::Path;

/// Column titles and widths, in output order
const COLUMNS: [(&str, f64); 4] = [
    ("Name", 30.0),
    ("Version", 20.0),
    ("License Type", 20.0),
    ("URL", 50.0),
];

/// XlsxMetadataWriter adapter producing the metadata spreadsheet
///
/// This adapter implements the MetadataTableWriter port with
/// `rust_xlsxwriter`: one bold header row, then one row per package.
pub struct XlsxMetadataWriter;

impl XlsxMetadataWriter {
    pub fn new() -> Self {
        Self
    }

    fn build(rows: &[PackageMetadata]) -> std::result::Result<Workbook, rust_xlsxwriter::XlsxError> {
        let mut workbook = Workbook::new();
        let worksheet = workbook.add_worksheet();
        let header_format = Format::new().set_bold();

        for (col, (title, width)) in COLUMNS.iter().enumerate() {
            let col = col as u16;
            worksheet.write_string_with_format(0, col, *title, &header_format)?;
            worksheet.set_column_width(col, *width)?;
        }

        for (index, row) in rows.iter().enumerate() {
            let line = index as u32 + 1;
            worksheet.write_string(line, 0, &row.name)?;
            worksheet.write_string(line, 1, &row.version)?;
            worksheet.write_string(line, 2, &row.license_type)?;
            worksheet.write_string(line, 3, &row.homepage_url)?;
        }

        Ok(workbook)
    }
}

impl Default for XlsxMetadataWriter {
    fn default() -> Self {
        Self::new()
    }
}

impl MetadataTableWriter for XlsxMetadataWriter {
    fn write_table(&self, rows: &[PackageMetadata], path: &Path) -> Result<()> {
        let report_error = |details: String| PipelineError::ReportWrite {
            path: path.to_path_buf(),
            details,
        };

        let mut workbook = Self::build(rows).map_err(|e| report_error(e.to_string()))?;
        workbook
            .save(path)
            .map_err(|e| report_error(e.to_string()))?;
        Ok(())
    }
}
