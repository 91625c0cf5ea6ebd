use std::path::{Path, PathBuf};

use rust_xlsxwriter::{Format, Workbook, XlsxError};

use crate::domain::{Cell, OutputTable};

#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    #[error("failed to create output directory {path:?}: {source}")]
    CreateDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("table with {0} rows does not fit in a worksheet")]
    TooManyRows(usize),
    #[error("failed to write spreadsheet: {0}")]
    Xlsx(#[from] XlsxError),
}

/// Writes `table` as a single-sheet xlsx file and returns the path written.
/// Only columns present in the table are written, in schema order.
pub fn export(table: &OutputTable, path: &Path) -> Result<PathBuf, ExportError> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(|source| ExportError::CreateDir {
            path: parent.to_path_buf(),
            source,
        })?;
    }

    let columns = table.columns();
    let mut workbook = Workbook::new();
    let worksheet = workbook.add_worksheet();
    let header = Format::new().set_bold();

    for (col, column) in (0u16..).zip(columns.iter()) {
        worksheet.write_string_with_format(0, col, column.name(), &header)?;
    }

    for (index, row) in table.rows().iter().enumerate() {
        let row_num = u32::try_from(index + 1).map_err(|_| ExportError::TooManyRows(table.len()))?;

        for (col, column) in (0u16..).zip(columns.iter()) {
            match row.get(*column) {
                Some(Cell::Text(s)) => {
                    worksheet.write_string(row_num, col, s)?;
                }
                Some(Cell::Number(n)) => {
                    worksheet.write_number(row_num, col, *n)?;
                }
                Some(Cell::Bool(b)) => {
                    worksheet.write_boolean(row_num, col, *b)?;
                }
                None => {}
            }
        }
    }

    worksheet.autofit();
    workbook.save(path)?;
    log::info!("Wrote {} row(s) to {}", table.len(), path.display());

    Ok(path.to_path_buf())
}
