// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use anyhow::{Context, Result};
use prospect_app::ColumnSpec;
use rust_xlsxwriter::{Workbook, Worksheet};
use std::fs;
use std::path::{Path, PathBuf};
use time::Date;

/// `<prefix>_Export_<YYYY-MM-DD>.xlsx`
pub fn export_filename(prefix: &str, date: Date) -> String {
    format!(
        "{prefix}_Export_{:04}-{:02}-{:02}.xlsx",
        date.year(),
        u8::from(date.month()),
        date.day(),
    )
}

/// Serializes a single-sheet workbook: one header row from the column
/// specs, then one row per record, all cells already display-formatted
/// by the caller. Column widths follow the specs.
pub fn workbook_bytes(columns: &[ColumnSpec], rows: &[Vec<String>]) -> Result<Vec<u8>> {
    let mut workbook = Workbook::new();
    let mut worksheet = Worksheet::new();

    for (col, spec) in columns.iter().enumerate() {
        let col = col as u16;
        worksheet
            .write_string(0, col, spec.header)
            .context("write header row")?;
        worksheet
            .set_column_width(col, f64::from(spec.width))
            .context("set column width")?;
    }

    for (row_index, row) in rows.iter().enumerate() {
        let row_index = (row_index + 1) as u32;
        for (col, cell) in row.iter().enumerate() {
            worksheet
                .write_string(row_index, col as u16, cell)
                .context("write data cell")?;
        }
    }

    workbook.push_worksheet(worksheet);
    workbook.save_to_buffer().context("serialize workbook")
}

/// Writes the workbook into `out_dir` under the export filename pattern.
/// The buffer is fully serialized before anything touches the
/// filesystem, and the bytes land via a temp file plus rename, so a
/// failure never leaves a partial export behind.
pub fn export_to_file(
    out_dir: &Path,
    prefix: &str,
    date: Date,
    columns: &[ColumnSpec],
    rows: &[Vec<String>],
) -> Result<PathBuf> {
    let buffer = workbook_bytes(columns, rows)?;

    fs::create_dir_all(out_dir)
        .with_context(|| format!("create export directory {}", out_dir.display()))?;

    let file_name = export_filename(prefix, date);
    let final_path = out_dir.join(&file_name);
    let temp_path = out_dir.join(format!(".{file_name}.tmp"));

    fs::write(&temp_path, &buffer)
        .with_context(|| format!("write export file {}", temp_path.display()))?;
    if let Err(error) = fs::rename(&temp_path, &final_path) {
        let _ = fs::remove_file(&temp_path);
        return Err(error)
            .with_context(|| format!("finalize export file {}", final_path.display()));
    }

    Ok(final_path)
}
