use anyhow::{anyhow, Context, Result};
use csv::ReaderBuilder;
use std::io;

use crate::ir::Record;

#[derive(Debug, Clone)]
pub struct CsvData {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

pub enum ColumnSelector {
    Index(usize),
    Name(String),
}

pub fn read_csv(reader: impl io::Read) -> Result<CsvData> {
    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .from_reader(reader);

    let headers = reader
        .headers()
        .context("Failed to read CSV headers")?
        .iter()
        .map(|s| s.to_string())
        .collect();

    let mut rows = Vec::new();
    for result in reader.records() {
        let record = result.context("Failed to read CSV record")?;
        let row: Vec<String> = record.iter().map(|s| s.to_string()).collect();
        rows.push(row);
    }

    if rows.is_empty() {
        return Err(anyhow!("CSV must contain at least one data row"));
    }

    Ok(CsvData { headers, rows })
}

pub fn read_csv_from_stdin() -> Result<CsvData> {
    read_csv(io::stdin())
}

pub fn parse_column_selector(input: &str) -> ColumnSelector {
    match input.parse::<usize>() {
        Ok(index) => ColumnSelector::Index(index),
        Err(_) => ColumnSelector::Name(input.to_string()),
    }
}

/// Resolve a selector to (column index, actual header name).
fn resolve_column(data: &CsvData, selector: &ColumnSelector) -> Result<(usize, String)> {
    match selector {
        ColumnSelector::Index(idx) => {
            if *idx >= data.headers.len() {
                return Err(anyhow!(
                    "Column index {} out of bounds (available columns: {})",
                    idx,
                    data.headers.len()
                ));
            }
            Ok((*idx, data.headers[*idx].clone()))
        }
        ColumnSelector::Name(name) => {
            let idx = data
                .headers
                .iter()
                .position(|h| h.eq_ignore_ascii_case(name))
                .ok_or_else(|| {
                    anyhow!(
                        "Column '{}' not found. Available columns: {}",
                        name,
                        data.headers.join(", ")
                    )
                })?;
            Ok((idx, data.headers[idx].clone()))
        }
    }
}

fn parse_cell(row: &[String], row_idx: usize, col_idx: usize, col_name: &str) -> Result<f64> {
    let value_str = row.get(col_idx).ok_or_else(|| {
        anyhow!(
            "Row {} has only {} columns, expected at least {}",
            row_idx + 1,
            row.len(),
            col_idx + 1
        )
    })?;

    value_str.parse::<f64>().with_context(|| {
        format!(
            "Failed to parse value '{}' as number in column '{}' at row {}",
            value_str,
            col_name,
            row_idx + 1
        )
    })
}

/// Extract ordered records for the series views: one ordinal key column plus
/// one or more measure columns.
///
/// This is the ingestion side of the chart pipeline's precondition: the
/// returned records are sorted ascending by key and keys are unique, so the
/// transform/geometry stages never have to revalidate. Malformed numbers,
/// short rows, and duplicate keys all fail here.
///
/// Returns (key column name, measure column names, records).
pub fn extract_records(
    data: &CsvData,
    key_selector: &ColumnSelector,
    measure_selectors: &[ColumnSelector],
) -> Result<(String, Vec<String>, Vec<Record>)> {
    let (key_idx, key_name) = resolve_column(data, key_selector)?;

    let mut measure_cols = Vec::with_capacity(measure_selectors.len());
    for selector in measure_selectors {
        measure_cols.push(resolve_column(data, selector)?);
    }

    let mut records = Vec::with_capacity(data.rows.len());
    for (row_idx, row) in data.rows.iter().enumerate() {
        let key = parse_cell(row, row_idx, key_idx, &key_name)?;
        if !key.is_finite() {
            return Err(anyhow!(
                "Non-finite key '{}' in column '{}' at row {}",
                key,
                key_name,
                row_idx + 1
            ));
        }

        let mut values = Vec::with_capacity(measure_cols.len());
        for (col_idx, col_name) in &measure_cols {
            values.push(parse_cell(row, row_idx, *col_idx, col_name)?);
        }
        records.push(Record { key, values });
    }

    records.sort_by(|a, b| a.key.total_cmp(&b.key));
    for pair in records.windows(2) {
        if pair[0].key == pair[1].key {
            return Err(anyhow!(
                "Duplicate key '{}' in column '{}': keys must be unique",
                pair[0].key,
                key_name
            ));
        }
    }

    let measure_names = measure_cols.into_iter().map(|(_, name)| name).collect();
    Ok((key_name, measure_names, records))
}

/// Extract (category, value) pairs for the static bar/heatmap views.
/// Repeated categories are aggregated by sum, keeping first-appearance
/// order.
///
/// Returns (category column name, value column name, pairs).
pub fn extract_categories(
    data: &CsvData,
    category_selector: &ColumnSelector,
    value_selector: &ColumnSelector,
) -> Result<(String, String, Vec<(String, f64)>)> {
    let (cat_idx, cat_name) = resolve_column(data, category_selector)?;
    let (val_idx, val_name) = resolve_column(data, value_selector)?;

    let mut order: Vec<String> = Vec::new();
    let mut totals: Vec<f64> = Vec::new();

    for (row_idx, row) in data.rows.iter().enumerate() {
        let category = row.get(cat_idx).ok_or_else(|| {
            anyhow!(
                "Row {} has only {} columns, expected at least {}",
                row_idx + 1,
                row.len(),
                cat_idx + 1
            )
        })?;
        let value = parse_cell(row, row_idx, val_idx, &val_name)?;

        match order.iter().position(|c| c == category) {
            Some(i) => totals[i] += value,
            None => {
                order.push(category.clone());
                totals.push(value);
            }
        }
    }

    let pairs = order.into_iter().zip(totals).collect();
    Ok((cat_name, val_name, pairs))
}
