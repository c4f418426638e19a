use csv::ReaderBuilder;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use crate::error::{PipelineError, PipelineResult};

// one row of a results file, indicator values kept in the configured order
#[derive(Debug, Clone, PartialEq)]
pub struct Record {
    pub group: String,
    pub values: Vec<Option<f64>>,
}

/// All rows of one results file.
#[derive(Debug, Clone)]
pub struct Table {
    pub path: PathBuf,
    pub indicators: Vec<String>,
    pub records: Vec<Record>,
}

impl Table {
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

// read a results csv, keeping only the group column and the indicator columns
pub fn load_table(path: &Path, group_column: &str, indicators: &[String]) -> PipelineResult<Table> {
    if !path.is_file() {
        return Err(PipelineError::MissingInputFile { path: path.to_path_buf() });
    }

    let mut rdr = ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_path(path)?;

    // locate columns by header name, so column order in the file doesn't matter
    let headers = rdr.headers()?.clone();
    let find = |name: &str| -> PipelineResult<usize> {
        headers
            .iter()
            .position(|h| h == name)
            .ok_or_else(|| PipelineError::MissingColumn {
                path: path.to_path_buf(),
                column: name.to_string(),
            })
    };
    let group_idx = find(group_column)?;
    let indicator_idx: Vec<usize> = indicators.iter().map(|name| find(name.as_str())).collect::<PipelineResult<_>>()?;
    debug!("{}: group column at {}, indicators at {:?}", path.display(), group_idx, indicator_idx);

    let mut records = Vec::new();
    for result in rdr.records() {
        let row = result?;
        let line = row.position().map(|p| p.line()).unwrap_or(0);

        let group = row.get(group_idx).unwrap_or("").to_string();
        let mut values = Vec::with_capacity(indicator_idx.len());
        for (&idx, name) in indicator_idx.iter().zip(indicators) {
            let cell = row.get(idx).unwrap_or("");
            let value = parse_cell(cell).ok_or_else(|| PipelineError::InvalidValue {
                path: path.to_path_buf(),
                line,
                column: name.clone(),
                value: cell.to_string(),
            })?;
            values.push(value);
        }
        records.push(Record { group, values });
    }

    info!("Loaded {} rows from {}", records.len(), path.display());
    Ok(Table {
        path: path.to_path_buf(),
        indicators: indicators.to_vec(),
        records,
    })
}

// the usual missing-value markers written by dataframe tools, matched exactly
const NA_TOKENS: &[&str] = &[
    "", "#N/A", "#N/A N/A", "#NA", "-1.#IND", "-1.#QNAN", "-NaN", "-nan", "1.#IND", "1.#QNAN", "<NA>", "N/A",
    "NA", "NULL", "NaN", "None", "n/a", "nan", "null",
];

// Some(None) is a missing cell, None means the cell is garbage
fn parse_cell(cell: &str) -> Option<Option<f64>> {
    if NA_TOKENS.contains(&cell) {
        return Some(None);
    }
    cell.parse::<f64>().ok().filter(|v| v.is_finite()).map(Some)
}
