use std::collections::HashMap;
use std::io::Read;
use std::path::Path;

use anyhow::{bail, Context, Result};
use thiserror::Error;

use super::model::{CombinationMeta, MicDataset, SourceRow, CONCENTRATION_LEVELS, LEVEL_COUNT};
use crate::mode::{
    PresentationMode, COL_ACCESSED, COL_ANTIBIOTIC, COL_CUTOFF, COL_CUTOFF_TENTATIVE,
    COL_DISTRIBUTIONS, COL_OBSERVATIONS, COL_SPECIES,
};

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

#[derive(Debug, Error, PartialEq)]
pub enum SchemaError {
    #[error("missing required column '{0}'")]
    MissingColumn(String),
    #[error("row {row}, column '{column}': cannot parse '{value}' as {expected}")]
    InvalidCell {
        row: usize,
        column: String,
        value: String,
        expected: &'static str,
    },
}

// ---------------------------------------------------------------------------
// Public entry-point
// ---------------------------------------------------------------------------

/// Load and reshape a dataset.  Dispatch by extension.
///
/// Supported formats:
/// * `.csv` – comma-separated, header row
/// * `.tsv` – tab-separated, header row
pub fn load_file(path: &Path, mode: PresentationMode) -> Result<MicDataset> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    let delimiter = match ext.as_str() {
        "csv" => b',',
        "tsv" | "tab" => b'\t',
        other => bail!("Unsupported file extension: .{other}"),
    };

    let file = std::fs::File::open(path)
        .with_context(|| format!("opening {}", path.display()))?;
    let dataset = load_delimited(file, delimiter, mode)
        .with_context(|| format!("loading {}", path.display()))?;

    log::info!(
        "Loaded {} source rows ({} observations) from {} in {mode} mode",
        dataset.source_rows,
        dataset.len(),
        path.display()
    );
    Ok(dataset)
}

/// Parse a delimited table and reshape it to long format.
///
/// Every one of the 19 concentration columns and every metadata column the
/// mode requires must be present; optional metadata columns are read when
/// they exist.  Any malformed row aborts the whole load.
pub fn load_delimited<R: Read>(
    reader: R,
    delimiter: u8,
    mode: PresentationMode,
) -> Result<MicDataset> {
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(delimiter)
        .from_reader(reader);

    let headers = reader.headers().context("reading header row")?.clone();
    let columns = ColumnIndex::new(&headers, mode)?;

    let mut rows = Vec::new();
    for (row_no, result) in reader.records().enumerate() {
        // 1-based, counting the header line
        let line = row_no + 2;
        let record = result.with_context(|| format!("reading row {line}"))?;
        rows.push(columns.source_row(&record, line)?);
    }

    Ok(MicDataset::from_source_rows(rows))
}

// ---------------------------------------------------------------------------
// Column lookup
// ---------------------------------------------------------------------------

struct ColumnIndex {
    antibiotic: usize,
    species: usize,
    accessed: usize,
    cutoff: Option<usize>,
    cutoff_tentative: Option<usize>,
    distributions: Option<usize>,
    observations: Option<usize>,
    levels: [usize; LEVEL_COUNT],
}

impl ColumnIndex {
    fn new(headers: &csv::StringRecord, mode: PresentationMode) -> Result<Self, SchemaError> {
        let by_name: HashMap<&str, usize> = headers
            .iter()
            .enumerate()
            .map(|(i, h)| (h.trim(), i))
            .collect();

        for col in mode.required_columns() {
            if !by_name.contains_key(col) {
                return Err(SchemaError::MissingColumn(col.to_string()));
            }
        }

        let require = |name: &str| {
            by_name
                .get(name)
                .copied()
                .ok_or_else(|| SchemaError::MissingColumn(name.to_string()))
        };

        let mut levels = [0usize; LEVEL_COUNT];
        for (slot, lvl) in levels.iter_mut().zip(CONCENTRATION_LEVELS.iter()) {
            *slot = require(lvl.label)?;
        }

        Ok(ColumnIndex {
            antibiotic: require(COL_ANTIBIOTIC)?,
            species: require(COL_SPECIES)?,
            accessed: require(COL_ACCESSED)?,
            cutoff: by_name.get(COL_CUTOFF).copied(),
            cutoff_tentative: by_name.get(COL_CUTOFF_TENTATIVE).copied(),
            distributions: by_name.get(COL_DISTRIBUTIONS).copied(),
            observations: by_name.get(COL_OBSERVATIONS).copied(),
            levels,
        })
    }

    fn source_row(&self, record: &csv::StringRecord, line: usize) -> Result<SourceRow, SchemaError> {
        let cell = |idx: usize| record.get(idx).unwrap_or("").trim();

        let mut counts = [None; LEVEL_COUNT];
        for ((slot, &idx), lvl) in counts
            .iter_mut()
            .zip(self.levels.iter())
            .zip(CONCENTRATION_LEVELS.iter())
        {
            *slot = parse_count(cell(idx), line, lvl.label)?;
        }

        let optional = |idx: Option<usize>| idx.map(cell).unwrap_or("");

        let meta = CombinationMeta {
            cutoff: parse_float(optional(self.cutoff), line, COL_CUTOFF)?,
            cutoff_tentative: match self.cutoff_tentative {
                Some(idx) => parse_flag(cell(idx), line, COL_CUTOFF_TENTATIVE)?,
                None => None,
            },
            distributions: parse_count(optional(self.distributions), line, COL_DISTRIBUTIONS)?,
            observations: parse_count(optional(self.observations), line, COL_OBSERVATIONS)?,
            accessed: cell(self.accessed).to_string(),
        };

        Ok(SourceRow {
            antibiotic: cell(self.antibiotic).to_string(),
            species: cell(self.species).to_string(),
            counts,
            meta,
        })
    }
}

// ---------------------------------------------------------------------------
// Cell parsers
// ---------------------------------------------------------------------------

fn is_null(s: &str) -> bool {
    s.is_empty() || s.eq_ignore_ascii_case("nan") || s.eq_ignore_ascii_case("na")
}

fn invalid(row: usize, column: &str, value: &str, expected: &'static str) -> SchemaError {
    SchemaError::InvalidCell {
        row,
        column: column.to_string(),
        value: value.to_string(),
        expected,
    }
}

/// Non-negative integer.  Float-formatted integers (`12.0`) are accepted
/// since integer columns containing nulls are often written that way.
fn parse_count(s: &str, row: usize, column: &str) -> Result<Option<u32>, SchemaError> {
    if is_null(s) {
        return Ok(None);
    }
    if let Ok(n) = s.parse::<u32>() {
        return Ok(Some(n));
    }
    match s.parse::<f64>() {
        Ok(f) if f >= 0.0 && f.fract() == 0.0 && f <= u32::MAX as f64 => Ok(Some(f as u32)),
        _ => Err(invalid(row, column, s, "a non-negative integer")),
    }
}

fn parse_float(s: &str, row: usize, column: &str) -> Result<Option<f64>, SchemaError> {
    if is_null(s) {
        return Ok(None);
    }
    s.parse::<f64>()
        .map(Some)
        .map_err(|_| invalid(row, column, s, "a number"))
}

fn parse_flag(s: &str, row: usize, column: &str) -> Result<Option<bool>, SchemaError> {
    if is_null(s) {
        return Ok(None);
    }
    match s.to_ascii_lowercase().as_str() {
        "true" | "1" | "1.0" | "yes" => Ok(Some(true)),
        "false" | "0" | "0.0" | "no" => Ok(Some(false)),
        _ => Err(invalid(row, column, s, "a boolean")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::Classification;

    fn header(meta: &[&str]) -> String {
        let mut cols: Vec<&str> = meta.to_vec();
        cols.extend(CONCENTRATION_LEVELS.iter().map(|l| l.label));
        cols.join(",")
    }

    fn counts_csv(counts: &[u32; LEVEL_COUNT]) -> String {
        counts
            .iter()
            .map(|c| c.to_string())
            .collect::<Vec<_>>()
            .join(",")
    }

    const FULL_META: [&str; 7] = [
        "ANTIBIOTIC",
        "SPECIES",
        "Distributions",
        "Observations",
        "ECOFF",
        "ECOFF_tentative",
        "accessed",
    ];

    #[test]
    fn loads_full_schema() {
        let mut counts = [0u32; LEVEL_COUNT];
        counts[11] = 4;
        let text = format!(
            "{}\nAmoxicillin,E. coli,3,4,8,False,2024-01-01,{}\n",
            header(&FULL_META),
            counts_csv(&counts)
        );
        let ds = load_delimited(text.as_bytes(), b',', PresentationMode::Full).unwrap();

        assert_eq!(ds.len(), LEVEL_COUNT);
        let row = &ds.observations[11];
        assert_eq!(row.concentration, 4.0);
        assert_eq!(row.count, Some(4));
        assert_eq!(row.meta.cutoff, Some(8.0));
        assert_eq!(row.meta.cutoff_tentative, Some(false));
        assert_eq!(row.meta.distributions, Some(3));
        assert_eq!(row.meta.accessed, "2024-01-01");
        assert_eq!(row.classification(), Some(Classification::Wildtype));
    }

    #[test]
    fn missing_required_metadata_column_fails() {
        let meta = ["ANTIBIOTIC", "SPECIES", "ECOFF", "ECOFF_tentative", "accessed"];
        let text = format!("{}\n", header(&meta));

        let err = load_delimited(text.as_bytes(), b',', PresentationMode::Full).unwrap_err();
        let schema = err.downcast_ref::<SchemaError>().unwrap();
        assert_eq!(
            schema,
            &SchemaError::MissingColumn("Distributions".to_string())
        );
    }

    #[test]
    fn narrower_schema_loads_in_mid_mode() {
        let meta = ["ANTIBIOTIC", "SPECIES", "ECOFF", "ECOFF_tentative", "accessed"];
        let text = format!(
            "{}\nAmoxicillin,E. coli,,True,2024-01-01,{}\n",
            header(&meta),
            counts_csv(&[1; LEVEL_COUNT])
        );
        let ds = load_delimited(text.as_bytes(), b',', PresentationMode::Mid).unwrap();

        let meta = &ds.observations[0].meta;
        assert_eq!(meta.cutoff, None);
        assert_eq!(meta.cutoff_tentative, Some(true));
        assert_eq!(meta.distributions, None);
        assert_eq!(meta.observations, None);
    }

    #[test]
    fn missing_concentration_column_fails() {
        let text = FULL_META.join(",") + ",0.002\n";
        let err = load_delimited(text.as_bytes(), b',', PresentationMode::Full).unwrap_err();
        assert_eq!(
            err.downcast_ref::<SchemaError>(),
            Some(&SchemaError::MissingColumn("0.004".to_string()))
        );
    }

    #[test]
    fn short_row_is_a_hard_failure() {
        let text = format!("{}\nAmoxicillin,E. coli,1\n", header(&FULL_META));
        assert!(load_delimited(text.as_bytes(), b',', PresentationMode::Full).is_err());
    }

    #[test]
    fn garbage_count_reports_row_and_column() {
        let mut cells: Vec<String> = vec![
            "Amoxicillin".into(),
            "E. coli".into(),
            "1".into(),
            "1".into(),
            "8".into(),
            "".into(),
            "x".into(),
        ];
        cells.extend((0..LEVEL_COUNT).map(|i| if i == 4 { "lots".into() } else { "0".into() }));
        let text = format!("{}\n{}\n", header(&FULL_META), cells.join(","));

        let err = load_delimited(text.as_bytes(), b',', PresentationMode::Full).unwrap_err();
        match err.downcast_ref::<SchemaError>() {
            Some(SchemaError::InvalidCell { row, column, .. }) => {
                assert_eq!(*row, 2);
                assert_eq!(column, "0.03");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn cell_parsers_accept_float_formatted_exports() {
        assert_eq!(parse_count("12.0", 1, "c").unwrap(), Some(12));
        assert_eq!(parse_count("", 1, "c").unwrap(), None);
        assert!(parse_count("-1", 1, "c").is_err());
        assert!(parse_count("1.5", 1, "c").is_err());
        assert_eq!(parse_float("NaN", 1, "c").unwrap(), None);
        assert_eq!(parse_float("0.25", 1, "c").unwrap(), Some(0.25));
        assert_eq!(parse_flag("True", 1, "c").unwrap(), Some(true));
        assert_eq!(parse_flag("0", 1, "c").unwrap(), Some(false));
        assert!(parse_flag("maybe", 1, "c").is_err());
    }

    #[test]
    fn unsupported_extension_is_rejected() {
        let err = load_file(Path::new("data.parquet"), PresentationMode::Full).unwrap_err();
        assert!(err.to_string().contains("Unsupported file extension"));
    }
}
