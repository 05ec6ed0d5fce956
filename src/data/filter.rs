use std::collections::HashSet;

use thiserror::Error;

use super::model::{CombinationMeta, MicDataset, ObservationRow, LEVEL_COUNT};

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

#[derive(Debug, Error, PartialEq)]
pub enum SelectionError {
    #[error("no observations for {antibiotic} / {species}")]
    Empty { antibiotic: String, species: String },
    #[error("metadata differs between rows of {antibiotic} / {species}")]
    InconsistentMetadata { antibiotic: String, species: String },
}

// ---------------------------------------------------------------------------
// Dropdown enumeration
// ---------------------------------------------------------------------------

/// Distinct values in first-occurrence order.
fn distinct<'a>(values: impl Iterator<Item = &'a str>) -> Vec<String> {
    let mut seen = HashSet::new();
    values
        .filter(|v| seen.insert(*v))
        .map(str::to_string)
        .collect()
}

/// Antibiotics selectable in the first dropdown.
pub fn antibiotics(dataset: &MicDataset) -> Vec<String> {
    distinct(dataset.observations.iter().map(|o| o.antibiotic.as_str()))
}

/// Species selectable once `antibiotic` is chosen.
pub fn species_for(dataset: &MicDataset, antibiotic: &str) -> Vec<String> {
    distinct(
        dataset
            .observations
            .iter()
            .filter(|o| o.antibiotic == antibiotic)
            .map(|o| o.species.as_str()),
    )
}

// ---------------------------------------------------------------------------
// Selection
// ---------------------------------------------------------------------------

/// The observations of one antibiotic × species combination.
#[derive(Debug, Clone)]
pub struct Selection<'a> {
    pub antibiotic: &'a str,
    pub species: &'a str,
    pub rows: Vec<&'a ObservationRow>,
}

/// Narrow the dataset to one combination.
///
/// A well-formed dataset yields exactly one row per concentration level;
/// anything else is logged but still returned.
pub fn select<'a>(dataset: &'a MicDataset, antibiotic: &'a str, species: &'a str) -> Selection<'a> {
    let rows: Vec<&ObservationRow> = dataset
        .observations
        .iter()
        .filter(|o| o.antibiotic == antibiotic && o.species == species)
        .collect();

    if rows.len() != LEVEL_COUNT {
        log::warn!(
            "{antibiotic} / {species}: expected {LEVEL_COUNT} observations, found {}",
            rows.len()
        );
    }

    Selection {
        antibiotic,
        species,
        rows,
    }
}

impl Selection<'_> {
    /// Scalar metadata of the combination, checked to be identical on
    /// every row.
    pub fn metadata(&self) -> Result<&CombinationMeta, SelectionError> {
        let first = self.rows.first().ok_or_else(|| SelectionError::Empty {
            antibiotic: self.antibiotic.to_string(),
            species: self.species.to_string(),
        })?;

        if self.rows.iter().any(|o| o.meta != first.meta) {
            return Err(SelectionError::InconsistentMetadata {
                antibiotic: self.antibiotic.to_string(),
                species: self.species.to_string(),
            });
        }
        Ok(&first.meta)
    }

    /// Distinct concentrations, in row order.
    pub fn concentrations(&self) -> Vec<f64> {
        let mut out: Vec<f64> = Vec::with_capacity(self.rows.len());
        for o in &self.rows {
            if !out.contains(&o.concentration) {
                out.push(o.concentration);
            }
        }
        out
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}
