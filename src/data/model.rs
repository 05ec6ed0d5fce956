use std::fmt;

use serde::Serialize;

// ---------------------------------------------------------------------------
// Concentration levels – the fixed doubling-dilution series (schema constant)
// ---------------------------------------------------------------------------

/// One column of the wide-format table: its literal header and its value in mg/L.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ConcentrationLevel {
    pub label: &'static str,
    pub mg_per_l: f64,
}

impl ConcentrationLevel {
    const fn new(label: &'static str, mg_per_l: f64) -> Self {
        Self { label, mg_per_l }
    }
}

pub const LEVEL_COUNT: usize = 19;

/// Ascending concentration columns. The headers are matched literally.
pub const CONCENTRATION_LEVELS: [ConcentrationLevel; LEVEL_COUNT] = [
    ConcentrationLevel::new("0.002", 0.002),
    ConcentrationLevel::new("0.004", 0.004),
    ConcentrationLevel::new("0.008", 0.008),
    ConcentrationLevel::new("0.016", 0.016),
    ConcentrationLevel::new("0.03", 0.03),
    ConcentrationLevel::new("0.06", 0.06),
    ConcentrationLevel::new("0.125", 0.125),
    ConcentrationLevel::new("0.25", 0.25),
    ConcentrationLevel::new("0.5", 0.5),
    ConcentrationLevel::new("1", 1.0),
    ConcentrationLevel::new("2", 2.0),
    ConcentrationLevel::new("4", 4.0),
    ConcentrationLevel::new("8", 8.0),
    ConcentrationLevel::new("16", 16.0),
    ConcentrationLevel::new("32", 32.0),
    ConcentrationLevel::new("64", 64.0),
    ConcentrationLevel::new("128", 128.0),
    ConcentrationLevel::new("256", 256.0),
    ConcentrationLevel::new("512", 512.0),
];

/// Header label for a concentration value, if it is one of the fixed levels.
pub fn level_label(mg_per_l: f64) -> Option<&'static str> {
    CONCENTRATION_LEVELS
        .iter()
        .find(|lvl| lvl.mg_per_l == mg_per_l)
        .map(|lvl| lvl.label)
}

// ---------------------------------------------------------------------------
// Classification
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Classification {
    Wildtype,
    Resistant,
}

impl Classification {
    /// Strict comparison against the cutoff. A missing cutoff leaves the
    /// concentration unclassified.
    pub fn classify(concentration: f64, cutoff: Option<f64>) -> Option<Self> {
        let cutoff = cutoff?;
        if concentration > cutoff {
            Some(Classification::Resistant)
        } else {
            Some(Classification::Wildtype)
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Classification::Wildtype => "wildtype",
            Classification::Resistant => "resistant",
        }
    }
}

impl fmt::Display for Classification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

// ---------------------------------------------------------------------------
// SourceRow – one antibiotic × species row of the wide table
// ---------------------------------------------------------------------------

/// Scalar metadata shared by every observation of one combination.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CombinationMeta {
    /// ECOFF in mg/L.
    pub cutoff: Option<f64>,
    /// `None` when the dataset variant has no tentative-flag column.
    pub cutoff_tentative: Option<bool>,
    pub distributions: Option<u32>,
    pub observations: Option<u32>,
    pub accessed: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SourceRow {
    pub antibiotic: String,
    pub species: String,
    /// One count per entry of [`CONCENTRATION_LEVELS`], same order.
    pub counts: [Option<u32>; LEVEL_COUNT],
    pub meta: CombinationMeta,
}

// ---------------------------------------------------------------------------
// ObservationRow – one row of the long table
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ObservationRow {
    pub antibiotic: String,
    pub species: String,
    pub concentration: f64,
    pub count: Option<u32>,
    #[serde(flatten)]
    pub meta: CombinationMeta,
}

impl ObservationRow {
    pub fn classification(&self) -> Option<Classification> {
        Classification::classify(self.concentration, self.meta.cutoff)
    }

    /// Bar height; null counts draw as zero.
    pub fn height(&self) -> u32 {
        self.count.unwrap_or(0)
    }
}

// ---------------------------------------------------------------------------
// MicDataset – the complete reshaped dataset
// ---------------------------------------------------------------------------

/// The loaded dataset in long format.
#[derive(Debug, Clone, Default)]
pub struct MicDataset {
    /// Row-major: source row order, then concentration order.
    pub observations: Vec<ObservationRow>,
    /// Number of wide-format rows the observations were derived from.
    pub source_rows: usize,
}

impl MicDataset {
    /// Wide → long: exactly [`LEVEL_COUNT`] observations per source row.
    pub fn from_source_rows(rows: Vec<SourceRow>) -> Self {
        let source_rows = rows.len();
        let mut observations = Vec::with_capacity(source_rows * LEVEL_COUNT);

        for row in rows {
            for (level, count) in CONCENTRATION_LEVELS.iter().zip(row.counts) {
                observations.push(ObservationRow {
                    antibiotic: row.antibiotic.clone(),
                    species: row.species.clone(),
                    concentration: level.mg_per_l,
                    count,
                    meta: row.meta.clone(),
                });
            }
        }

        MicDataset {
            observations,
            source_rows,
        }
    }

    pub fn len(&self) -> usize {
        self.observations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.observations.is_empty()
    }
}
