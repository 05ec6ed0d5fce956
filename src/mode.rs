use std::fmt;

use clap::ValueEnum;
use serde::Serialize;

// ---------------------------------------------------------------------------
// Presentation mode – schema variant + UI affordances in one place
// ---------------------------------------------------------------------------

pub const COL_ANTIBIOTIC: &str = "ANTIBIOTIC";
pub const COL_SPECIES: &str = "SPECIES";
pub const COL_DISTRIBUTIONS: &str = "Distributions";
pub const COL_OBSERVATIONS: &str = "Observations";
pub const COL_CUTOFF: &str = "ECOFF";
pub const COL_CUTOFF_TENTATIVE: &str = "ECOFF_tentative";
pub const COL_ACCESSED: &str = "accessed";

/// Which optional metadata columns a dataset must carry and which visual
/// affordances are active.
///
/// * `Full`    – counts + tentative flag; ECOFF overlay behind a checkbox.
/// * `Mid`     – no counts; ECOFF overlay always on.
/// * `Minimal` – no tentative flag; no overlay, raw table shown instead.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PresentationMode {
    #[default]
    Full,
    Mid,
    Minimal,
}

impl PresentationMode {
    pub const ALL: [PresentationMode; 3] = [
        PresentationMode::Full,
        PresentationMode::Mid,
        PresentationMode::Minimal,
    ];

    /// Metadata columns whose absence is a load failure.
    pub fn required_columns(self) -> &'static [&'static str] {
        match self {
            PresentationMode::Full => &[
                COL_ANTIBIOTIC,
                COL_SPECIES,
                COL_DISTRIBUTIONS,
                COL_OBSERVATIONS,
                COL_CUTOFF,
                COL_CUTOFF_TENTATIVE,
                COL_ACCESSED,
            ],
            PresentationMode::Mid => &[
                COL_ANTIBIOTIC,
                COL_SPECIES,
                COL_CUTOFF,
                COL_CUTOFF_TENTATIVE,
                COL_ACCESSED,
            ],
            PresentationMode::Minimal => &[COL_ANTIBIOTIC, COL_SPECIES, COL_ACCESSED],
        }
    }

    /// Whether the user gets a "show ECOFF" checkbox.
    pub fn has_cutoff_toggle(self) -> bool {
        matches!(self, PresentationMode::Full)
    }

    /// Whether the ECOFF overlay (colour + line + notices) is active for the
    /// given toggle state.
    pub fn cutoff_overlay(self, show_cutoff: bool) -> bool {
        match self {
            PresentationMode::Full => show_cutoff,
            PresentationMode::Mid => true,
            PresentationMode::Minimal => false,
        }
    }

    pub fn shows_table(self) -> bool {
        matches!(self, PresentationMode::Minimal)
    }
}

impl fmt::Display for PresentationMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            PresentationMode::Full => "full",
            PresentationMode::Mid => "mid",
            PresentationMode::Minimal => "minimal",
        };
        f.write_str(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn narrower_modes_require_subsets_of_full() {
        let full = PresentationMode::Full.required_columns();
        for mode in [PresentationMode::Mid, PresentationMode::Minimal] {
            assert!(mode.required_columns().iter().all(|c| full.contains(c)));
        }
        assert!(!PresentationMode::Mid
            .required_columns()
            .contains(&COL_DISTRIBUTIONS));
        assert!(!PresentationMode::Minimal
            .required_columns()
            .contains(&COL_CUTOFF_TENTATIVE));
    }

    #[test]
    fn overlay_follows_toggle_only_in_full_mode() {
        assert!(!PresentationMode::Full.cutoff_overlay(false));
        assert!(PresentationMode::Full.cutoff_overlay(true));
        assert!(PresentationMode::Mid.cutoff_overlay(false));
        assert!(!PresentationMode::Minimal.cutoff_overlay(true));
    }

    #[test]
    fn only_minimal_shows_the_raw_table() {
        let with_table: Vec<_> = PresentationMode::ALL
            .into_iter()
            .filter(|m| m.shows_table())
            .collect();
        assert_eq!(with_table, vec![PresentationMode::Minimal]);
    }
}
