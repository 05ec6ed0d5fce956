use std::path::PathBuf;

use clap::Parser;

use crate::mode::PresentationMode;

#[derive(Parser, Debug, Clone)]
#[command(author, version, about)]
pub struct Args {
    /// MIC distribution table (.csv or .tsv)
    #[arg(value_name = "DATA_PATH", default_value = "EUCAST_data.csv")]
    pub data_path: PathBuf,

    /// Schema variant / presentation mode
    #[arg(long, value_enum, default_value_t = PresentationMode::Full)]
    pub mode: PresentationMode,

    /// Print the rendered chart spec as JSON instead of opening a window
    #[arg(long, default_value_t = false)]
    pub export: bool,

    /// Antibiotic to render (defaults to the first in the table)
    #[arg(long)]
    pub antibiotic: Option<String>,

    /// Species to render (defaults to the first for the antibiotic)
    #[arg(long)]
    pub species: Option<String>,

    /// Start with the ECOFF overlay enabled
    #[arg(long, default_value_t = false)]
    pub show_cutoff: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_to_full_mode_and_bundled_file_name() {
        let args = Args::parse_from(["ecoff-viewer"]);
        assert_eq!(args.mode, PresentationMode::Full);
        assert_eq!(args.data_path, PathBuf::from("EUCAST_data.csv"));
        assert!(!args.export);
    }

    #[test]
    fn parses_export_selection() {
        let args = Args::parse_from([
            "ecoff-viewer",
            "data.tsv",
            "--mode",
            "minimal",
            "--export",
            "--antibiotic",
            "Amoxicillin",
            "--species",
            "E. coli",
        ]);
        assert_eq!(args.mode, PresentationMode::Minimal);
        assert_eq!(args.antibiotic.as_deref(), Some("Amoxicillin"));
        assert_eq!(args.species.as_deref(), Some("E. coli"));
        assert!(args.export);
    }
}
