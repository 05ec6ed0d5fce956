use std::path::{Path, PathBuf};

use anyhow::Result;

use crate::chart::{render, RenderOutput, ViewState};
use crate::data::filter::{antibiotics, species_for};
use crate::data::loader::load_file;
use crate::data::model::MicDataset;
use crate::mode::PresentationMode;

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// The full UI state, independent of rendering.
#[derive(Debug, Default)]
pub struct AppState {
    /// Loaded dataset (None until a file is loaded).
    pub dataset: Option<MicDataset>,

    /// File the dataset came from.
    pub source_path: Option<PathBuf>,

    /// Dropdown selections and toggle.
    pub view: ViewState,

    /// Options of the antibiotic dropdown.
    pub antibiotic_options: Vec<String>,

    /// Options of the species dropdown, conditioned on the antibiotic.
    pub species_options: Vec<String>,

    /// Output of the last render (cached until the next selection change).
    pub output: Option<RenderOutput>,

    /// Status / error message shown in the UI.
    pub status_message: Option<String>,
}

impl AppState {
    pub fn new(mode: PresentationMode) -> Self {
        Self {
            view: ViewState {
                mode,
                ..ViewState::default()
            },
            ..Self::default()
        }
    }

    /// Load a file in the current mode and make it the active dataset.
    pub fn load(&mut self, path: &Path) -> Result<()> {
        let dataset = load_file(path, self.view.mode)?;
        self.source_path = Some(path.to_path_buf());
        self.set_dataset(dataset);
        Ok(())
    }

    /// Like [`AppState::load`], but failures are reported in the status line
    /// and the previous dataset is kept.
    pub fn open(&mut self, path: &Path) {
        if let Err(e) = self.load(path) {
            log::error!("Failed to load file: {e:#}");
            self.status_message = Some(format!("Error: {e:#}"));
        }
    }

    /// Ingest a newly loaded dataset and select its first combination.
    pub fn set_dataset(&mut self, dataset: MicDataset) {
        self.antibiotic_options = antibiotics(&dataset);
        self.dataset = Some(dataset);
        self.status_message = None;

        let first = self.antibiotic_options.first().cloned().unwrap_or_default();
        self.select_antibiotic(first);
    }

    /// Choose an antibiotic; the species list is recomputed and the species
    /// choice kept only if it is still available.
    pub fn select_antibiotic(&mut self, antibiotic: String) {
        self.species_options = self
            .dataset
            .as_ref()
            .map(|ds| species_for(ds, &antibiotic))
            .unwrap_or_default();
        self.view.antibiotic = antibiotic;

        if !self.species_options.contains(&self.view.species) {
            self.view.species = self.species_options.first().cloned().unwrap_or_default();
        }
        self.rerender();
    }

    pub fn select_species(&mut self, species: String) {
        self.view.species = species;
        self.rerender();
    }

    pub fn set_show_cutoff(&mut self, show: bool) {
        self.view.show_cutoff = show;
        self.rerender();
    }

    /// Recompute the output from scratch for the current view.
    pub fn rerender(&mut self) {
        let Some(ds) = &self.dataset else {
            self.output = None;
            return;
        };
        if ds.is_empty() {
            self.output = None;
            self.status_message = Some("Dataset contains no rows".to_string());
            return;
        }

        match render(ds, &self.view) {
            Ok(out) => {
                self.output = Some(out);
                self.status_message = None;
            }
            Err(e) => {
                log::error!("Cannot render selection: {e}");
                self.output = None;
                self.status_message = Some(format!("Error: {e}"));
            }
        }
    }
}
