use eframe::egui::{self, Color32, RichText, Ui};

use crate::state::AppState;

// ---------------------------------------------------------------------------
// Left side panel – selection widgets
// ---------------------------------------------------------------------------

/// Render the left selection panel.
pub fn side_panel(ui: &mut Ui, state: &mut AppState) {
    ui.heading("Selection");
    ui.separator();

    if state.dataset.is_none() {
        ui.label("No dataset loaded.");
        return;
    }

    // Clone what we need so we can mutate state inside the combo boxes.
    let antibiotics = state.antibiotic_options.clone();
    let species = state.species_options.clone();
    let current_antibiotic = state.view.antibiotic.clone();
    let current_species = state.view.species.clone();

    ui.strong("antibiotic");
    egui::ComboBox::from_id_salt("antibiotic")
        .selected_text(&current_antibiotic)
        .width(ui.available_width())
        .show_ui(ui, |ui: &mut Ui| {
            for name in &antibiotics {
                if ui
                    .selectable_label(current_antibiotic == *name, name)
                    .clicked()
                    && current_antibiotic != *name
                {
                    state.select_antibiotic(name.clone());
                }
            }
        });
    ui.add_space(4.0);

    ui.strong("bacteria species");
    egui::ComboBox::from_id_salt("species")
        .selected_text(&current_species)
        .width(ui.available_width())
        .show_ui(ui, |ui: &mut Ui| {
            for name in &species {
                if ui
                    .selectable_label(current_species == *name, name)
                    .clicked()
                    && current_species != *name
                {
                    state.select_species(name.clone());
                }
            }
        });
    ui.separator();

    if state.view.mode.has_cutoff_toggle() {
        let mut show = state.view.show_cutoff;
        if ui.checkbox(&mut show, "ECOFF").changed() {
            state.set_show_cutoff(show);
        }
    }

    if let Some(out) = &state.output {
        for text in out.notice_texts() {
            ui.label(RichText::new(text).italics());
        }

        if let Some(scale) = &out.chart.fill_scale {
            ui.add_space(8.0);
            for (label, color) in scale.legend_entries() {
                ui.horizontal(|ui: &mut Ui| {
                    ui.label(RichText::new("■").color(color));
                    ui.label(label);
                });
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Top bar
// ---------------------------------------------------------------------------

/// Render the top menu / toolbar.
pub fn top_bar(ui: &mut Ui, state: &mut AppState) {
    egui::menu::bar(ui, |ui: &mut Ui| {
        ui.menu_button("File", |ui: &mut Ui| {
            if ui.button("Open…").clicked() {
                open_file_dialog(state);
                ui.close_menu();
            }
        });

        ui.separator();

        if let Some(ds) = &state.dataset {
            ui.label(format!(
                "{} combinations, {} observations ({} mode)",
                ds.source_rows,
                ds.len(),
                state.view.mode
            ));
        }

        if let Some(path) = &state.source_path {
            ui.separator();
            ui.label(path.display().to_string());
        }

        if let Some(msg) = &state.status_message {
            ui.separator();
            ui.label(RichText::new(msg).color(Color32::RED));
        }
    });
}

// ---------------------------------------------------------------------------
// File dialog
// ---------------------------------------------------------------------------

pub fn open_file_dialog(state: &mut AppState) {
    let file = rfd::FileDialog::new()
        .set_title("Open MIC distribution table")
        .add_filter("Supported files", &["csv", "tsv", "tab"])
        .add_filter("CSV", &["csv"])
        .add_filter("TSV", &["tsv", "tab"])
        .pick_file();

    if let Some(path) = file {
        state.open(&path);
    }
}
