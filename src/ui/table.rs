use eframe::egui::Ui;
use egui_extras::{Column, TableBuilder};

use crate::data::model::{level_label, ObservationRow};

const HEADERS: [&str; 7] = [
    "antibiotic",
    "species",
    "concentration",
    "n",
    "ECOFF",
    "tentative",
    "accessed",
];

fn optional<T: ToString>(v: Option<T>) -> String {
    v.map(|v| v.to_string()).unwrap_or_default()
}

/// Raw dump of the selected long-format rows.
pub fn observation_table(ui: &mut Ui, rows: &[ObservationRow]) {
    ui.push_id("observation_table", |ui: &mut Ui| {
        TableBuilder::new(ui)
            .striped(true)
            .vscroll(false)
            .resizable(true)
            .columns(Column::auto().at_least(60.0), HEADERS.len())
            .header(20.0, |mut header| {
                for h in HEADERS {
                    header.col(|ui: &mut Ui| {
                        ui.strong(h);
                    });
                }
            })
            .body(|mut body| {
                for row in rows {
                    let cells = [
                        row.antibiotic.clone(),
                        row.species.clone(),
                        level_label(row.concentration)
                            .map(str::to_string)
                            .unwrap_or_else(|| row.concentration.to_string()),
                        optional(row.count),
                        optional(row.meta.cutoff),
                        optional(row.meta.cutoff_tentative),
                        row.meta.accessed.clone(),
                    ];
                    body.row(18.0, |mut table_row| {
                        for cell in &cells {
                            table_row.col(|ui: &mut Ui| {
                                ui.label(cell);
                            });
                        }
                    });
                }
            });
    });
}
