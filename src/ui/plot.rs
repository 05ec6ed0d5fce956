use eframe::egui::{Color32, RichText, ScrollArea, Ui};
use egui_plot::{Bar, BarChart, GridMark, LineStyle, Plot, VLine};

use crate::chart::{AxisScale, ChartSpec, LIMITATIONS_HEADING};
use crate::color::NEUTRAL_FILL;
use crate::data::model::level_label;
use crate::state::AppState;
use crate::ui::table;

// ---------------------------------------------------------------------------
// Central panel: header, MIC bar chart, disclaimer
// ---------------------------------------------------------------------------

/// Render the central panel.
pub fn central_panel(ui: &mut Ui, state: &AppState) {
    let Some(out) = &state.output else {
        let message = placeholder_message(state);
        ui.centered_and_justified(|ui: &mut Ui| {
            ui.heading(message);
        });
        return;
    };

    ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            ui.heading(&out.header);
            ui.label(&out.source);
            ui.add_space(6.0);

            mic_chart(ui, &out.chart);

            ui.add_space(8.0);
            ui.strong(LIMITATIONS_HEADING);
            ui.label(RichText::new(out.limitations).small());

            if let Some(rows) = &out.table {
                ui.separator();
                table::observation_table(ui, rows);
            }
        });
}

/// Text shown in place of the chart when there is no output.
fn placeholder_message(state: &AppState) -> String {
    if state.dataset.is_none() {
        return "Open a file to view MIC distributions  (File → Open…)".to_string();
    }
    state
        .status_message
        .clone()
        .unwrap_or_else(|| "The current selection cannot be rendered".to_string())
}

/// Map a concentration onto the plot's x axis.
fn x_position(spec: &ChartSpec, concentration: f64) -> f64 {
    match spec.x_scale {
        AxisScale::Log2 => concentration.log2(),
        AxisScale::Linear => concentration,
    }
}

/// Axis text for a grid mark: the literal level label when it hits a tick.
fn tick_label(scale: AxisScale, ticks: &[f64], value: f64) -> String {
    let concentration = match scale {
        AxisScale::Log2 => value.exp2(),
        AxisScale::Linear => value,
    };
    ticks
        .iter()
        .find(|&&t| (t - concentration).abs() <= t * 1e-6)
        .and_then(|&t| level_label(t).map(str::to_string))
        .unwrap_or_else(|| format!("{concentration}"))
}

/// Draw a [`ChartSpec`] as an egui bar chart.
pub fn mic_chart(ui: &mut Ui, spec: &ChartSpec) {
    if let Some(title) = &spec.title {
        ui.label(RichText::new(title).strong());
    }

    let bars: Vec<Bar> = spec
        .bars
        .iter()
        .map(|b| {
            let fill = spec
                .bar_color(b)
                .map(|c| c.to_color32())
                .unwrap_or(NEUTRAL_FILL);
            Bar::new(x_position(spec, b.concentration), b.count as f64)
                .width(0.8)
                .fill(fill)
                .name(level_label(b.concentration).unwrap_or_default())
        })
        .collect();

    let grid: Vec<f64> = spec
        .x_ticks
        .iter()
        .map(|&t| x_position(spec, t))
        .collect();
    let scale = spec.x_scale;
    let ticks = spec.x_ticks.clone();

    Plot::new("mic_chart")
        .height(360.0)
        .x_axis_label(spec.x_label)
        .y_axis_label(spec.y_label)
        .include_y(0.0)
        .allow_drag(false)
        .allow_scroll(false)
        .allow_zoom(false)
        .x_grid_spacer(move |_input| {
            grid.iter()
                .map(|&value| GridMark {
                    value,
                    step_size: 1.0,
                })
                .collect()
        })
        .x_axis_formatter(move |mark, _range| tick_label(scale, &ticks, mark.value))
        .show(ui, |plot_ui| {
            plot_ui.bar_chart(BarChart::new(bars));

            if let Some(line) = &spec.cutoff_line {
                let style = if line.dashed {
                    LineStyle::dashed_loose()
                } else {
                    LineStyle::Solid
                };
                plot_ui.vline(
                    VLine::new(x_position(spec, line.x))
                        .style(style)
                        .color(Color32::from_gray(40)),
                );
            }
        });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chart::{Bar as SpecBar, X_LABEL, Y_LABEL};
    use crate::data::model::{CombinationMeta, MicDataset, SourceRow, LEVEL_COUNT};
    use crate::mode::PresentationMode;

    fn spec() -> ChartSpec {
        ChartSpec {
            title: None,
            x_label: X_LABEL,
            y_label: Y_LABEL,
            x_scale: AxisScale::Log2,
            x_ticks: vec![0.03, 0.06, 0.125, 8.0],
            bars: vec![SpecBar {
                concentration: 8.0,
                count: 2,
                fill: None,
            }],
            fill_scale: None,
            cutoff_line: None,
        }
    }

    #[test]
    fn log2_positions_round_trip_to_level_labels() {
        let spec = spec();
        assert_eq!(x_position(&spec, 8.0), 3.0);
        for &t in &spec.x_ticks {
            let label = tick_label(spec.x_scale, &spec.x_ticks, x_position(&spec, t));
            assert_eq!(label, level_label(t).unwrap());
        }
    }

    #[test]
    fn placeholder_asks_for_a_file_without_dataset() {
        let state = AppState::new(PresentationMode::Full);
        assert!(placeholder_message(&state).starts_with("Open a file"));
    }

    #[test]
    fn placeholder_reports_render_error_when_dataset_loaded() {
        let row = |cutoff: f64| SourceRow {
            antibiotic: "A".to_string(),
            species: "x".to_string(),
            counts: [Some(1); LEVEL_COUNT],
            meta: CombinationMeta {
                cutoff: Some(cutoff),
                cutoff_tentative: None,
                distributions: None,
                observations: None,
                accessed: "2024-01-01".to_string(),
            },
        };
        let mut state = AppState::new(PresentationMode::Full);
        state.set_dataset(MicDataset::from_source_rows(vec![row(1.0), row(2.0)]));

        assert!(state.output.is_none());
        let message = placeholder_message(&state);
        assert!(message.starts_with("Error:"));
        assert!(!message.contains("Open a file"));

        state.status_message = None;
        assert_eq!(
            placeholder_message(&state),
            "The current selection cannot be rendered"
        );
    }
}
