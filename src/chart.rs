use serde::Serialize;

use crate::color::{FillScale, NamedColor};
use crate::data::filter::{select, SelectionError};
use crate::data::model::{Classification, MicDataset, ObservationRow};
use crate::mode::PresentationMode;

// ---------------------------------------------------------------------------
// Fixed texts and constants
// ---------------------------------------------------------------------------

/// The cutoff line sits half a dilution step above the ECOFF so it falls
/// between the last wildtype bar and the first resistant one.
pub const CUTOFF_LINE_OFFSET: f64 = 1.5;

pub const SOURCE_NAME: &str = "EUCAST";
pub const SOURCE_URL: &str = "https://mic.eucast.org";

pub const X_LABEL: &str = "concentration (mg/L)";
pub const Y_LABEL: &str = "n";

pub const LIMITATIONS_HEADING: &str = "Note on limitations";
pub const LIMITATIONS: &str = "Different studies often use different MIC concentration ranges. \
Distributions truncated at the lower end of the scale within the putative wild-type \
distribution have been excluded. The accepted distributions include studies from a wide \
variety of sources and time periods and some, on purpose, include high and others low, \
proportions of resistant organisms, so the distributions must not be used to represent \
rates of resistance to any agent and cannot be used to compare resistance rates among \
agents, resistance over time or resistance in different geographic locations.";

// ---------------------------------------------------------------------------
// View state – everything the renderer depends on besides the data
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct ViewState {
    pub mode: PresentationMode,
    pub antibiotic: String,
    pub species: String,
    pub show_cutoff: bool,
}

// ---------------------------------------------------------------------------
// Output types
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Notice {
    NoCutoff,
    TentativeCutoff,
}

impl Notice {
    pub fn text(self) -> &'static str {
        match self {
            Notice::NoCutoff => "no ECOFF value available",
            Notice::TentativeCutoff => "ECOFF is tentative (based on fewer than 5 distributions)",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum AxisScale {
    Linear,
    Log2,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Bar {
    pub concentration: f64,
    pub count: u32,
    /// Present only while the classification overlay is active.
    pub fill: Option<Classification>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CutoffLine {
    pub x: f64,
    pub dashed: bool,
}

/// Declarative chart description; the UI layer (or a JSON consumer) draws it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartSpec {
    pub title: Option<String>,
    pub x_label: &'static str,
    pub y_label: &'static str,
    pub x_scale: AxisScale,
    /// Tick positions: the distinct concentrations of the selection.
    pub x_ticks: Vec<f64>,
    pub bars: Vec<Bar>,
    pub fill_scale: Option<FillScale>,
    pub cutoff_line: Option<CutoffLine>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RenderOutput {
    pub header: String,
    pub source: String,
    pub chart: ChartSpec,
    pub notices: Vec<Notice>,
    pub limitations: &'static str,
    /// Raw selected rows, only in modes that show the data table.
    pub table: Option<Vec<ObservationRow>>,
}

impl RenderOutput {
    pub fn notice_texts(&self) -> Vec<&'static str> {
        self.notices.iter().map(|n| n.text()).collect()
    }
}

// ---------------------------------------------------------------------------
// Rendering
// ---------------------------------------------------------------------------

/// `"1 distribution"`, `"3 observations"`.
pub fn pluralize(n: u32, noun: &str) -> String {
    if n == 1 {
        format!("{n} {noun}")
    } else {
        format!("{n} {noun}s")
    }
}

/// `"<N> distributions, <M> observations"` from whichever counts exist.
pub fn summary_text(distributions: Option<u32>, observations: Option<u32>) -> Option<String> {
    let parts: Vec<String> = [
        distributions.map(|n| pluralize(n, "distribution")),
        observations.map(|n| pluralize(n, "observation")),
    ]
    .into_iter()
    .flatten()
    .collect();

    if parts.is_empty() {
        None
    } else {
        Some(parts.join(", "))
    }
}

pub fn cutoff_line_x(cutoff: f64) -> f64 {
    cutoff * CUTOFF_LINE_OFFSET
}

/// Pure function of (data, view) → chart + notices.  Called wholesale on
/// every selection change.
pub fn render(dataset: &MicDataset, view: &ViewState) -> Result<RenderOutput, SelectionError> {
    let selection = select(dataset, &view.antibiotic, &view.species);
    let meta = selection.metadata()?;
    let mode = view.mode;

    let overlay = mode.cutoff_overlay(view.show_cutoff);
    // Classification colours and the line need an actual cutoff.
    let cutoff = if overlay { meta.cutoff } else { None };

    let mut notices = Vec::new();
    if overlay {
        if meta.cutoff.is_none() {
            notices.push(Notice::NoCutoff);
        } else if meta.cutoff_tentative == Some(true) {
            notices.push(Notice::TentativeCutoff);
        }
    }

    let bars = selection
        .rows
        .iter()
        .map(|o| Bar {
            concentration: o.concentration,
            count: o.height(),
            fill: cutoff.and(o.classification()),
        })
        .collect();

    let title = summary_text(meta.distributions, meta.observations);

    let chart = ChartSpec {
        title,
        x_label: X_LABEL,
        y_label: Y_LABEL,
        x_scale: AxisScale::Log2,
        x_ticks: selection.concentrations(),
        bars,
        fill_scale: cutoff.map(|_| FillScale::default()),
        cutoff_line: cutoff.map(|c| CutoffLine {
            x: cutoff_line_x(c),
            dashed: true,
        }),
    };

    let table = mode
        .shows_table()
        .then(|| selection.rows.iter().map(|&o| o.clone()).collect());

    Ok(RenderOutput {
        header: format!("{}: {}", view.antibiotic, view.species),
        source: format!(
            "source: {SOURCE_NAME} ({SOURCE_URL}) accessed {}",
            meta.accessed
        ),
        chart,
        notices,
        limitations: LIMITATIONS,
        table,
    })
}

impl ChartSpec {
    /// Colour of one bar under this spec.
    pub fn bar_color(&self, bar: &Bar) -> Option<NamedColor> {
        let scale = self.fill_scale.as_ref()?;
        bar.fill.map(|c| scale.color_for(c))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::{CombinationMeta, SourceRow, LEVEL_COUNT};

    fn dataset(cutoff: Option<f64>, tentative: Option<bool>) -> MicDataset {
        let mut counts = [Some(0); LEVEL_COUNT];
        counts[10] = Some(3);
        counts[14] = Some(1);
        MicDataset::from_source_rows(vec![SourceRow {
            antibiotic: "Amoxicillin".to_string(),
            species: "E. coli".to_string(),
            counts,
            meta: CombinationMeta {
                cutoff,
                cutoff_tentative: tentative,
                distributions: Some(1),
                observations: Some(4),
                accessed: "2024-05-02".to_string(),
            },
        }])
    }

    fn view(mode: PresentationMode, show_cutoff: bool) -> ViewState {
        ViewState {
            mode,
            antibiotic: "Amoxicillin".to_string(),
            species: "E. coli".to_string(),
            show_cutoff,
        }
    }

    #[test]
    fn pluralizes_each_noun_independently() {
        assert_eq!(
            summary_text(Some(1), Some(3)).unwrap(),
            "1 distribution, 3 observations"
        );
        assert_eq!(
            summary_text(Some(2), Some(1)).unwrap(),
            "2 distributions, 1 observation"
        );
        assert_eq!(summary_text(None, Some(0)).unwrap(), "0 observations");
        assert_eq!(summary_text(None, None), None);
    }

    #[test]
    fn cutoff_line_is_offset_by_half_a_step() {
        assert_eq!(cutoff_line_x(4.0), 6.0);
        assert_eq!(cutoff_line_x(8.0), 12.0);
    }

    #[test]
    fn toggle_off_draws_plain_bars() {
        let out = render(&dataset(Some(8.0), Some(false)), &view(PresentationMode::Full, false)).unwrap();
        assert!(out.chart.cutoff_line.is_none());
        assert!(out.chart.fill_scale.is_none());
        assert!(out.chart.bars.iter().all(|b| b.fill.is_none()));
        assert!(out.notices.is_empty());
        assert_eq!(out.chart.title.as_deref(), Some("1 distribution, 4 observations"));
    }

    #[test]
    fn null_cutoff_shows_notice_instead_of_overlay() {
        let out = render(&dataset(None, None), &view(PresentationMode::Full, true)).unwrap();
        assert_eq!(out.notices, vec![Notice::NoCutoff]);
        assert!(out.chart.cutoff_line.is_none());
        assert!(out.chart.fill_scale.is_none());
        assert!(out.chart.bars.iter().all(|b| b.fill.is_none()));
    }

    #[test]
    fn tentative_cutoff_adds_advisory() {
        let out = render(&dataset(Some(2.0), Some(true)), &view(PresentationMode::Full, true)).unwrap();
        assert_eq!(out.notice_texts(), vec![Notice::TentativeCutoff.text()]);
        assert_eq!(out.chart.cutoff_line.map(|l| l.x), Some(3.0));
    }

    #[test]
    fn mid_mode_overlays_without_toggle() {
        let out = render(&dataset(Some(2.0), Some(true)), &view(PresentationMode::Mid, false)).unwrap();
        assert!(out.chart.cutoff_line.is_some());
        assert_eq!(out.notices, vec![Notice::TentativeCutoff]);
        assert!(out.table.is_none());
    }

    #[test]
    fn minimal_mode_never_classifies_and_dumps_rows() {
        let out = render(&dataset(Some(2.0), None), &view(PresentationMode::Minimal, true)).unwrap();
        assert!(out.chart.cutoff_line.is_none());
        assert!(out.chart.bars.iter().all(|b| b.fill.is_none()));
        assert!(out.notices.is_empty());
        assert_eq!(out.table.map(|t| t.len()), Some(LEVEL_COUNT));
    }

    #[test]
    fn summary_follows_available_counts_in_every_mode() {
        let out = render(&dataset(Some(2.0), None), &view(PresentationMode::Minimal, false)).unwrap();
        assert_eq!(out.chart.title.as_deref(), Some("1 distribution, 4 observations"));

        let mut ds = dataset(Some(2.0), Some(false));
        for o in &mut ds.observations {
            o.meta.distributions = None;
            o.meta.observations = None;
        }
        let out = render(&ds, &view(PresentationMode::Mid, false)).unwrap();
        assert!(out.chart.title.is_none());
    }

    #[test]
    fn header_source_and_disclaimer() {
        let out = render(&dataset(None, None), &view(PresentationMode::Full, false)).unwrap();
        assert_eq!(out.header, "Amoxicillin: E. coli");
        assert_eq!(
            out.source,
            "source: EUCAST (https://mic.eucast.org) accessed 2024-05-02"
        );
        assert_eq!(out.limitations, LIMITATIONS);
        assert_eq!(out.chart.x_scale, AxisScale::Log2);
        assert_eq!(out.chart.x_ticks.len(), LEVEL_COUNT);
    }

    #[test]
    fn bar_colors_follow_classification() {
        let out = render(&dataset(Some(2.0), None), &view(PresentationMode::Full, true)).unwrap();
        let colors: Vec<&str> = out
            .chart
            .bars
            .iter()
            .map(|b| out.chart.bar_color(b).unwrap().name)
            .collect();
        assert_eq!(colors[10], "blue");
        assert_eq!(colors[11], "red");
    }

    #[test]
    fn unknown_combination_is_an_error() {
        let mut v = view(PresentationMode::Full, false);
        v.species = "S. aureus".to_string();
        assert!(render(&dataset(None, None), &v).is_err());
    }

    #[test]
    fn exported_spec_serializes_to_json() {
        let out = render(&dataset(Some(8.0), None), &view(PresentationMode::Full, true)).unwrap();
        let json = serde_json::to_value(&out).unwrap();
        assert_eq!(json["chart"]["x_scale"], "log2");
        assert_eq!(json["chart"]["cutoff_line"]["x"], 12.0);
        assert_eq!(json["chart"]["bars"][13]["fill"], "resistant");
        assert_eq!(json["chart"]["fill_scale"]["wildtype"]["name"], "blue");
    }
}
