use anyhow::{anyhow, bail, Context, Result};
use clap::Parser;
use eframe::egui;

use ecoff_viewer::app::EcoffViewerApp;
use ecoff_viewer::cli::Args;
use ecoff_viewer::state::AppState;

/// Apply `--antibiotic` / `--species`, rejecting values not in the data.
fn apply_selection(state: &mut AppState, args: &Args) -> Result<()> {
    if let Some(antibiotic) = &args.antibiotic {
        if !state.antibiotic_options.contains(antibiotic) {
            bail!(
                "unknown antibiotic '{antibiotic}', expected one of: {}",
                state.antibiotic_options.join(", ")
            );
        }
        state.select_antibiotic(antibiotic.clone());
    }
    if let Some(species) = &args.species {
        if !state.species_options.contains(species) {
            bail!(
                "species '{species}' not available for {}, expected one of: {}",
                state.view.antibiotic,
                state.species_options.join(", ")
            );
        }
        state.select_species(species.clone());
    }
    state.set_show_cutoff(args.show_cutoff);
    Ok(())
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    let mut state = AppState::new(args.mode);
    state
        .load(&args.data_path)
        .context("cannot start without a dataset")?;
    apply_selection(&mut state, &args)?;

    if args.export {
        let output = state
            .output
            .as_ref()
            .context("nothing to render for the current selection")?;
        println!("{}", serde_json::to_string_pretty(output)?);
        return Ok(());
    }

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1100.0, 760.0])
            .with_min_inner_size([600.0, 400.0]),
        ..Default::default()
    };

    eframe::run_native(
        "ECOFF Viewer – MIC Distributions",
        options,
        Box::new(move |_cc| Ok(Box::new(EcoffViewerApp::new(state)))),
    )
    .map_err(|e| anyhow!("{e}"))
}
