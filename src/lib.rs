//! EUCAST MIC distribution viewer.
//!
//! A wide table (one column per dilution step) is reshaped into one
//! observation per antibiotic × species × concentration, narrowed by a
//! two-stage antibiotic → species selection, and rendered as a bar chart
//! on a log2 concentration axis with an optional ECOFF overlay.

pub mod app;
pub mod chart;
pub mod cli;
pub mod color;
pub mod data;
pub mod mode;
pub mod state;
pub mod ui;
