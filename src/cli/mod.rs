//! Command-line interface components
//!
//! This module contains CLI-specific code for the Sounding Catalog
//! application: argument parsing and the command handlers.

pub mod args;
pub mod commands;

pub use args::{Cli, Commands, GlobalArgs, ProductArgs, StationsArgs, SurveyArgs};
pub use commands::{
    build_catalog, handle_products, handle_runs, handle_stations, handle_survey, survey_product,
    RunsReport, StationsReport, SurveyEntry,
};
