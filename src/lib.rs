//! Energy, emissions and cost indicators for buildings and the energy communities they form.
#![warn(missing_docs)]
use std::path::PathBuf;

pub mod asset;
pub mod benchmark;
pub mod building;
pub mod calculation;
pub mod carrier;
pub mod cli;
pub mod community;
pub mod electricity;
pub mod error;
pub mod finance;
pub mod id;
pub mod indicators;
pub mod input;
pub mod kpi;
pub mod ledger;
pub mod log;
pub mod model;
pub mod output;
pub mod series;
pub mod settings;
pub mod system;
pub mod units;

#[cfg(test)]
mod fixture;

/// Get the folder in which program configuration files are stored
pub fn get_config_dir() -> PathBuf {
    let Some(mut config_dir) = dirs::config_dir() else {
        // No config dir on this platform; fall back to the working directory
        return PathBuf::from(".");
    };
    config_dir.push("community-kpis");

    config_dir
}
