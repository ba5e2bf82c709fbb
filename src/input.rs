//! Common routines for handling input data.
use crate::model::{Model, ModelParameters, ReferenceData};
use anyhow::{Context, Result, bail};
use itertools::Itertools;
use serde::de::DeserializeOwned;
use std::fs;
use std::path::Path;

mod asset;
use asset::read_assets;
mod benchmark;
use benchmark::read_benchmarks;
mod building;
use building::read_buildings;
mod carrier;
use carrier::{read_carrier_factors, read_carriers};
mod system;
use system::read_systems;

/// Read a series of type `T`s from a CSV file.
///
/// Will raise an error if the file is empty.
///
/// # Arguments
///
/// * `file_path` - Path to the CSV file
pub fn read_csv<'a, T: DeserializeOwned + 'a>(
    file_path: &'a Path,
) -> Result<impl Iterator<Item = T> + 'a> {
    let vec = read_csv_internal(file_path)?;
    if vec.is_empty() {
        bail!("CSV file {} cannot be empty", file_path.display());
    }
    Ok(vec.into_iter())
}

/// Read a series of type `T`s from a CSV file.
///
/// # Arguments
///
/// * `file_path` - Path to the CSV file
pub fn read_csv_optional<'a, T: DeserializeOwned + 'a>(
    file_path: &'a Path,
) -> Result<impl Iterator<Item = T> + 'a> {
    if !file_path.exists() {
        return Ok(Vec::new().into_iter());
    }

    let vec = read_csv_internal(file_path)?;
    Ok(vec.into_iter())
}

fn read_csv_internal<'a, T: DeserializeOwned + 'a>(file_path: &'a Path) -> Result<Vec<T>> {
    let vec = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_path(file_path)
        .with_context(|| input_err_msg(file_path))?
        .into_deserialize()
        .process_results(|iter| iter.collect_vec())
        .with_context(|| input_err_msg(file_path))?;

    Ok(vec)
}

/// Parse a TOML file at the specified path.
///
/// # Arguments
///
/// * `file_path` - Path to the TOML file
///
/// # Returns
///
/// * The deserialised TOML data or an error if the file could not be read or parsed.
pub fn read_toml<T: DeserializeOwned>(file_path: &Path) -> Result<T> {
    let toml_str = fs::read_to_string(file_path).with_context(|| input_err_msg(file_path))?;
    let toml_data = toml::from_str(&toml_str).with_context(|| input_err_msg(file_path))?;
    Ok(toml_data)
}

/// Format an error message to include the file path. To be used with `anyhow::Context`.
pub fn input_err_msg<P: AsRef<Path>>(file_path: P) -> String {
    format!("Error reading {}", file_path.as_ref().display())
}

/// Read the reference data (carriers, factors, generation systems and benchmarks).
///
/// # Arguments
///
/// * `model_dir` - Folder containing model configuration files
/// * `parameters` - The model parameters
pub fn load_reference_data(model_dir: &Path, parameters: &ModelParameters) -> Result<ReferenceData> {
    let carriers = read_carriers(model_dir)?;
    let carrier_factors = read_carrier_factors(model_dir, &carriers, parameters)?;
    let systems = read_systems(model_dir, &carriers)?;
    let benchmarks = read_benchmarks(model_dir, parameters);

    Ok(ReferenceData {
        carriers,
        carrier_factors,
        systems,
        benchmarks,
    })
}

/// Read a model from the specified directory.
///
/// # Arguments
///
/// * `model_dir` - Folder containing model configuration files
///
/// # Returns
///
/// The static model data ([`Model`]) or an error.
pub fn load_model<P: AsRef<Path>>(model_dir: P) -> Result<Model> {
    let model_dir = model_dir.as_ref();
    let parameters = ModelParameters::from_path(model_dir)?;
    let reference = load_reference_data(model_dir, &parameters)?;

    let mut buildings = read_buildings(model_dir, &reference.systems)?;
    let building_ids = buildings.keys().cloned().collect();
    for (building_id, assets) in read_assets(model_dir, &building_ids, &reference.systems)? {
        // Every key was checked against `building_ids` when reading
        if let Some(building) = buildings.get_mut(&building_id) {
            building.assets = assets;
        }
    }

    Ok(Model {
        model_path: model_dir.to_path_buf(),
        parameters,
        reference,
        buildings,
    })
}
