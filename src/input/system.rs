//! Code for reading the generation system catalogue from a CSV file.
use super::*;
use crate::carrier::EnergyCarrierMap;
use crate::finance::check_lifetime;
use crate::system::{GenerationSystem, SystemCatalogue};
use anyhow::ensure;
use indexmap::IndexMap;

const SYSTEMS_FILE_NAME: &str = "generation_systems.csv";

/// Read the generation system catalogue from a CSV file.
///
/// # Arguments
///
/// * `model_dir` - Folder containing model configuration files
/// * `carriers` - All known carriers
///
/// # Returns
///
/// A [`SystemCatalogue`] or an error.
pub fn read_systems(model_dir: &Path, carriers: &EnergyCarrierMap) -> Result<SystemCatalogue> {
    let file_path = model_dir.join(SYSTEMS_FILE_NAME);
    let systems = read_csv(&file_path)?;
    read_systems_from_iter(systems, carriers).with_context(|| input_err_msg(&file_path))
}

fn read_systems_from_iter<I>(iter: I, carriers: &EnergyCarrierMap) -> Result<SystemCatalogue>
where
    I: Iterator<Item = GenerationSystem>,
{
    let mut systems = IndexMap::new();
    for system in iter {
        if let Some(carrier_id) = system.energy_carrier_input_1_id {
            ensure!(
                carriers.contains_key(&carrier_id),
                "Generation system {} has unknown input carrier {carrier_id}",
                system.id
            );
        }
        if let Some(fuel_yield) = system.fuel_yield_1 {
            ensure!(
                fuel_yield.is_finite() && fuel_yield > 0.0,
                "Generation system {} must have a positive fuel yield",
                system.id
            );
        }
        if let Some(lifetime) = system.lifetime_years {
            check_lifetime(lifetime)
                .with_context(|| format!("Invalid lifetime for generation system {}", system.id))?;
        }

        let id = system.id;
        ensure!(
            systems.insert(id, system).is_none(),
            "Duplicate generation system ID {id}"
        );
    }

    Ok(systems.into_values().collect())
}
