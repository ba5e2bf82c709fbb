//! Code for reading the generation assets installed in buildings from CSV files.
use super::*;
use crate::asset::{AssetKind, GenerationAsset};
use crate::id::{AssetID, BuildingID, GenerationSystemID, IDCollection};
use crate::series::HourlySeries;
use crate::system::SystemCatalogue;
use anyhow::ensure;
use indexmap::{IndexMap, IndexSet};
use serde::Deserialize;

const ASSETS_FILE_NAME: &str = "building_assets.csv";
const AVAILABILITY_FILE_NAME: &str = "asset_availability.csv";

#[derive(Debug, Deserialize, PartialEq)]
struct AssetRaw {
    id: String,
    building_id: String,
    generation_system_id: GenerationSystemID,
    pmax_scalar: Option<f64>,
}

#[derive(Debug, Deserialize, PartialEq)]
struct AvailabilityRow {
    asset_id: String,
    value_input1: Option<f64>,
}

/// Read the generation assets for every building.
///
/// Assets are optional. If the assets file is present, every asset must have an hourly profile in
/// the availability file.
///
/// # Arguments
///
/// * `model_dir` - Folder containing model configuration files
/// * `building_ids` - All known building IDs
/// * `systems` - The generation system catalogue
///
/// # Returns
///
/// The assets for each building which has any.
pub fn read_assets(
    model_dir: &Path,
    building_ids: &IndexSet<BuildingID>,
    systems: &SystemCatalogue,
) -> Result<IndexMap<BuildingID, Vec<GenerationAsset>>> {
    let file_path = model_dir.join(ASSETS_FILE_NAME);
    let assets = read_csv_optional(&file_path)?;
    let assets = read_assets_raw_from_iter(assets, building_ids, systems)
        .with_context(|| input_err_msg(&file_path))?;
    if assets.is_empty() {
        return Ok(IndexMap::new());
    }

    let file_path = model_dir.join(AVAILABILITY_FILE_NAME);
    let rows = read_csv(&file_path)?;
    let asset_ids = assets.keys().cloned().collect();
    let mut profiles =
        read_availability_from_iter(rows, &asset_ids).with_context(|| input_err_msg(&file_path))?;

    let mut by_building: IndexMap<BuildingID, Vec<GenerationAsset>> = IndexMap::new();
    for (id, (building_id, asset)) in assets {
        let value_input1 = profiles
            .swap_remove(&id)
            .with_context(|| format!("No availability profile for asset {id}"))?;
        by_building
            .entry(building_id)
            .or_default()
            .push(GenerationAsset {
                id,
                generation_system_id: asset.generation_system_id,
                pmax_scalar: asset.pmax_scalar,
                value_input1,
            });
    }

    Ok(by_building)
}

fn read_assets_raw_from_iter<I>(
    iter: I,
    building_ids: &IndexSet<BuildingID>,
    systems: &SystemCatalogue,
) -> Result<IndexMap<AssetID, (BuildingID, AssetRaw)>>
where
    I: Iterator<Item = AssetRaw>,
{
    let mut assets = IndexMap::new();
    for asset in iter {
        let id = AssetID::new(&asset.id);
        let building_id = building_ids.get_id_by_str(&asset.building_id)?;

        if let Some(pmax) = asset.pmax_scalar {
            ensure!(
                pmax.is_finite() && pmax >= 0.0,
                "Asset {id} must have a finite, non-negative capacity"
            );
        }

        // Heat pump and electric assets don't need their system's input carrier
        let kind = AssetKind::classify(asset.generation_system_id);
        ensure!(
            kind.is_heat_pump()
                || kind == AssetKind::Electric
                || systems.get(asset.generation_system_id).is_some(),
            "Asset {id} uses unknown generation system {}",
            asset.generation_system_id
        );

        ensure!(
            assets.insert(id.clone(), (building_id, asset)).is_none(),
            "Duplicate asset ID {id}"
        );
    }

    Ok(assets)
}

fn read_availability_from_iter<I>(
    iter: I,
    asset_ids: &IndexSet<AssetID>,
) -> Result<IndexMap<AssetID, HourlySeries>>
where
    I: Iterator<Item = AvailabilityRow>,
{
    let mut values: IndexMap<AssetID, Vec<Option<f64>>> = IndexMap::new();
    for row in iter {
        let id = asset_ids.get_id_by_str(&row.asset_id)?;
        values.entry(id).or_default().push(row.value_input1);
    }

    values
        .into_iter()
        .map(|(id, values)| {
            let series = HourlySeries::from_optional(values)
                .with_context(|| format!("Invalid hourly profile for asset {id}"))?;
            Ok((id, series))
        })
        .try_collect()
}
