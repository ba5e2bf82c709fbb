//! Functions for calculating the KPIs of a whole community.
use crate::community::{CommunityAccount, CommunityAggregator, aggregate_demand_profiles};
use crate::indicators::{BuildingAccount, BuildingIndicatorEngine};
use crate::kpi::BuildingKpis;
use crate::model::Model;
use crate::output::DataWriter;
use anyhow::{Context, Result};
use log::info;
use std::path::Path;

/// The results of a calculation for every building and for the community as a whole
#[derive(Debug, Clone, PartialEq)]
pub struct CommunityResults {
    /// Energy accounts for each building, in input order
    pub accounts: Vec<BuildingAccount>,
    /// KPI records for each building, in input order
    pub building_kpis: Vec<BuildingKpis>,
    /// Aggregated community KPIs
    pub community: CommunityAccount,
}

/// Calculate the KPIs for every building in a model and aggregate them.
///
/// If the KPIs for any building cannot be calculated, the whole calculation fails.
pub fn calculate(model: &Model) -> Result<CommunityResults> {
    info!("Calculating KPIs for model {}", model.model_path.display());
    let engine = BuildingIndicatorEngine::new(&model.parameters, &model.reference);

    let mut accounts = Vec::with_capacity(model.buildings.len());
    let mut building_kpis = Vec::with_capacity(model.buildings.len());
    for building in model.buildings.values() {
        let account = engine
            .account(building)
            .with_context(|| format!("Could not calculate KPIs for building {}", building.id))?;
        building_kpis.push(engine.kpis(building, &account));
        accounts.push(account);
    }
    info!("Calculated KPIs for {} buildings", accounts.len());

    let total_demand = aggregate_demand_profiles(accounts.iter().map(|account| &account.demand));
    let electricity_carrier_name = model
        .reference
        .carriers
        .get(&model.parameters.electricity_carrier_id)
        .map(|carrier| carrier.name.as_str());
    let community = CommunityAggregator::new(electricity_carrier_name)
        .aggregate(&building_kpis, &total_demand)
        .context("Could not aggregate community KPIs")?;

    Ok(CommunityResults {
        accounts,
        building_kpis,
        community,
    })
}

/// Calculate the KPIs for a model and write them to `output_path`.
///
/// Nothing is written unless the calculation succeeds for every building.
///
/// # Arguments
///
/// * `model` - The model to run
/// * `output_path` - The folder to which output files will be written
pub fn run(model: &Model, output_path: &Path) -> Result<()> {
    let results = calculate(model)?;

    let mut writer = DataWriter::create(output_path)?;
    for (account, kpis) in results.accounts.iter().zip(&results.building_kpis) {
        writer.write_building(account, kpis, &model.reference.carriers)?;
    }
    writer.write_community(&results.community)?;
    writer.flush()?;

    Ok(())
}
