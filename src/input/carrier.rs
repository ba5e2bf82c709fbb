//! Code for reading energy carriers and their national factors from CSV files.
use super::*;
use crate::carrier::{CarrierFactorTable, CarrierFactors, EnergyCarrier, EnergyCarrierMap};
use crate::id::{CarrierID, CountryID};
use anyhow::ensure;
use serde::Deserialize;

const CARRIERS_FILE_NAME: &str = "energy_carriers.csv";
const CARRIER_FACTORS_FILE_NAME: &str = "carrier_factors.csv";

/// Reads energy carriers from a CSV file.
///
/// # Arguments
///
/// * `model_dir` - Folder containing model configuration files
///
/// # Returns
///
/// A map of [`EnergyCarrier`]s, keyed by ID
pub fn read_carriers(model_dir: &Path) -> Result<EnergyCarrierMap> {
    let file_path = model_dir.join(CARRIERS_FILE_NAME);
    let carriers = read_csv(&file_path)?;
    read_carriers_from_iter(carriers).with_context(|| input_err_msg(&file_path))
}

fn read_carriers_from_iter<I>(iter: I) -> Result<EnergyCarrierMap>
where
    I: Iterator<Item = EnergyCarrier>,
{
    let mut map = EnergyCarrierMap::new();
    for carrier in iter {
        let id = carrier.id;
        ensure!(
            map.insert(id, carrier).is_none(),
            "Duplicate energy carrier ID {id}"
        );
    }

    Ok(map)
}

#[derive(Debug, Deserialize, PartialEq)]
struct CarrierFactorsRaw {
    energy_carrier_id: CarrierID,
    country_id: CountryID,
    pef_tot: f64,
    pef_nren: f64,
    pef_ren: f64,
    f_co2_eq_g_kwh: f64,
    non_h_costs_eur_kwh: f64,
    house_costs_eur_kwh: f64,
}

impl CarrierFactorsRaw {
    fn factors(&self) -> CarrierFactors {
        CarrierFactors {
            pef_tot: self.pef_tot,
            pef_nren: self.pef_nren,
            pef_ren: self.pef_ren,
            f_co2_eq_g_kwh: self.f_co2_eq_g_kwh,
            non_h_costs_eur_kwh: self.non_h_costs_eur_kwh,
            house_costs_eur_kwh: self.house_costs_eur_kwh,
        }
    }
}

/// Reads national carrier factors from a CSV file.
///
/// # Arguments
///
/// * `model_dir` - Folder containing model configuration files
/// * `carriers` - All known carriers
/// * `parameters` - Model parameters
pub fn read_carrier_factors(
    model_dir: &Path,
    carriers: &EnergyCarrierMap,
    parameters: &ModelParameters,
) -> Result<CarrierFactorTable> {
    let file_path = model_dir.join(CARRIER_FACTORS_FILE_NAME);
    let factors = read_csv(&file_path)?;
    read_carrier_factors_from_iter(factors, carriers, parameters)
        .with_context(|| input_err_msg(&file_path))
}

fn read_carrier_factors_from_iter<I>(
    iter: I,
    carriers: &EnergyCarrierMap,
    parameters: &ModelParameters,
) -> Result<CarrierFactorTable>
where
    I: Iterator<Item = CarrierFactorsRaw>,
{
    let mut table = CarrierFactorTable::new(parameters.fallback_country_id);
    for row in iter {
        ensure!(
            carriers.contains_key(&row.energy_carrier_id),
            "Unknown energy carrier ID {}",
            row.energy_carrier_id
        );
        ensure!(
            table
                .insert(row.energy_carrier_id, row.country_id, row.factors())
                .is_none(),
            "Duplicate factors for carrier {} in country {}",
            row.energy_carrier_id,
            row.country_id
        );
    }

    // Grid electricity must always be costed
    ensure!(
        table.has_carrier(parameters.electricity_carrier_id),
        "No factors given for the electricity carrier ({})",
        parameters.electricity_carrier_id
    );

    Ok(table)
}
