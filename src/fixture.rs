//! Fixtures for tests

use crate::benchmark::{BenchmarkResolver, BenchmarkRow, default_lookup_strategies};
use crate::building::{Building, GenerationSystemProfile, ServiceProfile};
use crate::carrier::{CarrierFactorTable, CarrierFactors, EnergyCarrier, EnergyCarrierMap};
use crate::id::{BuildingUseID, CarrierID, CountryID, GenerationSystemID};
use crate::kpi::{BuildingKpis, FIXED_KPIS, INTENSITY_KPIS, PAYBACK_PERIOD, TOTAL_PRIMARY_ENERGY};
use crate::model::{ModelParameters, ReferenceData};
use crate::series::HourlySeries;
use crate::system::{GenerationSystem, SystemCatalogue};
use crate::units::{MoneyPerCapacity, MoneyPerEnergy};
use rstest::fixture;

/// Assert that an error with the given message occurs
macro_rules! assert_error {
    ($result:expr, $msg:expr) => {
        assert_eq!(
            $result.unwrap_err().chain().next().unwrap().to_string(),
            $msg
        );
    };
}
pub(crate) use assert_error;

#[fixture]
pub fn carriers() -> EnergyCarrierMap {
    [
        (12, "Electricity", true),
        (2, "Natural gas", true),
        (9, "Solar", false),
    ]
    .into_iter()
    .map(|(id, name, is_final)| {
        (
            CarrierID(id),
            EnergyCarrier {
                id: CarrierID(id),
                name: name.into(),
                is_final,
            },
        )
    })
    .collect()
}

#[fixture]
pub fn carrier_factors() -> CarrierFactors {
    CarrierFactors {
        pef_tot: 2.3,
        pef_nren: 1.9,
        pef_ren: 0.4,
        f_co2_eq_g_kwh: 250.0,
        non_h_costs_eur_kwh: 0.15,
        house_costs_eur_kwh: 0.2,
    }
}

/// Factors for electricity and gas in the fallback country only
#[fixture]
pub fn carrier_factor_table(carrier_factors: CarrierFactors) -> CarrierFactorTable {
    let mut table = CarrierFactorTable::new(CountryID(31));
    table.insert(CarrierID(12), CountryID(31), carrier_factors);
    table.insert(
        CarrierID(2),
        CountryID(31),
        CarrierFactors {
            pef_tot: 1.1,
            pef_nren: 1.1,
            pef_ren: 0.0,
            f_co2_eq_g_kwh: 200.0,
            non_h_costs_eur_kwh: 0.06,
            house_costs_eur_kwh: 0.08,
        },
    );
    table
}

fn system(id: u32, name: &str, carrier_id: u32, fuel_yield: Option<f64>) -> GenerationSystem {
    GenerationSystem {
        id: GenerationSystemID(id),
        name: name.into(),
        capex_eur_kw: None,
        opex_eur_kwh_year: None,
        lifetime_years: None,
        energy_carrier_input_1_id: Some(CarrierID(carrier_id)),
        fuel_yield_1: fuel_yield,
    }
}

#[fixture]
pub fn systems() -> SystemCatalogue {
    let pv = GenerationSystem {
        capex_eur_kw: Some(MoneyPerCapacity(1200.0)),
        opex_eur_kwh_year: Some(MoneyPerEnergy(0.01)),
        lifetime_years: Some(25),
        ..system(83, "PV panels", 12, None)
    };

    [
        system(10, "Gas boiler", 2, Some(0.9)),
        pv,
        system(61, "Air-water heat pump", 12, Some(3.0)),
        system(27, "DHW heat pump", 12, Some(2.5)),
        system(2, "Split air conditioner", 12, Some(3.5)),
        system(88, "Gas CHP", 2, Some(0.85)),
        system(37, "Solar thermal collector", 9, None),
    ]
    .into_iter()
    .collect()
}

/// A residential building in Spain with a gas boiler and a DHW heat pump, but no assets
#[fixture]
pub fn building() -> Building {
    Building {
        id: "b1".into(),
        name: "House".into(),
        building_use_id: BuildingUseID(1),
        construction_year: 1990,
        country_id: Some(CountryID(27)),
        area: 120.0,
        systems: GenerationSystemProfile {
            electricity: None,
            heating: Some(GenerationSystemID(10)),
            cooling: None,
            dhw: Some(GenerationSystemID(27)),
        },
        consumption: ServiceProfile {
            electricity: HourlySeries::constant(1.0),
            heating: HourlySeries::constant(2.0),
            cooling: HourlySeries::constant(0.5),
            dhw: HourlySeries::constant(0.4),
        },
        demand: None,
        assets: Vec::new(),
    }
}

#[fixture]
pub fn parameters() -> ModelParameters {
    ModelParameters::default()
}

#[fixture]
pub fn reference_data(
    carriers: EnergyCarrierMap,
    carrier_factor_table: CarrierFactorTable,
    systems: SystemCatalogue,
) -> ReferenceData {
    let benchmarks = BenchmarkResolver::new(
        vec![BenchmarkRow {
            country_id: CountryID(31),
            building_use_id: BuildingUseID(1),
            construction_year: 1990,
            total_primary_energy_intensity: Some(180.0),
            total_energy_cost_intensity: Some(15.0),
            total_co2_intensity: Some(35000.0),
        }],
        default_lookup_strategies(),
        CountryID(31),
    );

    ReferenceData {
        carriers,
        carrier_factors: carrier_factor_table,
        systems,
        benchmarks,
    }
}

/// A complete KPI record for a building.
///
/// Total primary energy is a constant series of 1 kWh, intensities are `intensity`, the payback
/// period is null and every other KPI is the scalar 1.
pub fn kpi_record(building_id: &str, area: f64, intensity: f64) -> BuildingKpis {
    let mut kpis = BuildingKpis::new(building_id.into(), area);
    for name in FIXED_KPIS {
        if name == TOTAL_PRIMARY_ENERGY {
            kpis.push(name, HourlySeries::constant(1.0), "kWh");
        } else if name == PAYBACK_PERIOD {
            kpis.push(name, None::<f64>, "years");
        } else if INTENSITY_KPIS.contains(&name) {
            kpis.push(name, intensity, "kWh/m2");
        } else {
            kpis.push(name, 1.0, "a.u.");
        }
    }

    kpis
}

#[fixture]
pub fn building_kpis() -> BuildingKpis {
    kpi_record("b1", 120.0, 50.0)
}
