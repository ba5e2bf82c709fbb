#![allow(missing_docs)]

//! KPI records produced for each building.
use crate::id::BuildingID;
use crate::series::HourlySeries;
use anyhow::{Result, ensure};

pub mod carrier;
pub mod citizen;

pub const PEAK_HEAT_DEMAND: &str = "KPI_peak_heat_demand_[kWh]";
pub const PEAK_ELEC_DEMAND: &str = "KPI_peak_elec_demand_[kWh]";
pub const PEAK_DHW_DEMAND: &str = "KPI_peak_dhw_demand_[kWh]";
pub const PEAK_COOLING_DEMAND: &str = "KPI_peak_cooling_demand_[kWh]";
pub const PEAK_ELECTRICITY_CONSUMPTION: &str = "KPI_peak_electricity_consumption_[kWh]";
pub const TOTAL_PRIMARY_ENERGY: &str = "total_primary_energy_[kWh]";
pub const NUM_MEMBERS: &str = "num_members";
pub const TOTAL_PV: &str = "Total_PV_[kWh]";
pub const TOTAL_SELF_CONSUMPTION: &str = "Total_self_consumption";
pub const TOTAL_SELF_SUFFICIENCY: &str = "Total_self_sufficiency";
pub const RATE_OF_SELF_CONSUMPTION: &str = "rate_of_self_consumption";
pub const RENEWABLE_PRIMARY_ENERGY: &str = "renewable_primary_energy_[kWh]";
pub const NON_RENEWABLE_PRIMARY_ENERGY: &str = "non_renewable_primary_energy_[kWh]";
pub const NON_HOUSEHOLD_COSTS: &str = "non_households_costs_[€]";
pub const HOUSEHOLD_COSTS: &str = "households_costs_[€]";
pub const TOTAL_CO2: &str = "Total_co2";
pub const PRIMARY_ENERGY_INTENSITY: &str = "total_primary_energy_intensity";
pub const NATIONAL_PRIMARY_ENERGY_INTENSITY: &str =
    "national_average_total_primary_energy_intensity";
pub const CO2_INTENSITY: &str = "total_CO2_intensity";
pub const NATIONAL_CO2_INTENSITY: &str = "national_average_total_CO2_intensity";
pub const ENERGY_COST_INTENSITY: &str = "total_energy_cost_intensity";
pub const NATIONAL_ENERGY_COST_INTENSITY: &str = "national_average_total_energy_cost_intensity";
pub const TOTAL_CAPEX: &str = "total_capex";
pub const TOTAL_LIFETIME_COSTS: &str = "total_lifetime_costs";
pub const TOTAL_SAVINGS: &str = "total_savings";
pub const PAYBACK_PERIOD: &str = "payback_period_years";

/// Prefix for the per-carrier final energy KPIs
pub const FINAL_ENERGY_PREFIX: &str = "final_energy_";

/// KPIs which are averaged over the community weighted by floor area, rather than summed
pub const INTENSITY_KPIS: [&str; 6] = [
    PRIMARY_ENERGY_INTENSITY,
    NATIONAL_PRIMARY_ENERGY_INTENSITY,
    CO2_INTENSITY,
    NATIONAL_CO2_INTENSITY,
    ENERGY_COST_INTENSITY,
    NATIONAL_ENERGY_COST_INTENSITY,
];

/// KPIs which every building record must contain, in order
pub const FIXED_KPIS: [&str; 32] = [
    PEAK_HEAT_DEMAND,
    PEAK_ELEC_DEMAND,
    TOTAL_PRIMARY_ENERGY,
    NUM_MEMBERS,
    "EquivalentTVHours_[h]",
    "EquivalentstreamingHours_[h]",
    "PizzaConsumptionComparison_[pizza]",
    "BatteryUsageEstimation_[charges]",
    "ElectricCarChargingEstimation_[charges]",
    "WineBottlesProduction_[bottles]",
    "TreesRequiredForCarbonOffset_[trees]",
    "streamingEmissionsImpact_[hours]",
    "CarbonEmissionsPerKilometer_[km]",
    TOTAL_PV,
    TOTAL_SELF_CONSUMPTION,
    TOTAL_SELF_SUFFICIENCY,
    RATE_OF_SELF_CONSUMPTION,
    RENEWABLE_PRIMARY_ENERGY,
    NON_RENEWABLE_PRIMARY_ENERGY,
    NON_HOUSEHOLD_COSTS,
    HOUSEHOLD_COSTS,
    TOTAL_CO2,
    PRIMARY_ENERGY_INTENSITY,
    NATIONAL_PRIMARY_ENERGY_INTENSITY,
    CO2_INTENSITY,
    NATIONAL_CO2_INTENSITY,
    ENERGY_COST_INTENSITY,
    NATIONAL_ENERGY_COST_INTENSITY,
    TOTAL_CAPEX,
    TOTAL_LIFETIME_COSTS,
    TOTAL_SAVINGS,
    PAYBACK_PERIOD,
];

/// The value of a KPI
#[derive(Debug, Clone, PartialEq)]
pub enum KpiValue {
    /// A single number
    Scalar(f64),
    /// A value for every hour of the year
    Series(HourlySeries),
    /// The KPI has no meaningful value (e.g. an investment which never pays back)
    Null,
}

impl KpiValue {
    /// The scalar value, if this is a scalar
    pub fn as_scalar(&self) -> Option<f64> {
        match self {
            Self::Scalar(value) => Some(*value),
            _ => None,
        }
    }

    /// The hourly series, if this is a series
    pub fn as_series(&self) -> Option<&HourlySeries> {
        match self {
            Self::Series(series) => Some(series),
            _ => None,
        }
    }
}

impl From<f64> for KpiValue {
    fn from(value: f64) -> Self {
        Self::Scalar(value)
    }
}

impl From<HourlySeries> for KpiValue {
    fn from(series: HourlySeries) -> Self {
        Self::Series(series)
    }
}

impl From<Option<f64>> for KpiValue {
    fn from(value: Option<f64>) -> Self {
        value.map_or(Self::Null, Self::Scalar)
    }
}

/// A single KPI for a building
#[derive(Debug, Clone, PartialEq)]
pub struct KpiEntry {
    /// Position of the KPI in the building's list, starting from 1
    pub id: u32,
    /// KPI name
    pub name: String,
    /// KPI value
    pub value: KpiValue,
    /// Unit of the value
    pub unit: String,
}

/// The ordered list of KPIs for one building
#[derive(Debug, Clone, PartialEq)]
pub struct BuildingKpis {
    /// The building these KPIs are for
    pub building_id: BuildingID,
    /// Floor area used for intensities and for weighting when aggregating (m²)
    pub area: f64,
    entries: Vec<KpiEntry>,
}

impl BuildingKpis {
    /// Create an empty list of KPIs
    pub fn new(building_id: BuildingID, area: f64) -> Self {
        Self {
            building_id,
            area,
            entries: Vec::new(),
        }
    }

    /// Append a KPI, giving it the next ID
    pub fn push<V: Into<KpiValue>>(&mut self, name: &str, value: V, unit: &str) {
        let id = u32::try_from(self.entries.len()).map_or(u32::MAX, |len| len + 1);
        self.entries.push(KpiEntry {
            id,
            name: name.to_string(),
            value: value.into(),
            unit: unit.to_string(),
        });
    }

    /// Look up a KPI by name
    pub fn get(&self, name: &str) -> Option<&KpiEntry> {
        self.entries.iter().find(|entry| entry.name == name)
    }

    /// Iterate over all KPIs in order
    pub fn iter(&self) -> impl Iterator<Item = &KpiEntry> {
        self.entries.iter()
    }

    /// Check that all the fixed KPIs are present, in the right place
    pub fn check_complete(&self) -> Result<()> {
        ensure!(
            self.entries.len() >= FIXED_KPIS.len(),
            "KPI record for building {} is incomplete: expected at least {} KPIs, found {}",
            self.building_id,
            FIXED_KPIS.len(),
            self.entries.len()
        );

        for (entry, expected) in self.entries.iter().zip(FIXED_KPIS) {
            ensure!(
                entry.name == expected,
                "KPI record for building {} is incomplete: expected {expected}, found {}",
                self.building_id,
                entry.name
            );
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixture::{assert_error, building_kpis};
    use rstest::rstest;

    #[test]
    fn test_push_assigns_ids() {
        let mut kpis = BuildingKpis::new("b1".into(), 100.0);
        kpis.push(PEAK_HEAT_DEMAND, 5.0, "kWh");
        kpis.push(PAYBACK_PERIOD, None::<f64>, "years");

        let entries: Vec<_> = kpis.iter().collect();
        assert_eq!(entries[0].id, 1);
        assert_eq!(entries[1].id, 2);
        assert_eq!(entries[1].value, KpiValue::Null);
        assert_eq!(kpis.get(PEAK_HEAT_DEMAND).unwrap().value.as_scalar(), Some(5.0));
    }

    #[rstest]
    fn test_check_complete(building_kpis: BuildingKpis) {
        assert!(building_kpis.check_complete().is_ok());
    }

    #[test]
    fn test_check_complete_missing() {
        let mut kpis = BuildingKpis::new("b1".into(), 100.0);
        kpis.push(PEAK_HEAT_DEMAND, 5.0, "kWh");
        assert_error!(
            kpis.check_complete(),
            "KPI record for building b1 is incomplete: expected at least 32 KPIs, found 1"
        );
    }

    #[rstest]
    fn test_check_complete_wrong_order(building_kpis: BuildingKpis) {
        let mut kpis = BuildingKpis::new("b1".into(), 100.0);
        kpis.push(PEAK_ELEC_DEMAND, 1.0, "kWh");
        for entry in building_kpis.iter().skip(1) {
            kpis.push(&entry.name, entry.value.clone(), &entry.unit);
        }
        assert_error!(
            kpis.check_complete(),
            "KPI record for building b1 is incomplete: expected KPI_peak_heat_demand_[kWh], \
            found KPI_peak_elec_demand_[kWh]"
        );
    }
}
