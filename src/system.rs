//! The catalogue of generation systems (boilers, heat pumps, PV panels etc.).
use crate::error::KpiError;
use crate::finance::FinancialParameters;
use crate::id::{CarrierID, GenerationSystemID};
use crate::units::{MoneyPerCapacity, MoneyPerEnergy};
use anyhow::Result;
use indexmap::IndexMap;
use serde::Deserialize;

/// A type of generation system
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct GenerationSystem {
    /// Unique identifier for the system
    pub id: GenerationSystemID,
    /// Human-readable name
    pub name: String,
    /// Capital cost per kW of installed capacity
    pub capex_eur_kw: Option<MoneyPerCapacity>,
    /// Operating cost per kWh generated, for each year of operation
    pub opex_eur_kwh_year: Option<MoneyPerEnergy>,
    /// Expected lifetime in years
    pub lifetime_years: Option<i64>,
    /// The carrier the system consumes
    pub energy_carrier_input_1_id: Option<CarrierID>,
    /// Useful output per unit of input
    pub fuel_yield_1: Option<f64>,
}

/// All known generation systems, keyed by ID
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SystemCatalogue(IndexMap<GenerationSystemID, GenerationSystem>);

impl SystemCatalogue {
    /// Look up a system
    pub fn get(&self, id: GenerationSystemID) -> Option<&GenerationSystem> {
        self.0.get(&id)
    }

    /// Iterate over all systems
    pub fn iter(&self) -> impl Iterator<Item = &GenerationSystem> {
        self.0.values()
    }

    /// The carrier consumed by a system.
    ///
    /// It is an error if the system is unknown or has no input carrier.
    pub fn input_carrier(&self, id: GenerationSystemID) -> Result<CarrierID> {
        let carrier_id = self
            .get(id)
            .and_then(|system| system.energy_carrier_input_1_id)
            .ok_or_else(|| {
                KpiError::MissingReferenceData(format!(
                    "No input energy carrier for generation system {id}"
                ))
            })?;

        Ok(carrier_id)
    }

    /// Useful output per unit of input for a system, defaulting to 1
    pub fn fuel_yield(&self, id: GenerationSystemID) -> f64 {
        self.get(id)
            .and_then(|system| system.fuel_yield_1)
            .unwrap_or(1.0)
    }

    /// Cost and lifetime parameters for a system, with defaults for anything unknown
    pub fn financial_parameters(&self, id: GenerationSystemID) -> FinancialParameters {
        let defaults = FinancialParameters::default();
        let Some(system) = self.get(id) else {
            return defaults;
        };

        FinancialParameters {
            capex_per_kw: system.capex_eur_kw.unwrap_or(defaults.capex_per_kw),
            opex_per_kwh: system.opex_eur_kwh_year.unwrap_or(defaults.opex_per_kwh),
            lifetime_years: system.lifetime_years.unwrap_or(defaults.lifetime_years),
        }
    }
}

impl FromIterator<GenerationSystem> for SystemCatalogue {
    fn from_iter<I: IntoIterator<Item = GenerationSystem>>(iter: I) -> Self {
        Self(iter.into_iter().map(|system| (system.id, system)).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixture::{assert_error, systems};
    use float_cmp::assert_approx_eq;
    use rstest::rstest;

    #[rstest]
    fn test_input_carrier(systems: SystemCatalogue) {
        assert_eq!(
            systems.input_carrier(GenerationSystemID(10)).unwrap(),
            CarrierID(2)
        );
        assert_error!(
            systems.input_carrier(GenerationSystemID(999)),
            "Missing reference data: No input energy carrier for generation system 999"
        );
    }

    #[rstest]
    fn test_fuel_yield(systems: SystemCatalogue) {
        assert_approx_eq!(f64, systems.fuel_yield(GenerationSystemID(10)), 0.9);
        assert_approx_eq!(f64, systems.fuel_yield(GenerationSystemID(999)), 1.0);
    }

    #[rstest]
    fn test_financial_parameters(systems: SystemCatalogue) {
        let pv = systems.financial_parameters(GenerationSystemID(83));
        assert_eq!(pv.capex_per_kw, MoneyPerCapacity(1200.0));
        assert_eq!(pv.opex_per_kwh, MoneyPerEnergy(0.01));
        assert_eq!(pv.lifetime_years, 25);

        // Unknown systems get all the defaults
        assert_eq!(
            systems.financial_parameters(GenerationSystemID(999)),
            FinancialParameters::default()
        );

        // Missing fields are filled in with defaults
        let boiler = systems.financial_parameters(GenerationSystemID(10));
        assert_eq!(boiler.capex_per_kw, MoneyPerCapacity(1000.0));
        assert_eq!(boiler.lifetime_years, 20);
    }
}
