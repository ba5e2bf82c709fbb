//! Energy carriers (fuels and energy vectors) and their national conversion factors.
use crate::error::KpiError;
use crate::id::{CarrierID, CountryID};
use anyhow::Result;
use indexmap::IndexMap;
use serde::Deserialize;

/// A fuel or energy vector, e.g. electricity, natural gas or district heat
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct EnergyCarrier {
    /// Unique identifier for the carrier
    pub id: CarrierID,
    /// Human-readable name
    pub name: String,
    /// Whether the carrier is delivered to end use (only these are accounted for)
    #[serde(rename = "final")]
    pub is_final: bool,
}

/// A map of [`EnergyCarrier`]s, keyed by carrier ID
pub type EnergyCarrierMap = IndexMap<CarrierID, EnergyCarrier>;

/// Which tariff applies when costing energy use
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tariff {
    /// Residential buildings
    Household,
    /// Everything else
    NonHousehold,
}

/// Primary energy, emissions and cost factors for one carrier in one country
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CarrierFactors {
    /// Total primary energy per kWh of final energy
    pub pef_tot: f64,
    /// Non-renewable primary energy per kWh of final energy
    pub pef_nren: f64,
    /// Renewable primary energy per kWh of final energy
    pub pef_ren: f64,
    /// Grams of CO2-equivalent emitted per kWh
    pub f_co2_eq_g_kwh: f64,
    /// Cost per kWh for non-household consumers (€)
    pub non_h_costs_eur_kwh: f64,
    /// Cost per kWh for household consumers (€)
    pub house_costs_eur_kwh: f64,
}

impl CarrierFactors {
    /// The cost per kWh under the given tariff
    pub fn cost_per_kwh(&self, tariff: Tariff) -> f64 {
        match tariff {
            Tariff::Household => self.house_costs_eur_kwh,
            Tariff::NonHousehold => self.non_h_costs_eur_kwh,
        }
    }
}

/// National factors for all carriers, with a fallback country used when a country has no data
#[derive(Debug, Clone, PartialEq)]
pub struct CarrierFactorTable {
    factors: IndexMap<(CarrierID, CountryID), CarrierFactors>,
    fallback_country_id: CountryID,
}

impl CarrierFactorTable {
    /// Create an empty table
    pub fn new(fallback_country_id: CountryID) -> Self {
        Self {
            factors: IndexMap::new(),
            fallback_country_id,
        }
    }

    /// Add factors for a carrier and country, returning the previous value if there was one
    pub fn insert(
        &mut self,
        carrier_id: CarrierID,
        country_id: CountryID,
        factors: CarrierFactors,
    ) -> Option<CarrierFactors> {
        self.factors.insert((carrier_id, country_id), factors)
    }

    /// Whether any factors at all are defined for the carrier
    pub fn has_carrier(&self, carrier_id: CarrierID) -> bool {
        self.factors.keys().any(|(id, _)| *id == carrier_id)
    }

    /// Look up the factors for a carrier in a given country.
    ///
    /// If there are no factors for `country_id`, those for the fallback country are used instead.
    /// It is an error if neither are present.
    pub fn resolve(&self, carrier_id: CarrierID, country_id: CountryID) -> Result<&CarrierFactors> {
        let found = self
            .factors
            .get(&(carrier_id, country_id))
            .or_else(|| self.factors.get(&(carrier_id, self.fallback_country_id)));

        found.ok_or_else(|| {
            KpiError::MissingReferenceData(format!(
                "No factors for carrier {carrier_id} in country {country_id} or fallback country {}",
                self.fallback_country_id
            ))
            .into()
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixture::{assert_error, carrier_factors};
    use float_cmp::assert_approx_eq;
    use rstest::rstest;

    #[rstest]
    fn test_resolve_exact_country(carrier_factors: CarrierFactors) {
        let mut table = CarrierFactorTable::new(CountryID(31));
        let spanish = CarrierFactors {
            pef_tot: 2.0,
            ..carrier_factors
        };
        table.insert(CarrierID(12), CountryID(31), carrier_factors);
        table.insert(CarrierID(12), CountryID(27), spanish);

        let factors = table.resolve(CarrierID(12), CountryID(27)).unwrap();
        assert_approx_eq!(f64, factors.pef_tot, 2.0);
    }

    #[rstest]
    fn test_resolve_fallback_country(carrier_factors: CarrierFactors) {
        let mut table = CarrierFactorTable::new(CountryID(31));
        table.insert(CarrierID(12), CountryID(31), carrier_factors);

        assert_eq!(
            table.resolve(CarrierID(12), CountryID(999)).unwrap(),
            &carrier_factors
        );
    }

    #[rstest]
    fn test_resolve_missing(carrier_factors: CarrierFactors) {
        let mut table = CarrierFactorTable::new(CountryID(31));
        table.insert(CarrierID(12), CountryID(27), carrier_factors);

        let result = table.resolve(CarrierID(12), CountryID(999));
        assert_error!(
            result,
            "Missing reference data: No factors for carrier 12 in country 999 or fallback country 31"
        );
    }

    #[rstest]
    fn test_cost_per_kwh(carrier_factors: CarrierFactors) {
        assert_approx_eq!(f64, carrier_factors.cost_per_kwh(Tariff::Household), 0.2);
        assert_approx_eq!(f64, carrier_factors.cost_per_kwh(Tariff::NonHousehold), 0.15);
    }
}
