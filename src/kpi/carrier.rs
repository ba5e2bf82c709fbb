//! Primary energy, emissions and cost indicators for each carrier in a building's ledger.
use crate::carrier::{CarrierFactorTable, CarrierFactors, EnergyCarrierMap};
use crate::error::KpiError;
use crate::id::{CarrierID, CountryID};
use crate::ledger::EnergyCarrierLedger;
use crate::series::{HourlySeries, MonthlyValues};
use anyhow::{Context, Result};
use indexmap::IndexMap;
use strum::{EnumIter, IntoEnumIterator};

/// An indicator derived from final energy consumption of a carrier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter, strum::Display)]
pub enum CarrierIndicator {
    /// Total primary energy
    #[strum(to_string = "PEF_total")]
    PrimaryEnergyTotal,
    /// Non-renewable primary energy
    #[strum(to_string = "PEF_nren")]
    PrimaryEnergyNonRenewable,
    /// Renewable primary energy
    #[strum(to_string = "PEF_ren")]
    PrimaryEnergyRenewable,
    /// CO2-equivalent emissions
    #[strum(to_string = "co2")]
    Co2,
    /// Energy costs at the household tariff
    #[strum(to_string = "household_costs")]
    HouseholdCosts,
    /// Energy costs at the non-household tariff
    #[strum(to_string = "non_h_costs")]
    NonHouseholdCosts,
}

impl CarrierIndicator {
    /// The factor converting final energy (kWh) into this indicator
    fn factor(self, factors: &CarrierFactors) -> f64 {
        match self {
            Self::PrimaryEnergyTotal => factors.pef_tot,
            Self::PrimaryEnergyNonRenewable => factors.pef_nren,
            Self::PrimaryEnergyRenewable => factors.pef_ren,
            Self::Co2 => factors.f_co2_eq_g_kwh,
            Self::HouseholdCosts => factors.house_costs_eur_kwh,
            Self::NonHouseholdCosts => factors.non_h_costs_eur_kwh,
        }
    }

    /// Unit of hourly values
    pub fn hourly_unit(self) -> &'static str {
        match self {
            Self::PrimaryEnergyTotal
            | Self::PrimaryEnergyNonRenewable
            | Self::PrimaryEnergyRenewable => "kWh",
            Self::Co2 => "g",
            Self::HouseholdCosts | Self::NonHouseholdCosts => "€",
        }
    }

    /// Unit of monthly and yearly totals
    pub fn total_unit(self) -> &'static str {
        match self {
            Self::PrimaryEnergyTotal
            | Self::PrimaryEnergyNonRenewable
            | Self::PrimaryEnergyRenewable => "MWh",
            Self::Co2 => "t",
            Self::HouseholdCosts | Self::NonHouseholdCosts => "k€",
        }
    }

    /// Multiplier converting hourly units into total units
    fn total_conversion(self) -> f64 {
        match self {
            Self::Co2 => 1e-6,
            _ => 1e-3,
        }
    }
}

/// Indicators for one carrier in one building
#[derive(Debug, Clone, PartialEq)]
pub struct CarrierKpiRecord {
    /// The carrier these indicators are for
    pub carrier_id: CarrierID,
    /// The factors used in the calculation
    pub factors: CarrierFactors,
    hourly: IndexMap<CarrierIndicator, HourlySeries>,
}

impl CarrierKpiRecord {
    /// Calculate indicators from a carrier's final energy consumption
    pub fn new(carrier_id: CarrierID, consumption: &HourlySeries, factors: CarrierFactors) -> Self {
        let hourly = CarrierIndicator::iter()
            .map(|indicator| (indicator, consumption.scale(indicator.factor(&factors))))
            .collect();

        Self {
            carrier_id,
            factors,
            hourly,
        }
    }

    /// Hourly values in kWh, g or €
    pub fn hourly(&self, indicator: CarrierIndicator) -> &HourlySeries {
        &self.hourly[&indicator]
    }

    /// Monthly totals in MWh, t or k€
    pub fn monthly(&self, indicator: CarrierIndicator) -> MonthlyValues {
        let conversion = indicator.total_conversion();
        self.hourly(indicator).monthly().map(|v| v * conversion)
    }

    /// Yearly total in MWh, t or k€
    pub fn yearly(&self, indicator: CarrierIndicator) -> f64 {
        self.hourly(indicator).yearly() * indicator.total_conversion()
    }
}

/// Calculate indicators for every final carrier in a ledger.
///
/// # Arguments
///
/// * `ledger` - The building's final energy consumption
/// * `carriers` - All known energy carriers
/// * `factor_table` - National factors for carriers
/// * `country_id` - The country the building is in
pub fn calculate_carrier_kpis(
    ledger: &EnergyCarrierLedger,
    carriers: &EnergyCarrierMap,
    factor_table: &CarrierFactorTable,
    country_id: CountryID,
) -> Result<IndexMap<CarrierID, CarrierKpiRecord>> {
    let mut records = IndexMap::new();
    for (carrier_id, consumption) in ledger.iter() {
        let carrier = carriers.get(&carrier_id).ok_or_else(|| {
            KpiError::MissingReferenceData(format!("Unknown energy carrier {carrier_id}"))
        })?;
        if !carrier.is_final {
            continue;
        }

        let factors = factor_table
            .resolve(carrier_id, country_id)
            .with_context(|| format!("Could not calculate KPIs for carrier {}", carrier.name))?;
        records.insert(
            carrier_id,
            CarrierKpiRecord::new(carrier_id, consumption, *factors),
        );
    }

    Ok(records)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixture::{assert_error, carrier_factors, carriers};
    use float_cmp::assert_approx_eq;
    use rstest::rstest;

    #[rstest]
    fn test_carrier_kpi_record(carrier_factors: CarrierFactors) {
        let record = CarrierKpiRecord::new(CarrierID(12), &HourlySeries::constant(2.0), carrier_factors);

        assert_approx_eq!(
            f64,
            record.hourly(CarrierIndicator::PrimaryEnergyTotal)[0],
            2.0 * carrier_factors.pef_tot
        );
        assert_approx_eq!(
            f64,
            record.hourly(CarrierIndicator::Co2)[10],
            2.0 * carrier_factors.f_co2_eq_g_kwh
        );

        // 744 hours in January, kWh -> MWh
        assert_approx_eq!(
            f64,
            record.monthly(CarrierIndicator::PrimaryEnergyNonRenewable)[0],
            744.0 * 2.0 * carrier_factors.pef_nren * 1e-3,
            epsilon = 1e-9
        );

        // g -> t
        assert_approx_eq!(
            f64,
            record.yearly(CarrierIndicator::Co2),
            8760.0 * 2.0 * carrier_factors.f_co2_eq_g_kwh * 1e-6,
            epsilon = 1e-9
        );
    }

    #[rstest]
    fn test_monthly_totals_match_yearly(carrier_factors: CarrierFactors) {
        let consumption =
            HourlySeries::from_values((0..8760_u32).map(|h| f64::from(h % 24)).collect()).unwrap();
        let record = CarrierKpiRecord::new(CarrierID(2), &consumption, carrier_factors);

        for indicator in CarrierIndicator::iter() {
            let monthly: f64 = record.monthly(indicator).iter().sum();
            assert_approx_eq!(f64, monthly, record.yearly(indicator), epsilon = 1e-9);
        }
    }

    #[rstest]
    fn test_calculate_carrier_kpis_skips_non_final(
        carriers: EnergyCarrierMap,
        carrier_factors: CarrierFactors,
    ) {
        let mut table = CarrierFactorTable::new(CountryID(31));
        table.insert(CarrierID(12), CountryID(31), carrier_factors);
        table.insert(CarrierID(2), CountryID(31), carrier_factors);

        let mut ledger = EnergyCarrierLedger::new();
        ledger.add_consumption(CarrierID(9), &HourlySeries::constant(1.0));
        ledger.add_consumption(CarrierID(12), &HourlySeries::constant(1.0));

        let records = calculate_carrier_kpis(&ledger, &carriers, &table, CountryID(27)).unwrap();
        assert_eq!(records.keys().copied().collect::<Vec<_>>(), [CarrierID(12)]);
    }

    #[rstest]
    fn test_calculate_carrier_kpis_missing_factors(carriers: EnergyCarrierMap) {
        let table = CarrierFactorTable::new(CountryID(31));
        let mut ledger = EnergyCarrierLedger::new();
        ledger.add_consumption(CarrierID(2), &HourlySeries::constant(1.0));

        assert_error!(
            calculate_carrier_kpis(&ledger, &carriers, &table, CountryID(27)),
            "Could not calculate KPIs for carrier Natural gas"
        );
    }
}
