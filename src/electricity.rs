//! Balance of a building's electricity use against on-site generation.
use crate::series::HourlySeries;

/// Hourly electricity balance for one building
#[derive(Debug, Clone, PartialEq)]
pub struct ElectricityBalance {
    /// Total electricity use, including heat pumps (kWh)
    pub total_use: HourlySeries,
    /// On-site PV generation (kWh)
    pub total_pv: HourlySeries,
    /// Generation consumed on site (kWh)
    pub self_consumption: HourlySeries,
    /// Percentage of use met by self-consumption
    pub self_sufficiency: HourlySeries,
    /// Percentage of generation consumed on site
    pub rate_of_self_consumption: HourlySeries,
    /// Electricity drawn from the grid (kWh)
    pub grid_consumption: HourlySeries,
}

/// `numerator / denominator` as a percentage, or zero if the denominator is zero
fn percentage(numerator: f64, denominator: f64) -> f64 {
    if denominator == 0.0 {
        0.0
    } else {
        numerator / denominator * 100.0
    }
}

impl ElectricityBalance {
    /// Balance electricity use against PV generation, if there is any
    pub fn new(total_use: HourlySeries, pv: Option<HourlySeries>) -> Self {
        let Some(total_pv) = pv else {
            return Self {
                grid_consumption: total_use.clone(),
                total_use,
                total_pv: HourlySeries::zeros(),
                self_consumption: HourlySeries::zeros(),
                self_sufficiency: HourlySeries::zeros(),
                rate_of_self_consumption: HourlySeries::zeros(),
            };
        };

        let self_consumption = total_use.min(&total_pv);
        let self_sufficiency = self_consumption.zip_with(&total_use, percentage);
        let rate_of_self_consumption = self_consumption.zip_with(&total_pv, percentage);
        let grid_consumption = &total_use - &self_consumption;

        Self {
            total_use,
            total_pv,
            self_consumption,
            self_sufficiency,
            rate_of_self_consumption,
            grid_consumption,
        }
    }
}
