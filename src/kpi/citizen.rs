//! Everyday equivalents of a building's primary energy use and emissions.
use crate::series::HourlySeries;
use anyhow::{Result, ensure};
use serde::Deserialize;

macro_rules! define_factor_default {
    ($name:ident, $value: expr) => {
        fn $name() -> f64 {
            $value
        }
    };
}

define_factor_default!(default_tv_kwh_per_hour, 0.250);
define_factor_default!(default_streaming_kwh_per_hour, 0.077);
define_factor_default!(default_pizza_kwh, 2.0);
define_factor_default!(default_battery_kwh_per_charge, 68.7);
define_factor_default!(default_electric_car_kwh_per_charge, 354.0 * 0.196);
define_factor_default!(default_wine_bottle_kwh, 540.0);
define_factor_default!(default_tree_kg_co2, 25.0);
define_factor_default!(default_streaming_kg_co2_per_hour, 0.036);
define_factor_default!(default_car_kg_co2_per_km, 0.1163);

/// Conversion factors for the citizen-facing KPIs.
///
/// Energy factors divide primary energy (kWh) and emission factors divide CO2 (kg).
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct CitizenFactors {
    /// Energy used by watching TV for an hour
    #[serde(default = "default_tv_kwh_per_hour")]
    pub tv_kwh_per_hour: f64,
    /// Energy used by an hour of video streaming
    #[serde(default = "default_streaming_kwh_per_hour")]
    pub streaming_kwh_per_hour: f64,
    /// Energy used to bake one pizza
    #[serde(default = "default_pizza_kwh")]
    pub pizza_kwh: f64,
    /// Energy needed to fully charge a home battery
    #[serde(default = "default_battery_kwh_per_charge")]
    pub battery_kwh_per_charge: f64,
    /// Energy needed to fully charge an electric car
    #[serde(default = "default_electric_car_kwh_per_charge")]
    pub electric_car_kwh_per_charge: f64,
    /// Energy used to produce a bottle of wine
    #[serde(default = "default_wine_bottle_kwh")]
    pub wine_bottle_kwh: f64,
    /// CO2 absorbed by one tree in a year
    #[serde(default = "default_tree_kg_co2")]
    pub tree_kg_co2: f64,
    /// CO2 emitted by an hour of video streaming
    #[serde(default = "default_streaming_kg_co2_per_hour")]
    pub streaming_kg_co2_per_hour: f64,
    /// CO2 emitted by driving a combustion car for one km
    #[serde(default = "default_car_kg_co2_per_km")]
    pub car_kg_co2_per_km: f64,
}

impl Default for CitizenFactors {
    fn default() -> Self {
        Self {
            tv_kwh_per_hour: default_tv_kwh_per_hour(),
            streaming_kwh_per_hour: default_streaming_kwh_per_hour(),
            pizza_kwh: default_pizza_kwh(),
            battery_kwh_per_charge: default_battery_kwh_per_charge(),
            electric_car_kwh_per_charge: default_electric_car_kwh_per_charge(),
            wine_bottle_kwh: default_wine_bottle_kwh(),
            tree_kg_co2: default_tree_kg_co2(),
            streaming_kg_co2_per_hour: default_streaming_kg_co2_per_hour(),
            car_kg_co2_per_km: default_car_kg_co2_per_km(),
        }
    }
}

/// An everyday equivalent, as a KPI name, unit and hourly series
pub struct CitizenEquivalent {
    /// KPI name
    pub name: &'static str,
    /// Unit of the values
    pub unit: &'static str,
    /// Hourly values
    pub values: HourlySeries,
}

impl CitizenFactors {
    /// Check that all factors can be divided by
    pub fn validate(&self) -> Result<()> {
        for (name, value) in [
            ("tv_kwh_per_hour", self.tv_kwh_per_hour),
            ("streaming_kwh_per_hour", self.streaming_kwh_per_hour),
            ("pizza_kwh", self.pizza_kwh),
            ("battery_kwh_per_charge", self.battery_kwh_per_charge),
            ("electric_car_kwh_per_charge", self.electric_car_kwh_per_charge),
            ("wine_bottle_kwh", self.wine_bottle_kwh),
            ("tree_kg_co2", self.tree_kg_co2),
            ("streaming_kg_co2_per_hour", self.streaming_kg_co2_per_hour),
            ("car_kg_co2_per_km", self.car_kg_co2_per_km),
        ] {
            ensure!(
                value.is_finite() && value > 0.0,
                "Citizen factor {name} must be a finite number greater than zero"
            );
        }

        Ok(())
    }

    /// Calculate everyday equivalents, in KPI order.
    ///
    /// # Arguments
    ///
    /// * `primary_energy` - Total primary energy (kWh)
    /// * `co2` - Total CO2-equivalent emissions (g)
    pub fn equivalents(
        &self,
        primary_energy: &HourlySeries,
        co2: &HourlySeries,
    ) -> Vec<CitizenEquivalent> {
        let co2_kg = co2.scale(1e-3);
        let per = |series: &HourlySeries, divisor: f64| series.map(|v| v / divisor);

        vec![
            CitizenEquivalent {
                name: "EquivalentTVHours_[h]",
                unit: "h",
                values: per(primary_energy, self.tv_kwh_per_hour),
            },
            CitizenEquivalent {
                name: "EquivalentstreamingHours_[h]",
                unit: "h",
                values: per(primary_energy, self.streaming_kwh_per_hour),
            },
            CitizenEquivalent {
                name: "PizzaConsumptionComparison_[pizza]",
                unit: "pizza",
                values: per(primary_energy, self.pizza_kwh),
            },
            CitizenEquivalent {
                name: "BatteryUsageEstimation_[charges]",
                unit: "charges",
                values: per(primary_energy, self.battery_kwh_per_charge),
            },
            CitizenEquivalent {
                name: "ElectricCarChargingEstimation_[charges]",
                unit: "charges",
                values: per(primary_energy, self.electric_car_kwh_per_charge),
            },
            CitizenEquivalent {
                name: "WineBottlesProduction_[bottles]",
                unit: "bottles",
                values: per(primary_energy, self.wine_bottle_kwh),
            },
            CitizenEquivalent {
                name: "TreesRequiredForCarbonOffset_[trees]",
                unit: "trees",
                values: per(&co2_kg, self.tree_kg_co2),
            },
            CitizenEquivalent {
                name: "streamingEmissionsImpact_[hours]",
                unit: "hours",
                values: per(&co2_kg, self.streaming_kg_co2_per_hour),
            },
            CitizenEquivalent {
                name: "CarbonEmissionsPerKilometer_[km]",
                unit: "km",
                values: per(&co2_kg, self.car_kg_co2_per_km),
            },
        ]
    }
}
