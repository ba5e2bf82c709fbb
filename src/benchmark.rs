//! National average intensities used as benchmarks for each building.
//!
//! Benchmarks are looked up with an ordered list of strategies, each less specific than the last.
//! Each intensity is looked up on its own, so a row with a missing value doesn't hide the values
//! it does have. If no strategy finds a value, a fixed default is used, so a benchmark is always
//! available.
use crate::id::{BuildingUseID, CountryID};
use log::debug;
use serde::Deserialize;
use serde_string_enum::DeserializeLabeledStringEnum;

/// Primary energy intensity used when no benchmark matches (kWh/m²)
pub const DEFAULT_PRIMARY_ENERGY_INTENSITY: f64 = 234.87;

/// Energy cost intensity used when no benchmark matches (€/m²)
pub const DEFAULT_ENERGY_COST_INTENSITY: f64 = 22.0;

/// CO2 intensity used when no benchmark matches (g/m²)
pub const DEFAULT_CO2_INTENSITY: f64 = 43149.28568;

/// A row of the benchmarks table
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct BenchmarkRow {
    /// The country the averages apply to
    pub country_id: CountryID,
    /// The type of building the averages apply to
    pub building_use_id: BuildingUseID,
    /// The construction year the averages apply to
    pub construction_year: u32,
    /// Average primary energy intensity (kWh/m²)
    pub total_primary_energy_intensity: Option<f64>,
    /// Average energy cost intensity (€/m²)
    pub total_energy_cost_intensity: Option<f64>,
    /// Average CO2 intensity (g/m²)
    #[serde(rename = "total_CO2_intensity")]
    pub total_co2_intensity: Option<f64>,
}

/// National average intensities for a building
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NationalAverages {
    /// Primary energy intensity (kWh/m²)
    pub primary_energy_intensity: f64,
    /// Energy cost intensity (€/m²)
    pub energy_cost_intensity: f64,
    /// CO2 intensity (g/m²)
    pub co2_intensity: f64,
}

impl Default for NationalAverages {
    fn default() -> Self {
        Self {
            primary_energy_intensity: DEFAULT_PRIMARY_ENERGY_INTENSITY,
            energy_cost_intensity: DEFAULT_ENERGY_COST_INTENSITY,
            co2_intensity: DEFAULT_CO2_INTENSITY,
        }
    }
}

/// The building properties used to find a benchmark
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BenchmarkQuery {
    /// Type of building
    pub building_use_id: BuildingUseID,
    /// Year the building was built
    pub construction_year: u32,
    /// Country the building is in
    pub country_id: CountryID,
}

/// A way of matching rows of the benchmark table against a building
#[derive(DeserializeLabeledStringEnum, Debug, Clone, Copy, PartialEq)]
pub enum LookupStrategy {
    /// Match on building use, construction year and country
    #[string = "exact"]
    Exact,
    /// Match on building use and country
    #[string = "ignore_construction_year"]
    IgnoreConstructionYear,
    /// Match on building use, using the fallback country in place of the building's own
    #[string = "fallback_country"]
    FallbackCountry,
}

impl LookupStrategy {
    /// Whether `row` matches the query under this strategy
    fn matches(self, row: &BenchmarkRow, query: &BenchmarkQuery, fallback: CountryID) -> bool {
        if row.building_use_id != query.building_use_id {
            return false;
        }

        match self {
            Self::Exact => {
                row.country_id == query.country_id
                    && row.construction_year == query.construction_year
            }
            Self::IgnoreConstructionYear => row.country_id == query.country_id,
            Self::FallbackCountry => row.country_id == fallback,
        }
    }
}

/// The default order in which strategies are tried
pub fn default_lookup_strategies() -> Vec<LookupStrategy> {
    vec![
        LookupStrategy::Exact,
        LookupStrategy::IgnoreConstructionYear,
        LookupStrategy::FallbackCountry,
    ]
}

/// Finds national averages for buildings
#[derive(Debug, Clone, PartialEq)]
pub struct BenchmarkResolver {
    rows: Vec<BenchmarkRow>,
    strategies: Vec<LookupStrategy>,
    fallback_country_id: CountryID,
}

impl BenchmarkResolver {
    /// Create a new resolver.
    ///
    /// # Arguments
    ///
    /// * `rows` - The benchmark table (may be empty)
    /// * `strategies` - Strategies to try, in order
    /// * `fallback_country_id` - Country used by [`LookupStrategy::FallbackCountry`]
    pub fn new(
        rows: Vec<BenchmarkRow>,
        strategies: Vec<LookupStrategy>,
        fallback_country_id: CountryID,
    ) -> Self {
        Self {
            rows,
            strategies,
            fallback_country_id,
        }
    }

    /// Find the national averages for a building.
    ///
    /// Each intensity is taken from the first row, matched by the first successful strategy,
    /// which has a value for it. Intensities with no value anywhere get their default.
    pub fn resolve(&self, query: &BenchmarkQuery) -> NationalAverages {
        NationalAverages {
            primary_energy_intensity: self
                .resolve_value(query, |row| row.total_primary_energy_intensity)
                .unwrap_or(DEFAULT_PRIMARY_ENERGY_INTENSITY),
            energy_cost_intensity: self
                .resolve_value(query, |row| row.total_energy_cost_intensity)
                .unwrap_or(DEFAULT_ENERGY_COST_INTENSITY),
            co2_intensity: self
                .resolve_value(query, |row| row.total_co2_intensity)
                .unwrap_or(DEFAULT_CO2_INTENSITY),
        }
    }

    /// Look up one intensity by trying each strategy in turn
    fn resolve_value<F>(&self, query: &BenchmarkQuery, value: F) -> Option<f64>
    where
        F: Fn(&BenchmarkRow) -> Option<f64>,
    {
        for strategy in &self.strategies {
            if let Some(found) = self
                .rows
                .iter()
                .filter(|row| strategy.matches(row, query, self.fallback_country_id))
                .find_map(&value)
            {
                debug!("Benchmark for {query:?} found with {strategy:?} lookup");
                return Some(found);
            }
        }

        debug!("No benchmark found for {query:?}; using default");
        None
    }
}
