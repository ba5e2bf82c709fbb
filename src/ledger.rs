//! Accumulates a building's final energy consumption for each energy carrier.
use crate::id::CarrierID;
use crate::series::HourlySeries;
use indexmap::IndexMap;

/// Final energy consumption of one building, per carrier (kWh).
///
/// Consumption can only be added, never removed.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EnergyCarrierLedger(IndexMap<CarrierID, HourlySeries>);

impl EnergyCarrierLedger {
    /// Create an empty ledger
    pub fn new() -> Self {
        Self::default()
    }

    /// Add consumption for a carrier, starting from zero if the carrier has not been seen before
    pub fn add_consumption(&mut self, carrier_id: CarrierID, series: &HourlySeries) {
        *self.0.entry(carrier_id).or_default() += series;
    }

    /// Accumulated consumption for a carrier
    pub fn get(&self, carrier_id: CarrierID) -> Option<&HourlySeries> {
        self.0.get(&carrier_id)
    }

    /// Iterate over carriers and their accumulated consumption, in order of first use
    pub fn iter(&self) -> impl Iterator<Item = (CarrierID, &HourlySeries)> {
        self.0.iter().map(|(id, series)| (*id, series))
    }

    /// The number of carriers in the ledger
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether nothing has been added yet
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}
