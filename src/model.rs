//! The model represents the static input data provided by the user.
use crate::benchmark::BenchmarkResolver;
use crate::building::BuildingMap;
use crate::carrier::{CarrierFactorTable, EnergyCarrierMap};
use crate::system::SystemCatalogue;
use std::path::PathBuf;

pub mod parameters;
pub use parameters::ModelParameters;

/// Reference data shared by every building. It is loaded once and never modified.
#[derive(Debug, Clone, PartialEq)]
pub struct ReferenceData {
    /// Known energy carriers
    pub carriers: EnergyCarrierMap,
    /// National factors for each carrier
    pub carrier_factors: CarrierFactorTable,
    /// Known generation systems
    pub systems: SystemCatalogue,
    /// National average intensities
    pub benchmarks: BenchmarkResolver,
}

/// Model definition
pub struct Model {
    /// Path to model folder
    pub model_path: PathBuf,
    /// Parameters from the model TOML file
    pub parameters: ModelParameters,
    /// Reference data
    pub reference: ReferenceData,
    /// The buildings in the community
    pub buildings: BuildingMap,
}
