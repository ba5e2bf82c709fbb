//! Generation assets installed in buildings and their classification.
use crate::building::Service;
use crate::id::{AssetID, GenerationSystemID};
use crate::series::HourlySeries;
use crate::units::Capacity;

/// The kind of a generation asset, determined by its generation system
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AssetKind {
    /// A heat pump providing cooling
    CoolingHeatPump,
    /// A heat pump providing space heating
    HeatingHeatPump,
    /// A heat pump providing domestic hot water
    DhwHeatPump,
    /// An electricity generator, e.g. PV panels
    Electric,
    /// Combined heat and power
    CombinedHeatAndPower,
    /// Solar thermal collectors
    SolarThermal,
    /// Anything else which consumes a fuel
    FuelConsuming,
}

impl AssetKind {
    /// Classify a generation system by its ID
    pub fn classify(id: GenerationSystemID) -> Self {
        match id.0 {
            1..=8 => Self::CoolingHeatPump,
            61..=68 | 73 => Self::HeatingHeatPump,
            27..=36 | 41 => Self::DhwHeatPump,
            80..=87 => Self::Electric,
            88..=91 => Self::CombinedHeatAndPower,
            37..=40 | 69..=72 => Self::SolarThermal,
            _ => Self::FuelConsuming,
        }
    }

    /// The service provided, if this is a heat pump
    pub fn heat_pump_service(self) -> Option<Service> {
        match self {
            Self::CoolingHeatPump => Some(Service::Cooling),
            Self::HeatingHeatPump => Some(Service::Heating),
            Self::DhwHeatPump => Some(Service::Dhw),
            _ => None,
        }
    }

    /// Whether this is any kind of heat pump
    pub fn is_heat_pump(self) -> bool {
        self.heat_pump_service().is_some()
    }
}

/// A generation system installed in a building
#[derive(Debug, Clone, PartialEq)]
pub struct GenerationAsset {
    /// Unique identifier for the asset
    pub id: AssetID,
    /// The type of generation system
    pub generation_system_id: GenerationSystemID,
    /// Installed capacity multiplier, if known
    pub pmax_scalar: Option<f64>,
    /// Hourly input-1 profile. For heat pumps this is electricity drawn; for PV it is generation
    /// per unit of capacity.
    pub value_input1: HourlySeries,
}

impl GenerationAsset {
    /// The kind of asset
    pub fn kind(&self) -> AssetKind {
        AssetKind::classify(self.generation_system_id)
    }

    /// Installed capacity, treating an unknown capacity as zero
    pub fn capacity(&self) -> Capacity {
        Capacity(self.pmax_scalar.unwrap_or(0.0))
    }

    /// The input-1 profile scaled by installed capacity
    pub fn scaled_input(&self) -> HourlySeries {
        self.value_input1.scale(self.capacity().value())
    }
}
