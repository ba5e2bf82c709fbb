//! Buildings and their energy profiles.
use crate::asset::GenerationAsset;
use crate::id::{BuildingID, BuildingUseID, CountryID, GenerationSystemID};
use crate::series::HourlySeries;
use crate::system::SystemCatalogue;
use indexmap::IndexMap;
use log::warn;
use strum::{Display, EnumIter};

/// An energy service used by a building
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter, Display)]
#[strum(serialize_all = "snake_case")]
pub enum Service {
    /// Electricity for appliances, lighting etc.
    Electricity,
    /// Space heating
    Heating,
    /// Space cooling
    Cooling,
    /// Domestic hot water
    Dhw,
}

impl Service {
    /// Thermal services, i.e. those which may be provided by a heat pump
    pub const THERMAL: [Service; 3] = [Service::Dhw, Service::Heating, Service::Cooling];
}

/// An hourly profile for each energy service (kWh)
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ServiceProfile {
    /// Electricity
    pub electricity: HourlySeries,
    /// Space heating
    pub heating: HourlySeries,
    /// Space cooling
    pub cooling: HourlySeries,
    /// Domestic hot water
    pub dhw: HourlySeries,
}

impl ServiceProfile {
    /// The profile for one service
    pub fn get(&self, service: Service) -> &HourlySeries {
        match service {
            Service::Electricity => &self.electricity,
            Service::Heating => &self.heating,
            Service::Cooling => &self.cooling,
            Service::Dhw => &self.dhw,
        }
    }

    /// Mutable access to the profile for one service
    pub fn get_mut(&mut self, service: Service) -> &mut HourlySeries {
        match service {
            Service::Electricity => &mut self.electricity,
            Service::Heating => &mut self.heating,
            Service::Cooling => &mut self.cooling,
            Service::Dhw => &mut self.dhw,
        }
    }
}

impl std::ops::AddAssign<&ServiceProfile> for ServiceProfile {
    fn add_assign(&mut self, rhs: &ServiceProfile) {
        self.electricity += &rhs.electricity;
        self.heating += &rhs.heating;
        self.cooling += &rhs.cooling;
        self.dhw += &rhs.dhw;
    }
}

/// The generation system providing each service in a building, if any
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GenerationSystemProfile {
    /// Electricity system
    pub electricity: Option<GenerationSystemID>,
    /// Space heating system
    pub heating: Option<GenerationSystemID>,
    /// Space cooling system
    pub cooling: Option<GenerationSystemID>,
    /// Domestic hot water system
    pub dhw: Option<GenerationSystemID>,
}

impl GenerationSystemProfile {
    /// The system providing a service
    pub fn slot(&self, service: Service) -> Option<GenerationSystemID> {
        match service {
            Service::Electricity => self.electricity,
            Service::Heating => self.heating,
            Service::Cooling => self.cooling,
            Service::Dhw => self.dhw,
        }
    }
}

/// A building in the community
#[derive(Debug, Clone, PartialEq)]
pub struct Building {
    /// Unique identifier for the building
    pub id: BuildingID,
    /// Human-readable name
    pub name: String,
    /// Type of building (residential, office etc.)
    pub building_use_id: BuildingUseID,
    /// Year of construction
    pub construction_year: u32,
    /// Country the building is in, if known
    pub country_id: Option<CountryID>,
    /// Floor area (m²)
    pub area: f64,
    /// Generation systems providing each service
    pub systems: GenerationSystemProfile,
    /// Final energy consumption for each service
    pub consumption: ServiceProfile,
    /// Useful energy demand for each service, if known
    pub demand: Option<ServiceProfile>,
    /// Installed generation assets
    pub assets: Vec<GenerationAsset>,
}

/// A map of [`Building`]s, keyed by building ID
pub type BuildingMap = IndexMap<BuildingID, Building>;

impl Building {
    /// Whether the building is residential
    pub fn is_residential(&self, residential_use_ids: &[BuildingUseID]) -> bool {
        residential_use_ids.contains(&self.building_use_id)
    }

    /// The floor area to use in calculations.
    ///
    /// Areas of 1 m² or less are treated as unknown and `assumed_area` is used instead.
    pub fn floor_area(&self, assumed_area: f64) -> f64 {
        if self.area > 1.0 {
            return self.area;
        }

        warn!(
            "Building {} has a floor area of {} m2; assuming {assumed_area} m2",
            self.id, self.area
        );
        assumed_area
    }

    /// The building's demand profile.
    ///
    /// If no demand profile was supplied, it is derived from consumption: demand for a thermal
    /// service is its consumption multiplied by the fuel yield of the system providing it, and
    /// zero if no system provides it. Electricity demand is electricity consumption.
    pub fn demand_profile(&self, catalogue: &SystemCatalogue) -> ServiceProfile {
        if let Some(demand) = &self.demand {
            return demand.clone();
        }

        let mut demand = ServiceProfile {
            electricity: self.consumption.electricity.clone(),
            ..ServiceProfile::default()
        };
        for service in Service::THERMAL {
            if let Some(system_id) = self.systems.slot(service) {
                *demand.get_mut(service) = self
                    .consumption
                    .get(service)
                    .scale(catalogue.fuel_yield(system_id));
            }
        }

        demand
    }
}
