//! Code for reading buildings and their hourly profiles from CSV files.
use super::*;
use crate::asset::AssetKind;
use crate::building::{Building, BuildingMap, GenerationSystemProfile, Service, ServiceProfile};
use crate::id::{BuildingID, BuildingUseID, CountryID, GenerationSystemID, IDCollection};
use crate::series::HourlySeries;
use crate::system::SystemCatalogue;
use anyhow::ensure;
use indexmap::{IndexMap, IndexSet};
use serde::Deserialize;
use strum::IntoEnumIterator;

const BUILDINGS_FILE_NAME: &str = "buildings.csv";
const CONSUMPTION_FILE_NAME: &str = "building_consumption.csv";
const DEMAND_FILE_NAME: &str = "building_demand.csv";

#[derive(Debug, Deserialize, PartialEq)]
struct BuildingRaw {
    id: String,
    name: String,
    building_use_id: BuildingUseID,
    construction_year: u32,
    country_id: Option<CountryID>,
    area: f64,
    electricity_system_id: Option<GenerationSystemID>,
    heating_system_id: Option<GenerationSystemID>,
    cooling_system_id: Option<GenerationSystemID>,
    dhw_system_id: Option<GenerationSystemID>,
}

/// One hour of a building's profile, for every service
#[derive(Debug, Deserialize, PartialEq)]
struct ProfileRow {
    building_id: String,
    electricity: Option<f64>,
    heating: Option<f64>,
    cooling: Option<f64>,
    dhw: Option<f64>,
}

/// Read buildings along with their consumption and (optional) demand profiles.
///
/// # Arguments
///
/// * `model_dir` - Folder containing model configuration files
/// * `systems` - The generation system catalogue
///
/// # Returns
///
/// A map of [`Building`]s, keyed by building ID. Buildings have no assets at this point.
pub fn read_buildings(model_dir: &Path, systems: &SystemCatalogue) -> Result<BuildingMap> {
    let file_path = model_dir.join(BUILDINGS_FILE_NAME);
    let raw = read_csv(&file_path)?;
    let raw =
        read_buildings_raw_from_iter(raw, systems).with_context(|| input_err_msg(&file_path))?;
    let building_ids: IndexSet<BuildingID> = raw.keys().cloned().collect();

    let file_path = model_dir.join(CONSUMPTION_FILE_NAME);
    let rows = read_csv(&file_path)?;
    let mut consumption =
        read_profiles_from_iter(rows, &building_ids).with_context(|| input_err_msg(&file_path))?;

    let file_path = model_dir.join(DEMAND_FILE_NAME);
    let rows = read_csv_optional(&file_path)?;
    let mut demand =
        read_profiles_from_iter(rows, &building_ids).with_context(|| input_err_msg(&file_path))?;

    raw.into_iter()
        .map(|(id, building)| {
            let consumption = consumption
                .swap_remove(&id)
                .with_context(|| format!("No consumption data for building {id}"))?;
            let building = Building {
                id: id.clone(),
                name: building.name,
                building_use_id: building.building_use_id,
                construction_year: building.construction_year,
                country_id: building.country_id,
                area: building.area,
                systems: GenerationSystemProfile {
                    electricity: building.electricity_system_id,
                    heating: building.heating_system_id,
                    cooling: building.cooling_system_id,
                    dhw: building.dhw_system_id,
                },
                consumption,
                demand: demand.swap_remove(&id),
                assets: Vec::new(),
            };
            Ok((id, building))
        })
        .try_collect()
}

fn read_buildings_raw_from_iter<I>(
    iter: I,
    systems: &SystemCatalogue,
) -> Result<IndexMap<BuildingID, BuildingRaw>>
where
    I: Iterator<Item = BuildingRaw>,
{
    let mut buildings = IndexMap::new();
    for building in iter {
        let id = BuildingID::new(&building.id);
        ensure!(
            building.area.is_finite() && building.area >= 0.0,
            "Building {id} must have a non-negative floor area"
        );

        let slots = [
            (Service::Electricity, building.electricity_system_id),
            (Service::Heating, building.heating_system_id),
            (Service::Cooling, building.cooling_system_id),
            (Service::Dhw, building.dhw_system_id),
        ];
        for (service, system_id) in slots {
            let Some(system_id) = system_id else {
                continue;
            };

            // Heat pumps are routed to electricity and need no catalogue entry
            ensure!(
                AssetKind::classify(system_id).is_heat_pump() || systems.get(system_id).is_some(),
                "Unknown generation system {system_id} for {service} in building {id}"
            );
        }

        ensure!(
            buildings.insert(id.clone(), building).is_none(),
            "Duplicate building ID {id}"
        );
    }

    Ok(buildings)
}

/// Group hourly rows by building and convert them into [`ServiceProfile`]s.
///
/// Rows for each building must be given in time order. Empty cells are treated as zero.
fn read_profiles_from_iter<I>(
    iter: I,
    building_ids: &IndexSet<BuildingID>,
) -> Result<IndexMap<BuildingID, ServiceProfile>>
where
    I: Iterator<Item = ProfileRow>,
{
    let mut rows_by_building: IndexMap<BuildingID, Vec<ProfileRow>> = IndexMap::new();
    for row in iter {
        let id = building_ids.get_id_by_str(&row.building_id)?;
        rows_by_building.entry(id).or_default().push(row);
    }

    rows_by_building
        .into_iter()
        .map(|(id, rows)| {
            let profile = profile_from_rows(&rows)
                .with_context(|| format!("Invalid hourly profile for building {id}"))?;
            Ok((id, profile))
        })
        .try_collect()
}

fn profile_from_rows(rows: &[ProfileRow]) -> Result<ServiceProfile> {
    let mut profile = ServiceProfile::default();
    for service in Service::iter() {
        let values = rows.iter().map(|row| match service {
            Service::Electricity => row.electricity,
            Service::Heating => row.heating,
            Service::Cooling => row.cooling,
            Service::Dhw => row.dhw,
        });
        *profile.get_mut(service) = HourlySeries::from_optional(values)?;
    }

    Ok(profile)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::KpiError;
    use crate::fixture::{assert_error, systems};
    use crate::series::HOURS_PER_YEAR;
    use float_cmp::assert_approx_eq;
    use rstest::rstest;
    use std::fs::File;
    use std::io::Write;
    use std::iter;
    use tempfile::tempdir;

    fn building_raw(id: &str) -> BuildingRaw {
        BuildingRaw {
            id: id.into(),
            name: "Town hall".into(),
            building_use_id: BuildingUseID(5),
            construction_year: 1975,
            country_id: None,
            area: 800.0,
            electricity_system_id: None,
            heating_system_id: Some(GenerationSystemID(10)),
            cooling_system_id: Some(GenerationSystemID(2)),
            dhw_system_id: None,
        }
    }

    fn profile_rows(building_id: &str, count: usize) -> impl Iterator<Item = ProfileRow> + '_ {
        iter::repeat_with(move || ProfileRow {
            building_id: building_id.into(),
            electricity: Some(1.0),
            heating: None,
            cooling: Some(0.5),
            dhw: None,
        })
        .take(count)
    }

    #[rstest]
    fn test_read_buildings_raw(systems: SystemCatalogue) {
        let buildings =
            read_buildings_raw_from_iter([building_raw("b1")].into_iter(), &systems).unwrap();
        assert_eq!(buildings.len(), 1);
        assert!(buildings.contains_key("b1"));
    }

    #[rstest]
    fn test_read_buildings_raw_duplicate(systems: SystemCatalogue) {
        assert_error!(
            read_buildings_raw_from_iter(
                [building_raw("b1"), building_raw("b1")].into_iter(),
                &systems
            ),
            "Duplicate building ID b1"
        );
    }

    #[rstest]
    fn test_read_buildings_raw_unknown_system(systems: SystemCatalogue) {
        let mut building = building_raw("b1");
        building.heating_system_id = Some(GenerationSystemID(999));
        assert_error!(
            read_buildings_raw_from_iter([building].into_iter(), &systems),
            "Unknown generation system 999 for heating in building b1"
        );
    }

    #[rstest]
    fn test_read_buildings_raw_heat_pump_not_in_catalogue(systems: SystemCatalogue) {
        let mut building = building_raw("b1");
        building.heating_system_id = Some(GenerationSystemID(65));
        assert!(read_buildings_raw_from_iter([building].into_iter(), &systems).is_ok());
    }

    #[rstest]
    fn test_read_buildings_raw_negative_area(systems: SystemCatalogue) {
        let mut building = building_raw("b1");
        building.area = -1.0;
        assert_error!(
            read_buildings_raw_from_iter([building].into_iter(), &systems),
            "Building b1 must have a non-negative floor area"
        );
    }

    #[test]
    fn test_read_profiles() {
        let ids = IndexSet::from(["b1".into(), "b2".into()]);
        let rows = profile_rows("b1", HOURS_PER_YEAR).chain(profile_rows("b2", HOURS_PER_YEAR));
        let profiles = read_profiles_from_iter(rows, &ids).unwrap();

        assert_eq!(profiles.len(), 2);
        let profile = &profiles["b1"];
        assert_approx_eq!(f64, profile.electricity.yearly(), 8760.0);
        assert_approx_eq!(f64, profile.heating.yearly(), 0.0);
        assert_approx_eq!(f64, profile.cooling.yearly(), 4380.0);
    }

    #[test]
    fn test_read_profiles_wrong_length() {
        let ids = IndexSet::from(["b1".into()]);
        let result = read_profiles_from_iter(profile_rows("b1", 100), &ids);
        let err = result.unwrap_err();
        assert_eq!(err.to_string(), "Invalid hourly profile for building b1");
        assert_eq!(
            err.downcast_ref::<KpiError>(),
            Some(&KpiError::InvalidTimeSeriesLength {
                expected: HOURS_PER_YEAR,
                actual: 100
            })
        );
    }

    #[test]
    fn test_read_profiles_unknown_building() {
        let ids = IndexSet::from(["b1".into()]);
        assert_error!(
            read_profiles_from_iter(profile_rows("b2", 1), &ids),
            "Unknown ID b2 found"
        );
    }

    #[rstest]
    fn test_read_buildings(systems: SystemCatalogue) {
        let dir = tempdir().unwrap();
        {
            let mut file = File::create(dir.path().join(BUILDINGS_FILE_NAME)).unwrap();
            writeln!(
                file,
                "id,name,building_use_id,construction_year,country_id,area,\
electricity_system_id,heating_system_id,cooling_system_id,dhw_system_id
b1,House,1,1990,27,120,,10,,27"
            )
            .unwrap();

            let mut file = File::create(dir.path().join(CONSUMPTION_FILE_NAME)).unwrap();
            writeln!(file, "building_id,electricity,heating,cooling,dhw").unwrap();
            for _ in 0..HOURS_PER_YEAR {
                writeln!(file, "b1,1.0,2.0,,0.4").unwrap();
            }
        }

        let buildings = read_buildings(dir.path(), &systems).unwrap();
        let building = &buildings["b1"];
        assert_eq!(building.country_id, Some(CountryID(27)));
        assert_eq!(building.systems.dhw, Some(GenerationSystemID(27)));
        assert_eq!(building.systems.cooling, None);
        assert_approx_eq!(f64, building.consumption.heating[8759], 2.0);
        assert!(building.demand.is_none());
        assert!(building.assets.is_empty());
    }

    #[rstest]
    fn test_read_buildings_no_consumption(systems: SystemCatalogue) {
        let dir = tempdir().unwrap();
        {
            let mut file = File::create(dir.path().join(BUILDINGS_FILE_NAME)).unwrap();
            writeln!(
                file,
                "id,name,building_use_id,construction_year,country_id,area,\
electricity_system_id,heating_system_id,cooling_system_id,dhw_system_id
b1,House,1,1990,27,120,,,,
b2,Shop,4,2001,,90,,,,"
            )
            .unwrap();

            let mut file = File::create(dir.path().join(CONSUMPTION_FILE_NAME)).unwrap();
            writeln!(file, "building_id,electricity,heating,cooling,dhw").unwrap();
            for _ in 0..HOURS_PER_YEAR {
                writeln!(file, "b1,1.0,,,").unwrap();
            }
        }

        assert_error!(
            read_buildings(dir.path(), &systems),
            "No consumption data for building b2"
        );
    }
}
