//! The module responsible for writing output data to disk.
use crate::carrier::EnergyCarrierMap;
use crate::community::CommunityAccount;
use crate::finance::FinancialResult;
use crate::id::{BuildingID, CarrierID};
use crate::indicators::BuildingAccount;
use crate::kpi::carrier::CarrierIndicator;
use crate::kpi::{BuildingKpis, KpiValue};
use crate::series::{HOURS_PER_YEAR, HourlySeries};
use anyhow::{Context, Result, ensure};
use serde::{Deserialize, Serialize};
use std::fs;
use std::fs::File;
use std::path::{Path, PathBuf};
use strum::IntoEnumIterator;

/// The root folder in which model-specific output folders will be created
const OUTPUT_DIRECTORY_ROOT: &str = "kpi_results";

/// The output file name for building KPIs
const BUILDING_KPIS_FILE_NAME: &str = "building_kpis.csv";

/// The output file name for carrier KPIs
const CARRIER_KPIS_FILE_NAME: &str = "carrier_kpis.csv";

/// The output file name for investment appraisals
const BUILDING_FINANCE_FILE_NAME: &str = "building_finance.csv";

/// The output file name for community KPIs
const COMMUNITY_KPIS_FILE_NAME: &str = "community_kpis.csv";

/// The output file name for hourly community KPIs
const COMMUNITY_HOURLY_FILE_NAME: &str = "community_hourly.csv";

/// The output file name for a building's hourly KPIs
fn building_hourly_file_name(building_id: &BuildingID) -> String {
    format!("building_{building_id}_hourly.csv")
}

/// Get the model name from the specified directory path
pub fn get_output_dir(model_dir: &Path) -> Result<PathBuf> {
    // Canonicalise in case the user has specified "."
    let model_dir = model_dir
        .canonicalize()
        .context("Could not resolve path to model")?;

    let model_name = model_dir
        .file_name()
        .context("Model cannot be in root folder")?
        .to_str()
        .context("Invalid chars in model dir name")?;

    Ok([OUTPUT_DIRECTORY_ROOT, model_name].iter().collect())
}

/// Create a new output directory, with parents.
///
/// An existing directory is reused if it is empty. If it contains files, it is deleted and
/// recreated when `allow_overwrite` is set, otherwise an error is returned.
///
/// # Returns
///
/// Whether an existing folder will be overwritten.
pub fn create_output_directory(output_dir: &Path, allow_overwrite: bool) -> Result<bool> {
    let overwrite = if output_dir.is_dir() {
        if fs::read_dir(output_dir)?.next().is_none() {
            return Ok(false);
        }

        ensure!(
            allow_overwrite,
            "Output folder already exists and is not empty. Use --overwrite or change the \
            setting in settings.toml to replace it."
        );
        fs::remove_dir_all(output_dir)?;
        true
    } else {
        false
    };

    fs::create_dir_all(output_dir)?;

    Ok(overwrite)
}

/// Represents a row in the building KPIs CSV file.
///
/// Series are written as their yearly total and flagged as hourly; their hourly values go to the
/// building's hourly file.
#[derive(Serialize, Deserialize, Debug, PartialEq)]
struct BuildingKpiRow {
    building_id: BuildingID,
    id: u32,
    name: String,
    value: Option<f64>,
    unit: String,
    hourly: bool,
}

/// Represents a row in the carrier KPIs CSV file. Yearly totals have no month.
#[derive(Serialize, Deserialize, Debug, PartialEq)]
struct CarrierKpiRow {
    building_id: BuildingID,
    energy_carrier_id: CarrierID,
    energy_carrier: String,
    indicator: String,
    month: Option<u32>,
    value: f64,
    unit: String,
}

/// Represents a row in the building finance CSV file
#[derive(Serialize, Deserialize, Debug, PartialEq)]
struct FinanceRow {
    building_id: BuildingID,
    total_capex: f64,
    annual_opex: f64,
    npv_opex_before: f64,
    npv_opex_after: f64,
    total_lifetime_costs: f64,
    lcoe: Option<f64>,
    total_savings: f64,
    payback_period: Option<f64>,
}

impl FinanceRow {
    fn new(building_id: &BuildingID, result: &FinancialResult) -> Self {
        Self {
            building_id: building_id.clone(),
            total_capex: result.total_capex.value(),
            annual_opex: result.annual_opex.value(),
            npv_opex_before: result.npv_opex_before.value(),
            npv_opex_after: result.npv_opex_after.value(),
            total_lifetime_costs: result.total_lifetime_costs.value(),
            lcoe: result.lcoe.map(|lcoe| lcoe.value()),
            total_savings: result.total_savings.value(),
            payback_period: result.payback_period.map(|years| years.value()),
        }
    }
}

/// Represents a row in the community KPIs CSV file
#[derive(Serialize, Deserialize, Debug, PartialEq)]
struct CommunityKpiRow {
    name: String,
    value: Option<f64>,
    unit: String,
    hourly: bool,
}

/// The value to write in a KPI table and whether it summarises an hourly series
fn tabulate(value: &KpiValue) -> (Option<f64>, bool) {
    match value {
        KpiValue::Scalar(value) => (Some(*value), false),
        KpiValue::Series(series) => (Some(series.yearly()), true),
        KpiValue::Null => (None, false),
    }
}

/// Write hourly series to a CSV file, one column per series
fn write_hourly<'a, I>(file_path: &Path, columns: I) -> Result<()>
where
    I: IntoIterator<Item = (&'a str, &'a HourlySeries)>,
{
    let (names, series): (Vec<_>, Vec<_>) = columns.into_iter().unzip();

    let mut writer = csv::Writer::from_path(file_path)?;
    writer.write_record(std::iter::once("hour").chain(names))?;
    for hour in 0..HOURS_PER_YEAR {
        let values = series.iter().map(|series| series[hour].to_string());
        writer.write_record(std::iter::once(hour.to_string()).chain(values))?;
    }
    writer.flush()?;

    Ok(())
}

/// An object for writing KPIs to file
pub struct DataWriter {
    output_path: PathBuf,
    building_kpis_writer: csv::Writer<File>,
    carrier_kpis_writer: csv::Writer<File>,
    finance_writer: csv::Writer<File>,
    community_kpis_writer: csv::Writer<File>,
}

impl DataWriter {
    /// Open CSV files to write output data to
    ///
    /// # Arguments
    ///
    /// * `output_path` - Folder where files will be saved
    pub fn create(output_path: &Path) -> Result<Self> {
        let new_writer = |file_name| {
            let file_path = output_path.join(file_name);
            csv::Writer::from_path(&file_path)
                .with_context(|| format!("Could not create {}", file_path.display()))
        };

        Ok(Self {
            output_path: output_path.to_path_buf(),
            building_kpis_writer: new_writer(BUILDING_KPIS_FILE_NAME)?,
            carrier_kpis_writer: new_writer(CARRIER_KPIS_FILE_NAME)?,
            finance_writer: new_writer(BUILDING_FINANCE_FILE_NAME)?,
            community_kpis_writer: new_writer(COMMUNITY_KPIS_FILE_NAME)?,
        })
    }

    /// Write all outputs for one building
    pub fn write_building(
        &mut self,
        account: &BuildingAccount,
        kpis: &BuildingKpis,
        carriers: &EnergyCarrierMap,
    ) -> Result<()> {
        self.write_building_kpis(kpis)?;
        self.write_carrier_kpis(account, carriers)?;
        if let Some(result) = &account.finance {
            self.finance_writer
                .serialize(FinanceRow::new(&account.building_id, result))?;
        }

        Ok(())
    }

    /// Write a building's KPI list, plus a separate file for its hourly KPIs
    fn write_building_kpis(&mut self, kpis: &BuildingKpis) -> Result<()> {
        for entry in kpis.iter() {
            let (value, hourly) = tabulate(&entry.value);
            self.building_kpis_writer.serialize(BuildingKpiRow {
                building_id: kpis.building_id.clone(),
                id: entry.id,
                name: entry.name.clone(),
                value,
                unit: entry.unit.clone(),
                hourly,
            })?;
        }

        let columns = kpis.iter().filter_map(|entry| {
            entry
                .value
                .as_series()
                .map(|series| (entry.name.as_str(), series))
        });
        let file_path = self
            .output_path
            .join(building_hourly_file_name(&kpis.building_id));
        write_hourly(&file_path, columns)
    }

    /// Write monthly and yearly totals of every carrier indicator for a building
    fn write_carrier_kpis(
        &mut self,
        account: &BuildingAccount,
        carriers: &EnergyCarrierMap,
    ) -> Result<()> {
        for (carrier_id, record) in &account.carrier_kpis {
            let carrier_name = carriers
                .get(carrier_id)
                .map_or_else(|| carrier_id.to_string(), |carrier| carrier.name.clone());
            for indicator in CarrierIndicator::iter() {
                let monthly = record
                    .monthly(indicator)
                    .into_iter()
                    .zip(1..)
                    .map(|(value, month)| (Some(month), value));
                let yearly = std::iter::once((None, record.yearly(indicator)));
                for (month, value) in monthly.chain(yearly) {
                    self.carrier_kpis_writer.serialize(CarrierKpiRow {
                        building_id: account.building_id.clone(),
                        energy_carrier_id: *carrier_id,
                        energy_carrier: carrier_name.clone(),
                        indicator: indicator.to_string(),
                        month,
                        value,
                        unit: indicator.total_unit().to_string(),
                    })?;
                }
            }
        }

        Ok(())
    }

    /// Write the community KPIs, plus a separate file for hourly KPIs
    pub fn write_community(&mut self, community: &CommunityAccount) -> Result<()> {
        for (name, kpi) in community.iter() {
            let (value, hourly) = tabulate(&kpi.value);
            self.community_kpis_writer.serialize(CommunityKpiRow {
                name: name.to_string(),
                value,
                unit: kpi.unit.clone(),
                hourly,
            })?;
        }

        let columns = community
            .iter()
            .filter_map(|(name, kpi)| kpi.value.as_series().map(|series| (name, series)));
        write_hourly(&self.output_path.join(COMMUNITY_HOURLY_FILE_NAME), columns)
    }

    /// Flush the underlying streams
    pub fn flush(&mut self) -> Result<()> {
        self.building_kpis_writer.flush()?;
        self.carrier_kpis_writer.flush()?;
        self.finance_writer.flush()?;
        self.community_kpis_writer.flush()?;

        Ok(())
    }
}
