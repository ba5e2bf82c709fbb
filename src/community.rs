//! Aggregation of building KPI records into community KPIs.
use crate::building::ServiceProfile;
use crate::error::KpiError;
use crate::kpi::{
    BuildingKpis, FINAL_ENERGY_PREFIX, INTENSITY_KPIS, KpiValue, PEAK_COOLING_DEMAND,
    PEAK_DHW_DEMAND, PEAK_ELEC_DEMAND, PEAK_ELECTRICITY_CONSUMPTION, PEAK_HEAT_DEMAND,
};
use anyhow::{Result, bail, ensure};
use indexmap::IndexMap;
use log::debug;

/// Sum demand profiles over a set of buildings
pub fn aggregate_demand_profiles<'a, I>(profiles: I) -> ServiceProfile
where
    I: IntoIterator<Item = &'a ServiceProfile>,
{
    let mut total = ServiceProfile::default();
    for profile in profiles {
        total += profile;
    }

    total
}

/// A community KPI
#[derive(Debug, Clone, PartialEq)]
pub struct CommunityKpi {
    /// The aggregated value
    pub value: KpiValue,
    /// Unit of the value
    pub unit: String,
}

/// Community KPIs, keyed by name, in the order they first appear in the building records
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CommunityAccount(IndexMap<String, CommunityKpi>);

impl CommunityAccount {
    /// Look up a KPI by name
    pub fn get(&self, name: &str) -> Option<&CommunityKpi> {
        self.0.get(name)
    }

    /// Iterate over KPI names and values
    pub fn iter(&self) -> impl Iterator<Item = (&str, &CommunityKpi)> {
        self.0.iter().map(|(name, kpi)| (name.as_str(), kpi))
    }

    /// The number of KPIs
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether there are no KPIs
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    fn insert_peak(&mut self, name: &str, peak: f64) {
        self.0.insert(
            name.to_string(),
            CommunityKpi {
                value: KpiValue::Scalar(peak),
                unit: "kWh".to_string(),
            },
        );
    }
}

/// Add `value` to an accumulated KPI value
fn accumulate(name: &str, total: &mut KpiValue, value: &KpiValue) -> Result<()> {
    match (total, value) {
        (_, KpiValue::Null) => {}
        (total @ KpiValue::Null, value) => *total = value.clone(),
        (KpiValue::Scalar(total), KpiValue::Scalar(value)) => *total += value,
        (KpiValue::Series(total), KpiValue::Series(value)) => *total += value,
        _ => bail!("KPI {name} is a scalar for some buildings and a series for others"),
    }

    Ok(())
}

/// Combines the KPI records of the buildings in a community
pub struct CommunityAggregator {
    electricity_final_energy: Option<String>,
}

impl CommunityAggregator {
    /// Create a new aggregator.
    ///
    /// # Arguments
    ///
    /// * `electricity_carrier_name` - Name of the grid electricity carrier, used to find the peak
    ///   electricity consumption
    pub fn new(electricity_carrier_name: Option<&str>) -> Self {
        Self {
            electricity_final_energy: electricity_carrier_name
                .map(|name| format!("{FINAL_ENERGY_PREFIX}{name}")),
        }
    }

    /// Aggregate building KPI records.
    ///
    /// Scalars and series are summed, except for intensities which are averaged weighted by
    /// floor area. Peak demands are then taken from the community's total demand.
    ///
    /// # Arguments
    ///
    /// * `records` - The KPI record for every building
    /// * `total_demand` - The community's total demand profile
    pub fn aggregate(
        &self,
        records: &[BuildingKpis],
        total_demand: &ServiceProfile,
    ) -> Result<CommunityAccount> {
        for record in records {
            record.check_complete()?;
        }

        let total_area: f64 = records.iter().map(|record| record.area).sum();
        ensure!(total_area > 0.0, KpiError::ZeroAreaAggregation);

        let mut kpis: IndexMap<String, CommunityKpi> = IndexMap::new();
        for record in records {
            for entry in record.iter() {
                let kpi = kpis
                    .entry(entry.name.clone())
                    .or_insert_with(|| CommunityKpi {
                        value: KpiValue::Null,
                        unit: entry.unit.clone(),
                    });

                if INTENSITY_KPIS.contains(&entry.name.as_str()) {
                    let KpiValue::Scalar(intensity) = entry.value else {
                        bail!(
                            "Intensity {} for building {} is not a scalar",
                            entry.name,
                            record.building_id
                        );
                    };
                    let weighted = KpiValue::Scalar(intensity * record.area);
                    accumulate(&entry.name, &mut kpi.value, &weighted)?;
                } else {
                    accumulate(&entry.name, &mut kpi.value, &entry.value)?;
                }
            }
        }

        for name in INTENSITY_KPIS {
            if let Some(KpiValue::Scalar(weighted)) = kpis.get_mut(name).map(|kpi| &mut kpi.value) {
                *weighted /= total_area;
            }
        }

        let mut account = CommunityAccount(kpis);
        account.insert_peak(PEAK_HEAT_DEMAND, total_demand.heating.peak());
        account.insert_peak(PEAK_DHW_DEMAND, total_demand.dhw.peak());
        account.insert_peak(PEAK_COOLING_DEMAND, total_demand.cooling.peak());
        account.insert_peak(PEAK_ELEC_DEMAND, total_demand.electricity.peak());

        let electricity_peak = self
            .electricity_final_energy
            .as_deref()
            .and_then(|name| account.get(name))
            .and_then(|kpi| kpi.value.as_series())
            .map(|series| series.peak());
        if let Some(peak) = electricity_peak {
            account.insert_peak(PEAK_ELECTRICITY_CONSUMPTION, peak);
        }

        debug!(
            "Aggregated {} KPIs over {} buildings ({total_area} m2)",
            account.len(),
            records.len()
        );

        Ok(account)
    }
}
