//! Per-building energy accounting and the building KPI record.
//!
//! A building's consumption is routed to energy carriers according to the systems and assets it
//! has: heat pumps draw electricity, other systems consume the input carrier given in the
//! catalogue, and PV generation offsets electricity drawn from the grid. The resulting ledger is
//! then converted into primary energy, emissions and costs.
use crate::asset::{AssetKind, GenerationAsset};
use crate::benchmark::{BenchmarkQuery, NationalAverages};
use crate::building::{Building, Service, ServiceProfile};
use crate::carrier::Tariff;
use crate::electricity::ElectricityBalance;
use crate::finance::{FinancialResult, Investment, appraise};
use crate::id::{BuildingID, CarrierID, CountryID};
use crate::kpi::carrier::{CarrierIndicator, CarrierKpiRecord, calculate_carrier_kpis};
use crate::kpi::*;
use crate::ledger::EnergyCarrierLedger;
use crate::model::{ModelParameters, ReferenceData};
use crate::series::HourlySeries;
use crate::units::{Capacity, MoneyPerYear, Year};
use anyhow::{Context, Result};
use indexmap::IndexMap;
use log::{debug, warn};
use std::collections::HashSet;

/// The energy accounts for one building
#[derive(Debug, Clone, PartialEq)]
pub struct BuildingAccount {
    /// The building these accounts are for
    pub building_id: BuildingID,
    /// The country whose factors and benchmarks apply
    pub country_id: CountryID,
    /// Floor area used for intensities (m²)
    pub area: f64,
    /// Which tariff the building pays
    pub tariff: Tariff,
    /// Final energy consumption per carrier
    pub ledger: EnergyCarrierLedger,
    /// Electricity use, PV generation and self-consumption
    pub balance: ElectricityBalance,
    /// Indicators for each final carrier in the ledger
    pub carrier_kpis: IndexMap<CarrierID, CarrierKpiRecord>,
    /// Appraisal of the building's PV investment, if it has one
    pub finance: Option<FinancialResult>,
    /// Useful energy demand
    pub demand: ServiceProfile,
}

impl BuildingAccount {
    /// Hourly values of an indicator, summed over all carriers
    pub fn total(&self, indicator: CarrierIndicator) -> HourlySeries {
        self.carrier_kpis
            .values()
            .map(|record| record.hourly(indicator))
            .sum()
    }

    /// Yearly energy cost (€) at the building's tariff
    pub fn energy_cost(&self) -> f64 {
        let indicator = match self.tariff {
            Tariff::Household => CarrierIndicator::HouseholdCosts,
            Tariff::NonHousehold => CarrierIndicator::NonHouseholdCosts,
        };
        self.total(indicator).yearly()
    }
}

/// Sum the scaled input profiles of some assets, warning about any with no capacity
fn sum_scaled_inputs<'a, I>(assets: I) -> HourlySeries
where
    I: IntoIterator<Item = &'a GenerationAsset>,
{
    let mut total = HourlySeries::zeros();
    for asset in assets {
        if asset.pmax_scalar.is_none() {
            warn!("Asset {} has no capacity; its output is taken as zero", asset.id);
        }
        total += &asset.scaled_input();
    }

    total
}

/// Calculates the energy accounts and KPIs for individual buildings
pub struct BuildingIndicatorEngine<'a> {
    parameters: &'a ModelParameters,
    reference: &'a ReferenceData,
}

impl<'a> BuildingIndicatorEngine<'a> {
    /// Create a new engine
    pub fn new(parameters: &'a ModelParameters, reference: &'a ReferenceData) -> Self {
        Self {
            parameters,
            reference,
        }
    }

    /// Calculate the KPI record for a building
    pub fn evaluate(&self, building: &Building) -> Result<BuildingKpis> {
        let account = self.account(building)?;
        Ok(self.kpis(building, &account))
    }

    /// Route a building's consumption to carriers and calculate its energy accounts.
    ///
    /// A heat pump's electricity is counted once: if there is a heat pump asset for a service,
    /// the consumption given for that service is ignored.
    pub fn account(&self, building: &Building) -> Result<BuildingAccount> {
        debug!("Calculating energy accounts for building {}", building.id);

        let systems = &self.reference.systems;
        let mut ledger = EnergyCarrierLedger::new();
        let mut total_use = building.consumption.electricity.clone();

        let mut covered = HashSet::new();
        for asset in &building.assets {
            if let Some(service) = asset.kind().heat_pump_service() {
                total_use += &asset.value_input1;
                covered.insert(service);
            }
        }

        for service in Service::THERMAL {
            if covered.contains(&service) {
                continue;
            }
            let Some(system_id) = building.systems.slot(service) else {
                continue;
            };

            let consumption = building.consumption.get(service);
            if AssetKind::classify(system_id).is_heat_pump() {
                total_use += consumption;
            } else {
                let carrier_id = systems.input_carrier(system_id).with_context(|| {
                    format!("Cannot route {service} consumption of building {}", building.id)
                })?;
                ledger.add_consumption(carrier_id, consumption);
            }
        }

        let pv_assets: Vec<_> = building
            .assets
            .iter()
            .filter(|asset| asset.kind() == AssetKind::Electric)
            .collect();
        let pv = (!pv_assets.is_empty()).then(|| sum_scaled_inputs(pv_assets.iter().copied()));

        for asset in &building.assets {
            let kind = asset.kind();
            if kind.is_heat_pump() || kind == AssetKind::Electric {
                continue;
            }

            let carrier_id = systems
                .input_carrier(asset.generation_system_id)
                .with_context(|| format!("Cannot route consumption of asset {}", asset.id))?;
            ledger.add_consumption(carrier_id, &sum_scaled_inputs([asset]));
        }

        let balance = ElectricityBalance::new(total_use, pv);
        ledger.add_consumption(
            self.parameters.electricity_carrier_id,
            &balance.grid_consumption,
        );

        let country_id = building
            .country_id
            .unwrap_or(self.parameters.default_country_id);
        let carrier_kpis = calculate_carrier_kpis(
            &ledger,
            &self.reference.carriers,
            &self.reference.carrier_factors,
            country_id,
        )?;

        let tariff = if building.is_residential(&self.parameters.residential_use_ids) {
            Tariff::Household
        } else {
            Tariff::NonHousehold
        };
        let finance = self.appraise_investment(building, &balance, tariff, country_id)?;

        Ok(BuildingAccount {
            building_id: building.id.clone(),
            country_id,
            area: building.floor_area(self.parameters.assumed_floor_area),
            tariff,
            ledger,
            balance,
            carrier_kpis,
            finance,
            demand: building.demand_profile(systems),
        })
    }

    /// Appraise the building's PV investment, if it has one
    fn appraise_investment(
        &self,
        building: &Building,
        balance: &ElectricityBalance,
        tariff: Tariff,
        country_id: CountryID,
    ) -> Result<Option<FinancialResult>> {
        let system_id = self.parameters.financed_system_id;
        let financed: Vec<_> = building
            .assets
            .iter()
            .filter(|asset| {
                asset.kind() == AssetKind::Electric && asset.generation_system_id == system_id
            })
            .collect();
        if financed.is_empty() {
            return Ok(None);
        }

        let capacity: Capacity = financed.iter().map(|asset| asset.capacity()).sum();
        let generation = sum_scaled_inputs(financed.iter().copied());
        let price = self
            .reference
            .carrier_factors
            .resolve(self.parameters.electricity_carrier_id, country_id)?
            .cost_per_kwh(tariff);
        let investment = Investment {
            capacity,
            generation: &generation,
            cost_before: MoneyPerYear(balance.total_use.yearly() * price),
            cost_now: MoneyPerYear(balance.grid_consumption.yearly() * price),
        };

        let parameters = self.reference.systems.financial_parameters(system_id);
        let result = appraise(&parameters, &investment, self.parameters.discount_rate)
            .with_context(|| format!("Cannot appraise PV investment in building {}", building.id))?;

        Ok(Some(result))
    }

    /// National averages for a building
    fn national_averages(&self, building: &Building, country_id: CountryID) -> NationalAverages {
        self.reference.benchmarks.resolve(&BenchmarkQuery {
            building_use_id: building.building_use_id,
            construction_year: building.construction_year,
            country_id,
        })
    }

    /// Build the ordered KPI record for a building from its accounts
    pub fn kpis(&self, building: &Building, account: &BuildingAccount) -> BuildingKpis {
        let primary_energy = account.total(CarrierIndicator::PrimaryEnergyTotal);
        let co2 = account.total(CarrierIndicator::Co2);
        let balance = &account.balance;
        let area = account.area;

        let mut kpis = BuildingKpis::new(building.id.clone(), area);
        kpis.push(PEAK_HEAT_DEMAND, account.demand.heating.peak(), "kWh");
        kpis.push(PEAK_ELEC_DEMAND, balance.total_use.peak(), "kWh");
        kpis.push(TOTAL_PRIMARY_ENERGY, primary_energy.clone(), "kWh");
        kpis.push(NUM_MEMBERS, 1.0, "a.u.");
        for equivalent in self
            .parameters
            .citizen_factors
            .equivalents(&primary_energy, &co2)
        {
            kpis.push(equivalent.name, equivalent.values, equivalent.unit);
        }

        kpis.push(TOTAL_PV, balance.total_pv.clone(), "kWh");
        kpis.push(TOTAL_SELF_CONSUMPTION, balance.self_consumption.clone(), "kWh");
        kpis.push(TOTAL_SELF_SUFFICIENCY, balance.self_sufficiency.clone(), "%");
        kpis.push(
            RATE_OF_SELF_CONSUMPTION,
            balance.rate_of_self_consumption.clone(),
            "%",
        );
        kpis.push(
            RENEWABLE_PRIMARY_ENERGY,
            account.total(CarrierIndicator::PrimaryEnergyRenewable),
            "kWh",
        );
        kpis.push(
            NON_RENEWABLE_PRIMARY_ENERGY,
            account.total(CarrierIndicator::PrimaryEnergyNonRenewable),
            "kWh",
        );
        kpis.push(
            NON_HOUSEHOLD_COSTS,
            account.total(CarrierIndicator::NonHouseholdCosts),
            "€",
        );
        kpis.push(
            HOUSEHOLD_COSTS,
            account.total(CarrierIndicator::HouseholdCosts),
            "€",
        );
        kpis.push(TOTAL_CO2, co2.clone(), "g");

        let national = self.national_averages(building, account.country_id);
        kpis.push(PRIMARY_ENERGY_INTENSITY, primary_energy.yearly() / area, "kWh/m2");
        kpis.push(
            NATIONAL_PRIMARY_ENERGY_INTENSITY,
            national.primary_energy_intensity,
            "kWh/m2",
        );
        kpis.push(CO2_INTENSITY, co2.yearly() / area, "g/m2");
        kpis.push(NATIONAL_CO2_INTENSITY, national.co2_intensity, "g/m2");
        kpis.push(ENERGY_COST_INTENSITY, account.energy_cost() / area, "€/m2");
        kpis.push(
            NATIONAL_ENERGY_COST_INTENSITY,
            national.energy_cost_intensity,
            "€/m2",
        );

        // Buildings with nothing to appraise report zeros
        let finance = account.finance.as_ref();
        kpis.push(
            TOTAL_CAPEX,
            finance.map_or(0.0, |result| result.total_capex.value()),
            "€",
        );
        kpis.push(
            TOTAL_LIFETIME_COSTS,
            finance.map_or(0.0, |result| result.total_lifetime_costs.value()),
            "€",
        );
        kpis.push(
            TOTAL_SAVINGS,
            finance.map_or(0.0, |result| result.total_savings.value()),
            "€",
        );
        let payback = match finance {
            None => KpiValue::Scalar(0.0),
            Some(result) => result.payback_period.map(Year::value).into(),
        };
        kpis.push(PAYBACK_PERIOD, payback, "years");

        for (carrier_id, consumption) in account.ledger.iter() {
            let Some(carrier) = self.reference.carriers.get(&carrier_id) else {
                continue;
            };
            if carrier.is_final && consumption.any_positive() {
                let name = format!("{FINAL_ENERGY_PREFIX}{}", carrier.name);
                kpis.push(&name, consumption.clone(), "kWh");
            }
        }

        kpis
    }
}
