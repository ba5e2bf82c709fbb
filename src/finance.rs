//! Investment appraisal for generation assets: NPV, LCOE, savings and payback.
use crate::error::KpiError;
use crate::series::HourlySeries;
use crate::units::{
    Capacity, Dimensionless, EnergyPerYear, Money, MoneyPerCapacity, MoneyPerEnergy,
    MoneyPerYear, Year,
};
use anyhow::{Result, ensure};

/// Capital cost used when none is known (€/kW)
pub const DEFAULT_CAPEX_PER_KW: MoneyPerCapacity = MoneyPerCapacity::new(1000.0);

/// Operating cost used when none is known (€/kWh)
pub const DEFAULT_OPEX_PER_KWH: MoneyPerEnergy = MoneyPerEnergy::new(25.0);

/// Lifetime used when none is known (years)
pub const DEFAULT_LIFETIME_YEARS: i64 = 20;

/// Costs and lifetime of a generation system
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FinancialParameters {
    /// Capital cost per kW of installed capacity
    pub capex_per_kw: MoneyPerCapacity,
    /// Operating cost per kWh generated, for each year of operation
    pub opex_per_kwh: MoneyPerEnergy,
    /// Expected lifetime in years
    pub lifetime_years: i64,
}

impl Default for FinancialParameters {
    fn default() -> Self {
        Self {
            capex_per_kw: DEFAULT_CAPEX_PER_KW,
            opex_per_kwh: DEFAULT_OPEX_PER_KWH,
            lifetime_years: DEFAULT_LIFETIME_YEARS,
        }
    }
}

/// The investment being appraised
#[derive(Debug, Clone, PartialEq)]
pub struct Investment<'a> {
    /// Installed capacity
    pub capacity: Capacity,
    /// Hourly generation over a year (kWh)
    pub generation: &'a HourlySeries,
    /// Annual energy costs before the investment
    pub cost_before: MoneyPerYear,
    /// Annual energy costs after the investment, excluding operating costs of the asset
    pub cost_now: MoneyPerYear,
}

/// The outcome of appraising an investment
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FinancialResult {
    /// Total capital expenditure
    pub total_capex: Money,
    /// Operating costs of the asset in each year
    pub annual_opex: MoneyPerYear,
    /// Discounted energy costs over the lifetime, without the investment
    pub npv_opex_before: Money,
    /// Discounted energy and operating costs over the lifetime, with the investment
    pub npv_opex_after: Money,
    /// Capital plus discounted costs over the lifetime
    pub total_lifetime_costs: Money,
    /// Levelised cost of electricity. `None` if the discounted generation is zero.
    pub lcoe: Option<MoneyPerEnergy>,
    /// Discounted savings over the lifetime
    pub total_savings: Money,
    /// Years taken for savings to cover the capital cost. `None` if this never happens within the
    /// asset's lifetime.
    pub payback_period: Option<Year>,
}

/// Check that a lifetime is a positive number of years, returning it as a `u32`
pub fn check_lifetime(lifetime_years: i64) -> Result<u32> {
    let lifetime = u32::try_from(lifetime_years).unwrap_or(0);
    ensure!(
        lifetime > 0,
        KpiError::InvalidFinancialInput(format!(
            "Lifetime must be a positive number of years, got {lifetime_years}"
        ))
    );

    Ok(lifetime)
}

/// The sum of discount factors for years 1 to `lifetime`.
///
/// Multiplying a constant annual cash flow by this gives its net present value.
pub fn annuity_factor(lifetime: u32, discount_rate: Dimensionless) -> Year {
    let growth = 1.0 + discount_rate.value();
    let mut discount = 1.0;
    let mut total = 0.0;
    for _ in 0..lifetime {
        discount /= growth;
        total += discount;
    }

    Year(total)
}

/// Net present value of a constant annual cash flow
pub fn npv(annual: MoneyPerYear, lifetime: u32, discount_rate: Dimensionless) -> Money {
    annual * annuity_factor(lifetime, discount_rate)
}

/// Years for the annual savings to repay the capital cost, if this happens within `lifetime`
pub fn payback_period(
    total_capex: Money,
    annual_savings: MoneyPerYear,
    lifetime: u32,
) -> Option<Year> {
    if annual_savings <= MoneyPerYear(0.0) {
        return None;
    }

    let years = total_capex / annual_savings;
    (years <= Year(f64::from(lifetime))).then_some(years)
}

/// Appraise an investment in a generation asset.
///
/// # Arguments
///
/// * `parameters` - Costs and lifetime of the asset
/// * `investment` - Capacity, generation and energy costs before and after
/// * `discount_rate` - The rate at which future cash flows are discounted
pub fn appraise(
    parameters: &FinancialParameters,
    investment: &Investment,
    discount_rate: Dimensionless,
) -> Result<FinancialResult> {
    let lifetime = check_lifetime(parameters.lifetime_years)?;

    let total_capex = parameters.capex_per_kw * investment.capacity;
    let annual_generation = EnergyPerYear(investment.generation.yearly());
    let annual_opex = parameters.opex_per_kwh * annual_generation;

    let npv_opex_before = npv(investment.cost_before, lifetime, discount_rate);
    let npv_opex_after = npv(investment.cost_now + annual_opex, lifetime, discount_rate);
    let total_lifetime_costs = total_capex + npv_opex_after;
    let total_savings = npv_opex_before - npv_opex_after;

    let npv_generation = annual_generation * annuity_factor(lifetime, discount_rate);
    let lcoe = (npv_generation.value() != 0.0).then(|| total_lifetime_costs / npv_generation);

    let annual_savings = total_savings / Year(f64::from(lifetime));
    let payback_period = payback_period(total_capex, annual_savings, lifetime);

    Ok(FinancialResult {
        total_capex,
        annual_opex,
        npv_opex_before,
        npv_opex_after,
        total_lifetime_costs,
        lcoe,
        total_savings,
        payback_period,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use float_cmp::assert_approx_eq;
    use rstest::rstest;

    #[rstest]
    #[case(1, 0.05, 1.0 / 1.05)]
    #[case(2, 0.05, 1.0 / 1.05 + 1.0 / (1.05 * 1.05))]
    #[case(20, 0.05, 12.462210342539)]
    #[case(10, 0.0, 10.0)]
    #[case(0, 0.05, 0.0)]
    fn test_annuity_factor(#[case] lifetime: u32, #[case] rate: f64, #[case] expected: f64) {
        let factor = annuity_factor(lifetime, Dimensionless(rate));
        assert_approx_eq!(f64, factor.value(), expected, epsilon = 1e-9);
    }

    #[rstest]
    #[case(20, Ok(20))]
    #[case(1, Ok(1))]
    #[case(0, Err(()))]
    #[case(-5, Err(()))]
    fn test_check_lifetime(#[case] lifetime: i64, #[case] expected: Result<u32, ()>) {
        let result = check_lifetime(lifetime);
        match expected {
            Ok(value) => assert_eq!(result.unwrap(), value),
            Err(()) => assert_eq!(
                result.unwrap_err().downcast_ref::<KpiError>(),
                Some(&KpiError::InvalidFinancialInput(format!(
                    "Lifetime must be a positive number of years, got {lifetime}"
                )))
            ),
        }
    }

    #[rstest]
    #[case(1000.0, 250.0, 20, Some(4.0))]
    #[case(1000.0, 50.0, 20, Some(20.0))] // pays back in final year
    #[case(1000.0, 40.0, 20, None)] // takes longer than lifetime
    #[case(1000.0, 0.0, 20, None)]
    #[case(1000.0, -10.0, 20, None)]
    fn test_payback_period(
        #[case] capex: f64,
        #[case] savings: f64,
        #[case] lifetime: u32,
        #[case] expected: Option<f64>,
    ) {
        let result = payback_period(Money(capex), MoneyPerYear(savings), lifetime);
        assert_eq!(result.map(Year::value), expected);
    }

    #[test]
    fn test_appraise_default_parameters() {
        // 10 kW with default costs, generating 10000 kWh per year
        let generation = HourlySeries::constant(10_000.0 / 8760.0);
        let investment = Investment {
            capacity: Capacity(10.0),
            generation: &generation,
            cost_before: MoneyPerYear(2000.0),
            cost_now: MoneyPerYear(500.0),
        };
        let result = appraise(
            &FinancialParameters::default(),
            &investment,
            Dimensionless(0.05),
        )
        .unwrap();

        let factor = annuity_factor(20, Dimensionless(0.05)).value();
        assert_approx_eq!(Money, result.total_capex, Money(10_000.0));
        assert_approx_eq!(
            MoneyPerYear,
            result.annual_opex,
            MoneyPerYear(250_000.0),
            epsilon = 1e-6
        );
        assert_approx_eq!(
            Money,
            result.npv_opex_before,
            Money(2000.0 * factor),
            epsilon = 1e-6
        );
        assert_approx_eq!(
            Money,
            result.npv_opex_after,
            Money(250_500.0 * factor),
            epsilon = 1e-4
        );
        assert_approx_eq!(
            Money,
            result.total_lifetime_costs,
            Money(10_000.0 + 250_500.0 * factor),
            epsilon = 1e-4
        );
        assert_approx_eq!(
            Money,
            result.total_savings,
            Money((2000.0 - 250_500.0) * factor),
            epsilon = 1e-4
        );
        assert_approx_eq!(
            MoneyPerEnergy,
            result.lcoe.unwrap(),
            MoneyPerEnergy((10_000.0 + 250_500.0 * factor) / (10_000.0 * factor)),
            epsilon = 1e-6
        );
        assert!(result.payback_period.is_none());
    }

    #[test]
    fn test_appraise_pays_back() {
        // Cheap to run, so savings repay the capital cost
        let generation = HourlySeries::constant(1.0);
        let parameters = FinancialParameters {
            capex_per_kw: MoneyPerCapacity(1000.0),
            opex_per_kwh: MoneyPerEnergy(0.0),
            lifetime_years: 20,
        };
        let investment = Investment {
            capacity: Capacity(5.0),
            generation: &generation,
            cost_before: MoneyPerYear(2000.0),
            cost_now: MoneyPerYear(1000.0),
        };
        let result = appraise(&parameters, &investment, Dimensionless(0.05)).unwrap();

        // Savings of 1000 per year, discounted and spread back over the lifetime
        let factor = annuity_factor(20, Dimensionless(0.05)).value();
        let annual_savings = 1000.0 * factor / 20.0;
        assert_approx_eq!(
            Year,
            result.payback_period.unwrap(),
            Year(5000.0 / annual_savings),
            epsilon = 1e-9
        );
    }

    #[test]
    fn test_appraise_no_generation() {
        let generation = HourlySeries::zeros();
        let investment = Investment {
            capacity: Capacity(0.0),
            generation: &generation,
            cost_before: MoneyPerYear(0.0),
            cost_now: MoneyPerYear(0.0),
        };
        let result = appraise(
            &FinancialParameters::default(),
            &investment,
            Dimensionless(0.05),
        )
        .unwrap();
        assert!(result.lcoe.is_none());
        assert!(result.payback_period.is_none());
        assert_approx_eq!(Money, result.total_lifetime_costs, Money(0.0));
    }

    #[test]
    fn test_appraise_invalid_lifetime() {
        let generation = HourlySeries::zeros();
        let investment = Investment {
            capacity: Capacity(1.0),
            generation: &generation,
            cost_before: MoneyPerYear(0.0),
            cost_now: MoneyPerYear(0.0),
        };
        let parameters = FinancialParameters {
            lifetime_years: 0,
            ..FinancialParameters::default()
        };
        assert!(appraise(&parameters, &investment, Dimensionless(0.05)).is_err());
    }
}
