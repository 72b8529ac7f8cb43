//! Net income calculation per scenario.
//!
//! Every scenario is computed independently. Intermediate values are allowed
//! to go negative (e.g. expenses above income). A zero gross income is an
//! error, since the retention percentage is undefined, and so is any amount
//! that does not fit in a `Decimal`.

use super::nl;
use super::scenario::{ScenarioConfig, ScenarioFamily, ScenarioKind};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ComputeError {
    #[error("{scenario}: gross income is zero, retention percentage is undefined")]
    ZeroGrossIncome { scenario: ScenarioKind },
    #[error("{scenario}: amounts are too large to compute")]
    Overflow { scenario: ScenarioKind },
}

/// Breakdown of where the gross income of one scenario ends up.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScenarioResult {
    pub scenario: ScenarioKind,
    pub label: &'static str,
    pub gross_income: Decimal,
    pub company_expenses: Decimal,
    pub net_income: Decimal,
    pub personal_tax: Decimal,
    pub corporate_tax: Decimal,
    pub dividend_tax: Decimal,
    pub social_security: Decimal,
    /// Net income as a percentage of gross income
    pub retention_pct: Decimal,
}

/// Tax components before the retention percentage is known
#[derive(Debug, Default)]
struct Breakdown {
    net_income: Decimal,
    personal_tax: Decimal,
    corporate_tax: Decimal,
    dividend_tax: Decimal,
    social_security: Decimal,
}

#[derive(Debug, Clone, Copy)]
enum Salary {
    Full,
    Capped,
}

/// Compute the net income breakdown of a scenario.
pub fn compute(config: &ScenarioConfig) -> Result<ScenarioResult, ComputeError> {
    let overflow = || ComputeError::Overflow {
        scenario: config.kind,
    };
    let gross = config.gross_income.ok_or_else(overflow)?;
    let expenses = config.company_expenses;

    if gross.is_zero() {
        return Err(ComputeError::ZeroGrossIncome {
            scenario: config.kind,
        });
    }

    let breakdown = match config.family {
        ScenarioFamily::Regular {
            income_tax_rate,
            social_security_rate,
        } => regular(gross, expenses, income_tax_rate, rate_or_zero(social_security_rate)),
        ScenarioFamily::SelfEmployed {
            income_tax_rate,
            self_employment_deduction,
        } => self_employed(gross, expenses, income_tax_rate, self_employment_deduction),
        // no corporate rate: corporate income is only positive for negative expenses
        ScenarioFamily::IncorporatedFullSalary {
            income_tax_rate,
            social_security_rate,
        }
        | ScenarioFamily::Payrolling {
            income_tax_rate,
            social_security_rate,
        } => incorporated(
            gross,
            expenses,
            Salary::Full,
            income_tax_rate,
            Decimal::ZERO,
            None,
            rate_or_zero(social_security_rate),
        ),
        ScenarioFamily::IncorporatedCappedSalary {
            income_tax_rate,
            corporate_tax_rate,
            social_security_rate,
            ..
        } => incorporated(
            gross,
            expenses,
            Salary::Capped,
            income_tax_rate,
            corporate_tax_rate,
            None,
            rate_or_zero(social_security_rate),
        ),
        ScenarioFamily::IncorporatedCappedSalaryWithDividend {
            income_tax_rate,
            corporate_tax_rate,
            dividend_tax_rate,
            social_security_rate,
            ..
        } => incorporated(
            gross,
            expenses,
            Salary::Capped,
            income_tax_rate,
            corporate_tax_rate,
            Some(dividend_tax_rate),
            rate_or_zero(social_security_rate),
        ),
    }
    .ok_or_else(overflow)?;

    let retention_pct = breakdown
        .net_income
        .checked_div(gross)
        .and_then(|ratio| ratio.checked_mul(dec!(100)))
        .ok_or_else(overflow)?;

    log::debug!(
        "{}: gross {}, net {}, retention {:.1}%",
        config.kind,
        gross,
        breakdown.net_income,
        retention_pct
    );

    Ok(ScenarioResult {
        scenario: config.kind,
        label: config.label(),
        gross_income: gross,
        company_expenses: expenses,
        net_income: breakdown.net_income,
        personal_tax: breakdown.personal_tax,
        corporate_tax: breakdown.corporate_tax,
        dividend_tax: breakdown.dividend_tax,
        social_security: breakdown.social_security,
        retention_pct,
    })
}

/// Compute every scenario, keeping failures per scenario.
pub fn compute_all(configs: &[ScenarioConfig]) -> Vec<Result<ScenarioResult, ComputeError>> {
    configs.iter().map(compute).collect()
}

fn rate_or_zero(rate: Option<Decimal>) -> Decimal {
    rate.unwrap_or(Decimal::ZERO)
}

// The helpers below return `None` when an amount overflows.

fn regular(
    gross: Decimal,
    expenses: Decimal,
    income_tax_rate: Decimal,
    social_security_rate: Decimal,
) -> Option<Breakdown> {
    let taxable_income = gross.checked_sub(expenses)?;
    let personal_tax = taxable_income.checked_mul(income_tax_rate)?;
    let social_security = taxable_income.checked_mul(social_security_rate)?;

    Some(Breakdown {
        net_income: taxable_income
            .checked_sub(personal_tax)?
            .checked_sub(social_security)?,
        personal_tax,
        social_security,
        ..Default::default()
    })
}

fn self_employed(
    gross: Decimal,
    expenses: Decimal,
    income_tax_rate: Decimal,
    deduction: Decimal,
) -> Option<Breakdown> {
    // no floor at zero
    let taxable_income = gross.checked_sub(deduction)?.checked_sub(expenses)?;
    let personal_tax = taxable_income.checked_mul(income_tax_rate)?;

    Some(Breakdown {
        net_income: taxable_income.checked_sub(personal_tax)?,
        personal_tax,
        ..Default::default()
    })
}

fn incorporated(
    gross: Decimal,
    expenses: Decimal,
    salary: Salary,
    income_tax_rate: Decimal,
    corporate_tax_rate: Decimal,
    dividend_tax_rate: Option<Decimal>,
    social_security_rate: Decimal,
) -> Option<Breakdown> {
    let salary = match salary {
        Salary::Full => gross,
        Salary::Capped => nl::BV_SALARY_CAP.min(gross.checked_mul(nl::BV_SALARY_SHARE)?),
    };

    let personal_tax = salary.checked_mul(income_tax_rate)?;
    let net_salary = salary.checked_sub(personal_tax)?;
    let corporate_income = gross.checked_sub(salary)?.checked_sub(expenses)?;

    let mut out = Breakdown {
        personal_tax,
        ..Default::default()
    };

    if corporate_income > Decimal::ZERO {
        out.corporate_tax = corporate_income.checked_mul(corporate_tax_rate)?;
        let after_corporate_tax = corporate_income.checked_sub(out.corporate_tax)?;

        let distributed = match dividend_tax_rate {
            Some(rate) => {
                out.dividend_tax = after_corporate_tax.checked_mul(rate)?;
                after_corporate_tax.checked_sub(out.dividend_tax)?
            }
            None => after_corporate_tax,
        };
        out.net_income = net_salary.checked_add(distributed)?;
    } else {
        out.net_income = net_salary;
    }

    out.social_security = salary.checked_mul(social_security_rate)?;
    out.net_income = out.net_income.checked_sub(out.social_security)?;
    Some(out)
}
