use rust_decimal::Decimal;
use rust_decimal_macros::dec;

/// Working weeks assumed per year when deriving gross income from an hourly rate
pub const WORK_WEEKS_PER_YEAR: Decimal = dec!(48);

/// Salary ceiling for the capped BV variants
pub const BV_SALARY_CAP: Decimal = dec!(60000);

/// Share of gross income paid out as salary in the capped BV variants
pub const BV_SALARY_SHARE: Decimal = dec!(0.4);

// 2023 figures, simplified to flat rates

/// Income tax on salary (box 1, top band)
pub const INCOME_TAX_RATE: Decimal = dec!(0.3961);

/// Income tax applied when employed through a payroll agency
pub const PAYROLLING_INCOME_TAX_RATE: Decimal = dec!(0.4665);

/// Employee social security contributions
pub const SOCIAL_SECURITY_RATE: Decimal = dec!(0.0669);

/// Flat self-employment deduction (zelfstandigenaftrek)
pub const SELF_EMPLOYMENT_DEDUCTION: Decimal = dec!(2470);

/// Corporate income tax (vennootschapsbelasting)
pub const CORPORATE_TAX_RATE: Decimal = dec!(0.25);

/// Dividend tax on distributed profit (box 2)
pub const DIVIDEND_TAX_RATE: Decimal = dec!(0.25);

/// Share of BV profit assumed to stay in the company
pub const RETAINED_INCOME_RATIO: Decimal = dec!(0.6);

/// Inclusive range an input value is expected to fall in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Bounds {
    pub min: Decimal,
    pub max: Decimal,
}

impl Bounds {
    const fn new(min: Decimal, max: Decimal) -> Self {
        Bounds { min, max }
    }

    pub fn contains(&self, value: Decimal) -> bool {
        value >= self.min && value <= self.max
    }
}

pub const GROSS_INCOME_BOUNDS: Bounds = Bounds::new(dec!(50000), dec!(500000));
pub const HOURLY_RATE_BOUNDS: Bounds = Bounds::new(dec!(20), dec!(500));
pub const HOURS_PER_WEEK_BOUNDS: Bounds = Bounds::new(dec!(1), dec!(60));
pub const COMPANY_EXPENSES_BOUNDS: Bounds = Bounds::new(dec!(0), dec!(100000));

pub const DEFAULT_GROSS_INCOME: Decimal = dec!(150000);
pub const DEFAULT_HOURLY_RATE: Decimal = dec!(100);
pub const DEFAULT_HOURS_PER_WEEK: Decimal = dec!(36);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bounds_are_inclusive() {
        assert!(HOURS_PER_WEEK_BOUNDS.contains(dec!(1)));
        assert!(HOURS_PER_WEEK_BOUNDS.contains(dec!(60)));
        assert!(!HOURS_PER_WEEK_BOUNDS.contains(dec!(60.5)));
        assert!(!COMPANY_EXPENSES_BOUNDS.contains(dec!(-1)));
    }

    #[test]
    fn defaults_fall_within_bounds() {
        assert!(GROSS_INCOME_BOUNDS.contains(DEFAULT_GROSS_INCOME));
        assert!(HOURLY_RATE_BOUNDS.contains(DEFAULT_HOURLY_RATE));
        assert!(HOURS_PER_WEEK_BOUNDS.contains(DEFAULT_HOURS_PER_WEEK));
    }
}
