use super::nl;
use super::warnings::Warning;
use rust_decimal::Decimal;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;

/// The six employment/tax structures being compared.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "kebab-case")]
pub enum ScenarioKind {
    /// Salaried employee
    #[serde(alias = "regular")]
    RegularSalary,
    /// Self-employed sole proprietor
    #[serde(alias = "self-employed")]
    Zzp,
    /// Own BV paying out everything as salary
    BvFullSalary,
    /// Own BV paying a salary of at most €60k, profit taxed in the company
    BvCappedSalary,
    /// As `BvCappedSalary`, with the remaining profit paid out as dividend
    BvCappedSalaryDividend,
    /// Employed through a payroll agency, no own company
    Payrolling,
}

impl ScenarioKind {
    pub const ALL: [ScenarioKind; 6] = [
        ScenarioKind::RegularSalary,
        ScenarioKind::Zzp,
        ScenarioKind::BvFullSalary,
        ScenarioKind::BvCappedSalary,
        ScenarioKind::BvCappedSalaryDividend,
        ScenarioKind::Payrolling,
    ];

    /// Display label, as shown in tables and the chart
    pub fn label(&self) -> &'static str {
        match self {
            ScenarioKind::RegularSalary => "Regular Salary",
            ScenarioKind::Zzp => "ZZP (Self-employed)",
            ScenarioKind::BvFullSalary => "BV with Full Salary",
            ScenarioKind::BvCappedSalary => "BV with €60k Salary",
            ScenarioKind::BvCappedSalaryDividend => "BV with €60k + Dividend",
            ScenarioKind::Payrolling => "Payrolling[No BV]",
        }
    }

    /// How gross income is entered for this scenario unless the input says otherwise
    pub fn default_income_mode(&self) -> IncomeMode {
        match self {
            ScenarioKind::RegularSalary => IncomeMode::Annual,
            _ => IncomeMode::Hourly,
        }
    }

    /// Identifier used on the command line and in input files
    pub fn key(&self) -> &'static str {
        match self {
            ScenarioKind::RegularSalary => "regular-salary",
            ScenarioKind::Zzp => "zzp",
            ScenarioKind::BvFullSalary => "bv-full-salary",
            ScenarioKind::BvCappedSalary => "bv-capped-salary",
            ScenarioKind::BvCappedSalaryDividend => "bv-capped-salary-dividend",
            ScenarioKind::Payrolling => "payrolling",
        }
    }
}

impl fmt::Display for ScenarioKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IncomeMode {
    Annual,
    Hourly,
}

/// Rate parameters per scenario. Each variant carries only what its formula uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScenarioFamily {
    Regular {
        income_tax_rate: Decimal,
        social_security_rate: Option<Decimal>,
    },
    SelfEmployed {
        income_tax_rate: Decimal,
        self_employment_deduction: Decimal,
    },
    IncorporatedFullSalary {
        income_tax_rate: Decimal,
        social_security_rate: Option<Decimal>,
    },
    IncorporatedCappedSalary {
        income_tax_rate: Decimal,
        corporate_tax_rate: Decimal,
        social_security_rate: Option<Decimal>,
        /// Informational only, not used in the computation
        retained_income_ratio: Option<Decimal>,
    },
    IncorporatedCappedSalaryWithDividend {
        income_tax_rate: Decimal,
        corporate_tax_rate: Decimal,
        dividend_tax_rate: Decimal,
        social_security_rate: Option<Decimal>,
        /// Informational only, not used in the computation
        retained_income_ratio: Option<Decimal>,
    },
    /// Computed like `IncorporatedFullSalary`: the whole gross is salary and
    /// company expenses do not reduce the taxable base.
    Payrolling {
        income_tax_rate: Decimal,
        social_security_rate: Option<Decimal>,
    },
}

/// Flat view of the rates of a scenario, absent where the family has no such rate.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct RateSheet {
    pub income_tax_rate: Decimal,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub social_security_rate: Option<Decimal>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub self_employment_deduction: Option<Decimal>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub corporate_tax_rate: Option<Decimal>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dividend_tax_rate: Option<Decimal>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub retained_income_ratio: Option<Decimal>,
}

/// Rate values replacing those of the base table.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(deny_unknown_fields)]
pub struct RateOverrides {
    /// Income tax rate as a fraction (e.g. 0.3961)
    #[serde(default)]
    #[schemars(with = "Option<f64>")]
    pub income_tax_rate: Option<Decimal>,
    /// Social security rate as a fraction
    #[serde(default)]
    #[schemars(with = "Option<f64>")]
    pub social_security_rate: Option<Decimal>,
    /// Flat self-employment deduction in euro (ZZP only)
    #[serde(default)]
    #[schemars(with = "Option<f64>")]
    pub self_employment_deduction: Option<Decimal>,
    /// Corporate tax rate as a fraction (capped BV variants only)
    #[serde(default)]
    #[schemars(with = "Option<f64>")]
    pub corporate_tax_rate: Option<Decimal>,
    /// Dividend tax rate as a fraction (dividend variant only)
    #[serde(default)]
    #[schemars(with = "Option<f64>")]
    pub dividend_tax_rate: Option<Decimal>,
    /// Retained income ratio (capped BV variants only, informational)
    #[serde(default)]
    #[schemars(with = "Option<f64>")]
    pub retained_income_ratio: Option<Decimal>,
}

impl ScenarioFamily {
    pub fn rates(&self) -> RateSheet {
        match *self {
            ScenarioFamily::Regular {
                income_tax_rate,
                social_security_rate,
            }
            | ScenarioFamily::IncorporatedFullSalary {
                income_tax_rate,
                social_security_rate,
            }
            | ScenarioFamily::Payrolling {
                income_tax_rate,
                social_security_rate,
            } => RateSheet {
                income_tax_rate,
                social_security_rate,
                ..Default::default()
            },
            ScenarioFamily::SelfEmployed {
                income_tax_rate,
                self_employment_deduction,
            } => RateSheet {
                income_tax_rate,
                self_employment_deduction: Some(self_employment_deduction),
                ..Default::default()
            },
            ScenarioFamily::IncorporatedCappedSalary {
                income_tax_rate,
                corporate_tax_rate,
                social_security_rate,
                retained_income_ratio,
            } => RateSheet {
                income_tax_rate,
                social_security_rate,
                corporate_tax_rate: Some(corporate_tax_rate),
                retained_income_ratio,
                ..Default::default()
            },
            ScenarioFamily::IncorporatedCappedSalaryWithDividend {
                income_tax_rate,
                corporate_tax_rate,
                dividend_tax_rate,
                social_security_rate,
                retained_income_ratio,
            } => RateSheet {
                income_tax_rate,
                social_security_rate,
                self_employment_deduction: None,
                corporate_tax_rate: Some(corporate_tax_rate),
                dividend_tax_rate: Some(dividend_tax_rate),
                retained_income_ratio,
            },
        }
    }

    /// Replace rates with the given overrides. Overrides naming a rate this
    /// family does not have are returned as warnings and otherwise ignored.
    pub fn with_overrides(
        self,
        kind: ScenarioKind,
        overrides: &RateOverrides,
    ) -> (ScenarioFamily, Vec<Warning>) {
        let mut family = self;
        let mut warnings = Vec::new();

        if let Some(rate) = overrides.income_tax_rate {
            match &mut family {
                ScenarioFamily::Regular { income_tax_rate, .. }
                | ScenarioFamily::SelfEmployed { income_tax_rate, .. }
                | ScenarioFamily::IncorporatedFullSalary { income_tax_rate, .. }
                | ScenarioFamily::IncorporatedCappedSalary { income_tax_rate, .. }
                | ScenarioFamily::IncorporatedCappedSalaryWithDividend {
                    income_tax_rate, ..
                }
                | ScenarioFamily::Payrolling { income_tax_rate, .. } => *income_tax_rate = rate,
            }
        }

        if let Some(rate) = overrides.social_security_rate {
            match &mut family {
                ScenarioFamily::Regular {
                    social_security_rate,
                    ..
                }
                | ScenarioFamily::IncorporatedFullSalary {
                    social_security_rate,
                    ..
                }
                | ScenarioFamily::IncorporatedCappedSalary {
                    social_security_rate,
                    ..
                }
                | ScenarioFamily::IncorporatedCappedSalaryWithDividend {
                    social_security_rate,
                    ..
                }
                | ScenarioFamily::Payrolling {
                    social_security_rate,
                    ..
                } => *social_security_rate = Some(rate),
                ScenarioFamily::SelfEmployed { .. } => {
                    warnings.push(ignored(kind, "social_security_rate"))
                }
            }
        }

        if let Some(amount) = overrides.self_employment_deduction {
            match &mut family {
                ScenarioFamily::SelfEmployed {
                    self_employment_deduction,
                    ..
                } => *self_employment_deduction = amount,
                _ => warnings.push(ignored(kind, "self_employment_deduction")),
            }
        }

        if let Some(rate) = overrides.corporate_tax_rate {
            match &mut family {
                ScenarioFamily::IncorporatedCappedSalary {
                    corporate_tax_rate, ..
                }
                | ScenarioFamily::IncorporatedCappedSalaryWithDividend {
                    corporate_tax_rate, ..
                } => *corporate_tax_rate = rate,
                _ => warnings.push(ignored(kind, "corporate_tax_rate")),
            }
        }

        if let Some(rate) = overrides.dividend_tax_rate {
            match &mut family {
                ScenarioFamily::IncorporatedCappedSalaryWithDividend {
                    dividend_tax_rate, ..
                } => *dividend_tax_rate = rate,
                _ => warnings.push(ignored(kind, "dividend_tax_rate")),
            }
        }

        if let Some(ratio) = overrides.retained_income_ratio {
            match &mut family {
                ScenarioFamily::IncorporatedCappedSalary {
                    retained_income_ratio,
                    ..
                }
                | ScenarioFamily::IncorporatedCappedSalaryWithDividend {
                    retained_income_ratio,
                    ..
                } => *retained_income_ratio = Some(ratio),
                _ => warnings.push(ignored(kind, "retained_income_ratio")),
            }
        }

        (family, warnings)
    }
}

fn ignored(scenario: ScenarioKind, field: &'static str) -> Warning {
    Warning::IgnoredRateOverride { scenario, field }
}

/// Entry of the fixed scenario table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BaseScenario {
    pub kind: ScenarioKind,
    pub family: ScenarioFamily,
}

/// The base definitions of all scenarios, in display order.
pub static BASE_SCENARIOS: [BaseScenario; 6] = [
    BaseScenario {
        kind: ScenarioKind::RegularSalary,
        family: ScenarioFamily::Regular {
            income_tax_rate: nl::INCOME_TAX_RATE,
            social_security_rate: Some(nl::SOCIAL_SECURITY_RATE),
        },
    },
    BaseScenario {
        kind: ScenarioKind::Zzp,
        family: ScenarioFamily::SelfEmployed {
            income_tax_rate: nl::INCOME_TAX_RATE,
            self_employment_deduction: nl::SELF_EMPLOYMENT_DEDUCTION,
        },
    },
    BaseScenario {
        kind: ScenarioKind::BvFullSalary,
        family: ScenarioFamily::IncorporatedFullSalary {
            income_tax_rate: nl::INCOME_TAX_RATE,
            social_security_rate: Some(nl::SOCIAL_SECURITY_RATE),
        },
    },
    BaseScenario {
        kind: ScenarioKind::BvCappedSalary,
        family: ScenarioFamily::IncorporatedCappedSalary {
            income_tax_rate: nl::INCOME_TAX_RATE,
            corporate_tax_rate: nl::CORPORATE_TAX_RATE,
            social_security_rate: Some(nl::SOCIAL_SECURITY_RATE),
            retained_income_ratio: Some(nl::RETAINED_INCOME_RATIO),
        },
    },
    BaseScenario {
        kind: ScenarioKind::BvCappedSalaryDividend,
        family: ScenarioFamily::IncorporatedCappedSalaryWithDividend {
            income_tax_rate: nl::INCOME_TAX_RATE,
            corporate_tax_rate: nl::CORPORATE_TAX_RATE,
            dividend_tax_rate: nl::DIVIDEND_TAX_RATE,
            social_security_rate: Some(nl::SOCIAL_SECURITY_RATE),
            retained_income_ratio: Some(nl::RETAINED_INCOME_RATIO),
        },
    },
    BaseScenario {
        kind: ScenarioKind::Payrolling,
        family: ScenarioFamily::Payrolling {
            income_tax_rate: nl::PAYROLLING_INCOME_TAX_RATE,
            social_security_rate: Some(nl::SOCIAL_SECURITY_RATE),
        },
    },
];

impl BaseScenario {
    pub fn get(kind: ScenarioKind) -> &'static BaseScenario {
        // the table holds every kind, in `ScenarioKind::ALL` order
        &BASE_SCENARIOS[kind as usize]
    }
}

/// How gross income was entered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "mode", rename_all = "lowercase")]
pub enum IncomeInput {
    Annual {
        gross_income: Decimal,
    },
    Hourly {
        hourly_rate: Decimal,
        hours_per_week: Decimal,
    },
}

impl IncomeInput {
    pub fn default_for(kind: ScenarioKind) -> Self {
        match kind.default_income_mode() {
            IncomeMode::Annual => IncomeInput::Annual {
                gross_income: nl::DEFAULT_GROSS_INCOME,
            },
            IncomeMode::Hourly => IncomeInput::Hourly {
                hourly_rate: nl::DEFAULT_HOURLY_RATE,
                hours_per_week: nl::DEFAULT_HOURS_PER_WEEK,
            },
        }
    }

    /// Annual gross income; hourly input assumes a 48 week working year.
    /// `None` if the annual amount overflows.
    pub fn gross_income(&self) -> Option<Decimal> {
        match *self {
            IncomeInput::Annual { gross_income } => Some(gross_income),
            IncomeInput::Hourly {
                hourly_rate,
                hours_per_week,
            } => hourly_rate
                .checked_mul(hours_per_week)?
                .checked_mul(nl::WORK_WEEKS_PER_YEAR),
        }
    }
}

/// A fully resolved scenario, ready to be computed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScenarioConfig {
    pub kind: ScenarioKind,
    pub family: ScenarioFamily,
    pub income: IncomeInput,
    /// Derived from `income`; `None` if it does not fit in a `Decimal`
    pub gross_income: Option<Decimal>,
    pub company_expenses: Decimal,
}

impl ScenarioConfig {
    /// Build a scenario from its family, income input and expenses. No bounds
    /// are enforced here.
    pub fn build(
        kind: ScenarioKind,
        family: ScenarioFamily,
        income: IncomeInput,
        company_expenses: Decimal,
    ) -> Self {
        ScenarioConfig {
            kind,
            family,
            income,
            gross_income: income.gross_income(),
            company_expenses,
        }
    }

    /// The base scenario with default income and no expenses
    #[cfg(test)]
    pub fn default_for(kind: ScenarioKind) -> Self {
        let base = BaseScenario::get(kind);
        ScenarioConfig::build(kind, base.family, IncomeInput::default_for(kind), Decimal::ZERO)
    }

    pub fn label(&self) -> &'static str {
        self.kind.label()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn base_table_follows_kind_order() {
        for (idx, kind) in ScenarioKind::ALL.iter().enumerate() {
            assert_eq!(BASE_SCENARIOS[idx].kind, *kind);
            assert_eq!(BaseScenario::get(*kind).kind, *kind);
        }
    }

    #[test]
    fn hourly_income_uses_48_weeks() {
        let income = IncomeInput::Hourly {
            hourly_rate: dec!(100),
            hours_per_week: dec!(36),
        };
        assert_eq!(income.gross_income(), Some(dec!(172800)));
    }

    #[test]
    fn hourly_income_overflow_is_none() {
        let income = IncomeInput::Hourly {
            hourly_rate: dec!(100000000000000000000),
            hours_per_week: dec!(10000000000),
        };
        assert_eq!(income.gross_income(), None);

        let config = ScenarioConfig::build(
            ScenarioKind::Zzp,
            BaseScenario::get(ScenarioKind::Zzp).family,
            income,
            Decimal::ZERO,
        );
        assert_eq!(config.gross_income, None);
    }

    #[test]
    fn defaults_follow_income_mode() {
        let regular = ScenarioConfig::default_for(ScenarioKind::RegularSalary);
        assert_eq!(regular.gross_income, Some(dec!(150000)));
        assert!(matches!(regular.income, IncomeInput::Annual { .. }));

        let zzp = ScenarioConfig::default_for(ScenarioKind::Zzp);
        assert_eq!(zzp.gross_income, Some(dec!(172800)));
        assert_eq!(zzp.company_expenses, Decimal::ZERO);
    }

    #[test]
    fn zzp_has_no_social_security_rate() {
        let rates = BaseScenario::get(ScenarioKind::Zzp).family.rates();
        assert_eq!(rates.social_security_rate, None);
        assert_eq!(rates.self_employment_deduction, Some(dec!(2470)));
    }

    #[test]
    fn overrides_replace_matching_rates() {
        let base = BaseScenario::get(ScenarioKind::BvCappedSalaryDividend);
        let overrides = RateOverrides {
            dividend_tax_rate: Some(dec!(0.245)),
            income_tax_rate: Some(dec!(0.37)),
            ..Default::default()
        };

        let (family, warnings) = base.family.with_overrides(base.kind, &overrides);
        assert!(warnings.is_empty());
        let rates = family.rates();
        assert_eq!(rates.dividend_tax_rate, Some(dec!(0.245)));
        assert_eq!(rates.income_tax_rate, dec!(0.37));
        assert_eq!(rates.corporate_tax_rate, Some(dec!(0.25)));
    }

    #[test]
    fn overrides_for_missing_rates_are_reported() {
        let base = BaseScenario::get(ScenarioKind::Zzp);
        let overrides = RateOverrides {
            social_security_rate: Some(dec!(0.1)),
            corporate_tax_rate: Some(dec!(0.2)),
            ..Default::default()
        };

        let (family, warnings) = base.family.with_overrides(base.kind, &overrides);
        assert_eq!(family, base.family);
        assert_eq!(
            warnings,
            vec![
                Warning::IgnoredRateOverride {
                    scenario: ScenarioKind::Zzp,
                    field: "social_security_rate",
                },
                Warning::IgnoredRateOverride {
                    scenario: ScenarioKind::Zzp,
                    field: "corporate_tax_rate",
                },
            ]
        );
    }
}
