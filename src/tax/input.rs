use super::nl::{self, Bounds};
use super::scenario::{BaseScenario, IncomeInput, RateOverrides, ScenarioConfig, ScenarioKind};
use super::warnings::Warning;
use rust_decimal::Decimal;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::io::Read;

#[derive(Debug, thiserror::Error)]
pub enum InputError {
    #[error("invalid input JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("scenario listed more than once: {0}")]
    DuplicateScenario(ScenarioKind),
    #[error("{0}: give either gross_income or hourly_rate/hours_per_week, not both")]
    ConflictingIncome(ScenarioKind),
    #[error("{0}: hourly_rate and hours_per_week must be given together")]
    IncompleteHourly(ScenarioKind),
}

/// Input root for scenario JSON
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
#[serde(deny_unknown_fields)]
pub struct InputFile {
    /// Per-scenario inputs; scenarios not listed use the defaults
    #[serde(default)]
    pub scenarios: Vec<ScenarioInput>,
}

/// Inputs for one scenario
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
#[serde(deny_unknown_fields)]
pub struct ScenarioInput {
    /// Which scenario these inputs apply to
    pub scenario: ScenarioKind,
    /// Annual gross income in euro
    #[serde(default)]
    #[schemars(with = "Option<f64>")]
    pub gross_income: Option<Decimal>,
    /// Hourly rate in euro; annual income assumes 48 working weeks
    #[serde(default)]
    #[schemars(with = "Option<f64>")]
    pub hourly_rate: Option<Decimal>,
    /// Hours worked per week
    #[serde(default)]
    #[schemars(with = "Option<f64>")]
    pub hours_per_week: Option<Decimal>,
    /// Additional company expenses in euro
    #[serde(default)]
    #[schemars(with = "Option<f64>")]
    pub company_expenses: Option<Decimal>,
    /// Replacement rates for this scenario
    #[serde(default)]
    pub rates: Option<RateOverrides>,
}

pub fn read_input_json<R: Read>(reader: R) -> Result<InputFile, InputError> {
    Ok(serde_json::from_reader(reader)?)
}

/// Values applied to every scenario on top of the input file.
#[derive(Debug, Clone, Copy, Default)]
pub struct InputOverrides {
    /// Only applies to scenarios with annual income
    pub gross_income: Option<Decimal>,
    /// Only applies to scenarios with hourly income
    pub hourly_rate: Option<Decimal>,
    /// Only applies to scenarios with hourly income
    pub hours_per_week: Option<Decimal>,
    pub company_expenses: Option<Decimal>,
}

/// Scenarios ready to compute, with any findings about their inputs
#[derive(Debug, Clone)]
pub struct Resolved {
    pub configs: Vec<ScenarioConfig>,
    pub warnings: Vec<Warning>,
}

/// Merge defaults, the input file and the overrides into scenario configs, in
/// display order. An empty `only` selects every scenario.
pub fn resolve(
    input: &InputFile,
    overrides: &InputOverrides,
    only: &[ScenarioKind],
) -> Result<Resolved, InputError> {
    let mut seen = HashSet::new();
    for entry in &input.scenarios {
        if !seen.insert(entry.scenario) {
            return Err(InputError::DuplicateScenario(entry.scenario));
        }
    }

    let mut configs = Vec::new();
    let mut warnings = Vec::new();

    for kind in ScenarioKind::ALL {
        if !only.is_empty() && !only.contains(&kind) {
            continue;
        }

        let entry = input.scenarios.iter().find(|s| s.scenario == kind);
        let income = apply_income_overrides(income_for(kind, entry)?, overrides);
        let company_expenses = overrides
            .company_expenses
            .or(entry.and_then(|e| e.company_expenses))
            .unwrap_or(Decimal::ZERO);

        let base = BaseScenario::get(kind);
        let family = match entry.and_then(|e| e.rates.as_ref()) {
            Some(rates) => {
                let (family, ignored) = base.family.with_overrides(kind, rates);
                warnings.extend(ignored);
                family
            }
            None => base.family,
        };

        warnings.extend(check_bounds(kind, &income, company_expenses));
        configs.push(ScenarioConfig::build(kind, family, income, company_expenses));
    }

    for warning in &warnings {
        log::warn!("{}", warning);
    }

    Ok(Resolved { configs, warnings })
}

fn income_for(kind: ScenarioKind, entry: Option<&ScenarioInput>) -> Result<IncomeInput, InputError> {
    let Some(entry) = entry else {
        return Ok(IncomeInput::default_for(kind));
    };

    match (entry.gross_income, entry.hourly_rate, entry.hours_per_week) {
        (Some(_), Some(_), _) | (Some(_), _, Some(_)) => Err(InputError::ConflictingIncome(kind)),
        (Some(gross_income), None, None) => Ok(IncomeInput::Annual { gross_income }),
        (None, Some(hourly_rate), Some(hours_per_week)) => Ok(IncomeInput::Hourly {
            hourly_rate,
            hours_per_week,
        }),
        (None, Some(_), None) | (None, None, Some(_)) => Err(InputError::IncompleteHourly(kind)),
        (None, None, None) => Ok(IncomeInput::default_for(kind)),
    }
}

fn apply_income_overrides(income: IncomeInput, overrides: &InputOverrides) -> IncomeInput {
    match income {
        IncomeInput::Annual { gross_income } => IncomeInput::Annual {
            gross_income: overrides.gross_income.unwrap_or(gross_income),
        },
        IncomeInput::Hourly {
            hourly_rate,
            hours_per_week,
        } => IncomeInput::Hourly {
            hourly_rate: overrides.hourly_rate.unwrap_or(hourly_rate),
            hours_per_week: overrides.hours_per_week.unwrap_or(hours_per_week),
        },
    }
}

fn check_bounds(kind: ScenarioKind, income: &IncomeInput, company_expenses: Decimal) -> Vec<Warning> {
    let mut checks: Vec<(&'static str, Decimal, Bounds)> = match *income {
        IncomeInput::Annual { gross_income } => {
            vec![("gross_income", gross_income, nl::GROSS_INCOME_BOUNDS)]
        }
        IncomeInput::Hourly {
            hourly_rate,
            hours_per_week,
        } => vec![
            ("hourly_rate", hourly_rate, nl::HOURLY_RATE_BOUNDS),
            ("hours_per_week", hours_per_week, nl::HOURS_PER_WEEK_BOUNDS),
        ],
    };
    checks.push(("company_expenses", company_expenses, nl::COMPANY_EXPENSES_BOUNDS));

    checks
        .into_iter()
        .filter(|(_, value, bounds)| !bounds.contains(*value))
        .map(|(field, value, bounds)| Warning::OutOfRange {
            scenario: kind,
            field,
            value,
            min: bounds.min,
            max: bounds.max,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn parse(json: &str) -> InputFile {
        read_input_json(json.as_bytes()).unwrap()
    }

    #[test]
    fn defaults_cover_all_scenarios() {
        let resolved = resolve(&InputFile::default(), &InputOverrides::default(), &[]).unwrap();

        assert_eq!(resolved.configs.len(), 6);
        assert!(resolved.warnings.is_empty());
        assert_eq!(resolved.configs[0].gross_income, Some(dec!(150000)));
        assert!(resolved.configs[1..]
            .iter()
            .all(|c| c.gross_income == Some(dec!(172800))));
    }

    #[test]
    fn file_entries_replace_defaults() {
        let input = parse(
            r#"{"scenarios": [
                {"scenario": "zzp", "hourly_rate": 110, "hours_per_week": 32, "company_expenses": 5000},
                {"scenario": "bv-full-salary", "gross_income": 120000}
            ]}"#,
        );
        let resolved = resolve(&input, &InputOverrides::default(), &[]).unwrap();

        let zzp = &resolved.configs[1];
        assert_eq!(zzp.gross_income, Some(dec!(168960)));
        assert_eq!(zzp.company_expenses, dec!(5000));

        let bv = &resolved.configs[2];
        assert_eq!(bv.gross_income, Some(dec!(120000)));
    }

    #[test]
    fn overrides_apply_by_income_mode() {
        let overrides = InputOverrides {
            gross_income: Some(dec!(90000)),
            hours_per_week: Some(dec!(40)),
            company_expenses: Some(dec!(1000)),
            ..Default::default()
        };
        let resolved = resolve(&InputFile::default(), &overrides, &[]).unwrap();

        assert_eq!(resolved.configs[0].gross_income, Some(dec!(90000)));
        // 100 * 40 * 48
        assert_eq!(resolved.configs[3].gross_income, Some(dec!(192000)));
        assert!(resolved
            .configs
            .iter()
            .all(|c| c.company_expenses == dec!(1000)));
    }

    #[test]
    fn only_selects_scenarios_in_display_order() {
        let only = [ScenarioKind::Payrolling, ScenarioKind::RegularSalary];
        let resolved = resolve(&InputFile::default(), &InputOverrides::default(), &only).unwrap();

        let kinds: Vec<_> = resolved.configs.iter().map(|c| c.kind).collect();
        assert_eq!(kinds, vec![ScenarioKind::RegularSalary, ScenarioKind::Payrolling]);
    }

    #[test]
    fn out_of_range_values_warn_but_are_kept() {
        let input = parse(r#"{"scenarios": [{"scenario": "regular-salary", "gross_income": 0}]}"#);
        let resolved = resolve(&input, &InputOverrides::default(), &[]).unwrap();

        assert_eq!(resolved.configs[0].gross_income, Some(Decimal::ZERO));
        assert_eq!(
            resolved.warnings,
            vec![Warning::OutOfRange {
                scenario: ScenarioKind::RegularSalary,
                field: "gross_income",
                value: Decimal::ZERO,
                min: dec!(50000),
                max: dec!(500000),
            }]
        );
    }

    #[test]
    fn huge_hourly_values_resolve_without_gross_income() {
        let overrides = InputOverrides {
            hourly_rate: Some(dec!(100000000000000000000)),
            hours_per_week: Some(dec!(10000000000)),
            ..Default::default()
        };
        let resolved = resolve(&InputFile::default(), &overrides, &[]).unwrap();

        assert_eq!(resolved.configs.len(), 6);
        assert_eq!(resolved.configs[0].gross_income, Some(dec!(150000)));
        assert!(resolved.configs[1..].iter().all(|c| c.gross_income.is_none()));
        // hourly_rate and hours_per_week for each of the five hourly scenarios
        assert_eq!(resolved.warnings.len(), 10);
    }

    #[test]
    fn rate_overrides_are_applied() {
        let input = parse(
            r#"{"scenarios": [{"scenario": "payrolling", "rates": {"income_tax_rate": 0.4}}]}"#,
        );
        let resolved = resolve(&input, &InputOverrides::default(), &[]).unwrap();

        assert_eq!(resolved.configs[5].family.rates().income_tax_rate, dec!(0.4));
    }

    #[test]
    fn duplicate_scenario_is_rejected() {
        let input = parse(r#"{"scenarios": [{"scenario": "zzp"}, {"scenario": "zzp"}]}"#);
        let err = resolve(&input, &InputOverrides::default(), &[]).unwrap_err();
        assert!(matches!(err, InputError::DuplicateScenario(ScenarioKind::Zzp)));
    }

    #[test]
    fn incomplete_or_conflicting_income_is_rejected() {
        let input = parse(r#"{"scenarios": [{"scenario": "zzp", "hourly_rate": 80}]}"#);
        assert!(matches!(
            resolve(&input, &InputOverrides::default(), &[]),
            Err(InputError::IncompleteHourly(ScenarioKind::Zzp))
        ));

        let input = parse(
            r#"{"scenarios": [{"scenario": "zzp", "gross_income": 80000, "hours_per_week": 40}]}"#,
        );
        assert!(matches!(
            resolve(&input, &InputOverrides::default(), &[]),
            Err(InputError::ConflictingIncome(ScenarioKind::Zzp))
        ));
    }

    #[test]
    fn unknown_fields_are_rejected() {
        let err = read_input_json(r#"{"scenarios": [{"scenario": "zzp", "salary": 1}]}"#.as_bytes());
        assert!(matches!(err, Err(InputError::Json(_))));
    }
}
