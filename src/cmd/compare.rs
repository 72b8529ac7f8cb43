//! Compare command - net income per scenario as a table, CSV or JSON

use super::schema::FieldDoc;
use super::ScenarioArgs;
use crate::money::{format_eur, format_pct};
use crate::tax::{
    compute_all, ComputeError, IncomeInput, RateSheet, ScenarioConfig, ScenarioKind, ScenarioResult,
    Warning,
};
use clap::Args;
use incomec_derive::FieldSchema;
use rust_decimal::Decimal;
use serde::Serialize;
use std::io;
use tabled::{
    settings::{object::Columns, Alignment, Modify, Style},
    Table, Tabled,
};

#[derive(Args, Debug)]
pub struct CompareCommand {
    #[command(flatten)]
    scenarios: ScenarioArgs,

    /// Output as CSV instead of formatted table
    #[arg(long, conflicts_with = "json")]
    csv: bool,

    /// Output as JSON instead of formatted table
    #[arg(long)]
    json: bool,
}

/// A scenario together with its computed breakdown or the reason it failed
#[derive(Debug)]
pub struct Outcome {
    pub config: ScenarioConfig,
    pub result: Result<ScenarioResult, ComputeError>,
}

/// Compute every scenario independently; a failure stays with its scenario
pub fn outcomes(configs: Vec<ScenarioConfig>) -> Vec<Outcome> {
    let results = compute_all(&configs);
    configs
        .into_iter()
        .zip(results)
        .map(|(config, result)| {
            if let Err(ref err) = result {
                log::warn!("{}", err);
            }
            Outcome { config, result }
        })
        .collect()
}

impl CompareCommand {
    pub fn exec(&self) -> anyhow::Result<()> {
        let resolved = self.scenarios.load()?;
        let outcomes = outcomes(resolved.configs);

        if self.json {
            self.print_json(&outcomes, &resolved.warnings)
        } else if self.csv {
            self.write_csv(&outcomes)
        } else {
            self.print_table(&outcomes, &resolved.warnings);
            Ok(())
        }
    }

    fn print_table(&self, outcomes: &[Outcome], warnings: &[Warning]) {
        let rows: Vec<ResultRow> = outcomes.iter().map(ResultRow::from).collect();

        let table = Table::new(&rows)
            .with(Style::rounded())
            .with(Modify::new(Columns::new(1..)).with(Alignment::right()))
            .to_string();
        println!("{}", table);

        let errors: Vec<_> = outcomes
            .iter()
            .filter_map(|o| o.result.as_ref().err())
            .collect();
        if !errors.is_empty() {
            println!();
            println!("Errors:");
            for err in errors {
                println!("  {}", err);
            }
        }

        if !warnings.is_empty() {
            println!();
            println!("Warnings:");
            for warning in warnings {
                println!("  {}", warning);
            }
        }
    }

    fn write_csv(&self, outcomes: &[Outcome]) -> anyhow::Result<()> {
        let mut wtr = csv::Writer::from_writer(io::stdout());
        for outcome in outcomes {
            wtr.serialize(ResultRecord::from(outcome))?;
        }
        wtr.flush()?;
        Ok(())
    }

    fn print_json(&self, outcomes: &[Outcome], warnings: &[Warning]) -> anyhow::Result<()> {
        let data = ComparisonJson {
            generated_at: chrono::Local::now().to_rfc3339(),
            scenarios: outcomes.iter().map(OutcomeJson::from).collect(),
            warnings: warnings
                .iter()
                .map(|w| WarningJson {
                    message: w.to_string(),
                    warning: w,
                })
                .collect(),
        };
        println!("{}", serde_json::to_string_pretty(&data)?);
        Ok(())
    }
}

/// Row for the results table
#[derive(Debug, Clone, Tabled)]
pub struct ResultRow {
    #[tabled(rename = "Scenario")]
    pub scenario: String,
    #[tabled(rename = "Gross Income")]
    pub gross_income: String,
    #[tabled(rename = "Company Expenses")]
    pub company_expenses: String,
    #[tabled(rename = "Net Income")]
    pub net_income: String,
    #[tabled(rename = "Personal Tax")]
    pub personal_tax: String,
    #[tabled(rename = "Corporate Tax")]
    pub corporate_tax: String,
    #[tabled(rename = "Dividend Tax")]
    pub dividend_tax: String,
    #[tabled(rename = "Social Security")]
    pub social_security: String,
    #[tabled(rename = "Retention %")]
    pub retention: String,
}

impl From<&Outcome> for ResultRow {
    fn from(outcome: &Outcome) -> Self {
        let config = &outcome.config;
        let unavailable = || "n/a".to_string();
        let (net, personal, corporate, dividend, social, retention) = match &outcome.result {
            Ok(r) => (
                format_eur(r.net_income),
                format_eur(r.personal_tax),
                format_eur(r.corporate_tax),
                format_eur(r.dividend_tax),
                format_eur(r.social_security),
                format_pct(r.retention_pct),
            ),
            Err(_) => (
                unavailable(),
                unavailable(),
                unavailable(),
                unavailable(),
                unavailable(),
                unavailable(),
            ),
        };

        ResultRow {
            scenario: config.label().to_string(),
            gross_income: config.gross_income.map(format_eur).unwrap_or_else(unavailable),
            company_expenses: format_eur(config.company_expenses),
            net_income: net,
            personal_tax: personal,
            corporate_tax: corporate,
            dividend_tax: dividend,
            social_security: social,
            retention,
        }
    }
}

/// CSV record of one scenario
#[derive(Debug, Clone, Serialize, FieldSchema)]
pub struct ResultRecord {
    /// Scenario identifier (e.g. zzp, bv-capped-salary)
    pub scenario: ScenarioKind,
    /// Display label of the scenario
    pub label: &'static str,
    /// Annual gross income in euro (empty if it does not fit in a decimal)
    pub gross_income: Option<Decimal>,
    /// Company expenses in euro
    pub company_expenses: Decimal,
    /// Net income kept by the individual (empty on error)
    pub net_income: Option<Decimal>,
    /// Income tax on salary or profit (empty on error)
    pub personal_tax: Option<Decimal>,
    /// Corporate tax paid by the BV (empty on error)
    pub corporate_tax: Option<Decimal>,
    /// Dividend tax on distributed profit (empty on error)
    pub dividend_tax: Option<Decimal>,
    /// Social security contributions (empty on error)
    pub social_security: Option<Decimal>,
    /// Net income as a percentage of gross income, two decimals (empty on error)
    pub retention_pct: Option<Decimal>,
    /// Why the scenario could not be computed
    pub error: Option<String>,
}

impl From<&Outcome> for ResultRecord {
    fn from(outcome: &Outcome) -> Self {
        let config = &outcome.config;
        let ok = outcome.result.as_ref().ok();

        ResultRecord {
            scenario: config.kind,
            label: config.label(),
            gross_income: config.gross_income,
            company_expenses: config.company_expenses,
            net_income: ok.map(|r| r.net_income),
            personal_tax: ok.map(|r| r.personal_tax),
            corporate_tax: ok.map(|r| r.corporate_tax),
            dividend_tax: ok.map(|r| r.dividend_tax),
            social_security: ok.map(|r| r.social_security),
            retention_pct: ok.map(|r| r.retention_pct.round_dp(2)),
            error: outcome.result.as_ref().err().map(|e| e.to_string()),
        }
    }
}

#[derive(Serialize)]
struct ComparisonJson<'a> {
    generated_at: String,
    scenarios: Vec<OutcomeJson<'a>>,
    warnings: Vec<WarningJson<'a>>,
}

#[derive(Serialize)]
struct OutcomeJson<'a> {
    scenario: ScenarioKind,
    label: &'static str,
    income: IncomeInput,
    rates: RateSheet,
    #[serde(skip_serializing_if = "Option::is_none")]
    result: Option<&'a ScenarioResult>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

impl<'a> From<&'a Outcome> for OutcomeJson<'a> {
    fn from(outcome: &'a Outcome) -> Self {
        OutcomeJson {
            scenario: outcome.config.kind,
            label: outcome.config.label(),
            income: outcome.config.income,
            rates: outcome.config.family.rates(),
            result: outcome.result.as_ref().ok(),
            error: outcome.result.as_ref().err().map(|e| e.to_string()),
        }
    }
}

#[derive(Serialize)]
struct WarningJson<'a> {
    message: String,
    #[serde(flatten)]
    warning: &'a Warning,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn zero_gross_regular() -> ScenarioConfig {
        let mut config = ScenarioConfig::default_for(ScenarioKind::RegularSalary);
        config.income = IncomeInput::Annual {
            gross_income: Decimal::ZERO,
        };
        config.gross_income = Some(Decimal::ZERO);
        config
    }

    #[test]
    fn failed_scenario_keeps_its_row() {
        let outcomes = outcomes(vec![
            zero_gross_regular(),
            ScenarioConfig::default_for(ScenarioKind::Zzp),
        ]);

        let failed = ResultRow::from(&outcomes[0]);
        assert_eq!(failed.scenario, "Regular Salary");
        assert_eq!(failed.gross_income, "€0.00");
        assert_eq!(failed.net_income, "n/a");

        let ok = ResultRow::from(&outcomes[1]);
        assert_eq!(ok.net_income, "€102,862.29");
        assert_eq!(ok.retention, "59.5%");
    }

    #[test]
    fn overflowing_gross_income_keeps_its_row() {
        let mut config = ScenarioConfig::default_for(ScenarioKind::Zzp);
        config.income = IncomeInput::Hourly {
            hourly_rate: dec!(100000000000000000000),
            hours_per_week: dec!(10000000000),
        };
        config.gross_income = config.income.gross_income();

        let outcomes = outcomes(vec![
            config,
            ScenarioConfig::default_for(ScenarioKind::RegularSalary),
        ]);

        let failed = ResultRow::from(&outcomes[0]);
        assert_eq!(failed.gross_income, "n/a");
        assert_eq!(failed.net_income, "n/a");

        let record = ResultRecord::from(&outcomes[0]);
        assert_eq!(record.gross_income, None);
        assert!(record.error.unwrap().contains("too large"));

        assert_eq!(ResultRow::from(&outcomes[1]).net_income, "€80,550.00");
    }

    #[test]
    fn record_carries_error_message() {
        let outcomes = outcomes(vec![zero_gross_regular()]);
        let record = ResultRecord::from(&outcomes[0]);

        assert_eq!(record.net_income, None);
        assert!(record.error.unwrap().contains("gross income is zero"));
    }

    #[test]
    fn record_rounds_retention() {
        let outcomes = outcomes(vec![ScenarioConfig::default_for(ScenarioKind::Zzp)]);
        let record = ResultRecord::from(&outcomes[0]);

        // 102862.287 / 172800
        assert_eq!(record.retention_pct, Some(dec!(59.53)));
        assert_eq!(record.error, None);
    }

    #[test]
    fn record_schema_lists_every_column() {
        let names: Vec<_> = ResultRecord::field_schema().iter().map(|f| f.name).collect();
        assert_eq!(names.first(), Some(&"scenario"));
        assert_eq!(names.last(), Some(&"error"));
        assert_eq!(names.len(), 11);

        let net = ResultRecord::field_schema()
            .iter()
            .find(|f| f.name == "net_income")
            .unwrap();
        assert!(!net.required);
    }
}
