//! Scenarios command - the built-in rate table

use crate::money::{format_decimal, format_eur};
use crate::tax::{IncomeMode, BASE_SCENARIOS};
use clap::Args;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use tabled::{settings::Style, Table, Tabled};

#[derive(Args, Debug)]
pub struct ScenariosCommand {}

#[derive(Debug, Tabled)]
struct RateRow {
    #[tabled(rename = "Key")]
    key: &'static str,
    #[tabled(rename = "Scenario")]
    label: &'static str,
    #[tabled(rename = "Income")]
    income: &'static str,
    #[tabled(rename = "Income Tax")]
    income_tax: String,
    #[tabled(rename = "Social Security")]
    social_security: String,
    #[tabled(rename = "Deduction")]
    deduction: String,
    #[tabled(rename = "Corporate Tax")]
    corporate_tax: String,
    #[tabled(rename = "Dividend Tax")]
    dividend_tax: String,
    #[tabled(rename = "Retained")]
    retained: String,
}

impl ScenariosCommand {
    pub fn exec(&self) -> anyhow::Result<()> {
        let rows: Vec<RateRow> = BASE_SCENARIOS
            .iter()
            .map(|base| {
                let rates = base.family.rates();
                RateRow {
                    key: base.kind.key(),
                    label: base.kind.label(),
                    income: match base.kind.default_income_mode() {
                        IncomeMode::Annual => "annual",
                        IncomeMode::Hourly => "hourly",
                    },
                    income_tax: rate(Some(rates.income_tax_rate)),
                    social_security: rate(rates.social_security_rate),
                    deduction: rates
                        .self_employment_deduction
                        .map_or_else(|| "-".to_string(), format_eur),
                    corporate_tax: rate(rates.corporate_tax_rate),
                    dividend_tax: rate(rates.dividend_tax_rate),
                    retained: rate(rates.retained_income_ratio),
                }
            })
            .collect();

        println!("{}", Table::new(rows).with(Style::rounded()));
        println!();
        println!("Hourly income assumes 48 working weeks per year.");
        Ok(())
    }
}

fn rate(rate: Option<Decimal>) -> String {
    rate.map_or_else(|| "-".to_string(), |r| format!("{}%", format_decimal(r * dec!(100))))
}
