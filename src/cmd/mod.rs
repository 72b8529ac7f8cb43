pub mod compare;
pub mod html_report;
pub mod scenarios;
pub mod schema;

use crate::tax::{self, InputFile, InputOverrides, Resolved, ScenarioKind};
use anyhow::Context;
use clap::{Args, ValueEnum};
use rust_decimal::Decimal;
use std::fs::File;
use std::io::{self, BufReader, Read};
use std::path::{Path, PathBuf};

/// Scenario inputs shared by the commands that compute results
#[derive(Args, Debug)]
pub struct ScenarioArgs {
    /// JSON file with per-scenario inputs (or "-" for stdin)
    #[arg(short, long)]
    input: Option<PathBuf>,

    /// Annual gross income for scenarios entered as a yearly amount
    #[arg(short, long)]
    gross: Option<Decimal>,

    /// Hourly rate for scenarios entered per hour
    #[arg(short = 'r', long)]
    hourly_rate: Option<Decimal>,

    /// Hours per week for scenarios entered per hour
    #[arg(short = 'w', long)]
    hours: Option<Decimal>,

    /// Additional company expenses, applied to every scenario
    #[arg(short = 'x', long)]
    expenses: Option<Decimal>,

    /// Only include these scenarios (repeatable)
    #[arg(long, value_enum)]
    only: Vec<ScenarioArg>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ScenarioArg {
    #[value(alias = "regular")]
    RegularSalary,
    Zzp,
    BvFullSalary,
    BvCappedSalary,
    BvCappedSalaryDividend,
    Payrolling,
}

impl From<ScenarioArg> for ScenarioKind {
    fn from(arg: ScenarioArg) -> Self {
        match arg {
            ScenarioArg::RegularSalary => ScenarioKind::RegularSalary,
            ScenarioArg::Zzp => ScenarioKind::Zzp,
            ScenarioArg::BvFullSalary => ScenarioKind::BvFullSalary,
            ScenarioArg::BvCappedSalary => ScenarioKind::BvCappedSalary,
            ScenarioArg::BvCappedSalaryDividend => ScenarioKind::BvCappedSalaryDividend,
            ScenarioArg::Payrolling => ScenarioKind::Payrolling,
        }
    }
}

impl ScenarioArgs {
    /// Read the input file (if any) and resolve all selected scenarios
    pub fn load(&self) -> anyhow::Result<Resolved> {
        let input = match &self.input {
            Some(path) => read_input(path)?,
            None => InputFile::default(),
        };

        let overrides = InputOverrides {
            gross_income: self.gross,
            hourly_rate: self.hourly_rate,
            hours_per_week: self.hours,
            company_expenses: self.expenses,
        };
        let only: Vec<ScenarioKind> = self.only.iter().map(|&s| s.into()).collect();

        let resolved = tax::resolve(&input, &overrides, &only)?;
        log::info!("Resolved {} scenarios", resolved.configs.len());
        Ok(resolved)
    }
}

/// Read scenario inputs (JSON) from a file, or stdin with "-"
pub fn read_input(path: &Path) -> anyhow::Result<InputFile> {
    if path.as_os_str() == "-" {
        read_from_stdin()
    } else {
        let file =
            File::open(path).with_context(|| format!("cannot open {}", path.display()))?;
        Ok(tax::read_input_json(BufReader::new(file))?)
    }
}

fn read_from_stdin() -> anyhow::Result<InputFile> {
    let stdin = io::stdin();
    let mut reader = BufReader::new(stdin.lock());

    let mut buffer = Vec::new();
    reader.read_to_end(&mut buffer)?;

    if buffer.is_empty() {
        anyhow::bail!("No input received. Provide a file or pipe data to stdin.");
    }

    Ok(tax::read_input_json(io::Cursor::new(buffer))?)
}
