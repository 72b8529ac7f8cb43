use super::scenario::ScenarioKind;
use crate::money::format_decimal;
use rust_decimal::Decimal;
use serde::Serialize;
use std::fmt;

/// Non-fatal findings about the inputs. Computation always proceeds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type")]
pub enum Warning {
    /// Input value lies outside the range the calculator was designed for.
    OutOfRange {
        scenario: ScenarioKind,
        field: &'static str,
        value: Decimal,
        min: Decimal,
        max: Decimal,
    },
    /// A rate override names a rate the scenario does not use.
    IgnoredRateOverride {
        scenario: ScenarioKind,
        field: &'static str,
    },
}

impl fmt::Display for Warning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Warning::OutOfRange {
                scenario,
                field,
                value,
                min,
                max,
            } => write!(
                f,
                "{}: {} = {} is outside {}..={}",
                scenario,
                field,
                format_decimal(*value),
                format_decimal(*min),
                format_decimal(*max)
            ),
            Warning::IgnoredRateOverride { scenario, field } => {
                write!(f, "{}: has no {}, override ignored", scenario, field)
            }
        }
    }
}
