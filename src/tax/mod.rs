pub mod calc;
pub mod input;
pub mod nl;
pub mod scenario;
pub mod warnings;

// Flat public surface for domain types and functions.
pub use calc::{compute_all, ComputeError, ScenarioResult};
pub use input::{read_input_json, resolve, InputFile, InputOverrides, Resolved};
pub use scenario::{
    IncomeInput, IncomeMode, RateSheet, ScenarioConfig, ScenarioKind, BASE_SCENARIOS,
};
pub use warnings::Warning;
