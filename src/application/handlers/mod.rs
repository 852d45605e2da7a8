//! Command and query handlers.
//!
//! Each handler is a struct holding its port dependencies behind
//! `Arc<dyn ...>` with a single `handle()` method, a typed command or
//! query, and a typed error.

pub mod attainment;
pub mod mapping;
pub mod outcome;
pub mod threshold;

pub use attainment::{
    AttainmentError, CalculateDirectHandler, CalculateDirectQuery, CalculateIndirectHandler,
    CalculateIndirectQuery, ValidateCoverageHandler, ValidateCoverageQuery,
};
pub use mapping::{
    CoverageSummary, CoverageSummaryHandler, CoverageSummaryQuery, GetMatrixHandler,
    GetMatrixQuery, MappingError, MatrixView, ToggleMappingCommand, ToggleMappingHandler,
    ToggleMappingResult,
};
pub use outcome::{ListOutcomesHandler, ListOutcomesQuery, OutcomeQueryError};
pub use threshold::{
    CreateThresholdCommand, CreateThresholdHandler, DeleteThresholdCommand,
    DeleteThresholdHandler, ListThresholdsHandler, ListThresholdsQuery, ThresholdCommandError,
    UpdateThresholdCommand, UpdateThresholdHandler,
};
