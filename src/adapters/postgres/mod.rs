//! PostgreSQL adapters - sqlx implementations of the store ports.
//!
//! Every query runs under the configured deadline and surfaces a typed
//! timeout error instead of hanging. Idempotent reads are retried once
//! on transient database failure; mutations never are, since the caller
//! cannot tell a lost reply from a lost write.

mod outcome_store;
mod score_store;
mod threshold_store;

pub use outcome_store::PostgresOutcomeStore;
pub use score_store::PostgresScoreStore;
pub use threshold_store::PostgresThresholdStore;
