//! Attainment module - score aggregation and classification records.

mod aggregate;

pub use aggregate::{
    aggregate_direct, aggregate_indirect, AttainmentResult, DirectScore, IndirectAttainment,
    SurveyResponse, Trend, TrendDirection, UNCLASSIFIED,
};
