//! OBE Hub - Outcome-Based Education Records Service
//!
//! This crate implements the outcome mapping and attainment engine for
//! OBE academic records: PEO/PLO/CLO mapping matrices, per-degree
//! attainment-threshold groups and assessment/survey score aggregation.

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;
