//! Generate synthetic customers and orders and load them into the `raw`
//! schema of an environment's warehouse database.

pub mod config;
pub mod run;
pub mod telemetry;
