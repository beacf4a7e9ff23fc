pub mod batch;
pub mod environment;
pub mod error;
pub mod generate;
pub mod models;
pub mod types;
