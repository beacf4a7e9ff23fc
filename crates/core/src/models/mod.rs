//! Row types generated in memory and loaded into the `raw` schema.

pub mod customer;
pub mod order;
