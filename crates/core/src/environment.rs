//! Deployment environments and the warehouse names derived from them.
//!
//! Each environment owns one database (`dev_db`, `stg_db`, `prod_db`) with a
//! `raw` schema holding the generated tables. The role defaults to
//! `<env>_role` unless overridden.

use std::fmt;
use std::str::FromStr;

use crate::error::CoreError;

/// Schema that receives generated rows in every environment.
pub const RAW_SCHEMA: &str = "raw";

/// Table names inside [`RAW_SCHEMA`].
pub const CUSTOMERS_TABLE: &str = "customers";
pub const ORDERS_TABLE: &str = "orders";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Environment {
    #[default]
    Dev,
    Stg,
    Prod,
}

impl Environment {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Dev => "dev",
            Self::Stg => "stg",
            Self::Prod => "prod",
        }
    }

    /// Database owned by this environment, e.g. `dev_db`.
    pub fn database(self) -> String {
        format!("{}_db", self.as_str())
    }

    /// Role assumed after connecting when none is configured, e.g. `dev_role`.
    pub fn default_role(self) -> String {
        format!("{}_role", self.as_str())
    }

    pub fn target(self) -> Target {
        Target {
            database: self.database(),
            schema: RAW_SCHEMA.to_string(),
        }
    }
}

impl fmt::Display for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Environment {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "dev" => Ok(Self::Dev),
            "stg" => Ok(Self::Stg),
            "prod" => Ok(Self::Prod),
            other => Err(CoreError::Validation(format!(
                "Unknown environment '{other}'. Expected one of: dev, stg, prod"
            ))),
        }
    }
}

/// Database and schema that a run writes into.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Target {
    pub database: String,
    pub schema: String,
}

impl Target {
    /// Schema-qualified customers table, e.g. `raw.customers`.
    pub fn customers_table(&self) -> String {
        format!("{}.{CUSTOMERS_TABLE}", self.schema)
    }

    /// Schema-qualified orders table, e.g. `raw.orders`.
    pub fn orders_table(&self) -> String {
        format!("{}.{ORDERS_TABLE}", self.schema)
    }
}

impl fmt::Display for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.database, self.schema)
    }
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;

    #[test]
    fn parses_known_environments_case_insensitively() {
        assert_eq!("DEV".parse::<Environment>().unwrap(), Environment::Dev);
        assert_eq!("stg".parse::<Environment>().unwrap(), Environment::Stg);
        assert_eq!(" Prod ".parse::<Environment>().unwrap(), Environment::Prod);
    }

    #[test]
    fn rejects_unknown_environment() {
        assert_matches!(
            "qa".parse::<Environment>(),
            Err(CoreError::Validation(msg)) if msg.contains("'qa'")
        );
    }

    #[test]
    fn derives_names_from_environment() {
        let env = Environment::Stg;
        assert_eq!(env.database(), "stg_db");
        assert_eq!(env.default_role(), "stg_role");

        let target = env.target();
        assert_eq!(target.customers_table(), "raw.customers");
        assert_eq!(target.orders_table(), "raw.orders");
        assert_eq!(target.to_string(), "stg_db.raw");
    }

    #[test]
    fn default_environment_is_dev() {
        assert_eq!(Environment::default(), Environment::Dev);
    }
}
