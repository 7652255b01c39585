use std::fmt;
use std::str::FromStr;

use anyhow::bail;

/// Deployment environment selector. Parsed from `ENVIRONMENT`; anything
/// outside the fixed set is a configuration error, never a silent default.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Environment {
    Development,
    Staging,
    Production,
}

impl FromStr for Environment {
    type Err = anyhow::Error;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        match raw {
            "development" => Ok(Environment::Development),
            "staging" => Ok(Environment::Staging),
            "production" => Ok(Environment::Production),
            other => bail!(
                "invalid environment {other:?}: expected development, staging or production"
            ),
        }
    }
}

impl Environment {
    pub fn as_str(self) -> &'static str {
        match self {
            Environment::Development => "development",
            Environment::Staging => "staging",
            Environment::Production => "production",
        }
    }
}

impl fmt::Display for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Environment-scoped resource-name prefixes. Every component that filters
/// resources by name consumes these; the suffix tables live nowhere else.
#[derive(Debug, Clone)]
pub struct Prefixes {
    pub db_instance: String,
    pub bucket: String,
    pub search_domain: String,
}

impl Prefixes {
    pub fn for_environment(env: Environment) -> Self {
        let db_instance = match env {
            Environment::Development => "cg-aws-broker-dev",
            Environment::Staging => "cg-aws-broker-stage",
            Environment::Production => "cg-aws-broker-prod",
        };
        let bucket = match env {
            Environment::Development => "development-cg-",
            Environment::Staging => "staging-cg-",
            Environment::Production => "cg-",
        };
        let search_domain = match env {
            Environment::Development => "cg-broker-dev-",
            Environment::Staging => "cg-broker-stg-",
            Environment::Production => "cg-broker-prd-",
        };
        Self {
            db_instance: db_instance.to_string(),
            bucket: bucket.to_string(),
            search_domain: search_domain.to_string(),
        }
    }

    /// Log groups for managed database instances live under a fixed path.
    pub fn db_log_group_prefix(&self) -> String {
        format!("/aws/rds/instance/{}", self.db_instance)
    }
}
