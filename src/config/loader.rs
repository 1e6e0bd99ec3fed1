//! Configuration loading functionality.
//!
//! This module provides the [`ConfigLoader`] type for loading versioned
//! payroll policies from YAML files.

use chrono::NaiveDate;
use std::fs;
use std::path::Path;

use crate::error::{EngineError, EngineResult};

use super::types::PayrollPolicy;

/// Loads and provides access to payroll policy configuration.
///
/// # Directory Structure
///
/// The configuration directory should have the following structure:
/// ```text
/// config/
/// └── policies/
///     ├── 2024-04-01.yaml  # Policy effective from this date
///     └── 2025-04-01.yaml
/// ```
///
/// # Example
///
/// ```no_run
/// use payroll_engine::config::ConfigLoader;
/// use chrono::NaiveDate;
///
/// let loader = ConfigLoader::load("./config").unwrap();
/// let date = NaiveDate::from_ymd_opt(2025, 8, 1).unwrap();
/// let policy = loader.policy_for(date).unwrap();
/// println!("PF ceiling: {}", policy.provident_fund.ceiling);
/// ```
#[derive(Debug, Clone)]
pub struct ConfigLoader {
    /// Policies sorted by effective date, oldest first.
    policies: Vec<PayrollPolicy>,
}

impl ConfigLoader {
    /// Loads every policy file from `<path>/policies`.
    ///
    /// Returns an error if the directory is missing, holds no policy files, or
    /// any file contains invalid YAML.
    pub fn load<P: AsRef<Path>>(path: P) -> EngineResult<Self> {
        let policies_dir = path.as_ref().join("policies");
        let policies = Self::load_policies(&policies_dir)?;
        Ok(Self::from_policies(policies))
    }

    /// Creates a loader from already-built policies.
    pub fn from_policies(policies: Vec<PayrollPolicy>) -> Self {
        let mut sorted = policies;
        sorted.sort_by(|a, b| a.effective_date.cmp(&b.effective_date));
        Self { policies: sorted }
    }

    /// Loads and parses a YAML file.
    fn load_yaml<T: serde::de::DeserializeOwned>(path: &Path) -> EngineResult<T> {
        let path_str = path.display().to_string();

        let content = fs::read_to_string(path).map_err(|_| EngineError::ConfigNotFound {
            path: path_str.clone(),
        })?;

        serde_yaml::from_str(&content).map_err(|e| EngineError::ConfigParseError {
            path: path_str,
            message: e.to_string(),
        })
    }

    /// Loads all policy files from the policies directory.
    fn load_policies(policies_dir: &Path) -> EngineResult<Vec<PayrollPolicy>> {
        let dir_str = policies_dir.display().to_string();

        let entries = fs::read_dir(policies_dir).map_err(|_| EngineError::ConfigNotFound {
            path: dir_str.clone(),
        })?;

        let mut policies = Vec::new();

        for entry in entries {
            let entry = entry.map_err(|_| EngineError::ConfigNotFound {
                path: dir_str.clone(),
            })?;

            let path = entry.path();
            if path.extension().is_some_and(|ext| ext == "yaml") {
                policies.push(Self::load_yaml::<PayrollPolicy>(&path)?);
            }
        }

        if policies.is_empty() {
            return Err(EngineError::ConfigNotFound {
                path: format!("{} (no policy files found)", dir_str),
            });
        }

        Ok(policies)
    }

    /// Returns all loaded policies, oldest first.
    pub fn policies(&self) -> &[PayrollPolicy] {
        &self.policies
    }

    /// Gets the policy in force on a given date.
    ///
    /// The most recent policy whose effective date is on or before `date` wins.
    pub fn policy_for(&self, date: NaiveDate) -> EngineResult<&PayrollPolicy> {
        self.policies
            .iter()
            .rfind(|p| p.effective_date <= date)
            .ok_or(EngineError::PolicyNotFound { date })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;

    fn config_path() -> &'static str {
        "./config"
    }

    fn make_date(date_str: &str) -> NaiveDate {
        NaiveDate::parse_from_str(date_str, "%Y-%m-%d").unwrap()
    }

    fn policy_effective(version: &str, date: &str) -> PayrollPolicy {
        PayrollPolicy {
            version: version.to_string(),
            effective_date: make_date(date),
            ..PayrollPolicy::default()
        }
    }

    #[test]
    fn test_load_valid_configuration() {
        let result = ConfigLoader::load(config_path());
        assert!(result.is_ok(), "Failed to load config: {:?}", result.err());
        assert_eq!(result.unwrap().policies().len(), 2);
    }

    #[test]
    fn test_loaded_policy_matches_statutory_constants() {
        let loader = ConfigLoader::load(config_path()).unwrap();
        let policy = loader.policy_for(make_date("2025-08-01")).unwrap();

        assert_eq!(policy.version, "2025-04-01");
        assert_eq!(policy.provident_fund.rate, Decimal::new(12, 2));
        assert_eq!(policy.provident_fund.ceiling, Decimal::from(1800));
        assert_eq!(policy.state_insurance.gross_threshold, Decimal::from(25000));
        assert_eq!(policy.professional_tax.flat_amount, Decimal::from(200));
    }

    #[test]
    fn test_policy_for_selects_most_recent_effective() {
        let loader = ConfigLoader::load(config_path()).unwrap();
        let policy = loader.policy_for(make_date("2025-01-15")).unwrap();
        assert_eq!(policy.version, "2024-04-01");
    }

    #[test]
    fn test_policy_not_found_before_first_effective_date() {
        let loader = ConfigLoader::load(config_path()).unwrap();
        let date = make_date("2020-01-01");

        match loader.policy_for(date) {
            Err(EngineError::PolicyNotFound { date: d }) => assert_eq!(d, date),
            other => panic!("Expected PolicyNotFound, got {:?}", other),
        }
    }

    #[test]
    fn test_load_missing_directory_returns_error() {
        match ConfigLoader::load("/nonexistent/path") {
            Err(EngineError::ConfigNotFound { path }) => {
                assert!(path.contains("policies"));
            }
            other => panic!("Expected ConfigNotFound error, got {:?}", other),
        }
    }

    #[test]
    fn test_from_policies_sorts_by_effective_date() {
        let loader = ConfigLoader::from_policies(vec![
            policy_effective("b", "2025-04-01"),
            policy_effective("a", "2024-04-01"),
        ]);
        let versions: Vec<&str> = loader
            .policies()
            .iter()
            .map(|p| p.version.as_str())
            .collect();
        assert_eq!(versions, vec!["a", "b"]);
        assert_eq!(
            loader.policy_for(make_date("2025-04-01")).unwrap().version,
            "b"
        );
    }
}
