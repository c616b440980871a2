//! Environment-driven handler configuration.

use std::collections::BTreeMap;
use std::time::Duration;

use resume_search_core::contract::{DEFAULT_LINK_EXPIRY_SECS, DEFAULT_PAGE_SIZE};

use crate::error::ConfigError;

pub const TABLE_NAME_VAR: &str = "STORE_TABLE_NAME";
pub const BUCKET_NAME_VAR: &str = "UPLOAD_S3_NAME";
pub const LINK_TTL_VAR: &str = "RESUME_LINK_TTL_SECS";
pub const DEFAULT_PAGE_SIZE_VAR: &str = "DEFAULT_PAGE_SIZE";
pub const UPLOAD_KEY_PREFIX_VAR: &str = "UPLOAD_KEY_PREFIX";

/// Upper bound S3 accepts for SigV4 presigned URLs (seven days).
pub const MAX_LINK_EXPIRY_SECS: u64 = 604_800;

/// Source of configuration values. Blank values are treated as unset.
pub trait ConfigSource {
    fn get(&self, name: &str) -> Option<String>;
}

/// Reads from the process environment.
#[derive(Debug, Default, Clone, Copy)]
pub struct EnvConfig;

impl ConfigSource for EnvConfig {
    fn get(&self, name: &str) -> Option<String> {
        std::env::var(name).ok()
    }
}

impl ConfigSource for BTreeMap<String, String> {
    fn get(&self, name: &str) -> Option<String> {
        BTreeMap::get(self, name).cloned()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FinderConfig {
    pub table_name: String,
    pub bucket: String,
    pub link_expiry: Duration,
    pub default_scan_limit: usize,
}

impl FinderConfig {
    pub fn from_source(source: &dyn ConfigSource) -> Result<Self, ConfigError> {
        let table_name = required(source, TABLE_NAME_VAR)?;
        let bucket = required(source, BUCKET_NAME_VAR)?;

        let link_expiry_secs =
            optional_number(source, LINK_TTL_VAR)?.unwrap_or(DEFAULT_LINK_EXPIRY_SECS);
        if link_expiry_secs == 0 || link_expiry_secs > MAX_LINK_EXPIRY_SECS {
            return Err(ConfigError::Invalid {
                name: LINK_TTL_VAR,
                value: link_expiry_secs.to_string(),
                reason: format!("must be between 1 and {MAX_LINK_EXPIRY_SECS} seconds"),
            });
        }

        let default_scan_limit = optional_number(source, DEFAULT_PAGE_SIZE_VAR)?
            .map(|value| value as usize)
            .unwrap_or(DEFAULT_PAGE_SIZE);
        if default_scan_limit == 0 {
            return Err(ConfigError::Invalid {
                name: DEFAULT_PAGE_SIZE_VAR,
                value: "0".to_string(),
                reason: "must be a positive integer".to_string(),
            });
        }

        Ok(Self {
            table_name,
            bucket,
            link_expiry: Duration::from_secs(link_expiry_secs),
            default_scan_limit,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploaderConfig {
    pub bucket: String,
    pub key_prefix: Option<String>,
}

impl UploaderConfig {
    pub fn from_source(source: &dyn ConfigSource) -> Result<Self, ConfigError> {
        Ok(Self {
            bucket: required(source, BUCKET_NAME_VAR)?,
            key_prefix: non_blank(source, UPLOAD_KEY_PREFIX_VAR),
        })
    }
}

fn non_blank(source: &dyn ConfigSource, name: &str) -> Option<String> {
    source
        .get(name)
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

fn required(source: &dyn ConfigSource, name: &'static str) -> Result<String, ConfigError> {
    non_blank(source, name).ok_or(ConfigError::Missing { name })
}

fn optional_number(
    source: &dyn ConfigSource,
    name: &'static str,
) -> Result<Option<u64>, ConfigError> {
    non_blank(source, name)
        .map(|value| {
            value.parse::<u64>().map_err(|error| ConfigError::Invalid {
                name,
                value: value.clone(),
                reason: error.to_string(),
            })
        })
        .transpose()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn source(pairs: &[(&str, &str)]) -> BTreeMap<String, String> {
        pairs
            .iter()
            .map(|(name, value)| (name.to_string(), value.to_string()))
            .collect()
    }

    #[test]
    fn finder_config_applies_defaults() {
        let config = FinderConfig::from_source(&source(&[
            ("STORE_TABLE_NAME", "resumes"),
            ("UPLOAD_S3_NAME", "resume-uploads"),
        ]))
        .expect("config should load");

        assert_eq!(config.table_name, "resumes");
        assert_eq!(config.bucket, "resume-uploads");
        assert_eq!(config.link_expiry, Duration::from_secs(600));
        assert_eq!(config.default_scan_limit, 5);
    }

    #[test]
    fn finder_config_requires_table_name() {
        let error = FinderConfig::from_source(&source(&[
            ("STORE_TABLE_NAME", "  "),
            ("UPLOAD_S3_NAME", "resume-uploads"),
        ]))
        .expect_err("blank table name should fail");
        assert_eq!(
            error,
            ConfigError::Missing {
                name: "STORE_TABLE_NAME"
            }
        );
    }

    #[test]
    fn finder_config_rejects_out_of_range_link_ttl() {
        let error = FinderConfig::from_source(&source(&[
            ("STORE_TABLE_NAME", "resumes"),
            ("UPLOAD_S3_NAME", "resume-uploads"),
            ("RESUME_LINK_TTL_SECS", "604801"),
        ]))
        .expect_err("ttl above seven days should fail");
        assert!(matches!(
            error,
            ConfigError::Invalid {
                name: "RESUME_LINK_TTL_SECS",
                ..
            }
        ));
    }

    #[test]
    fn finder_config_rejects_non_numeric_page_size() {
        let error = FinderConfig::from_source(&source(&[
            ("STORE_TABLE_NAME", "resumes"),
            ("UPLOAD_S3_NAME", "resume-uploads"),
            ("DEFAULT_PAGE_SIZE", "five"),
        ]))
        .expect_err("non-numeric page size should fail");
        assert!(error.to_string().starts_with("DEFAULT_PAGE_SIZE has invalid value 'five'"));
    }

    #[test]
    fn uploader_config_keeps_optional_prefix() {
        let config = UploaderConfig::from_source(&source(&[
            ("UPLOAD_S3_NAME", "resume-uploads"),
            ("UPLOAD_KEY_PREFIX", "incoming"),
        ]))
        .expect("config should load");
        assert_eq!(config.key_prefix.as_deref(), Some("incoming"));

        let config = UploaderConfig::from_source(&source(&[("UPLOAD_S3_NAME", "resume-uploads")]))
            .expect("config should load");
        assert_eq!(config.key_prefix, None);
    }

    #[test]
    fn uploader_config_requires_bucket() {
        let error =
            UploaderConfig::from_source(&source(&[])).expect_err("missing bucket should fail");
        assert_eq!(error.to_string(), "UPLOAD_S3_NAME must be configured");
    }
}
