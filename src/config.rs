//! Deployment configuration.
//!
//! The company profile feeds every fixed text block of the invoice layout.
//! Defaults reproduce the PT. Setia Kawan Makmur Sejahtera letterhead.

use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid APP_PORT '{0}'")]
    InvalidPort(String),
    #[error("failed to read company profile {path}: {source}")]
    ProfileIo {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid company profile {path}: {source}")]
    ProfileParse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct BankDetails {
    /// Sentence printed above the bank lines.
    pub intro: String,
    pub bank_name: String,
    pub account_holder: String,
    pub account_number: String,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct Signatory {
    pub closing: String,
    pub name: String,
    pub title: String,
}

/// Letterhead, payment and signature texts, plus the customer-specific rules.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct CompanyProfile {
    pub company_name: String,
    pub address_lines: Vec<String>,
    pub contact_lines: Vec<String>,
    pub bank: BankDetails,
    pub signatory: Signatory,
    /// Summary label for the withholding row.
    pub withholding_label: String,
    /// Customer whose invoices list faktur and bupot numbers in the summary.
    pub disclosure_customer: String,
    pub download_filename: String,
}

impl Default for CompanyProfile {
    fn default() -> Self {
        let company_name = "PT. SETIA KAWAN MAKMUR SEJAHTERA".to_string();
        Self {
            address_lines: vec![
                "Office and Mill :".to_string(),
                "JL. JAYENG KUSUMA VII / 12,".to_string(),
                "DESA TAPAN KECAMATAN KEDUNGWARU,".to_string(),
                "TULUNGAGUNG 66229".to_string(),
                "JAWA TIMUR, INDONESIA".to_string(),
            ],
            contact_lines: vec![
                "Telephone : +62.355.323190".to_string(),
                "Fax : +62.355.323187".to_string(),
            ],
            bank: BankDetails {
                intro: "Untuk pembayaran, mohon ditransfer ke rekening bank kami dengan detail sebagai berikut :".to_string(),
                bank_name: "BANK MANDIRI TULUNGAGUNG".to_string(),
                account_holder: company_name.clone(),
                account_number: "1710099088000".to_string(),
            },
            signatory: Signatory {
                closing: "Hormat Kami,".to_string(),
                name: "FANI CHRISYANTI, S.E., M.Ak".to_string(),
                title: "Manager Keuangan".to_string(),
            },
            withholding_label: "PPH (0,1%)".to_string(),
            disclosure_customer: "SETIA KAWAN ABADI".to_string(),
            download_filename: "invoices_combined.pdf".to_string(),
            company_name,
        }
    }
}

impl CompanyProfile {
    /// Load a profile from a JSON file. Missing keys keep their defaults.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let raw = fs::read_to_string(path).map_err(|source| ConfigError::ProfileIo {
            path: path.to_path_buf(),
            source,
        })?;
        serde_json::from_str(&raw).map_err(|source| ConfigError::ProfileParse {
            path: path.to_path_buf(),
            source,
        })
    }
}

/// Process-level settings read from the environment.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub logo_path: Option<PathBuf>,
    pub typst_bin: PathBuf,
    pub profile: CompanyProfile,
}

const DEFAULT_LOGO_PATH: &str = "assets/logo.jpeg";

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
            logo_path: Some(PathBuf::from(DEFAULT_LOGO_PATH)),
            typst_bin: PathBuf::from("typst"),
            profile: CompanyProfile::default(),
        }
    }
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build from an arbitrary key lookup, unset keys fall back to defaults.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let port = match lookup("APP_PORT") {
            Some(raw) => raw
                .trim()
                .parse::<u16>()
                .map_err(|_| ConfigError::InvalidPort(raw))?,
            None => defaults.port,
        };

        let logo_path = match lookup("LOGO_PATH") {
            Some(raw) if raw.trim().is_empty() => None,
            Some(raw) => Some(PathBuf::from(raw.trim())),
            None => defaults.logo_path,
        };

        let profile = match lookup("COMPANY_PROFILE") {
            Some(raw) if !raw.trim().is_empty() => {
                CompanyProfile::from_file(Path::new(raw.trim()))?
            }
            _ => defaults.profile,
        };

        Ok(Self {
            host: lookup("APP_HOST").unwrap_or(defaults.host),
            port,
            logo_path,
            typst_bin: lookup("TYPST_BIN")
                .map(PathBuf::from)
                .unwrap_or(defaults.typst_bin),
            profile,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::io::Write;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = AppConfig::from_lookup(lookup_from(&[])).unwrap();
        assert_eq!(config.port, 8080);
        assert_eq!(config.logo_path, Some(PathBuf::from("assets/logo.jpeg")));
        assert_eq!(config.profile.disclosure_customer, "SETIA KAWAN ABADI");
        assert_eq!(config.profile.bank.account_number, "1710099088000");
        assert_eq!(
            config.profile.bank.account_holder,
            "PT. SETIA KAWAN MAKMUR SEJAHTERA"
        );
    }

    #[test]
    fn test_overrides() {
        let config = AppConfig::from_lookup(lookup_from(&[
            ("APP_PORT", "9000"),
            ("LOGO_PATH", ""),
            ("TYPST_BIN", "/opt/typst/bin/typst"),
        ]))
        .unwrap();
        assert_eq!(config.port, 9000);
        assert_eq!(config.logo_path, None);
        assert_eq!(config.typst_bin, PathBuf::from("/opt/typst/bin/typst"));
    }

    #[test]
    fn test_invalid_port() {
        let err = AppConfig::from_lookup(lookup_from(&[("APP_PORT", "eighty")])).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidPort(_)));
    }

    #[test]
    fn test_partial_profile_file_keeps_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"company_name": "CV. MAJU JAYA"}}"#).unwrap();

        let profile = CompanyProfile::from_file(file.path()).unwrap();
        assert_eq!(profile.company_name, "CV. MAJU JAYA");
        assert_eq!(profile.withholding_label, "PPH (0,1%)");
    }

    #[test]
    fn test_missing_profile_file() {
        let err = CompanyProfile::from_file(Path::new("/nonexistent/profile.json")).unwrap_err();
        assert!(matches!(err, ConfigError::ProfileIo { .. }));
    }
}
