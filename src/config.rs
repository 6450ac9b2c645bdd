use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{Result, TotpError};

/// Environment variable overriding the config file location.
pub const CONFIG_ENV: &str = "VAULT_TOTP_CONFIG";

/// Configuration file format (~/.config/vault-totp/config.toml).
#[derive(Debug, Clone, Deserialize, Default, PartialEq, Eq)]
pub struct Config {
    #[serde(default)]
    pub vault: VaultConfig,
    #[serde(default)]
    pub display: DisplaySection,
}

#[derive(Debug, Clone, Deserialize, Default, PartialEq, Eq)]
pub struct VaultConfig {
    /// Vault API address, used when neither --vault-addr nor VAULT_ADDR is set
    pub address: Option<String>,
    /// Record field holding the TOTP secret
    pub field: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Default, PartialEq, Eq)]
pub struct DisplaySection {
    #[serde(default)]
    pub no_time: bool,
}

impl Config {
    /// Load config from a path. Returns default config if file doesn't exist.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = fs::read_to_string(path)?;
        let config: Config =
            toml::from_str(&content).map_err(|e| TotpError::Config(format!("{}: {}", path.display(), e)))?;
        Ok(config)
    }
}

/// Location of the config file: `$VAULT_TOTP_CONFIG`, else the user config dir.
pub fn config_path() -> Option<PathBuf> {
    if let Ok(path) = std::env::var(CONFIG_ENV) {
        return Some(PathBuf::from(path));
    }
    dirs::config_dir().map(|dir| dir.join("vault-totp").join("config.toml"))
}

/// Read the token the `vault` CLI caches in `~/.vault-token` after login.
pub fn vault_token_from_disk() -> Option<String> {
    let path = dirs::home_dir()?.join(".vault-token");
    let token = fs::read_to_string(path).ok()?;
    let token = token.trim();
    if token.is_empty() {
        return None;
    }
    Some(token.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;
    use tempfile::TempDir;

    #[test]
    fn test_missing_file_is_default() {
        let dir = TempDir::new().unwrap();
        let config = Config::load(&dir.path().join("absent.toml")).unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_load_full() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(
            &path,
            "[vault]\naddress = \"https://vault.example.com:8200\"\nfield = \"totp\"\n\n[display]\nno_time = true\n",
        )
        .unwrap();

        let config = Config::load(&path).unwrap();
        assert_eq!(config.vault.address.as_deref(), Some("https://vault.example.com:8200"));
        assert_eq!(config.vault.field.as_deref(), Some("totp"));
        assert!(config.display.no_time);
    }

    #[test]
    fn test_partial_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "[vault]\nfield = \"otp\"\n").unwrap();

        let config = Config::load(&path).unwrap();
        assert_eq!(config.vault.field.as_deref(), Some("otp"));
        assert!(config.vault.address.is_none());
        assert!(!config.display.no_time);
    }

    #[test]
    fn test_invalid_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "[vault\n").unwrap();

        let err = Config::load(&path).unwrap_err();
        assert!(matches!(err, TotpError::Config(_)));
    }

    #[test]
    #[serial]
    fn test_config_path_env_override() {
        std::env::set_var(CONFIG_ENV, "/tmp/vault-totp-test.toml");
        assert_eq!(config_path(), Some(PathBuf::from("/tmp/vault-totp-test.toml")));
        std::env::remove_var(CONFIG_ENV);

        if let Some(path) = config_path() {
            assert!(path.ends_with("vault-totp/config.toml"));
        }
    }
}
