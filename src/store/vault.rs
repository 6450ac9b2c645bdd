use std::process::{Command, Output};

use tracing::debug;

use crate::error::{Result, TotpError};

use super::{Record, SecretStore};

/// Default Vault API address when neither flag, env nor config sets one.
pub const DEFAULT_ADDRESS: &str = "https://127.0.0.1:8200";

/// Secret store backed by the HashiCorp `vault` command-line client.
pub struct VaultCli {
    pub address: String,
    pub token: String,
    /// Binary to invoke, `vault` unless overridden.
    pub program: String,
}

impl VaultCli {
    pub fn new(address: impl Into<String>, token: impl Into<String>) -> Self {
        Self {
            address: address.into(),
            token: token.into(),
            program: "vault".to_string(),
        }
    }

    fn command(&self, args: &[&str]) -> Result<Output> {
        debug!(program = %self.program, ?args, "invoking vault client");
        Command::new(&self.program)
            .args(args)
            .env("VAULT_ADDR", &self.address)
            .env("VAULT_TOKEN", &self.token)
            .output()
            .map_err(|e| {
                if e.kind() == std::io::ErrorKind::NotFound {
                    TotpError::Store(
                        "HashiCorp Vault CLI not found. Install from https://www.vaultproject.io/downloads"
                            .into(),
                    )
                } else {
                    TotpError::Store(format!("Failed to run `{} {}`: {}", self.program, args[0], e))
                }
            })
    }
}

impl SecretStore for VaultCli {
    fn read(&self, path: &str) -> Result<Option<Record>> {
        let output = self.command(&["read", "-format=json", path])?;
        if !output.status.success() {
            return classify_failure(&output, &format!("Unable to read from key {:?}", path));
        }

        let response: serde_json::Value = serde_json::from_slice(&output.stdout)
            .map_err(|e| TotpError::Store(format!("Failed to parse vault output: {}", e)))?;
        Ok(extract_record(response))
    }

    fn list(&self, prefix: &str) -> Result<Option<Vec<String>>> {
        let output = self.command(&["list", "-format=json", prefix])?;
        if !output.status.success() {
            return classify_failure(&output, &format!("Unable to list keys {:?}", prefix));
        }

        let keys: Vec<String> = serde_json::from_slice(&output.stdout)
            .map_err(|e| TotpError::Store(format!("Failed to parse vault output: {}", e)))?;
        if keys.is_empty() {
            return Ok(None);
        }
        Ok(Some(keys))
    }
}

/// Turn a failed `vault` invocation into not-found or an error.
fn classify_failure<T>(output: &Output, context: &str) -> Result<Option<T>> {
    let stderr = String::from_utf8_lossy(&output.stderr);
    if stderr.contains("No value found") || stderr.contains("Not Found") {
        return Ok(None);
    }
    if stderr.contains("permission denied")
        || stderr.contains("missing client token")
        || stderr.contains("VAULT_TOKEN")
    {
        return Err(TotpError::AuthFailed(format!(
            "{}: permission denied. Check your vault-token.",
            context
        )));
    }
    Err(TotpError::Store(format!("{}: {}", context, stderr.trim())))
}

/// KV v2 responses nest the fields at `.data.data`, KV v1 at `.data`.
fn extract_record(response: serde_json::Value) -> Option<Record> {
    let data = response.get("data")?;
    let fields = match data.get("data") {
        Some(inner) if inner.is_object() && data.get("metadata").is_some() => inner,
        _ => data,
    };
    match fields {
        serde_json::Value::Object(map) => Some(map.clone().into_iter().collect()),
        _ => None,
    }
}
