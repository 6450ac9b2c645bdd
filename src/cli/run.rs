use std::io;

use tracing::{debug, info};

use vault_totp::config::{self, Config};
use vault_totp::display::{DisplayConfig, DisplayLoop, SystemClock, Ticker, TICK_INTERVAL};
use vault_totp::error::{Result, TotpError};
use vault_totp::resolver::{KeyResolver, DEFAULT_FIELD};
use vault_totp::store::vault::{VaultCli, DEFAULT_ADDRESS};
use vault_totp::token::{Token, TokenSet};

use super::Cli;

/// Settings after merging flags, environment and the config file.
#[derive(Debug)]
struct Settings {
    field: String,
    address: String,
    display: DisplayConfig,
}

impl Settings {
    fn merge(cli: &Cli, file: &Config) -> Self {
        Self {
            field: cli
                .field
                .clone()
                .or_else(|| file.vault.field.clone())
                .unwrap_or_else(|| DEFAULT_FIELD.to_string()),
            address: cli
                .vault_addr
                .clone()
                .or_else(|| file.vault.address.clone())
                .unwrap_or_else(|| DEFAULT_ADDRESS.to_string()),
            display: DisplayConfig {
                omit_time: cli.no_time || file.display.no_time,
                one_shot: cli.one_shot,
            },
        }
    }
}

pub fn run(cli: &Cli) -> Result<()> {
    let file = match config::config_path() {
        Some(path) => Config::load(&path)?,
        None => Config::default(),
    };
    let settings = Settings::merge(cli, &file);
    debug!(?settings, "effective settings");

    let tokens = match &cli.test_secret {
        Some(secret) => vec![Token::test(secret.clone())],
        None => fetch_tokens(cli, &settings)?,
    };
    let set = TokenSet::from_tokens(tokens);

    let stdout = io::stdout().lock();
    let mut display = DisplayLoop::new(set, settings.display, stdout, SystemClock);
    display.run(&mut Ticker::new(TICK_INTERVAL))?;
    Ok(())
}

fn fetch_tokens(cli: &Cli, settings: &Settings) -> Result<Vec<Token>> {
    let token = cli
        .vault_token
        .clone()
        .filter(|t| !t.is_empty())
        .or_else(config::vault_token_from_disk)
        .ok_or(TotpError::NoCredentials)?;
    let key = cli.key.as_deref().ok_or(TotpError::MissingKey)?;

    info!(address = %settings.address, key, "fetching secrets");
    let store = VaultCli::new(settings.address.clone(), token);
    KeyResolver::new(store, settings.field.clone()).resolve(key)
}
