pub mod run;

use clap::Parser;

#[derive(Parser, Debug)]
#[command(
    name = "vault-totp",
    version,
    about = "Show live TOTP codes for secrets stored in Vault"
)]
pub struct Cli {
    /// Field inside the key to search the TOTP secret in [default: secret]
    #[arg(long)]
    pub field: Option<String>,

    /// Omit printing the validity time
    #[arg(short = 'n', long)]
    pub no_time: bool,

    /// Print the codes once instead of continuously
    #[arg(short = '1', long)]
    pub one_shot: bool,

    /// Use a test secret from the command line instead of a secret from Vault
    #[arg(long = "test", value_name = "SECRET")]
    pub test_secret: Option<String>,

    /// Vault API address [default: https://127.0.0.1:8200]
    #[arg(long, env = "VAULT_ADDR")]
    pub vault_addr: Option<String>,

    /// Vault token for accessing the Vault instance [default: ~/.vault-token]
    #[arg(long, env = "VAULT_TOKEN", hide_env_values = true)]
    pub vault_token: Option<String>,

    /// Key to read the secret from; end it with `*` to read every key below it
    pub key: Option<String>,
}
