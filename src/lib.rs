//! vault-totp — live TOTP codes for secrets kept in a hierarchical secret store.
//!
//! The library resolves key patterns against a [`store::SecretStore`], turns
//! the results into a sorted [`token::TokenSet`] and repaints their codes in
//! place with [`display::DisplayLoop`]. The command-line front end is gated
//! behind the `cli` feature and private to the binary.
//!
//! # Quick start
//!
//! ```no_run
//! use vault_totp::resolver::KeyResolver;
//! use vault_totp::store::VaultCli;
//! use vault_totp::token::{error_line, format_line, TokenSet};
//!
//! let store = VaultCli::new("https://127.0.0.1:8200", "s.token");
//! let tokens = KeyResolver::new(store, "secret").resolve("secret/totp/*")?;
//! let set = TokenSet::from_tokens(tokens);
//! let now = chrono::Utc::now();
//! for token in set.tokens() {
//!     match format_line(token, set.show_names(), set.longest_name_length(), now, false) {
//!         Ok(line) => println!("{}", line),
//!         Err(e) => println!("{}", error_line(token, &e)),
//!     }
//! }
//! # Ok::<(), vault_totp::error::TotpError>(())
//! ```

pub mod config;
pub mod display;
pub mod error;
pub mod otp;
pub mod resolver;
pub mod store;
pub mod token;
