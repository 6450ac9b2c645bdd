use std::fmt;

use chrono::{DateTime, Utc};
use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::otp::{self, OtpError};

/// One OTP-producing identity: a display name and its raw stored secret.
#[derive(Clone, PartialEq, Eq, Zeroize, ZeroizeOnDrop)]
pub struct Token {
    #[zeroize(skip)]
    pub name: String,
    secret: String,
}

impl Token {
    pub fn new(name: impl Into<String>, secret: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            secret: secret.into(),
        }
    }

    /// Token for a literal secret given on the command line.
    pub fn test(secret: impl Into<String>) -> Self {
        Self::new("Test", secret)
    }

    /// The secret exactly as stored, before normalization.
    pub fn secret(&self) -> &str {
        &self.secret
    }

    /// Current code for this token at `at`.
    pub fn code(&self, at: DateTime<Utc>) -> Result<String, OtpError> {
        otp::generate_code(&self.secret, at)
    }
}

impl fmt::Debug for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Token")
            .field("name", &self.name)
            .field("secret", &"<redacted>")
            .finish()
    }
}

/// Tokens in display order, with the name column width fixed at construction.
#[derive(Debug, Clone, Default)]
pub struct TokenSet {
    tokens: Vec<Token>,
    longest_name: usize,
}

impl TokenSet {
    /// Sort by name (byte order, so uppercase sorts before lowercase) and
    /// measure the longest name.
    pub fn from_tokens(mut tokens: Vec<Token>) -> Self {
        tokens.sort_by(|a, b| a.name.as_bytes().cmp(b.name.as_bytes()));
        let longest_name = tokens
            .iter()
            .map(|t| t.name.chars().count())
            .max()
            .unwrap_or(0);
        Self {
            tokens,
            longest_name,
        }
    }

    pub fn tokens(&self) -> &[Token] {
        &self.tokens
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    pub fn longest_name_length(&self) -> usize {
        self.longest_name
    }

    /// Names are only shown when there is more than one token.
    pub fn show_names(&self) -> bool {
        self.tokens.len() > 1
    }
}

/// Render one output line, e.g. `"github:   123456 (Valid 12s)"`.
///
/// With `show_name` the name plus colon is left-justified in a field of
/// `name_pad + 2` characters, so codes line up in one column.
pub fn format_line(
    token: &Token,
    show_name: bool,
    name_pad: usize,
    now: DateTime<Utc>,
    omit_time: bool,
) -> Result<String, OtpError> {
    let code = token.code(now)?;

    let mut line = String::new();
    if show_name {
        let label = format!("{}:", token.name);
        line.push_str(&format!("{:<width$}", label, width = name_pad + 2));
    }
    line.push_str(&code);
    if !omit_time {
        line.push_str(&format!(" (Valid {}s)", otp::remaining_seconds(now)));
    }
    Ok(line)
}

/// Row shown in place of a code when generation fails for one token.
pub fn error_line(token: &Token, err: &OtpError) -> String {
    format!("{}: ERROR ({})", token.name, err)
}
