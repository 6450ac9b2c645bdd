use thiserror::Error;

#[derive(Error, Debug)]
pub enum TotpError {
    #[error("Please specify a vault key to read the secret from.\n\nUsage: vault-totp [opts] <vault-key>")]
    MissingKey,

    #[error("You need to specify a vault-token")]
    NoCredentials,

    #[error("Authentication failed: {0}")]
    AuthFailed(String),

    #[error("Key {0:?} not found")]
    KeyNotFound(String),

    #[error("The key {key:?} does not have a field named {field:?}.")]
    FieldNotFound { key: String, field: String },

    #[error("There is no key {0:?}")]
    NoSuchKey(String),

    #[error("The field {field:?} of key {key:?} is not a string")]
    FieldNotString { key: String, field: String },

    #[error("Secret store error: {0}")]
    Store(String),

    #[error("Invalid config: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl TotpError {
    /// Return a typed exit code for this error category.
    pub fn exit_code(&self) -> i32 {
        match self {
            TotpError::MissingKey => 2,
            TotpError::NoCredentials => 2,
            TotpError::AuthFailed(_) => 2,
            TotpError::KeyNotFound(_) => 3,
            TotpError::FieldNotFound { .. } => 3,
            TotpError::NoSuchKey(_) => 3,
            TotpError::FieldNotString { .. } => 1,
            TotpError::Store(_) => 1,
            TotpError::Config(_) => 1,
            TotpError::Io(_) => 1,
        }
    }

    /// Return a string error code identifier.
    pub fn error_code(&self) -> &'static str {
        match self {
            TotpError::MissingKey => "missing_key",
            TotpError::NoCredentials => "no_credentials",
            TotpError::AuthFailed(_) => "auth_failed",
            TotpError::KeyNotFound(_) => "not_found",
            TotpError::FieldNotFound { .. } => "field_not_found",
            TotpError::NoSuchKey(_) => "not_found",
            TotpError::FieldNotString { .. } => "invalid_field",
            TotpError::Store(_) => "store_error",
            TotpError::Config(_) => "config_error",
            TotpError::Io(_) => "io_error",
        }
    }
}

pub type Result<T> = std::result::Result<T, TotpError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exit_codes_by_category() {
        assert_eq!(TotpError::MissingKey.exit_code(), 2);
        assert_eq!(TotpError::NoCredentials.exit_code(), 2);
        assert_eq!(TotpError::KeyNotFound("a/b".into()).exit_code(), 3);
        assert_eq!(TotpError::NoSuchKey("a/".into()).exit_code(), 3);
        assert_eq!(TotpError::Store("boom".into()).exit_code(), 1);
        assert_eq!(TotpError::Config("bad".into()).error_code(), "config_error");
    }

    #[test]
    fn test_io_errors_convert() {
        let err: TotpError = std::io::Error::new(std::io::ErrorKind::BrokenPipe, "closed").into();
        assert_eq!(err.exit_code(), 1);
        assert_eq!(err.error_code(), "io_error");
    }
}
