//! TOTP code generation (RFC 6238, HMAC-SHA1, 30 second step, 6 digits).
//!
//! Secrets are taken exactly as stored and normalized on every call, so a
//! malformed secret fails the same way each time it is used.

use chrono::{DateTime, Timelike, Utc};
use thiserror::Error;
use totp_rs::{Algorithm, TOTP};

/// Length of one code window in seconds.
pub const STEP_SECONDS: u64 = 30;

/// Number of digits in a generated code.
pub const DIGITS: u32 = 6;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum OtpError {
    #[error("illegal base32 data: {0}")]
    SecretDecode(data_encoding::DecodeError),

    #[error("invalid base32 alphabet: {0}")]
    Alphabet(String),

    #[error("time {0} is before the Unix epoch")]
    BeforeEpoch(i64),
}

/// Trim surrounding whitespace, uppercase the secret and right-pad it with
/// `=` to a multiple of 8 characters.
pub fn normalize_secret(raw: &str) -> String {
    let mut secret = raw.trim().to_uppercase();
    let rem = secret.len() % 8;
    if rem != 0 {
        secret.extend(std::iter::repeat('=').take(8 - rem));
    }
    secret
}

/// Decode a normalized base32 secret into key bytes. Non-zero trailing bits
/// are accepted, as issuers do not always clear them.
fn decode_secret(normalized: &str) -> Result<Vec<u8>, OtpError> {
    let mut spec = data_encoding::BASE32.specification();
    spec.check_trailing_bits = false;
    let encoding = spec
        .encoding()
        .map_err(|e| OtpError::Alphabet(e.to_string()))?;
    encoding
        .decode(normalized.as_bytes())
        .map_err(OtpError::SecretDecode)
}

/// Generate the 6-digit TOTP code for `secret` at instant `at`.
pub fn generate_code(secret: &str, at: DateTime<Utc>) -> Result<String, OtpError> {
    let key = decode_secret(&normalize_secret(secret))?;

    let ts = at.timestamp();
    let seconds = u64::try_from(ts).map_err(|_| OtpError::BeforeEpoch(ts))?;

    // Issuer secrets shorter than 128 bits are common, so skip the length check
    let totp = TOTP::new_unchecked(Algorithm::SHA1, DIGITS as usize, 1, STEP_SECONDS, key);
    Ok(totp.generate(seconds))
}

/// Seconds the code for `at` stays valid. Always in `1..=30`.
pub fn remaining_seconds(at: DateTime<Utc>) -> u32 {
    let step = STEP_SECONDS as u32;
    step - (at.second() % step)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    // RFC 6238 appendix B SHA1 seed "12345678901234567890"
    const RFC_SECRET: &str = "GEZDGNBVGY3TQOJQGEZDGNBVGY3TQOJQ";

    fn at(secs: i64) -> DateTime<Utc> {
        Utc.timestamp_opt(secs, 0).unwrap()
    }

    #[test]
    fn test_rfc6238_totp_vectors() {
        let cases = [
            (59, "287082"),
            (1111111109, "081804"),
            (1111111111, "050471"),
            (1234567890, "005924"),
            (2000000000, "279037"),
            (20000000000, "353130"),
        ];
        for (ts, want) in cases {
            assert_eq!(generate_code(RFC_SECRET, at(ts)).unwrap(), want, "ts {}", ts);
        }
    }

    #[test]
    fn test_lowercase_and_unpadded_secret() {
        let upper = generate_code("JBSWY3DPEHPK3PXP", at(1_700_000_000)).unwrap();
        let lower = generate_code("jbswy3dpehpk3pxp", at(1_700_000_000)).unwrap();
        assert_eq!(upper, lower);

        // 10 chars needs padding to 16, and "h" leaves non-zero trailing bits
        assert!(generate_code("jbswy3dpeh", at(1_700_000_000)).is_ok());
        assert_eq!(
            generate_code("jbswy3dpeh", at(1_700_000_000)).unwrap(),
            generate_code("JBSWY3DPEH======", at(1_700_000_000)).unwrap()
        );
    }

    #[test]
    fn test_code_is_six_digits() {
        for ts in [0, 59, 1_000_000_007, 1_700_000_000] {
            let code = generate_code("JBSWY3DPEHPK3PXP", at(ts)).unwrap();
            assert_eq!(code.len(), 6);
            assert!(code.chars().all(|c| c.is_ascii_digit()));
        }
    }

    #[test]
    fn test_code_stable_within_step() {
        let base = 1_699_999_980;
        let first = generate_code(RFC_SECRET, at(base)).unwrap();
        for offset in 1..30 {
            assert_eq!(generate_code(RFC_SECRET, at(base + offset)).unwrap(), first);
        }
        let next = generate_code(RFC_SECRET, at(base + 30)).unwrap();
        assert_ne!(next, first);
    }

    #[test]
    fn test_surrounding_whitespace_is_trimmed() {
        let now = at(1_700_000_000);
        let clean = generate_code("JBSWY3DPEHPK3PXP", now).unwrap();
        assert_eq!(generate_code("JBSWY3DPEHPK3PXP\n", now).unwrap(), clean);
        assert_eq!(generate_code(" JBSWY3DPEHPK3PXP ", now).unwrap(), clean);
        assert_eq!(normalize_secret("\tjbswy3dpeh\r\n"), "JBSWY3DPEH======");
    }

    #[test]
    fn test_padding_rules() {
        assert_eq!(normalize_secret("abcdefgh"), "ABCDEFGH");
        assert_eq!(normalize_secret("ABCDEFGHIJ"), "ABCDEFGHIJ======");
        assert_eq!(normalize_secret("A"), "A=======");
        assert_eq!(normalize_secret(""), "");

        let once = normalize_secret("jbswy3dpeh");
        assert_eq!(once.len(), 16);
        assert_eq!(normalize_secret(&once), once);
    }

    #[test]
    fn test_invalid_secret_fails_every_time() {
        let first = generate_code("not-base32!", at(100)).unwrap_err();
        let second = generate_code("not-base32!", at(130)).unwrap_err();
        assert!(matches!(first, OtpError::SecretDecode(_)));
        assert_eq!(first, second);
    }

    #[test]
    fn test_before_epoch_rejected() {
        let err = generate_code(RFC_SECRET, at(-1)).unwrap_err();
        assert_eq!(err, OtpError::BeforeEpoch(-1));
    }

    #[test]
    fn test_remaining_seconds_range_and_reset() {
        // Window starts at 1_699_999_980 (second 0 of its minute)
        let start = 1_699_999_980;
        assert_eq!(remaining_seconds(at(start)), 30);
        assert_eq!(remaining_seconds(at(start + 1)), 29);
        assert_eq!(remaining_seconds(at(start + 29)), 1);
        assert_eq!(remaining_seconds(at(start + 30)), 30);

        let mut prev = remaining_seconds(at(start));
        for offset in 1..30 {
            let r = remaining_seconds(at(start + offset));
            assert!((1..=30).contains(&r));
            assert!(r < prev);
            prev = r;
        }
    }
}
