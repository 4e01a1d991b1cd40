//! Time-based One-Time Password (TOTP) Engine
//!
//! Implements RFC 6238 code generation and verification with
//! HMAC-SHA1/SHA256/SHA512 and a configurable skew window.

use std::fmt;
use std::time::{SystemTime, UNIX_EPOCH};

use hmac::{Hmac, Mac};
use rand::RngCore;
use serde::{Deserialize, Serialize};
use sha1::Sha1;
use sha2::{Sha256, Sha512};
use subtle::ConstantTimeEq;
use zeroize::{Zeroize, ZeroizeOnDrop};

use super::{base32, CryptoError, CryptoResult};

type HmacSha1 = Hmac<Sha1>;
type HmacSha256 = Hmac<Sha256>;
type HmacSha512 = Hmac<Sha512>;

/// Default generated secret length in bytes (160 bits)
pub const DEFAULT_SECRET_LENGTH: usize = 20;

/// Minimum length accepted when generating a new secret (128 bits)
pub const MIN_SECRET_LENGTH: usize = 16;

/// Floor for secrets written by older deployments. Stored secrets at least
/// this long are still accepted for verification; new ones are never this
/// short.
pub const LEGACY_SECRET_LENGTH: usize = 10;

/// HMAC algorithm for code derivation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum TotpAlgorithm {
    #[default]
    Sha1,
    Sha256,
    Sha512,
}

impl TotpAlgorithm {
    /// Algorithm name as it appears in otpauth:// URIs
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Sha1 => "SHA1",
            Self::Sha256 => "SHA256",
            Self::Sha512 => "SHA512",
        }
    }
}

/// TOTP parameters
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TotpConfig {
    /// Time step in seconds (default: 30)
    pub time_step: u64,
    /// Number of code digits (default: 6)
    pub digits: u32,
    /// HMAC algorithm (default: SHA1)
    pub algorithm: TotpAlgorithm,
    /// Accepted skew in time steps on each side of now (default: 1)
    pub window: u64,
}

impl Default for TotpConfig {
    fn default() -> Self {
        Self {
            time_step: 30,
            digits: 6,
            algorithm: TotpAlgorithm::Sha1,
            window: 1,
        }
    }
}

impl TotpConfig {
    pub fn with_time_step(mut self, seconds: u64) -> Self {
        self.time_step = seconds;
        self
    }

    pub fn with_digits(mut self, digits: u32) -> Self {
        self.digits = digits;
        self
    }

    pub fn with_algorithm(mut self, algorithm: TotpAlgorithm) -> Self {
        self.algorithm = algorithm;
        self
    }

    pub fn with_window(mut self, window: u64) -> Self {
        self.window = window;
        self
    }
}

/// Raw TOTP secret
///
/// Zeroized on drop; `Debug` never prints the key material.
#[derive(Clone, Zeroize, ZeroizeOnDrop)]
pub struct Secret {
    bytes: Vec<u8>,
}

impl Secret {
    /// Create from raw bytes
    pub fn from_bytes(bytes: Vec<u8>) -> Self {
        Self { bytes }
    }

    /// Decode from the base32 form stored in the enrollment row
    pub fn from_base32(encoded: &str) -> CryptoResult<Self> {
        let bytes = base32::decode(encoded)
            .map_err(|e| CryptoError::InvalidSecret(e.to_string()))?;
        Ok(Self { bytes })
    }

    /// Base32 form for storage and provisioning URIs
    pub fn to_base32(&self) -> String {
        base32::encode(&self.bytes)
    }

    /// Get secret bytes for HMAC operations
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// Whether the secret is long enough to be used for verification,
    /// including secrets from deployments that generated shorter ones
    pub fn meets_legacy_minimum(&self) -> bool {
        self.bytes.len() >= LEGACY_SECRET_LENGTH
    }
}

impl fmt::Debug for Secret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Secret({} bytes)", self.bytes.len())
    }
}

/// Generate a new random secret from the thread-local CSPRNG
pub fn generate_secret(byte_length: usize) -> CryptoResult<Secret> {
    if byte_length < MIN_SECRET_LENGTH {
        return Err(CryptoError::InvalidParameter(format!(
            "secret length {} below minimum {}",
            byte_length, MIN_SECRET_LENGTH
        )));
    }

    let mut bytes = vec![0u8; byte_length];
    rand::thread_rng().fill_bytes(&mut bytes);
    Ok(Secret::from_bytes(bytes))
}

/// Compute the code for a specific Unix timestamp
pub fn code_at(secret: &Secret, timestamp: u64, config: &TotpConfig) -> CryptoResult<String> {
    if secret.is_empty() {
        return Err(CryptoError::InvalidSecret("secret is empty".to_string()));
    }

    hotp(secret.as_bytes(), timestamp / config.time_step, config)
}

/// Compute the code for the current time
pub fn code_now(secret: &Secret, config: &TotpConfig) -> CryptoResult<String> {
    code_at(secret, unix_now(), config)
}

/// Verify a submitted code against a specific Unix timestamp
///
/// Codes for counters in `[counter - window, counter + window]` are
/// accepted. A submission of the wrong length (or with non-digit
/// characters) is rejected before any HMAC is computed.
pub fn verify_at(
    secret: &Secret,
    submitted: &str,
    timestamp: u64,
    config: &TotpConfig,
) -> CryptoResult<bool> {
    if submitted.len() != config.digits as usize
        || !submitted.bytes().all(|b| b.is_ascii_digit())
    {
        return Ok(false);
    }

    if secret.is_empty() {
        return Err(CryptoError::InvalidSecret("secret is empty".to_string()));
    }

    let counter = timestamp / config.time_step;
    let start = counter.saturating_sub(config.window);
    let end = counter.saturating_add(config.window);

    // Scan the whole window; no early exit on match
    let mut matched = false;
    for c in start..=end {
        let candidate = hotp(secret.as_bytes(), c, config)?;
        matched |= bool::from(candidate.as_bytes().ct_eq(submitted.as_bytes()));
    }

    Ok(matched)
}

/// Verify a submitted code against the current time
pub fn verify_now(secret: &Secret, submitted: &str, config: &TotpConfig) -> CryptoResult<bool> {
    verify_at(secret, submitted, unix_now(), config)
}

/// Get remaining seconds until the current code expires
pub fn time_remaining(config: &TotpConfig) -> u64 {
    config.time_step - (unix_now() % config.time_step)
}

fn unix_now() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs()
}

/// HOTP (RFC 4226) over an 8-byte big-endian counter
fn hotp(key: &[u8], counter: u64, config: &TotpConfig) -> CryptoResult<String> {
    if config.digits == 0 || config.digits > 9 {
        return Err(CryptoError::InvalidParameter(format!(
            "digits must be between 1 and 9, got {}",
            config.digits
        )));
    }

    let message = counter.to_be_bytes();
    let digest = match config.algorithm {
        TotpAlgorithm::Sha1 => {
            let mut mac =
                HmacSha1::new_from_slice(key).expect("HMAC can take key of any size");
            mac.update(&message);
            mac.finalize().into_bytes().to_vec()
        }
        TotpAlgorithm::Sha256 => {
            let mut mac =
                HmacSha256::new_from_slice(key).expect("HMAC can take key of any size");
            mac.update(&message);
            mac.finalize().into_bytes().to_vec()
        }
        TotpAlgorithm::Sha512 => {
            let mut mac =
                HmacSha512::new_from_slice(key).expect("HMAC can take key of any size");
            mac.update(&message);
            mac.finalize().into_bytes().to_vec()
        }
    };

    // Dynamic truncation: 31-bit value at the offset given by the low
    // nibble of the last digest byte
    let offset = (digest[digest.len() - 1] & 0x0F) as usize;
    let binary = ((digest[offset] as u32 & 0x7F) << 24)
        | ((digest[offset + 1] as u32) << 16)
        | ((digest[offset + 2] as u32) << 8)
        | (digest[offset + 3] as u32);

    let code = binary % 10u32.pow(config.digits);
    Ok(format!("{:0width$}", code, width = config.digits as usize))
}

#[cfg(test)]
mod tests {
    use super::*;

    /// RFC 6238 Appendix B shared secret
    fn rfc_secret() -> Secret {
        Secret::from_bytes(b"12345678901234567890".to_vec())
    }

    fn rfc_config() -> TotpConfig {
        TotpConfig::default().with_digits(8)
    }

    #[test]
    fn test_rfc6238_sha1_vectors() {
        let secret = rfc_secret();
        let config = rfc_config();

        assert_eq!(code_at(&secret, 59, &config).unwrap(), "94287082");
        assert_eq!(code_at(&secret, 1111111109, &config).unwrap(), "07081804");
        assert_eq!(code_at(&secret, 1111111111, &config).unwrap(), "14050471");
        assert_eq!(code_at(&secret, 1234567890, &config).unwrap(), "89005924");
        assert_eq!(code_at(&secret, 2000000000, &config).unwrap(), "69279037");
    }

    #[test]
    fn test_code_is_deterministic() {
        let secret = rfc_secret();
        let config = TotpConfig::default();

        let a = code_at(&secret, 1700000000, &config).unwrap();
        let b = code_at(&secret, 1700000000, &config).unwrap();
        assert_eq!(a, b);
        assert_eq!(a.len(), 6);
    }

    #[test]
    fn test_verify_accepts_adjacent_steps() {
        let secret = rfc_secret();
        let config = rfc_config();
        let now = 1111111109;

        let current = code_at(&secret, now, &config).unwrap();
        let previous = code_at(&secret, now - 30, &config).unwrap();
        let next = code_at(&secret, now + 30, &config).unwrap();

        assert!(verify_at(&secret, &current, now, &config).unwrap());
        assert!(verify_at(&secret, &previous, now, &config).unwrap());
        assert!(verify_at(&secret, &next, now, &config).unwrap());
    }

    #[test]
    fn test_verify_rejects_outside_window() {
        let secret = rfc_secret();
        let config = rfc_config();
        let now = 1111111109;

        let stale = code_at(&secret, now - 60, &config).unwrap();
        assert!(!verify_at(&secret, &stale, now, &config).unwrap());
    }

    #[test]
    fn test_verify_rejects_wrong_length_without_error() {
        let secret = rfc_secret();
        let config = TotpConfig::default();

        assert!(!verify_at(&secret, "123", 59, &config).unwrap());
        assert!(!verify_at(&secret, "1234567", 59, &config).unwrap());
        assert!(!verify_at(&secret, "", 59, &config).unwrap());
        assert!(!verify_at(&secret, "abcdef", 59, &config).unwrap());
    }

    #[test]
    fn test_empty_secret_rejected() {
        let secret = Secret::from_bytes(vec![]);
        let config = TotpConfig::default();

        assert!(matches!(
            code_at(&secret, 59, &config),
            Err(CryptoError::InvalidSecret(_))
        ));
        assert!(matches!(
            verify_at(&secret, "123456", 59, &config),
            Err(CryptoError::InvalidSecret(_))
        ));
    }

    #[test]
    fn test_generate_secret_length_floor() {
        assert!(matches!(
            generate_secret(8),
            Err(CryptoError::InvalidParameter(_))
        ));
        assert!(matches!(
            generate_secret(LEGACY_SECRET_LENGTH),
            Err(CryptoError::InvalidParameter(_))
        ));

        let secret = generate_secret(DEFAULT_SECRET_LENGTH).unwrap();
        assert_eq!(secret.len(), DEFAULT_SECRET_LENGTH);
        assert!(secret.meets_legacy_minimum());
    }

    #[test]
    fn test_generated_secrets_differ() {
        let a = generate_secret(DEFAULT_SECRET_LENGTH).unwrap();
        let b = generate_secret(DEFAULT_SECRET_LENGTH).unwrap();
        assert_ne!(a.as_bytes(), b.as_bytes());
    }

    #[test]
    fn test_secret_base32_round_trip() {
        let secret = rfc_secret();
        let encoded = secret.to_base32();
        assert_eq!(encoded, "GEZDGNBVGY3TQOJQGEZDGNBVGY3TQOJQ");

        let decoded = Secret::from_base32(&encoded).unwrap();
        assert_eq!(decoded.as_bytes(), secret.as_bytes());
    }

    #[test]
    fn test_invalid_base32_secret() {
        assert!(matches!(
            Secret::from_base32("NOT!BASE32"),
            Err(CryptoError::InvalidSecret(_))
        ));
    }

    #[test]
    fn test_debug_is_redacted() {
        let secret = rfc_secret();
        let debug = format!("{:?}", secret);
        assert!(!debug.contains("1234"));
        assert!(!debug.contains(&secret.to_base32()));
    }

    #[test]
    fn test_time_remaining_bounds() {
        let config = TotpConfig::default();
        let remaining = time_remaining(&config);
        assert!(remaining >= 1);
        assert!(remaining <= 30);
    }
}
