//! Provisioning URI Builder
//!
//! Builds the otpauth:// URI consumed by authenticator apps.

use crate::crypto::{Secret, TotpConfig};

use super::{ProvisionError, ProvisionResult};

/// Build an `otpauth://totp/...` URI for the given issuer and account
///
/// Labels are percent-encoded. The issuer appears both in the path label
/// and as a query parameter, which is what authenticator apps expect.
pub fn build_provisioning_uri(
    issuer: &str,
    account: &str,
    secret: &Secret,
    config: &TotpConfig,
) -> ProvisionResult<String> {
    validate_label(issuer)?;
    validate_label(account)?;

    Ok(format!(
        "otpauth://totp/{}:{}?secret={}&issuer={}&algorithm={}&digits={}&period={}",
        urlencoding::encode(issuer),
        urlencoding::encode(account),
        secret.to_base32(),
        urlencoding::encode(issuer),
        config.algorithm.as_str(),
        config.digits,
        config.time_step,
    ))
}

/// Labels must be non-empty and must not contain the path separator `:`
fn validate_label(label: &str) -> ProvisionResult<()> {
    if label.is_empty() {
        return Err(ProvisionError::InvalidLabel("label is empty".to_string()));
    }

    if label.contains(':') {
        return Err(ProvisionError::InvalidLabel(format!(
            "label '{}' contains ':'",
            label
        )));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_secret() -> Secret {
        Secret::from_bytes(b"12345678901234567890".to_vec())
    }

    #[test]
    fn test_uri_format() {
        let uri = build_provisioning_uri(
            "Example",
            "alice@example.com",
            &test_secret(),
            &TotpConfig::default(),
        )
        .unwrap();

        assert!(uri.starts_with("otpauth://totp/Example:alice%40example.com?"));
        assert!(uri.contains("secret=GEZDGNBVGY3TQOJQGEZDGNBVGY3TQOJQ"));
        assert!(uri.contains("issuer=Example"));
        assert!(uri.contains("algorithm=SHA1"));
        assert!(uri.contains("digits=6"));
        assert!(uri.contains("period=30"));
    }

    #[test]
    fn test_labels_are_percent_encoded() {
        let uri = build_provisioning_uri(
            "My Site",
            "alice bob",
            &test_secret(),
            &TotpConfig::default(),
        )
        .unwrap();

        assert!(uri.contains("My%20Site:alice%20bob"));
        assert!(uri.contains("issuer=My%20Site"));
    }

    #[test]
    fn test_rejects_colon_in_labels() {
        let secret = test_secret();
        let config = TotpConfig::default();

        assert!(matches!(
            build_provisioning_uri("Bad:Issuer", "alice", &secret, &config),
            Err(ProvisionError::InvalidLabel(_))
        ));
        assert!(matches!(
            build_provisioning_uri("Example", "a:lice", &secret, &config),
            Err(ProvisionError::InvalidLabel(_))
        ));
    }

    #[test]
    fn test_rejects_empty_labels() {
        let secret = test_secret();
        let config = TotpConfig::default();

        assert!(matches!(
            build_provisioning_uri("", "alice", &secret, &config),
            Err(ProvisionError::InvalidLabel(_))
        ));
        assert!(matches!(
            build_provisioning_uri("Example", "", &secret, &config),
            Err(ProvisionError::InvalidLabel(_))
        ));
    }
}
