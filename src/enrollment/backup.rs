//! Backup Document
//!
//! Renders the downloadable recovery document handed to the user during
//! 2FA setup. Pure formatting; delivery is the caller's concern.

use chrono::{DateTime, Local};

use crate::crypto::{self, CryptoResult, Secret, TotpConfig};

/// Render the plain-text backup document for an enrolled account
///
/// Contains the code valid at `generated_at`, so the document is only
/// useful within the surrounding time window plus configured skew.
pub fn render_backup_document(
    scope: &str,
    secret: &Secret,
    generated_at: DateTime<Local>,
    config: &TotpConfig,
) -> CryptoResult<String> {
    let timestamp = generated_at.timestamp().max(0) as u64;
    let code = crypto::code_at(secret, timestamp, config)?;

    Ok(format!(
        "Two-factor authentication backup code\n\
         =====================================\n\
         \n\
         Account scope: {scope}\n\
         Generated:     {generated}\n\
         Backup code:   {code}\n\
         \n\
         This code is only valid for the {step}-second window around the\n\
         generation time shown above. Store this file somewhere safe and\n\
         delete it once used. If you lose access to your authenticator\n\
         app and this code has expired, contact support to reset\n\
         two-factor authentication.\n",
        scope = scope,
        generated = generated_at.format("%Y-%m-%d %H:%M:%S %:z"),
        code = code,
        step = config.time_step,
    ))
}

/// File name for the downloadable backup document
pub fn backup_file_name(scope: &str, site_name: &str) -> String {
    format!("2FA-backup-code-{}-{}.txt", scope, slugify(site_name))
}

/// Lowercase, runs of non-alphanumeric characters collapsed to `-`
fn slugify(name: &str) -> String {
    let mut slug = String::with_capacity(name.len());
    let mut last_was_dash = false;

    for c in name.chars() {
        if c.is_ascii_alphanumeric() {
            slug.push(c.to_ascii_lowercase());
            last_was_dash = false;
        } else if !last_was_dash && !slug.is_empty() {
            slug.push('-');
            last_was_dash = true;
        }
    }

    if slug.ends_with('-') {
        slug.pop();
    }

    slug
}
