//! Destination normalization and masking.
//!
//! Responses that echo a destination back to the client always mask it; the
//! unmasked value only appears after a password has been proven.

use rently_shared::utils::validation::normalize_email;

use crate::domain::entities::verification_code::Channel;

/// Canonical form of a destination for storage and lookups.
///
/// Email addresses are trimmed and lowercased so a code issued for
/// `Tenant@Example.com` matches a confirmation typed either way. Phone
/// numbers are trimmed only.
pub fn normalize_destination(destination: &str, channel: Channel) -> String {
    match channel {
        Channel::Email => normalize_email(destination),
        Channel::Phone => destination.trim().to_string(),
    }
}

/// Masks an email address or phone number for display.
///
/// Emails keep the first character of the local part (and the last when the
/// local part is longer than two characters) plus the full domain. Phone
/// numbers keep the last four characters and are fully masked at length four
/// or less.
pub fn mask_destination(destination: &str, channel: Channel) -> String {
    let destination = destination.trim();
    if destination.is_empty() {
        return String::new();
    }

    if channel == Channel::Email {
        if let Some((name, domain)) = destination.split_once('@') {
            let chars: Vec<char> = name.chars().collect();
            let masked_name = if chars.len() <= 2 {
                format!("{}*", chars.first().map(|c| c.to_string()).unwrap_or_default())
            } else {
                format!(
                    "{}{}{}",
                    chars[0],
                    "*".repeat(chars.len() - 2),
                    chars[chars.len() - 1]
                )
            };
            return format!("{}@{}", masked_name, domain);
        }
    }

    let len = destination.chars().count();
    if len <= 4 {
        return "*".repeat(len);
    }
    let tail: String = destination
        .chars()
        .skip(len - 4)
        .collect();
    format!("{}{}", "*".repeat(len - 4), tail)
}
