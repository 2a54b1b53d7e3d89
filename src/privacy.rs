// src/privacy.rs
//! Masking of applicant personal data before it is logged or sent to the LLM

use once_cell::sync::Lazy;
use regex::{Captures, Regex};

static CARD_NUMBER: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\d{4}[-\s]?\d{4}[-\s]?\d{4}[-\s]?\d{4}").expect("valid pattern")
});

/// Resident registration number
static RRN: Lazy<Regex> = Lazy::new(|| Regex::new(r"\d{6}[-\s]?\d{7}").expect("valid pattern"));

static PHONE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\d{2,3}[-.\s]?\d{3,4}[-.\s]?\d{4}").expect("valid pattern"));

static EMAIL: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"[a-zA-Z0-9._%+-]+@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,}").expect("valid pattern")
});

/// Mask phone numbers, emails, registration and card numbers in free text.
///
/// Longer digit patterns go first so a card number is not half-eaten by the
/// phone pattern. Emails inside free text always get three stars (`ho***@`),
/// unlike [`mask_email`] which scales with the local part.
pub fn mask_sensitive_data(text: &str) -> String {
    if text.is_empty() {
        return String::new();
    }

    let masked = CARD_NUMBER.replace_all(text, "****-****-****-****");
    let masked = RRN.replace_all(&masked, "******-*******");
    let masked = PHONE.replace_all(&masked, |caps: &Captures| mask_phone(&caps[0]));
    let masked = EMAIL.replace_all(&masked, |caps: &Captures| {
        let (local, domain) = caps[0].split_once('@').unwrap_or((&caps[0], ""));
        if local.chars().count() > 2 {
            format!("{}***@{}", local.chars().take(2).collect::<String>(), domain)
        } else {
            format!("***@{}", domain)
        }
    });

    masked.into_owned()
}

/// `010-1234-5678` -> `010-****-5678`; shorter numbers are left alone
pub fn mask_phone(phone: &str) -> String {
    let digits: String = phone.chars().filter(|c| c.is_ascii_digit()).collect();
    if digits.len() >= 10 {
        format!("{}-****-{}", &digits[..3], &digits[digits.len() - 4..])
    } else {
        phone.to_string()
    }
}

/// `abcdef@x.com` -> `ab****@x.com`, at most five stars. For a standalone
/// address field; free text goes through [`mask_sensitive_data`].
pub fn mask_email(email: &str) -> String {
    let Some((local, domain)) = email.split_once('@') else {
        return email.to_string();
    };
    let local_len = local.chars().count();
    if local_len > 2 {
        let head: String = local.chars().take(2).collect();
        format!("{}{}@{}", head, "*".repeat((local_len - 2).min(5)), domain)
    } else {
        format!("***@{}", domain)
    }
}

/// `홍길동` -> `홍*동`, `이산` -> `이*`
pub fn mask_name(name: &str) -> String {
    let chars: Vec<char> = name.chars().collect();
    match chars.len() {
        0 | 1 => name.to_string(),
        2 => format!("{}*", chars[0]),
        n => format!("{}{}{}", chars[0], "*".repeat(n - 2), chars[n - 1]),
    }
}
