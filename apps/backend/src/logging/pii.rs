//! Masking for values that must never reach logs verbatim.
//!
//! Emails keep their first character and domain. Opaque tokens such as
//! bearer JWTs and argon2 hashes are replaced wholesale.

use std::fmt;

use lazy_regex::{regex, regex_replace_all};

/// Masks emails and long opaque tokens in `input`.
///
/// Emails run first so their domains are not mistaken for tokens.
pub fn redact(input: &str) -> String {
    let emails = regex_replace_all!(
        r"\b([A-Za-z0-9._%+-]+)(@[A-Za-z0-9.-]+\.[A-Za-z]+)\b",
        input,
        |_, local, domain| mask_email(local, domain)
    );

    // argon2 PHC strings contain '$' and ',' so they get their own pattern
    let phc = regex!(r"\$argon2(?:id|i|d)\$[^\s]+").replace_all(&emails, "[REDACTED_HASH]");

    regex!(r"[A-Za-z0-9_\-+/]{16,}(?:\.[A-Za-z0-9_\-+/]{2,}){0,2}={0,2}")
        .replace_all(&phc, "[REDACTED_TOKEN]")
        .into_owned()
}

fn mask_email(local: &str, domain: &str) -> String {
    let first = local.chars().next().map(String::from).unwrap_or_default();
    format!("{first}***{domain}")
}

/// Display wrapper that applies [`redact`] when formatted.
pub struct Redacted<'a>(pub &'a str);

impl fmt::Display for Redacted<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&redact(self.0))
    }
}

impl fmt::Debug for Redacted<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", redact(self.0))
    }
}
