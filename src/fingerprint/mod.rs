//! Requirement fingerprinting for content-addressed venv reuse
//!
//! A fingerprint is the SHA256 of the normalized, sorted, newline-joined
//! requirement lines. Requested specs and `pip freeze` output go through
//! the same normalization, so a venv built from a spec and a venv
//! introspected later compare equal when their package sets match.

pub mod spec;

pub use spec::RequirementSpec;

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::fmt;

/// Marker that starts a requirement comment
const COMMENT_MARKER: char = '#';

/// Length of a hex-encoded SHA256 digest
const DIGEST_HEX_LEN: usize = 64;

/// Length of the abbreviated digest shown in listings
const SHORT_LEN: usize = 12;

/// Hex-encoded SHA256 digest of a normalized requirement set
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Fingerprint(String);

impl Fingerprint {
    /// Fingerprint a sequence of raw requirement lines
    pub fn of_lines<I, S>(lines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut normalized: Vec<String> = lines
            .into_iter()
            .filter_map(|line| normalize_requirement(line.as_ref()))
            .collect();
        normalized.sort();

        let joined = normalized.join("\n");
        let mut hasher = Sha256::new();
        hasher.update(joined.as_bytes());
        Self(hex::encode(hasher.finalize()))
    }

    /// Fingerprint the package list reported by a live environment
    ///
    /// Uses the exact normalization applied to requested specs.
    pub fn of_installed(packages: &[String]) -> Self {
        Self::of_lines(packages)
    }

    /// Parse a stored digest: 64 hex digits, any case
    pub fn from_hex(hex: &str) -> Option<Self> {
        let valid = hex.len() == DIGEST_HEX_LEN && hex.bytes().all(|b| b.is_ascii_hexdigit());
        valid.then(|| Self(hex.to_ascii_lowercase()))
    }

    /// The hex digest
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Abbreviated digest for display
    pub fn short(&self) -> &str {
        &self.0[..SHORT_LEN]
    }
}

impl TryFrom<String> for Fingerprint {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::from_hex(&value)
            .ok_or_else(|| format!("invalid requirements hash {:?}: expected 64 hex digits", value))
    }
}

impl From<Fingerprint> for String {
    fn from(fingerprint: Fingerprint) -> Self {
        fingerprint.0
    }
}

impl fmt::Display for Fingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Canonicalize one requirement line
///
/// Returns `None` for blank lines and full-line comments. Inline comments
/// (a `#` preceded by whitespace) are cut off and the result lower-cased.
pub fn normalize_requirement(line: &str) -> Option<String> {
    strip_requirement(line).map(str::to_lowercase)
}

/// Requirement arguments suitable for passing to `pip install`
///
/// Same cuts as [`normalize_requirement`], but keeps the original casing.
pub fn install_args<S: AsRef<str>>(lines: &[S]) -> Vec<String> {
    lines
        .iter()
        .filter_map(|line| strip_requirement(line.as_ref()))
        .map(str::to_string)
        .collect()
}

/// Trim a line and cut its comment, `None` if nothing is left
fn strip_requirement(line: &str) -> Option<&str> {
    let line = line.trim();
    if line.is_empty() || line.starts_with(COMMENT_MARKER) {
        return None;
    }

    Some(match inline_comment_start(line) {
        Some(idx) => line[..idx].trim_end(),
        None => line,
    })
}

/// Byte offset of the first `#` that follows whitespace
fn inline_comment_start(line: &str) -> Option<usize> {
    let mut prev_is_space = false;
    for (idx, ch) in line.char_indices() {
        if ch == COMMENT_MARKER && prev_is_space {
            return Some(idx);
        }
        prev_is_space = ch.is_whitespace();
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    const EMPTY_SHA256: &str = "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855";

    #[test]
    fn normalize_strips_and_lowercases() {
        assert_eq!(
            normalize_requirement("  Flask==2.0  ").as_deref(),
            Some("flask==2.0")
        );
    }

    #[test]
    fn normalize_drops_blank_and_comments() {
        assert_eq!(normalize_requirement(""), None);
        assert_eq!(normalize_requirement("   \t"), None);
        assert_eq!(normalize_requirement("# pinned below"), None);
        assert_eq!(normalize_requirement("   # indented comment"), None);
    }

    #[test]
    fn normalize_cuts_inline_comment() {
        assert_eq!(
            normalize_requirement("pkg==1.0 # pinned").as_deref(),
            Some("pkg==1.0")
        );
        assert_eq!(
            normalize_requirement("pkg==1.0\t\t# tabbed").as_deref(),
            Some("pkg==1.0")
        );
        assert_eq!(
            normalize_requirement("pkg==1.0   # wide gap").as_deref(),
            Some("pkg==1.0")
        );
    }

    #[test]
    fn normalize_keeps_hash_without_whitespace() {
        assert_eq!(
            normalize_requirement("git+https://host/repo.git#egg=Pkg").as_deref(),
            Some("git+https://host/repo.git#egg=pkg")
        );
    }

    #[test]
    fn normalize_is_idempotent() {
        let inputs = [
            "Pkg-A==1.0",
            "  pkg==1.0   # wide gap",
            "requests[socks]>=2.31 ; python_version >= '3.8'",
            "git+https://host/repo.git#egg=Pkg",
        ];
        for input in inputs {
            let once = normalize_requirement(input).unwrap();
            let twice = normalize_requirement(&once).unwrap();
            assert_eq!(once, twice, "not idempotent for {input:?}");
        }
    }

    #[test]
    fn fingerprint_order_independent() {
        assert_eq!(
            Fingerprint::of_lines(["pkg-a==1.0", "pkg-b==2.0"]),
            Fingerprint::of_lines(["pkg-b==2.0", "pkg-a==1.0"])
        );
    }

    #[test]
    fn fingerprint_case_insensitive() {
        assert_eq!(
            Fingerprint::of_lines(["Pkg-A==1.0"]),
            Fingerprint::of_lines(["pkg-a==1.0"])
        );
    }

    #[test]
    fn fingerprint_ignores_blank_and_comment_lines() {
        assert_eq!(
            Fingerprint::of_lines(["pkg==1.0", "", "# comment"]),
            Fingerprint::of_lines(["pkg==1.0"])
        );
    }

    #[test]
    fn fingerprint_strips_inline_comments() {
        assert_eq!(
            Fingerprint::of_lines(["pkg==1.0 # pinned"]),
            Fingerprint::of_lines(["pkg==1.0"])
        );
    }

    #[test]
    fn fingerprint_distinguishes_versions() {
        assert_ne!(
            Fingerprint::of_lines(["flask==2.0"]),
            Fingerprint::of_lines(["flask==3.0"])
        );
    }

    #[test]
    fn fingerprint_empty_set_hashes_empty_string() {
        let empty: [&str; 0] = [];
        assert_eq!(Fingerprint::of_lines(empty).as_str(), EMPTY_SHA256);
        assert_eq!(
            Fingerprint::of_lines(["", "# only comments"]).as_str(),
            EMPTY_SHA256
        );
    }

    #[test]
    fn fingerprint_is_hex_sha256() {
        let fp = Fingerprint::of_lines(["flask==2.0"]);
        assert_eq!(fp.as_str().len(), 64);
        assert!(fp.as_str().chars().all(|c| c.is_ascii_hexdigit()));
        assert_eq!(fp.short().len(), 12);
    }

    #[test]
    fn installed_matches_requested() {
        let installed = vec!["Flask==2.0".to_string(), "click==8.1.7".to_string()];
        assert_eq!(
            Fingerprint::of_installed(&installed),
            Fingerprint::of_lines(["click==8.1.7  # cli", "flask==2.0"])
        );
    }

    #[test]
    fn fingerprint_serializes_as_plain_string() {
        let fp = Fingerprint::of_lines(["flask"]);
        assert_eq!(
            serde_json::to_string(&fp).unwrap(),
            format!("\"{}\"", fp.as_str())
        );
        let back: Fingerprint = serde_json::from_str(&format!("\"{}\"", fp)).unwrap();
        assert_eq!(back, fp);
    }

    #[test]
    fn stored_digest_must_be_hex() {
        assert!(serde_json::from_str::<Fingerprint>("\"a\u{00e9}\u{00e9}\u{00e9}\u{00e9}\u{00e9}\u{00e9}\"").is_err());
        assert!(serde_json::from_str::<Fingerprint>("\"abc123\"").is_err());
        assert!(Fingerprint::from_hex(&"g".repeat(64)).is_none());
    }

    #[test]
    fn uppercase_digest_is_lowered() {
        let fp = Fingerprint::of_lines(["flask"]);
        let upper = fp.as_str().to_ascii_uppercase();
        assert_eq!(Fingerprint::from_hex(&upper), Some(fp.clone()));
        assert_eq!(fp.short().len(), 12);
    }

    #[test]
    fn install_args_keep_case() {
        let args = install_args(&["", "# header", "Flask==2.0 # web", "  Click>=8 "]);
        assert_eq!(args, vec!["Flask==2.0", "Click>=8"]);
    }
}
