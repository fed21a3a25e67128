// SPDX-License-Identifier: BUSL-1.1
//! # Registration Token Validation
//!
//! Callers identify themselves with an opaque registration token that must
//! match one entry of a static allow-list. The list comes from a
//! comma-separated configuration value and is split without trimming, so
//! `"a, b"` allows `"a"` and `" b"` but not `"b"`.

use subtle::ConstantTimeEq;

/// Allow-list of registration tokens.
///
/// Custom `Debug` redacts the token values to prevent credential leakage
/// in logs.
#[derive(Clone, PartialEq, Eq)]
pub struct TokenSet {
    tokens: Vec<String>,
}

impl TokenSet {
    /// Split a comma-separated list into tokens.
    ///
    /// Splitting always yields at least one element: an empty input is a set
    /// containing the empty token.
    pub fn parse(raw: &str) -> Self {
        Self {
            tokens: raw.split(',').map(str::to_owned).collect(),
        }
    }

    /// Exact-match membership test.
    ///
    /// Every entry is compared so the time taken does not depend on which
    /// entry (if any) matched.
    pub fn contains(&self, token: &str) -> bool {
        self.tokens
            .iter()
            .fold(false, |found, expected| found | constant_time_token_eq(token, expected))
    }

    /// Number of entries. Never zero, see [`TokenSet::parse`].
    #[allow(clippy::len_without_is_empty)]
    pub fn len(&self) -> usize {
        self.tokens.len()
    }
}

impl std::fmt::Debug for TokenSet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenSet")
            .field("tokens", &format_args!("[REDACTED; {}]", self.tokens.len()))
            .finish()
    }
}

/// Constant-time comparison of two tokens.
///
/// When lengths differ, performs a dummy comparison so the mismatch costs
/// about as much as a same-length comparison.
fn constant_time_token_eq(provided: &str, expected: &str) -> bool {
    let provided = provided.as_bytes();
    let expected = expected.as_bytes();
    if provided.len() != expected.len() {
        let _ = expected.ct_eq(expected);
        return false;
    }
    provided.ct_eq(expected).into()
}
