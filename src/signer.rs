// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Request signing.
//!
//! The Airproce cloud authenticates requests with a shared secret (the
//! device pairing `hash`). The signature is the first 8 hex characters of
//! `SHA-1(secret || key1 || value1 || key2 || value2 ...)` with keys in byte
//! order. A wrong signature is not reported as such: the cloud simply
//! answers without a usable `control` object.

use std::fmt::{self, Write as _};

use sha1::{Digest, Sha1};

use crate::command::{RequestParams, SIGNATURE_KEY};

/// Number of hex characters kept from the digest.
pub const SIGNATURE_LEN: usize = 8;

/// A truncated request signature (8 lowercase hex characters).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Signature(String);

impl Signature {
    /// Returns the signature as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Signature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Builds the string that gets hashed: the secret followed by every
/// `key` + `value` pair, `sec` excluded.
#[must_use]
pub fn canonical_string(params: &RequestParams, secret: &str) -> String {
    let mut out = String::from(secret);
    for (key, value) in params.iter().filter(|(key, _)| *key != SIGNATURE_KEY) {
        out.push_str(key);
        // Writing into a String cannot fail
        let _ = write!(out, "{value}");
    }
    out
}

/// Computes the signature of `params` under `secret`.
///
/// Pure and deterministic: the same parameters and secret always produce
/// the same signature.
///
/// # Examples
///
/// ```
/// use airproce_lib::command::RequestParams;
/// use airproce_lib::signer::sign;
///
/// let params = RequestParams::new().with("userId", "u1").with("deviceId", "d1");
/// let sig = sign(&params, "abc");
/// assert_eq!(sig.as_str().len(), 8);
/// assert_eq!(sig, sign(&params, "abc"));
/// ```
#[must_use]
pub fn sign(params: &RequestParams, secret: &str) -> Signature {
    let digest = Sha1::digest(canonical_string(params, secret).as_bytes());
    let mut hex = String::with_capacity(SIGNATURE_LEN);
    for byte in digest.iter().take(SIGNATURE_LEN / 2) {
        let _ = write!(hex, "{byte:02x}");
    }
    Signature(hex)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn identity() -> RequestParams {
        RequestParams::new()
            .with("userId", "u1")
            .with("deviceId", "d1")
    }

    #[test]
    fn canonical_string_sorts_and_concatenates() {
        let params = identity().with("rank", 3u8).with("mode", 1u8);
        assert_eq!(
            canonical_string(&params, "abc"),
            "abcdeviceIdd1mode1rank3userIdu1"
        );
    }

    #[test]
    fn canonical_string_skips_existing_signature() {
        let params = identity().with(SIGNATURE_KEY, "deadbeef");
        assert_eq!(canonical_string(&params, "abc"), "abcdeviceIdd1userIdu1");
    }

    #[test]
    fn known_digest_prefix() {
        // SHA-1("abc") = a9993e364706816aba3e25717850c26c9cd0d89d
        let sig = sign(&RequestParams::new(), "abc");
        assert_eq!(sig.as_str(), "a9993e36");
    }

    #[test]
    fn signature_is_lowercase_hex() {
        let sig = sign(&identity(), "secret");
        assert_eq!(sig.as_str().len(), SIGNATURE_LEN);
        assert!(
            sig.as_str()
                .chars()
                .all(|c| c.is_ascii_digit() || ('a'..='f').contains(&c))
        );
    }

    #[test]
    fn deterministic() {
        let params = identity().with("time", 1_700_000_000_000i64);
        assert_eq!(sign(&params, "abc"), sign(&params.clone(), "abc"));
    }

    #[test]
    fn sensitive_to_values_keys_and_secret() {
        let base = sign(&identity(), "abc");
        assert_ne!(base, sign(&identity().with("userId", "u2"), "abc"));
        assert_ne!(base, sign(&identity().with("rank", 0u8), "abc"));
        assert_ne!(base, sign(&identity(), "abd"));

        let mut without_device = identity();
        without_device.remove("deviceId");
        assert_ne!(base, sign(&without_device, "abc"));
    }

    #[test]
    fn ignores_stale_signature_field() {
        let signed = identity().with(SIGNATURE_KEY, "00000000");
        assert_eq!(sign(&signed, "abc"), sign(&identity(), "abc"));
    }
}
