//! Claims carried in the payload segment of a session credential.
//!
//! The backend issues a compact `header.payload.signature` token. The client
//! reads only the payload, and only to decide what to show. Nothing here
//! verifies the signature or enforces expiry: the decoded claims are a UI
//! hint, and the backend re-checks authorization on every call.

use std::collections::BTreeSet;

use base64::Engine;
use base64::alphabet;
use base64::engine::{DecodePaddingMode, GeneralPurpose, GeneralPurposeConfig};
use chrono::{DateTime, Utc};
use podium_core::UserId;
use rootcause::Report;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

use crate::error::MalformedCredential;

/// URL-safe alphabet, tolerant of both padded and unpadded segments.
const PAYLOAD_ENGINE: GeneralPurpose = GeneralPurpose::new(
    &alphabet::URL_SAFE,
    GeneralPurposeConfig::new().with_decode_padding_mode(DecodePaddingMode::Indifferent),
);

/// Structured record decoded from a credential's payload segment.
///
/// Only `roles` has meaning to the client. Every other backend field is kept
/// as-is and reachable through [`Claims::field`].
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Claims {
    #[serde(default, deserialize_with = "roles_or_empty")]
    roles: BTreeSet<String>,
    #[serde(flatten)]
    extra: Map<String, Value>,
}

fn roles_or_empty<'de, D>(deserializer: D) -> Result<BTreeSet<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<BTreeSet<String>>::deserialize(deserializer)?.unwrap_or_default())
}

impl Claims {
    /// Creates claims carrying the given role tags and no other fields.
    #[must_use]
    pub fn new<I, S>(roles: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            roles: roles.into_iter().map(Into::into).collect(),
            extra: Map::new(),
        }
    }

    /// Adds a backend-defined field.
    #[must_use]
    pub fn with_field(mut self, name: impl Into<String>, value: Value) -> Self {
        self.extra.insert(name.into(), value);
        self
    }

    /// Returns the role tags, including ones this client does not know.
    #[must_use]
    pub fn roles(&self) -> &BTreeSet<String> {
        &self.roles
    }

    /// Returns true if the claims list the given role tag.
    #[must_use]
    pub fn has_role(&self, tag: &str) -> bool {
        self.roles.contains(tag)
    }

    /// Returns the backend user key from the `user_id` claim.
    #[must_use]
    pub fn user_id(&self) -> Option<UserId> {
        self.extra
            .get("user_id")
            .and_then(Value::as_i64)
            .map(UserId::new)
    }

    /// Returns the `exp` claim as a timestamp.
    ///
    /// Informational only; an expired credential is still used as-is.
    #[must_use]
    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        self.extra
            .get("exp")
            .and_then(Value::as_i64)
            .and_then(|secs| DateTime::from_timestamp(secs, 0))
    }

    /// Returns any other backend-defined field.
    #[must_use]
    pub fn field(&self, name: &str) -> Option<&Value> {
        self.extra.get(name)
    }
}

/// Reads claims out of a credential without verifying it.
///
/// This is the single place in the client where a server-issued token is
/// parsed. The result must never be used as proof of anything.
#[derive(Debug, Clone, Copy, Default)]
pub struct ClaimsDecoder;

impl ClaimsDecoder {
    /// Decodes the payload segment of `token`.
    ///
    /// # Errors
    ///
    /// Returns `MalformedCredential` when the token has fewer than two
    /// `.`-separated segments, the payload is not base64url, or the decoded
    /// bytes are not a JSON object with a string-array `roles` field.
    pub fn decode(token: &str) -> Result<Claims, Report<MalformedCredential>> {
        let mut segments = token.split('.');
        let _header = segments.next();
        let payload = segments
            .next()
            .ok_or_else(|| MalformedCredential::new("expected dot-separated segments"))?;

        let bytes = PAYLOAD_ENGINE
            .decode(payload)
            .map_err(|e| MalformedCredential::new(format!("payload is not base64url: {e}")))?;

        let claims = serde_json::from_slice::<Claims>(&bytes)
            .map_err(|e| MalformedCredential::new(format!("payload is not a claims object: {e}")))?;

        Ok(claims)
    }
}
