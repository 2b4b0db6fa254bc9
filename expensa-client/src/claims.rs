//! Reading the claims carried by a bearer token.
//!
//! The payload is decoded without verifying the signature: the claims only
//! seed what the UI shows until the current-user call answers, and the
//! backend validates the token on every request.

use base64::{
    Engine as _,
    engine::general_purpose::{URL_SAFE, URL_SAFE_NO_PAD},
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer};
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ClaimsError {
    #[error("token is not a JWT (expected three dot-separated segments)")]
    Malformed,
    #[error("token payload is not valid base64url: {0}")]
    Encoding(String),
    #[error("token payload is not valid claims JSON: {0}")]
    Payload(String),
}

/// Identity claims of a signed-in user.
#[derive(Debug, Clone, Default, Deserialize, PartialEq, Eq)]
pub struct Claims {
    /// Subject; the backend puts the user's display name or username here.
    #[serde(default)]
    pub sub: String,
    #[serde(default, deserialize_with = "deserialize_roles")]
    pub roles: Vec<String>,
    /// Expiry, seconds since the epoch.
    #[serde(default)]
    pub exp: Option<i64>,
}

impl Claims {
    pub fn new(sub: impl Into<String>, roles: Vec<String>) -> Self {
        Self {
            sub: sub.into(),
            roles,
            exp: None,
        }
    }

    /// Decodes the payload segment of `token`.
    pub fn decode(token: &str) -> Result<Self, ClaimsError> {
        let mut segments = token.trim().split('.');
        let (Some(_header), Some(payload), Some(_signature), None) = (
            segments.next(),
            segments.next(),
            segments.next(),
            segments.next(),
        ) else {
            return Err(ClaimsError::Malformed);
        };

        let bytes = if payload.ends_with('=') {
            URL_SAFE.decode(payload)
        } else {
            URL_SAFE_NO_PAD.decode(payload)
        }
        .map_err(|err| ClaimsError::Encoding(err.to_string()))?;

        serde_json::from_slice(&bytes).map_err(|err| ClaimsError::Payload(err.to_string()))
    }

    /// Expiry as a timestamp, when the token carries one.
    #[must_use]
    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        self.exp
            .and_then(|seconds| DateTime::<Utc>::from_timestamp(seconds, 0))
    }

    #[must_use]
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        self.expires_at().is_some_and(|expiry| expiry <= now)
    }
}

#[derive(Deserialize)]
struct Authority {
    authority: String,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RolesClaim {
    Names(Vec<String>),
    Authorities(Vec<Authority>),
    Joined(String),
}

fn deserialize_roles<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let roles = match Option::<RolesClaim>::deserialize(deserializer)? {
        None => Vec::new(),
        Some(RolesClaim::Names(names)) => names,
        Some(RolesClaim::Authorities(authorities)) => authorities
            .into_iter()
            .map(|authority| authority.authority)
            .collect(),
        Some(RolesClaim::Joined(joined)) => joined.split(',').map(str::to_string).collect(),
    };
    Ok(roles
        .into_iter()
        .map(|role| role.trim().to_string())
        .filter(|role| !role.is_empty())
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn token_with_payload(payload: &str) -> String {
        format!(
            "{}.{}.signature",
            URL_SAFE_NO_PAD.encode(r#"{"alg":"HS256","typ":"JWT"}"#),
            URL_SAFE_NO_PAD.encode(payload)
        )
    }

    #[test]
    fn decodes_comma_separated_roles() {
        let token = token_with_payload(r#"{"sub":"Jane Doe","roles":"ROLE_ADMIN, ROLE_USER"}"#);
        let claims = Claims::decode(&token).unwrap();
        assert_eq!(claims.sub, "Jane Doe");
        assert_eq!(claims.roles, vec!["ROLE_ADMIN", "ROLE_USER"]);
        assert!(claims.exp.is_none());
    }

    #[test]
    fn decodes_role_lists_and_authorities() {
        let list = token_with_payload(r#"{"sub":"jane","roles":["ROLE_MANAGER"]}"#);
        assert_eq!(Claims::decode(&list).unwrap().roles, vec!["ROLE_MANAGER"]);

        let authorities =
            token_with_payload(r#"{"sub":"jane","roles":[{"authority":"ROLE_ADMIN"}]}"#);
        assert_eq!(Claims::decode(&authorities).unwrap().roles, vec!["ROLE_ADMIN"]);

        let missing = token_with_payload(r#"{"sub":"jane"}"#);
        assert!(Claims::decode(&missing).unwrap().roles.is_empty());
    }

    #[test]
    fn padded_payloads_are_accepted() {
        let token = format!(
            "header.{}.sig",
            URL_SAFE.encode(r#"{"sub":"pad","roles":""}"#)
        );
        let claims = Claims::decode(&token).unwrap();
        assert_eq!(claims.sub, "pad");
        assert!(claims.roles.is_empty());
    }

    #[test]
    fn expiry_is_reported() {
        let token = token_with_payload(r#"{"sub":"jane","exp":1700000000}"#);
        let claims = Claims::decode(&token).unwrap();
        let expiry = claims.expires_at().unwrap();
        assert_eq!(expiry.timestamp(), 1_700_000_000);
        assert!(claims.is_expired_at(expiry));
        assert!(!claims.is_expired_at(DateTime::<Utc>::from_timestamp(1_600_000_000, 0).unwrap()));
    }

    #[test]
    fn malformed_tokens_are_errors() {
        assert_eq!(Claims::decode("abc123"), Err(ClaimsError::Malformed));
        assert_eq!(Claims::decode("a.b.c.d"), Err(ClaimsError::Malformed));
        assert!(matches!(
            Claims::decode("a.!!!.c"),
            Err(ClaimsError::Encoding(_))
        ));
        let not_json = format!("a.{}.c", URL_SAFE_NO_PAD.encode("plain"));
        assert!(matches!(Claims::decode(&not_json), Err(ClaimsError::Payload(_))));
    }
}
