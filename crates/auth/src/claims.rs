use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use bookshelf_core::UserId;

/// JWT claims model.
///
/// Serialized with the registered claim names (`sub`, `iss`, `iat`, `exp`);
/// timestamps travel as whole seconds since the epoch and `sub` as a decimal
/// string.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JwtClaims {
    /// Subject: the authenticated user.
    #[serde(with = "subject_string")]
    pub sub: UserId,

    /// Issuer name configured for this deployment.
    pub iss: String,

    /// Issued-at timestamp.
    #[serde(rename = "iat", with = "chrono::serde::ts_seconds")]
    pub issued_at: DateTime<Utc>,

    /// Expiration timestamp.
    #[serde(rename = "exp", with = "chrono::serde::ts_seconds")]
    pub expires_at: DateTime<Utc>,
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TokenError {
    #[error("malformed token: {0}")]
    Malformed(String),

    #[error("token signature does not match")]
    InvalidSignature,

    #[error("token has expired")]
    Expired,

    #[error("token issued by '{0}'")]
    UnknownIssuer(String),

    #[error("token could not be signed: {0}")]
    Signing(String),
}

impl TokenError {
    pub fn malformed(msg: impl Into<String>) -> Self {
        Self::Malformed(msg.into())
    }
}

/// Deterministically validate the time window of decoded claims.
///
/// There is no leeway: a token is expired as soon as `now` passes `expires_at`.
pub fn validate_claims(claims: &JwtClaims, now: DateTime<Utc>) -> Result<(), TokenError> {
    if claims.expires_at <= claims.issued_at {
        return Err(TokenError::malformed("expires_at must be after issued_at"));
    }
    if now > claims.expires_at {
        return Err(TokenError::Expired);
    }
    Ok(())
}

mod subject_string {
    use serde::{de::Error as _, Deserialize, Deserializer, Serializer};

    use bookshelf_core::UserId;

    pub fn serialize<S: Serializer>(id: &UserId, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(id)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<UserId, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse::<UserId>().map_err(D::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    fn claims(ttl_secs: i64) -> JwtClaims {
        let issued_at = Utc.with_ymd_and_hms(2024, 1, 1, 12, 0, 0).unwrap();
        JwtClaims {
            sub: UserId::new(3),
            iss: "bookshelf".into(),
            issued_at,
            expires_at: issued_at + Duration::seconds(ttl_secs),
        }
    }

    #[test]
    fn accepts_until_expiry_inclusive() {
        let c = claims(60);
        assert_eq!(validate_claims(&c, c.issued_at), Ok(()));
        assert_eq!(validate_claims(&c, c.expires_at), Ok(()));
        assert_eq!(
            validate_claims(&c, c.expires_at + Duration::seconds(1)),
            Err(TokenError::Expired)
        );
    }

    #[test]
    fn rejects_inverted_window() {
        let c = claims(0);
        assert!(matches!(validate_claims(&c, c.issued_at), Err(TokenError::Malformed(_))));
    }

    #[test]
    fn wire_format_uses_registered_names() {
        let c = claims(60);
        let json = serde_json::to_value(&c).unwrap();
        assert_eq!(json["sub"], "3");
        assert_eq!(json["iss"], "bookshelf");
        assert_eq!(json["iat"], c.issued_at.timestamp());
        assert_eq!(json["exp"], c.expires_at.timestamp());

        let back: JwtClaims = serde_json::from_value(json).unwrap();
        assert_eq!(back, c);
    }

    #[test]
    fn non_decimal_subject_is_rejected() {
        let json = serde_json::json!({"sub": "abc", "iss": "x", "iat": 1, "exp": 2});
        assert!(serde_json::from_value::<JwtClaims>(json).is_err());
    }
}
