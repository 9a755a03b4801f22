//! Optimistic concurrency version tokens
//!
//! Every mutable row carries a [`VersionToken`]. The storage layer issues a
//! fresh token on each write; clients echo back the token they last read
//! and the write only goes through when it still matches.
//!
//! Tokens are opaque 16-byte values. On the wire they are lowercase hex.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// Byte length of a freshly issued token.
pub const VERSION_TOKEN_LEN: usize = 16;

/// Opaque version stamp compared on update.
#[derive(Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "db", derive(sqlx::Type))]
#[cfg_attr(feature = "db", sqlx(transparent))]
pub struct VersionToken(Vec<u8>);

impl VersionToken {
    /// Issue a new random token.
    pub fn generate() -> Self {
        Self(uuid::Uuid::new_v4().as_bytes().to_vec())
    }

    pub fn from_bytes(bytes: impl Into<Vec<u8>>) -> Self {
        Self(bytes.into())
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    pub fn to_hex(&self) -> String {
        hex::encode(&self.0)
    }
}

impl fmt::Display for VersionToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl fmt::Debug for VersionToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "VersionToken({})", self.to_hex())
    }
}

/// Error returned when a token string is not valid hex.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid version token: {0}")]
pub struct InvalidVersionToken(String);

impl FromStr for VersionToken {
    type Err = InvalidVersionToken;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.is_empty() {
            return Err(InvalidVersionToken("empty".to_string()));
        }
        hex::decode(s)
            .map(Self)
            .map_err(|e| InvalidVersionToken(e.to_string()))
    }
}

impl Serialize for VersionToken {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for VersionToken {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_is_unique() {
        let a = VersionToken::generate();
        let b = VersionToken::generate();
        assert_eq!(a.as_bytes().len(), VERSION_TOKEN_LEN);
        assert_ne!(a, b);
    }

    #[test]
    fn test_hex_wire_format() {
        let token = VersionToken::from_bytes(vec![0xde, 0xad, 0xbe, 0xef]);
        let json = serde_json::to_string(&token).unwrap();
        assert_eq!(json, "\"deadbeef\"");

        let parsed: VersionToken = serde_json::from_str("\"DEADBEEF\"").unwrap();
        assert_eq!(parsed, token);
    }

    #[test]
    fn test_rejects_malformed_tokens() {
        assert!("".parse::<VersionToken>().is_err());
        assert!("xyz".parse::<VersionToken>().is_err());
        assert!(serde_json::from_str::<VersionToken>("\"abc\"").is_err());
    }
}
