use std::fmt;

use rand::rngs::OsRng;
use rand::RngCore;

/// Number of random bytes in a session token.
pub const TOKEN_BYTES: usize = 32;

/// Opaque, unguessable session identifier carried in the session cookie.
///
/// Tokens are hex-encoded [`TOKEN_BYTES`] bytes from the OS random source.
/// `Debug` output is redacted so tokens never end up in logs.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct SessionToken(String);

impl SessionToken {
    /// Generate a new random token.
    pub fn generate() -> Self {
        let mut bytes = [0u8; TOKEN_BYTES];
        OsRng.fill_bytes(&mut bytes);
        Self(hex::encode(bytes))
    }

    /// Accept a client-supplied token if it has the right shape.
    pub fn parse(raw: &str) -> Option<Self> {
        let bytes = hex::decode(raw).ok()?;
        if bytes.len() != TOKEN_BYTES {
            return None;
        }
        Some(Self(raw.to_ascii_lowercase()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for SessionToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SessionToken({}…)", &self.0[..8])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generated_tokens_are_unique() {
        let a = SessionToken::generate();
        let b = SessionToken::generate();
        assert_ne!(a, b);
        assert_eq!(a.as_str().len(), TOKEN_BYTES * 2);
    }

    #[test]
    fn parse_round_trips_generated_token() {
        let token = SessionToken::generate();
        assert_eq!(SessionToken::parse(token.as_str()), Some(token));
    }

    #[test]
    fn parse_rejects_malformed_input() {
        assert!(SessionToken::parse("").is_none());
        assert!(SessionToken::parse("abc").is_none());
        assert!(SessionToken::parse(&"zz".repeat(TOKEN_BYTES)).is_none());
        assert!(SessionToken::parse(&"ab".repeat(TOKEN_BYTES + 1)).is_none());
    }

    #[test]
    fn debug_is_redacted() {
        let token = SessionToken::generate();
        let shown = format!("{token:?}");
        assert!(!shown.contains(token.as_str()));
    }
}
