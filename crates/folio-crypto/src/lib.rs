//! Cryptographic primitives for Folio.
//!
//! Provides salted bcrypt password hashing for the credential file and
//! random session tokens for the session cookie.
//!
//! All crypto operations wrap established libraries.

pub mod password;
pub mod token;

pub use password::{CryptoError, PasswordHasher};
pub use token::{SessionToken, TOKEN_BYTES};
