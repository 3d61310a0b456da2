/// Salted bcrypt password hasher.
///
/// Every call to [`PasswordHasher::hash`] draws a fresh salt, so hashing the
/// same password twice yields different strings that both verify. The cost
/// factor is embedded in the hash, so verification works for any cost.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PasswordHasher {
    cost: u32,
}

impl PasswordHasher {
    /// Hasher with bcrypt's recommended cost.
    pub const DEFAULT: Self = Self {
        cost: bcrypt::DEFAULT_COST,
    };
    /// Lowest cost bcrypt accepts. For tests and throwaway credentials only.
    pub const FAST: Self = Self { cost: 4 };

    /// Create a hasher with a custom cost factor (4..=31).
    pub fn new(cost: u32) -> Result<Self, CryptoError> {
        if !(4..=31).contains(&cost) {
            return Err(CryptoError::InvalidCost(cost));
        }
        Ok(Self { cost })
    }

    /// Hash a password with a fresh random salt.
    pub fn hash(&self, password: &str) -> Result<String, CryptoError> {
        bcrypt::hash(password, self.cost).map_err(|e| CryptoError::Hashing(e.to_string()))
    }

    /// Check `password` against a stored bcrypt hash.
    ///
    /// Returns `Ok(false)` on mismatch and `Err` only if `hash` is not a
    /// well-formed bcrypt string.
    pub fn verify(password: &str, hash: &str) -> Result<bool, CryptoError> {
        bcrypt::verify(password, hash).map_err(|e| CryptoError::Hashing(e.to_string()))
    }

    /// A hasher with the same cost as an existing bcrypt hash.
    pub fn for_hash(hash: &str) -> Result<Self, CryptoError> {
        let parts: bcrypt::HashParts = hash
            .parse()
            .map_err(|e: bcrypt::BcryptError| CryptoError::Hashing(e.to_string()))?;
        Self::new(parts.get_cost())
    }

    pub fn cost(&self) -> u32 {
        self.cost
    }
}

impl Default for PasswordHasher {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// Errors from password hashing.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum CryptoError {
    #[error("hashing error: {0}")]
    Hashing(String),

    #[error("bcrypt cost must be between 4 and 31, got {0}")]
    InvalidCost(u32),
}
