//! bcrypt password hashing with a plaintext fallback for legacy records.

/// bcrypt cost used when none is configured.
pub const DEFAULT_COST: u32 = 10;

const MIN_COST: u32 = 4;
const MAX_COST: u32 = 31;

/// Errors from hashing or verifying a password.
#[derive(Debug, thiserror::Error)]
pub enum PasswordError {
    #[error("bcrypt cost must be between 4 and 31, got {0}")]
    InvalidCost(u32),

    #[error("password hashing failed: {0}")]
    Hash(#[from] bcrypt::BcryptError),
}

/// Hashes and verifies account passwords.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PasswordHasher {
    cost: u32,
}

impl Default for PasswordHasher {
    fn default() -> Self {
        Self { cost: DEFAULT_COST }
    }
}

impl PasswordHasher {
    /// Create a hasher with the given bcrypt cost.
    ///
    /// # Errors
    ///
    /// Returns [`PasswordError::InvalidCost`] outside bcrypt's `4..=31`.
    pub fn new(cost: u32) -> Result<Self, PasswordError> {
        if !(MIN_COST..=MAX_COST).contains(&cost) {
            return Err(PasswordError::InvalidCost(cost));
        }
        Ok(Self { cost })
    }

    #[must_use]
    pub const fn cost(&self) -> u32 {
        self.cost
    }

    /// Produce a `$2b$` hash.
    ///
    /// # Errors
    ///
    /// Returns an error if bcrypt fails (for example on interior NUL bytes).
    pub fn hash(&self, password: &str) -> Result<String, PasswordError> {
        Ok(bcrypt::hash(password, self.cost)?)
    }

    /// Check `password` against a stored value.
    ///
    /// Stored bcrypt hashes are verified with bcrypt. Anything else is a
    /// legacy plaintext password and is compared directly.
    ///
    /// # Errors
    ///
    /// Returns an error if the stored value looks like bcrypt but is malformed.
    pub fn verify(&self, password: &str, stored: &str) -> Result<bool, PasswordError> {
        if is_bcrypt_hash(stored) {
            return Ok(bcrypt::verify(password, stored)?);
        }
        Ok(!stored.is_empty() && constant_time_eq(password.as_bytes(), stored.as_bytes()))
    }

    /// Plaintext passwords should be replaced with a hash at the next chance.
    #[must_use]
    pub fn needs_rehash(&self, stored: &str) -> bool {
        !is_bcrypt_hash(stored)
    }
}

/// `$2a$`, `$2b$` and `$2y$` prefixes all identify bcrypt.
#[must_use]
pub fn is_bcrypt_hash(stored: &str) -> bool {
    ["$2a$", "$2b$", "$2y$"]
        .iter()
        .any(|prefix| stored.starts_with(prefix))
}

fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    a.iter().zip(b).fold(0u8, |acc, (x, y)| acc | (x ^ y)) == 0
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn fast() -> PasswordHasher {
        PasswordHasher::new(4).unwrap()
    }

    #[test]
    fn test_hash_and_verify() {
        let hasher = fast();
        let hash = hasher.hash("Glow@2024").unwrap();
        assert!(is_bcrypt_hash(&hash));
        assert!(hasher.verify("Glow@2024", &hash).unwrap());
        assert!(!hasher.verify("glow@2024", &hash).unwrap());
        assert!(!hasher.needs_rehash(&hash));
    }

    #[test]
    fn test_legacy_plaintext() {
        let hasher = fast();
        assert!(hasher.verify("admin123", "admin123").unwrap());
        assert!(!hasher.verify("admin12", "admin123").unwrap());
        assert!(!hasher.verify("", "").unwrap());
        assert!(hasher.needs_rehash("admin123"));
    }

    #[test]
    fn test_accepts_2y_prefix() {
        let hasher = fast();
        let hash = hasher.hash("secret-pass1!").unwrap();
        let php_style = hash.replacen("$2b$", "$2y$", 1);
        assert!(hasher.verify("secret-pass1!", &php_style).unwrap());
    }

    #[test]
    fn test_invalid_cost() {
        assert!(matches!(PasswordHasher::new(3), Err(PasswordError::InvalidCost(3))));
        assert!(PasswordHasher::new(32).is_err());
        assert_eq!(PasswordHasher::default().cost(), DEFAULT_COST);
    }
}
