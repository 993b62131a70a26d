use crate::error::AppError;
use bcrypt::{hash, verify};

/// Salted, deliberately slow password hashing (bcrypt).
#[derive(Clone)]
pub struct PasswordHasher {
    cost: u32,
    // Verified against when the email is unknown, so a failed login costs
    // one bcrypt round whether or not the account exists.
    dummy_hash: String,
}

impl PasswordHasher {
    pub fn new(cost: u32) -> Result<Self, AppError> {
        let dummy_hash = hash("not-a-real-password", cost)?;
        Ok(Self { cost, dummy_hash })
    }

    pub fn hash(&self, password: &str) -> Result<String, AppError> {
        hash(password, self.cost)
            .map_err(|e| AppError::InternalServerError(format!("Failed to hash password: {}", e)))
    }

    /// Returns `false` for a wrong password and for a digest bcrypt cannot parse.
    pub fn verify(&self, password: &str, hashed_password: &str) -> bool {
        verify(password, hashed_password).unwrap_or(false)
    }

    /// Burns the same CPU as a real verification and always fails.
    pub fn verify_dummy(&self, password: &str) -> bool {
        let _ = self.verify(password, &self.dummy_hash);
        false
    }
}

impl std::fmt::Debug for PasswordHasher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PasswordHasher")
            .field("cost", &self.cost)
            .finish()
    }
}
