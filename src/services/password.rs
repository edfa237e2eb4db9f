use argon2::{
    password_hash::{self, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
#[cfg(test)]
use argon2::{Algorithm, Params, Version};
use rand::rngs::OsRng;
use crate::errors::{AppError, AppResult};

/// Argon2id password hashing. Work runs on the blocking pool so request
/// threads are not stalled by the memory-hard computation.
#[derive(Clone)]
pub struct PasswordService {
    argon2: Argon2<'static>,
}

impl Default for PasswordService {
    fn default() -> Self {
        Self { argon2: Argon2::default() }
    }
}

impl PasswordService {
    fn hash_blocking(argon2: &Argon2<'_>, password: &str) -> Result<String, password_hash::Error> {
        let salt = SaltString::generate(&mut OsRng);
        Ok(argon2.hash_password(password.as_bytes(), &salt)?.to_string())
    }

    fn verify_blocking(
        argon2: &Argon2<'_>,
        password: &str,
        hash: &str,
    ) -> Result<bool, password_hash::Error> {
        let parsed = PasswordHash::new(hash)?;
        match argon2.verify_password(password.as_bytes(), &parsed) {
            Ok(()) => Ok(true),
            Err(password_hash::Error::Password) => Ok(false),
            Err(e) => Err(e),
        }
    }

    pub async fn hash(&self, password: String) -> AppResult<String> {
        let argon2 = self.argon2.clone();
        tokio::task::spawn_blocking(move || Self::hash_blocking(&argon2, &password))
            .await
            .map_err(|e| AppError::Internal(format!("hashing task panicked: {}", e)))?
            .map_err(|e| AppError::Hashing(e.to_string()))
    }

    /// `Ok(false)` for a wrong password; `Err` only when the stored hash is unusable.
    pub async fn verify(&self, password: String, hash: String) -> AppResult<bool> {
        let argon2 = self.argon2.clone();
        tokio::task::spawn_blocking(move || Self::verify_blocking(&argon2, &password, &hash))
            .await
            .map_err(|e| AppError::Internal(format!("verify task panicked: {}", e)))?
            .map_err(|e| AppError::Hashing(e.to_string()))
    }
}

#[cfg(test)]
pub(crate) fn fast_password_service() -> PasswordService {
    let params = Params::new(1024, 1, 1, None).expect("valid argon2 params");
    PasswordService {
        argon2: Argon2::new(Algorithm::Argon2id, Version::V0x13, params),
    }
}
