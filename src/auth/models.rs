use argon2::Config;
use rand::Rng;

use crate::errors::ServiceError;

#[derive(Deserialize)]
pub struct Credentials {
    pub password: String,
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials").finish()
    }
}

/// Decides whether a submitted password grants admin access
pub trait CredentialStore: Send + Sync {
    fn verify(&self, password: &str) -> Result<(), ServiceError>;
}

/// a single shared admin secret, only its argon2 hash is kept in memory
pub struct SharedSecret {
    hash: String,
}

impl std::fmt::Debug for SharedSecret {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SharedSecret").finish()
    }
}

impl SharedSecret {
    pub fn new(secret: &str) -> Result<Self, ServiceError> {
        let salt: [u8; 32] = rand::thread_rng().gen();
        let config = Config::default();

        let hash = argon2::hash_encoded(secret.trim().as_bytes(), &salt, &config)?;

        Ok(SharedSecret { hash })
    }
}

impl CredentialStore for SharedSecret {
    fn verify(&self, password: &str) -> Result<(), ServiceError> {
        let is_match = argon2::verify_encoded(&self.hash, password.trim().as_bytes())?;

        if !is_match {
            return Err(ServiceError::Unauthorized);
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn incorrect_password() {
        let secret = SharedSecret::new("hunter2boogaloo").unwrap();

        assert!(secret.verify("hunter2boogaloo").is_ok());
        assert_eq!(
            secret.verify("not-hunter2"),
            Err(ServiceError::Unauthorized)
        );
    }

    #[test]
    fn surrounding_whitespace_is_ignored() {
        let secret = SharedSecret::new("hunter2boogaloo").unwrap();

        assert!(secret.verify("  hunter2boogaloo\n").is_ok());
    }

    #[test]
    fn the_secret_should_not_leak() {
        let secret = SharedSecret::new("hunter2boogaloo").unwrap();

        assert!(!secret.hash.contains("hunter2boogaloo"));
        assert!(!format!("{:?}", secret).contains("hunter2boogaloo"));
    }
}
