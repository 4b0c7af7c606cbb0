use actix_identity::Identity;

use crate::errors::ServiceError;

/// the identity remembered for a logged in administrator
const ADMIN_IDENTITY: &str = "admin";

/// Proof that the current request belongs to an administrator.
///
/// Admin operations take an `&Admin`, it can only be obtained through
/// `verify_admin`.
#[derive(Debug)]
pub struct Admin {
    _private: (),
}

/// check if an administrator is logged in
/// returns LoginRequired when no admin identity is found
pub fn verify_admin(id: &Identity) -> Result<Admin, ServiceError> {
    match id.identity() {
        Some(ref identity) if identity == ADMIN_IDENTITY => Ok(Admin { _private: () }),
        _ => Err(ServiceError::LoginRequired),
    }
}

/// remember the administrator on this session
pub fn remember_admin(id: &Identity) {
    id.remember(ADMIN_IDENTITY.to_string());
}

#[cfg(test)]
pub fn test_admin() -> Admin {
    Admin { _private: () }
}
