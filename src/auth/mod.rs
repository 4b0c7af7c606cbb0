mod helpers;
mod models;
pub mod routes;

pub use helpers::{remember_admin, verify_admin, Admin};
pub use models::{CredentialStore, Credentials, SharedSecret};

#[cfg(test)]
pub use helpers::test_admin;
