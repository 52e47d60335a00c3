//! Hospital (admin) entity.

use serde::{Deserialize, Serialize};

use wardflow_core::HospitalId;

/// A registered hospital. The hospital account is the system's admin actor.
///
/// # Invariants
/// - `is_admin` is always true; there is no non-admin hospital.
/// - `password_hash` changes only through the explicit set-password path.
/// - email/phone/username are unique across hospitals (directory pre-check
///   plus store-level constraint).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Hospital {
    pub id: HospitalId,
    pub name: String,
    pub owner: String,
    pub address: String,
    pub email: String,
    pub phone: String,
    pub username: String,
    pub password_hash: String,
    pub is_admin: bool,
}

impl Hospital {
    /// Build a hospital record from registration input and a pre-hashed
    /// password. Normalizes whitespace and lowercases the email.
    #[allow(clippy::too_many_arguments)]
    pub fn register(
        id: HospitalId,
        name: &str,
        owner: &str,
        address: &str,
        email: &str,
        phone: &str,
        username: &str,
        password_hash: String,
    ) -> Self {
        Self {
            id,
            name: name.trim().to_string(),
            owner: owner.trim().to_string(),
            address: address.trim().to_string(),
            email: email.trim().to_lowercase(),
            phone: phone.trim().to_string(),
            username: username.trim().to_string(),
            password_hash,
            is_admin: true,
        }
    }

    /// Explicit password update; the only mutation of `password_hash`.
    pub fn set_password_hash(&mut self, hash: String) {
        self.password_hash = hash;
    }

    pub fn summary(&self) -> HospitalSummary {
        HospitalSummary {
            id: self.id,
            name: self.name.clone(),
            owner: self.owner.clone(),
            email: self.email.clone(),
            phone: self.phone.clone(),
            username: self.username.clone(),
            address: self.address.clone(),
        }
    }
}

/// Non-secret hospital fields returned by the API.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HospitalSummary {
    pub id: HospitalId,
    pub name: String,
    pub owner: String,
    pub email: String,
    pub phone: String,
    pub username: String,
    pub address: String,
}
