//! Doctor entity.

use core::str::FromStr;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use wardflow_core::{DomainError, DoctorId};

/// Hospital unit a doctor is attached to.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Unit {
    Pediatrics,
    Gynecology,
    #[serde(rename = "General Medicine")]
    GeneralMedicine,
    Surgery,
}

impl Unit {
    pub fn as_str(&self) -> &'static str {
        match self {
            Unit::Pediatrics => "Pediatrics",
            Unit::Gynecology => "Gynecology",
            Unit::GeneralMedicine => "General Medicine",
            Unit::Surgery => "Surgery",
        }
    }
}

impl core::fmt::Display for Unit {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Unit {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Pediatrics" => Ok(Unit::Pediatrics),
            "Gynecology" => Ok(Unit::Gynecology),
            "General Medicine" => Ok(Unit::GeneralMedicine),
            "Surgery" => Ok(Unit::Surgery),
            _ => Err(DomainError::validation(
                "unit must be one of Pediatrics, Gynecology, General Medicine, or Surgery",
            )),
        }
    }
}

/// A doctor account, created only by an authenticated admin.
///
/// # Invariants
/// - A fresh doctor holds a system-generated password hash and cannot pass
///   normal login until that password is rotated.
/// - Rotation is one-way: it sets `is_verified`, `is_active`, and
///   `has_changed_system_password` together with the new hash, and the
///   flags never go back.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Doctor {
    pub id: DoctorId,
    pub first_name: String,
    pub last_name: String,
    pub date_of_birth: NaiveDate,
    pub is_consultant: bool,
    pub unit: Unit,
    pub email: String,
    pub phone: String,
    pub img_url: Option<String>,
    pub password_hash: String,
    pub is_verified: bool,
    pub is_active: bool,
    pub has_changed_system_password: bool,
}

impl Doctor {
    /// Build a doctor record from admin-supplied input and the hash of the
    /// system-generated password.
    #[allow(clippy::too_many_arguments)]
    pub fn register(
        id: DoctorId,
        first_name: &str,
        last_name: &str,
        date_of_birth: NaiveDate,
        is_consultant: bool,
        unit: Unit,
        email: &str,
        phone: &str,
        img_url: Option<String>,
        password_hash: String,
    ) -> Self {
        Self {
            id,
            first_name: first_name.trim().to_string(),
            last_name: last_name.trim().to_string(),
            date_of_birth,
            is_consultant,
            unit,
            email: email.trim().to_lowercase(),
            phone: phone.trim().to_string(),
            img_url,
            password_hash,
            is_verified: false,
            is_active: false,
            has_changed_system_password: false,
        }
    }

    /// Apply the one-way system-password rotation.
    ///
    /// The caller has already verified the original system password; this
    /// stores the replacement hash and flips all three lifecycle flags so
    /// the whole transition lands in a single store update.
    pub fn complete_system_password_rotation(&mut self, new_hash: String) {
        self.password_hash = new_hash;
        self.is_verified = true;
        self.is_active = true;
        self.has_changed_system_password = true;
    }

    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }

    pub fn summary(&self) -> DoctorSummary {
        DoctorSummary {
            id: self.id,
            first_name: self.first_name.clone(),
            last_name: self.last_name.clone(),
            email: self.email.clone(),
            phone: self.phone.clone(),
            is_consultant: self.is_consultant,
            date_of_birth: self.date_of_birth,
            unit: self.unit,
            img_url: self.img_url.clone(),
            is_verified: self.is_verified,
        }
    }
}

/// Non-secret doctor fields returned by the API.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DoctorSummary {
    pub id: DoctorId,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: String,
    pub is_consultant: bool,
    #[serde(rename = "DOB")]
    pub date_of_birth: NaiveDate,
    pub unit: Unit,
    pub img_url: Option<String>,
    pub is_verified: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Doctor {
        Doctor::register(
            DoctorId::new(),
            "Ada",
            "Okafor",
            NaiveDate::from_ymd_opt(1986, 4, 12).unwrap(),
            true,
            Unit::Surgery,
            "Ada.Okafor@ward.test",
            "08030000002",
            None,
            "sys-hash".to_string(),
        )
    }

    #[test]
    fn fresh_doctor_is_inactive_and_unrotated() {
        let doctor = sample();
        assert!(!doctor.is_active);
        assert!(!doctor.is_verified);
        assert!(!doctor.has_changed_system_password);
        assert_eq!(doctor.email, "ada.okafor@ward.test");
    }

    #[test]
    fn rotation_flips_all_three_flags() {
        let mut doctor = sample();
        doctor.complete_system_password_rotation("new-hash".to_string());

        assert_eq!(doctor.password_hash, "new-hash");
        assert!(doctor.is_active);
        assert!(doctor.is_verified);
        assert!(doctor.has_changed_system_password);
    }

    #[test]
    fn unit_parses_the_four_wards() {
        assert_eq!("General Medicine".parse::<Unit>().unwrap(), Unit::GeneralMedicine);
        assert_eq!("Surgery".parse::<Unit>().unwrap(), Unit::Surgery);
        assert!("Cardiology".parse::<Unit>().is_err());
    }

    #[test]
    fn summary_serializes_dob_under_original_key() {
        let json = serde_json::to_value(sample().summary()).unwrap();
        assert!(json.get("DOB").is_some());
        assert_eq!(json["unit"], "Surgery");
    }
}
