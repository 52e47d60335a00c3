//! Patient entity.

use core::str::FromStr;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use wardflow_core::{DomainError, PatientId};

/// ABO/Rh blood group. Wire strings follow the original records, which use
/// `0` (zero) for the O group.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum BloodGroup {
    #[serde(rename = "A+")]
    APositive,
    #[serde(rename = "B+")]
    BPositive,
    #[serde(rename = "AB+")]
    AbPositive,
    #[serde(rename = "0+")]
    OPositive,
    #[serde(rename = "A-")]
    ANegative,
    #[serde(rename = "B-")]
    BNegative,
    #[serde(rename = "AB-")]
    AbNegative,
    #[serde(rename = "0-")]
    ONegative,
}

impl BloodGroup {
    pub fn as_str(&self) -> &'static str {
        match self {
            BloodGroup::APositive => "A+",
            BloodGroup::BPositive => "B+",
            BloodGroup::AbPositive => "AB+",
            BloodGroup::OPositive => "0+",
            BloodGroup::ANegative => "A-",
            BloodGroup::BNegative => "B-",
            BloodGroup::AbNegative => "AB-",
            BloodGroup::ONegative => "0-",
        }
    }
}

impl core::fmt::Display for BloodGroup {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BloodGroup {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "A+" => Ok(BloodGroup::APositive),
            "B+" => Ok(BloodGroup::BPositive),
            "AB+" => Ok(BloodGroup::AbPositive),
            "0+" => Ok(BloodGroup::OPositive),
            "A-" => Ok(BloodGroup::ANegative),
            "B-" => Ok(BloodGroup::BNegative),
            "AB-" => Ok(BloodGroup::AbNegative),
            "0-" => Ok(BloodGroup::ONegative),
            _ => Err(DomainError::validation(
                "blood group must be one of A+, B+, AB+, 0+, A-, B-, AB-, 0-",
            )),
        }
    }
}

/// Hemoglobin genotype.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Genotype {
    AA,
    AS,
    SS,
}

impl Genotype {
    pub fn as_str(&self) -> &'static str {
        match self {
            Genotype::AA => "AA",
            Genotype::AS => "AS",
            Genotype::SS => "SS",
        }
    }
}

impl core::fmt::Display for Genotype {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Genotype {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "AA" => Ok(Genotype::AA),
            "AS" => Ok(Genotype::AS),
            "SS" => Ok(Genotype::SS),
            _ => Err(DomainError::validation("genotype must be one of AA, AS, SS")),
        }
    }
}

/// A patient account.
///
/// # Invariants
/// - `verify_token` and `token_expires_at` are both present or both absent;
///   consuming a token clears the pair in the same update.
/// - `password_hash` changes only through the explicit set-password path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Patient {
    pub id: PatientId,
    pub first_name: String,
    pub last_name: String,
    pub date_of_birth: NaiveDate,
    pub blood_group: BloodGroup,
    pub genotype: Genotype,
    pub email: String,
    pub phone: String,
    pub img_url: Option<String>,
    pub is_verified: bool,
    pub password_hash: String,
    pub verify_token: Option<String>,
    pub token_expires_at: Option<DateTime<Utc>>,
}

impl Patient {
    /// Build a patient record from registration input, a pre-hashed password,
    /// and the freshly issued verification token pair.
    #[allow(clippy::too_many_arguments)]
    pub fn register(
        id: PatientId,
        first_name: &str,
        last_name: &str,
        date_of_birth: NaiveDate,
        blood_group: BloodGroup,
        genotype: Genotype,
        email: &str,
        phone: &str,
        password_hash: String,
        verify_token_hash: String,
        token_expires_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            first_name: first_name.trim().to_string(),
            last_name: last_name.trim().to_string(),
            date_of_birth,
            blood_group,
            genotype,
            email: email.trim().to_lowercase(),
            phone: phone.trim().to_string(),
            img_url: None,
            is_verified: false,
            password_hash,
            verify_token: Some(verify_token_hash),
            token_expires_at: Some(token_expires_at),
        }
    }

    /// Attach a new timed token pair (email verification or password reset).
    pub fn issue_token(&mut self, hash: String, expires_at: DateTime<Utc>) {
        self.verify_token = Some(hash);
        self.token_expires_at = Some(expires_at);
    }

    /// Clear the token pair after consumption.
    pub fn clear_token(&mut self) {
        self.verify_token = None;
        self.token_expires_at = None;
    }

    /// Mark the account verified and retire the token pair.
    pub fn mark_verified(&mut self) {
        self.is_verified = true;
        self.clear_token();
    }

    /// Explicit password update; the only mutation of `password_hash`.
    pub fn set_password_hash(&mut self, hash: String) {
        self.password_hash = hash;
    }

    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }

    pub fn summary(&self) -> PatientSummary {
        PatientSummary {
            id: self.id,
            first_name: self.first_name.clone(),
            last_name: self.last_name.clone(),
            email: self.email.clone(),
            phone: self.phone.clone(),
            blood_group: self.blood_group,
            date_of_birth: self.date_of_birth,
            genotype: self.genotype,
            is_verified: self.is_verified,
        }
    }
}

/// Non-secret patient fields returned by the API.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PatientSummary {
    pub id: PatientId,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: String,
    pub blood_group: BloodGroup,
    #[serde(rename = "DOB")]
    pub date_of_birth: NaiveDate,
    pub genotype: Genotype,
    pub is_verified: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn sample() -> Patient {
        Patient::register(
            PatientId::new(),
            "Bola",
            "Adeyemi",
            NaiveDate::from_ymd_opt(1994, 9, 30).unwrap(),
            BloodGroup::OPositive,
            Genotype::AS,
            "bola@ward.test",
            "08030000003",
            "pw-hash".to_string(),
            "token-hash".to_string(),
            Utc::now() + Duration::hours(24),
        )
    }

    #[test]
    fn fresh_patient_is_unverified_with_token_pair() {
        let patient = sample();
        assert!(!patient.is_verified);
        assert!(patient.verify_token.is_some());
        assert!(patient.token_expires_at.is_some());
    }

    #[test]
    fn mark_verified_clears_the_token_pair_together() {
        let mut patient = sample();
        patient.mark_verified();

        assert!(patient.is_verified);
        assert!(patient.verify_token.is_none());
        assert!(patient.token_expires_at.is_none());
    }

    #[test]
    fn blood_group_uses_zero_for_o_group() {
        assert_eq!("0+".parse::<BloodGroup>().unwrap(), BloodGroup::OPositive);
        assert!("O+".parse::<BloodGroup>().is_err());
        assert_eq!(
            serde_json::to_value(BloodGroup::ONegative).unwrap(),
            serde_json::json!("0-")
        );
    }

    #[test]
    fn summary_has_no_secret_fields() {
        let json = serde_json::to_string(&sample().summary()).unwrap();
        assert!(!json.contains("hash"));
        assert!(!json.contains("token"));
    }
}
