//! Request DTOs and their shape validation.
//!
//! Validation mirrors the request-shape rules the service contract promises:
//! the first failing rule's message comes back with a 422. Domain rules
//! (conflicts, lead time, token expiry) live in the domain crates, not here.

use chrono::{Days, NaiveDate, Utc};
use serde::Deserialize;

use wardflow_core::{DoctorId, DomainError, DomainResult, PatientId};
use wardflow_identity::{BloodGroup, Genotype, Unit};

// -------------------------
// Field rules
// -------------------------

fn require_email(value: &str) -> DomainResult<()> {
    let value = value.trim();
    if value.len() < 6 || !value.contains('@') {
        return Err(DomainError::validation("email must be a valid email"));
    }
    Ok(())
}

fn require_len(label: &str, value: &str, min: usize) -> DomainResult<()> {
    if value.trim().len() < min {
        return Err(DomainError::validation(format!(
            "{label} must be at least {min} characters long"
        )));
    }
    Ok(())
}

fn require_phone(value: &str) -> DomainResult<()> {
    let value = value.trim();
    if value.len() < 11 {
        return Err(DomainError::validation(
            "phone number must be at least 11 characters long",
        ));
    }
    if value.len() > 15 {
        return Err(DomainError::validation(
            "phone number must be at most 15 characters long",
        ));
    }
    Ok(())
}

fn require_password(value: &str) -> DomainResult<()> {
    require_len("password", value, 6)
}

fn require_confirm(password: &str, confirm: &str) -> DomainResult<()> {
    if password != confirm {
        return Err(DomainError::validation(
            "confirm password must be the same as the password",
        ));
    }
    Ok(())
}

fn require_token(value: &str) -> DomainResult<()> {
    if value.len() != 6 || !value.chars().all(|c| c.is_ascii_digit()) {
        return Err(DomainError::validation("token must be 6 digits"));
    }
    Ok(())
}

fn parse_dob(value: &str) -> DomainResult<NaiveDate> {
    let dob = NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d")
        .map_err(|_| DomainError::validation("date of birth must be a valid date"))?;

    let today = Utc::now().date_naive();
    if dob >= today {
        return Err(DomainError::validation("date of birth must be in the past"));
    }
    if dob < today - Days::new(36525) {
        return Err(DomainError::validation(
            "date of birth must be within the last 100 years",
        ));
    }
    Ok(dob)
}

// -------------------------
// Hospital
// -------------------------

#[derive(Debug, Deserialize)]
pub struct CreateHospitalRequest {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub owner: String,
    pub address: String,
    pub username: String,
    pub password: String,
}

impl CreateHospitalRequest {
    pub fn validate(&self) -> DomainResult<()> {
        require_len("name", &self.name, 3)?;
        require_email(&self.email)?;
        require_phone(&self.phone)?;
        require_len("owner", &self.owner, 3)?;
        require_len("address", &self.address, 3)?;
        require_len("username", &self.username, 3)?;
        require_password(&self.password)
    }
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

impl LoginRequest {
    pub fn validate(&self) -> DomainResult<()> {
        require_email(&self.email)?;
        require_password(&self.password)
    }
}

// -------------------------
// Doctor
// -------------------------

#[derive(Debug, Deserialize)]
pub struct CreateDoctorRequest {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: String,
    #[serde(rename = "DOB")]
    pub date_of_birth: String,
    pub is_consultant: bool,
    pub unit: String,
    pub img_url: Option<String>,
}

impl CreateDoctorRequest {
    /// Shape-check the request; returns the parsed date of birth and unit.
    pub fn validate(&self) -> DomainResult<(NaiveDate, Unit)> {
        require_len("first name", &self.first_name, 3)?;
        require_len("last name", &self.last_name, 3)?;
        require_email(&self.email)?;
        require_phone(&self.phone)?;
        let dob = parse_dob(&self.date_of_birth)?;
        let unit: Unit = self.unit.parse()?;
        Ok((dob, unit))
    }
}

#[derive(Debug, Deserialize)]
pub struct ResetSystemPasswordRequest {
    pub id: String,
    pub old_password: String,
    pub password: String,
    pub confirm_password: String,
}

impl ResetSystemPasswordRequest {
    pub fn validate(&self) -> DomainResult<DoctorId> {
        if self.old_password.is_empty() {
            return Err(DomainError::validation("old password is required"));
        }
        require_password(&self.password)?;
        require_confirm(&self.password, &self.confirm_password)?;
        self.id.parse()
    }
}

// -------------------------
// Patient
// -------------------------

#[derive(Debug, Deserialize)]
pub struct CreatePatientRequest {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: String,
    #[serde(rename = "DOB")]
    pub date_of_birth: String,
    pub blood_group: String,
    pub genotype: String,
    pub password: String,
    pub confirm_password: String,
}

impl CreatePatientRequest {
    /// Shape-check the request; returns the parsed date of birth, blood
    /// group, and genotype.
    pub fn validate(&self) -> DomainResult<(NaiveDate, BloodGroup, Genotype)> {
        require_len("first name", &self.first_name, 3)?;
        require_len("last name", &self.last_name, 3)?;
        require_email(&self.email)?;
        require_phone(&self.phone)?;
        let dob = parse_dob(&self.date_of_birth)?;
        let blood_group: BloodGroup = self.blood_group.parse()?;
        let genotype: Genotype = self.genotype.parse()?;
        require_password(&self.password)?;
        require_confirm(&self.password, &self.confirm_password)?;
        Ok((dob, blood_group, genotype))
    }
}

#[derive(Debug, Deserialize)]
pub struct VerifyAccountRequest {
    pub email: String,
    pub token: String,
}

impl VerifyAccountRequest {
    pub fn validate(&self) -> DomainResult<()> {
        require_email(&self.email)?;
        require_token(&self.token)
    }
}

#[derive(Debug, Deserialize)]
pub struct ForgotPasswordRequest {
    pub email: String,
}

impl ForgotPasswordRequest {
    pub fn validate(&self) -> DomainResult<()> {
        require_email(&self.email)
    }
}

#[derive(Debug, Deserialize)]
pub struct ResetPasswordRequest {
    pub email: String,
    pub token: String,
    pub password: String,
    pub confirm_password: String,
}

impl ResetPasswordRequest {
    pub fn validate(&self) -> DomainResult<()> {
        require_email(&self.email)?;
        require_token(&self.token)?;
        require_password(&self.password)?;
        require_confirm(&self.password, &self.confirm_password)
    }
}

// -------------------------
// Reservation
// -------------------------

#[derive(Debug, Deserialize)]
pub struct CreateReservationRequest {
    pub time: String,
    pub date: String,
    pub patient: String,
    pub doctor: String,
}

impl CreateReservationRequest {
    /// Shape-check the request; returns the parsed actor ids. Date/time
    /// strings stay raw — the engine owns their parsing and the combination
    /// rule.
    pub fn validate(&self) -> DomainResult<(DoctorId, PatientId)> {
        if self.time.trim().is_empty() {
            return Err(DomainError::validation("time is required"));
        }
        if self.date.trim().is_empty() {
            return Err(DomainError::validation("date is required"));
        }
        let doctor: DoctorId = self.doctor.parse()?;
        let patient: PatientId = self.patient.parse()?;
        Ok((doctor, patient))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hospital_request_rejects_short_password() {
        let req = CreateHospitalRequest {
            name: "General".into(),
            email: "gen@w.test".into(),
            phone: "08030000001".into(),
            owner: "Owner".into(),
            address: "12 Harbor Rd".into(),
            username: "general".into(),
            password: "pw".into(),
        };
        let err = req.validate().unwrap_err();
        assert!(err.to_string().contains("password"));
    }

    #[test]
    fn patient_request_parses_enums_and_dob() {
        let req = CreatePatientRequest {
            first_name: "Bola".into(),
            last_name: "Adeyemi".into(),
            email: "bola@w.test".into(),
            phone: "08030000003".into(),
            date_of_birth: "1994-09-30".into(),
            blood_group: "0+".into(),
            genotype: "AS".into(),
            password: "secret1".into(),
            confirm_password: "secret1".into(),
        };
        let (dob, bg, gt) = req.validate().unwrap();
        assert_eq!(dob, NaiveDate::from_ymd_opt(1994, 9, 30).unwrap());
        assert_eq!(bg, BloodGroup::OPositive);
        assert_eq!(gt, Genotype::AS);
    }

    #[test]
    fn mismatched_confirm_password_is_named() {
        let req = ResetPasswordRequest {
            email: "bola@w.test".into(),
            token: "123456".into(),
            password: "secret1".into(),
            confirm_password: "secret2".into(),
        };
        let err = req.validate().unwrap_err();
        assert!(err.to_string().contains("confirm password"));
    }

    #[test]
    fn future_dob_is_rejected() {
        let tomorrow = (Utc::now() + chrono::Duration::days(1))
            .date_naive()
            .to_string();
        assert!(parse_dob(&tomorrow).is_err());
    }

    #[test]
    fn token_must_be_six_digits() {
        assert!(require_token("123456").is_ok());
        assert!(require_token("12345").is_err());
        assert!(require_token("12345a").is_err());
    }
}
