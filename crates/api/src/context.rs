use wardflow_core::HospitalId;

/// Admin (hospital) context for a request, attached by the admin gate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AdminContext {
    hospital_id: HospitalId,
    name: String,
}

impl AdminContext {
    pub fn new(hospital_id: HospitalId, name: String) -> Self {
        Self { hospital_id, name }
    }

    pub fn hospital_id(&self) -> HospitalId {
        self.hospital_id
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}
