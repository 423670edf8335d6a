//! Wire types for the triage API.
//!
//! Field names follow the public JSON contract (`esi`, `ressources`, `assigned_chu`, `chus`), which
//! existing front-ends already consume.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use triage_core::{AllocationOutcome, FacilitySnapshot, IntakeRequest, PatientId, Reallocation};
use utoipa::ToSchema;

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct HealthRes {
    pub ok: bool,
    pub message: String,
}

/// Triage level as sent by clients: a JSON integer or a numeric string such as `"3"`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum EsiValue {
    Number(i64),
    Text(String),
}

impl EsiValue {
    /// The numeric level, or `None` when the text is not an integer.
    pub fn as_level(&self) -> Option<i64> {
        match self {
            EsiValue::Number(n) => Some(*n),
            EsiValue::Text(s) => s.trim().parse().ok(),
        }
    }
}

/// Incoming patient.
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
pub struct AssignPatientReq {
    /// Caller-supplied patient id; generated when absent.
    #[serde(default)]
    pub id: Option<String>,
    /// Triage level, 1 (most severe) to 5. Numeric strings are accepted.
    #[serde(default)]
    #[schema(value_type = Option<i64>)]
    pub esi: Option<EsiValue>,
    /// Free-text resource labels, e.g. "Lit" or "Respirateur".
    #[serde(default)]
    pub ressources: Vec<String>,
}

impl AssignPatientReq {
    /// Converts to a core intake request. `None` when the level is missing or not an integer.
    pub fn into_intake_request(self) -> Option<IntakeRequest> {
        Some(IntakeRequest {
            id: self.id,
            level: self.esi?.as_level()?,
            resources: self.ressources,
        })
    }
}

/// One facility as reported to clients.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct FacilityView {
    pub id: u32,
    #[schema(value_type = Object)]
    pub available_resources: BTreeMap<String, u32>,
    pub assigned_patients: usize,
    pub distance: u32,
}

impl From<&FacilitySnapshot> for FacilityView {
    fn from(snapshot: &FacilitySnapshot) -> Self {
        Self {
            id: snapshot.id.value(),
            available_resources: snapshot.available.to_wire(),
            assigned_patients: snapshot.admitted,
            distance: snapshot.distance_km,
        }
    }
}

/// `[released_patient_id, facility_id, incoming_patient_id, freed_needs]`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReallocationEntry(
    pub String,
    pub u32,
    pub String,
    pub BTreeMap<String, u32>,
);

impl From<&Reallocation> for ReallocationEntry {
    fn from(event: &Reallocation) -> Self {
        Self(
            event.released_patient_id.to_string(),
            event.facility_id.value(),
            event.incoming_patient_id.to_string(),
            event.freed_needs.to_wire(),
        )
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct AssignPatientRes {
    pub patient_id: String,
    pub assigned_chu: Option<u32>,
    pub chus: Vec<FacilityView>,
    #[schema(value_type = Vec<Vec<Object>>)]
    pub reallocations: Vec<ReallocationEntry>,
    pub unassigned: Vec<String>,
    /// Labels that did not match any known resource and were ignored.
    #[serde(default)]
    pub unrecognised_resources: Vec<String>,
}

impl AssignPatientRes {
    pub fn new(
        patient_id: &PatientId,
        outcome: &AllocationOutcome,
        facilities: &[FacilitySnapshot],
        unrecognised_resources: Vec<String>,
    ) -> Self {
        Self {
            patient_id: patient_id.to_string(),
            assigned_chu: outcome.facility_of(patient_id).map(|f| f.value()),
            chus: facilities.iter().map(FacilityView::from).collect(),
            reallocations: outcome
                .reallocations
                .iter()
                .map(ReallocationEntry::from)
                .collect(),
            unassigned: outcome.unassigned.iter().map(|id| id.to_string()).collect(),
            unrecognised_resources,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct FacilitiesRes {
    pub chus: Vec<FacilityView>,
}

impl FacilitiesRes {
    pub fn new(facilities: &[FacilitySnapshot]) -> Self {
        Self {
            chus: facilities.iter().map(FacilityView::from).collect(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct DischargeRes {
    pub patient_id: String,
    /// Facility the patient left; `null` when they were not admitted.
    pub released_from: Option<u32>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use triage_core::{FacilityId, Needs, ResourceKind};

    fn pid(s: &str) -> PatientId {
        PatientId::new(s).unwrap()
    }

    #[test]
    fn request_without_esi_has_no_intake() {
        let req: AssignPatientReq = serde_json::from_str(r#"{"id": "P1"}"#).unwrap();
        assert!(req.into_intake_request().is_none());
    }

    #[test]
    fn numeric_string_esi_is_accepted() {
        let req: AssignPatientReq = serde_json::from_str(r#"{"esi": " 3 "}"#).unwrap();
        assert_eq!(req.into_intake_request().unwrap().level, 3);

        let req: AssignPatientReq = serde_json::from_str(r#"{"esi": "urgent"}"#).unwrap();
        assert!(req.into_intake_request().is_none());
    }

    #[test]
    fn request_fields_map_to_intake() {
        let req: AssignPatientReq =
            serde_json::from_str(r#"{"esi": 2, "ressources": ["Lit", "Sang"]}"#).unwrap();
        let intake = req.into_intake_request().unwrap();
        assert_eq!(intake.level, 2);
        assert!(intake.id.is_none());
        assert_eq!(intake.resources, vec!["Lit", "Sang"]);
    }

    #[test]
    fn reallocation_serialises_as_four_element_array() {
        let event = Reallocation {
            released_patient_id: pid("A"),
            facility_id: FacilityId(3),
            incoming_patient_id: pid("B"),
            freed_needs: Needs::new().with(ResourceKind::Bed, 1),
        };
        let json = serde_json::to_value(ReallocationEntry::from(&event)).unwrap();
        assert_eq!(json, serde_json::json!(["A", 3, "B", {"bed": 1}]));
    }

    #[test]
    fn response_reports_assignment_and_facilities() {
        let mut outcome = AllocationOutcome::default();
        outcome.allocation.insert(pid("B"), FacilityId(0));
        outcome.unassigned.push(pid("A"));
        let facilities = vec![FacilitySnapshot {
            id: FacilityId(0),
            distance_km: 7,
            available: Needs::new().with(ResourceKind::Bed, 0),
            admitted: 1,
        }];

        let res = AssignPatientRes::new(&pid("B"), &outcome, &facilities, vec![]);
        let json = serde_json::to_value(&res).unwrap();

        assert_eq!(json["patient_id"], "B");
        assert_eq!(json["assigned_chu"], 0);
        assert_eq!(json["unassigned"], serde_json::json!(["A"]));
        assert_eq!(
            json["chus"][0],
            serde_json::json!({
                "id": 0,
                "available_resources": {"bed": 0},
                "assigned_patients": 1,
                "distance": 7
            })
        );
    }

    #[test]
    fn unassigned_patient_has_null_facility() {
        let outcome = AllocationOutcome {
            unassigned: vec![pid("A")],
            ..Default::default()
        };
        let res = AssignPatientRes::new(&pid("A"), &outcome, &[], vec!["Hélico".into()]);
        let json = serde_json::to_value(&res).unwrap();
        assert!(json["assigned_chu"].is_null());
        assert_eq!(json["unrecognised_resources"], serde_json::json!(["Hélico"]));
    }
}
