//! Resource types and per-patient resource needs.

use std::collections::BTreeMap;

/// A countable facility resource.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum ResourceKind {
    Bed,
    Specialist,
    GeneralPractitioner,
    Defibrillator,
    Scanner,
    Ventilator,
    BloodUnit,
}

impl ResourceKind {
    pub const ALL: [ResourceKind; 7] = [
        ResourceKind::Bed,
        ResourceKind::Specialist,
        ResourceKind::GeneralPractitioner,
        ResourceKind::Defibrillator,
        ResourceKind::Scanner,
        ResourceKind::Ventilator,
        ResourceKind::BloodUnit,
    ];

    /// Wire name, identical to the serde representation.
    pub fn as_str(self) -> &'static str {
        match self {
            ResourceKind::Bed => "bed",
            ResourceKind::Specialist => "specialist",
            ResourceKind::GeneralPractitioner => "general_practitioner",
            ResourceKind::Defibrillator => "defibrillator",
            ResourceKind::Scanner => "scanner",
            ResourceKind::Ventilator => "ventilator",
            ResourceKind::BloodUnit => "blood_unit",
        }
    }
}

impl std::fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Quantities of each resource type, keyed in a fixed order.
///
/// An absent key means zero. The same shape is used for patient needs, facility capacity and
/// available resources.
#[derive(Debug, Clone, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(transparent)]
pub struct Needs(BTreeMap<ResourceKind, u32>);

impl Needs {
    pub fn new() -> Self {
        Self::default()
    }

    /// Quantity for `kind`, zero when absent.
    pub fn get(&self, kind: ResourceKind) -> u32 {
        self.0.get(&kind).copied().unwrap_or(0)
    }

    /// Sets the quantity for `kind`, replacing any previous value.
    pub fn set(&mut self, kind: ResourceKind, qty: u32) {
        self.0.insert(kind, qty);
    }

    /// Adds `qty` units of `kind`.
    pub fn add(&mut self, kind: ResourceKind, qty: u32) {
        let entry = self.0.entry(kind).or_insert(0);
        *entry = entry.saturating_add(qty);
    }

    pub fn with(mut self, kind: ResourceKind, qty: u32) -> Self {
        self.set(kind, qty);
        self
    }

    pub fn iter(&self) -> impl Iterator<Item = (ResourceKind, u32)> + '_ {
        self.0.iter().map(|(k, v)| (*k, *v))
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn total_units(&self) -> u64 {
        self.0.values().map(|v| u64::from(*v)).sum()
    }

    /// Map keyed by wire names, for JSON responses.
    pub fn to_wire(&self) -> BTreeMap<String, u32> {
        self.iter().map(|(k, v)| (k.as_str().to_string(), v)).collect()
    }
}

impl FromIterator<(ResourceKind, u32)> for Needs {
    fn from_iter<I: IntoIterator<Item = (ResourceKind, u32)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn absent_kind_reads_as_zero() {
        let needs = Needs::new().with(ResourceKind::Bed, 1);
        assert_eq!(needs.get(ResourceKind::Bed), 1);
        assert_eq!(needs.get(ResourceKind::Scanner), 0);
    }

    #[test]
    fn add_accumulates() {
        let mut needs = Needs::new().with(ResourceKind::BloodUnit, 2);
        needs.add(ResourceKind::BloodUnit, 1);
        needs.add(ResourceKind::Ventilator, 1);
        assert_eq!(needs.get(ResourceKind::BloodUnit), 3);
        assert_eq!(needs.total_units(), 4);
    }

    #[test]
    fn serialises_with_snake_case_keys() {
        let needs = Needs::new()
            .with(ResourceKind::GeneralPractitioner, 1)
            .with(ResourceKind::Bed, 2);
        let json = serde_json::to_string(&needs).unwrap();
        assert_eq!(json, r#"{"bed":2,"general_practitioner":1}"#);
    }

    #[test]
    fn unknown_resource_key_is_rejected() {
        assert!(serde_json::from_str::<Needs>(r#"{"lit":1}"#).is_err());
    }

    #[test]
    fn wire_names_match_serde_representation() {
        for kind in ResourceKind::ALL {
            let json = serde_json::to_string(&kind).unwrap();
            assert_eq!(json, format!("\"{}\"", kind.as_str()));
            let back: ResourceKind = serde_json::from_str(&json).unwrap();
            assert_eq!(back, kind);
        }
    }
}
