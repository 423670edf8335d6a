use crate::TypesError;

/// Levels at or below this value may displace less urgent admitted patients.
const PREEMPTIVE_MAX: u8 = 3;

/// Emergency Severity Index triage level.
///
/// Level 1 is the most severe and level 5 the least. Ordering follows the numeric value, so a
/// *smaller* level sorts first and means *more* urgent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TriageLevel(u8);

impl TriageLevel {
    /// Creates a triage level from an untrusted integer.
    ///
    /// # Errors
    ///
    /// Returns [`TypesError::InvalidTriageLevel`] unless `value` is within 1..=5.
    pub fn new(value: i64) -> Result<Self, TypesError> {
        match value {
            1..=5 => Ok(Self(value as u8)),
            other => Err(TypesError::InvalidTriageLevel(other)),
        }
    }

    /// Returns the numeric level.
    pub fn value(self) -> u8 {
        self.0
    }

    /// Whether a patient at this level may trigger preemptive reallocation.
    pub fn is_preemptive(self) -> bool {
        self.0 <= PREEMPTIVE_MAX
    }

    /// Whether `self` is strictly less severe than `other`.
    pub fn is_less_severe_than(self, other: TriageLevel) -> bool {
        self.0 > other.0
    }

    /// All levels from most to least severe.
    pub fn all() -> impl Iterator<Item = TriageLevel> {
        (1..=5).map(TriageLevel)
    }
}

impl std::fmt::Display for TriageLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "ESI {}", self.0)
    }
}

impl serde::Serialize for TriageLevel {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_u8(self.0)
    }
}

impl<'de> serde::Deserialize<'de> for TriageLevel {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let raw = i64::deserialize(deserializer)?;
        TriageLevel::new(raw).map_err(serde::de::Error::custom)
    }
}
