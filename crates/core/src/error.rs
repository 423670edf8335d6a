use triage_types::TypesError;

#[derive(Debug, thiserror::Error)]
pub enum TriageError {
    #[error("invalid input: {0}")]
    InvalidInput(String),
    #[error(transparent)]
    Types(#[from] TypesError),

    #[error("patient {0} is already admitted or appears twice in the batch")]
    DuplicatePatient(String),
    #[error("facility id {0} is used more than once")]
    DuplicateFacility(u32),
    #[error("facility registry must contain at least one facility")]
    EmptyRegistry,
    #[error("facility registry lock is poisoned")]
    RegistryUnavailable,
    #[error("needs generator lock is poisoned")]
    GeneratorUnavailable,

    #[error("resource label {0:?} is mapped more than once")]
    DuplicateResourceLabel(String),

    #[error("failed to read facility fixture: {0}")]
    FixtureRead(std::io::Error),
    #[error("failed to parse facility fixture: {0}")]
    FixtureParse(serde_yaml::Error),
}

pub type TriageResult<T> = std::result::Result<T, TriageError>;
