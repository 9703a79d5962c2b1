use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FilterError {
    #[error("Unknown role filter: {0} (expected all, teacher, deanery or student)")]
    UnknownRole(String),
}
