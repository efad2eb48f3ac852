/// Failures surfaced by the preference store. Callers decide whether a
/// failure aborts the request (CRUD) or is merely recorded (the voice
/// pipeline).
#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("database connection failed: {0}")]
    ConnectionFailed(String),
    #[error("database query failed: {0}")]
    QueryFailed(String),
    #[error("record not found: {0}")]
    NotFound(String),
    #[error("database constraint violated: {0}")]
    ConstraintViolation(String),
}
