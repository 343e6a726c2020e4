use thiserror::Error;

#[derive(Error, Debug)]
pub enum VisitorError {
    #[error("{0}")]
    Validation(String),

    #[error("Visitor store unavailable: {0}")]
    ServiceUnavailable(#[source] anyhow::Error),
}
