use crate::actor::actionerror::ActionError;
use crate::api::uaa::UaaError;
use crate::api::CcError;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error(transparent)]
    Api(#[from] CcError),

    #[error(transparent)]
    Uaa(#[from] UaaError),

    #[error(transparent)]
    Action(#[from] ActionError),

    #[error("Warning: Error read/writing config: unexpected end of JSON input for {}", path.display())]
    EmptyConfig { path: PathBuf },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Template error: {0}")]
    Template(String),
}

impl Error {
    /// True for a Cloud Controller 404, whichever layer it surfaced through.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Error::Api(e) if e.is_not_found())
    }
}

pub type Result<T> = std::result::Result<T, Error>;
