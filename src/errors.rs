// src/errors.rs

//! Crate-wide error type.
//!
//! Every failure the ordering pipeline can produce is a variant of
//! [`StepdagError`]. The pipeline fails fast: the first violation found is
//! returned and nothing is ordered.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum StepdagError {
    /// The job document could not be turned into step records.
    #[error("malformed input: {0}")]
    MalformedInput(String),

    #[error("job contains no steps")]
    EmptyJob,

    /// `index` is the zero-based position of the record in the job.
    #[error("step #{index}: identifier is missing or empty")]
    EmptyIdentifier { index: usize },

    #[error("step #{index}: identifier {id:?} contains a newline")]
    NewlineInIdentifier { index: usize, id: String },

    #[error("duplicate step identifier '{0}'")]
    DuplicateStepIdentifier(String),

    #[error("step '{id}' (#{index}): precedence is missing")]
    MissingPrecedence { index: usize, id: String },

    #[error(
        "step '{id}' (#{index}): invalid precedence {value}, expected a positive integer"
    )]
    InvalidPrecedence {
        index: usize,
        id: String,
        value: String,
    },

    #[error("step '{id}' (#{index}): dependency identifier is empty")]
    EmptyDependencyIdentifier { index: usize, id: String },

    #[error("step '{step}' depends on unknown step '{missing}'")]
    UnknownDependency { step: String, missing: String },

    /// `cycle` lists the steps that sit on a dependency cycle; `blocked` is
    /// the total number of steps that could not be scheduled, including
    /// steps that are only downstream of a cycle.
    #[error("cyclic dependency between steps [{}] ({blocked} step(s) left unscheduled)", .cycle.join(", "))]
    CyclicDependency { cycle: Vec<String>, blocked: usize },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Coarse category of a [`StepdagError`], without its payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    MalformedInput,
    EmptyJob,
    EmptyIdentifier,
    NewlineInIdentifier,
    DuplicateStepIdentifier,
    MissingPrecedence,
    InvalidPrecedence,
    EmptyDependencyIdentifier,
    UnknownDependency,
    CyclicDependency,
    Io,
    Other,
}

impl StepdagError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            StepdagError::MalformedInput(_) => ErrorKind::MalformedInput,
            StepdagError::EmptyJob => ErrorKind::EmptyJob,
            StepdagError::EmptyIdentifier { .. } => ErrorKind::EmptyIdentifier,
            StepdagError::NewlineInIdentifier { .. } => ErrorKind::NewlineInIdentifier,
            StepdagError::DuplicateStepIdentifier(_) => ErrorKind::DuplicateStepIdentifier,
            StepdagError::MissingPrecedence { .. } => ErrorKind::MissingPrecedence,
            StepdagError::InvalidPrecedence { .. } => ErrorKind::InvalidPrecedence,
            StepdagError::EmptyDependencyIdentifier { .. } => {
                ErrorKind::EmptyDependencyIdentifier
            }
            StepdagError::UnknownDependency { .. } => ErrorKind::UnknownDependency,
            StepdagError::CyclicDependency { .. } => ErrorKind::CyclicDependency,
            StepdagError::Io(_) => ErrorKind::Io,
            StepdagError::Other(_) => ErrorKind::Other,
        }
    }
}

pub type Result<T> = std::result::Result<T, StepdagError>;
