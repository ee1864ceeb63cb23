// src/job/validate.rs

//! Per-record validation: [`RawStep`] -> [`Step`].
//!
//! Only rules that can be checked by looking at a single record live here.
//! Cross-record rules (duplicate ids, unknown dependencies) are enforced by
//! the graph builder.

use tracing::debug;

use crate::dag::step::{Step, StepId};
use crate::errors::{Result, StepdagError};
use crate::job::model::{RawPrecedence, RawStep};

/// Validate every record in order, stopping at the first failure.
pub fn validate_steps(records: &[RawStep]) -> Result<Vec<Step>> {
    records
        .iter()
        .enumerate()
        .map(|(index, raw)| validate_step(index, raw))
        .collect()
}

/// Turn one raw record into a canonical [`Step`] with unresolved parents.
///
/// `index` is only used to make error messages point at the right record.
pub fn validate_step(index: usize, raw: &RawStep) -> Result<Step> {
    let id = validate_identifier(index, raw.step.as_deref())?;
    let precedence = validate_precedence(index, &id, raw.precedence.as_ref())?;
    let dependency_ids = validate_dependencies(index, &id, raw.dependencies.as_deref())?;

    debug!(
        step = %id,
        precedence,
        deps = dependency_ids.len(),
        "validated step record"
    );

    Ok(Step::new(id, precedence, dependency_ids))
}

fn validate_identifier(index: usize, raw: Option<&str>) -> Result<StepId> {
    let id = raw.map(str::trim).unwrap_or_default();

    if id.is_empty() {
        return Err(StepdagError::EmptyIdentifier { index });
    }
    if id.contains('\n') || id.contains('\r') {
        return Err(StepdagError::NewlineInIdentifier {
            index,
            id: id.to_string(),
        });
    }

    Ok(id.to_string())
}

fn validate_precedence(index: usize, id: &str, raw: Option<&RawPrecedence>) -> Result<u64> {
    let raw = raw.ok_or_else(|| StepdagError::MissingPrecedence {
        index,
        id: id.to_string(),
    })?;

    parse_precedence(raw).ok_or_else(|| StepdagError::InvalidPrecedence {
        index,
        id: id.to_string(),
        value: raw.to_string(),
    })
}

/// Strict base-10 parse. Floats are rejected even when integral (`5.0`).
fn parse_precedence(raw: &RawPrecedence) -> Option<u64> {
    let value = match raw {
        RawPrecedence::Integer(v) => u64::try_from(*v).ok()?,
        RawPrecedence::Unsigned(v) => *v,
        RawPrecedence::Text(s) | RawPrecedence::Literal(s) => parse_decimal(s)?,
        RawPrecedence::Float(_) | RawPrecedence::Bool(_) | RawPrecedence::Other(_) => return None,
    };

    (value > 0).then_some(value)
}

// Digits only: `str::parse` would also take a leading `+`.
fn parse_decimal(text: &str) -> Option<u64> {
    let digits = text.trim();
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    digits.parse().ok()
}

fn validate_dependencies(index: usize, id: &str, raw: Option<&[String]>) -> Result<Vec<StepId>> {
    raw.unwrap_or_default()
        .iter()
        .map(|dep| {
            let dep = dep.trim();
            if dep.is_empty() {
                Err(StepdagError::EmptyDependencyIdentifier {
                    index,
                    id: id.to_string(),
                })
            } else {
                Ok(dep.to_string())
            }
        })
        .collect()
}
