// src/job/mod.rs

//! Job documents: raw records, loading and per-record validation.
//!
//! - `model.rs`: serde-backed raw record types and [`JobFormat`].
//! - `loader.rs`: YAML/TOML text (or a file) -> `Vec<RawStep>`.
//! - `validate.rs`: `RawStep` -> canonical [`Step`](crate::dag::Step).

pub mod loader;
pub mod model;
pub mod validate;

pub use loader::{load_from_path, parse_job};
pub use model::{JobFormat, RawPrecedence, RawStep};
pub use validate::{validate_step, validate_steps};
