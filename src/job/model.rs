// src/job/model.rs

use std::fmt;
use std::path::Path;
use std::str::FromStr;

use clap::ValueEnum;
use serde::de::{self, IgnoredAny, MapAccess, SeqAccess, Visitor};
use serde::{Deserialize, Deserializer};
use toml::Spanned;

/// One step as written in a job document, before any validation.
///
/// YAML form:
///
/// ```yaml
/// - step: "create user 1"
///   dependencies: ["prepare database"]
///   precedence: 100
/// ```
///
/// TOML form (`name` is accepted as an alias of `step`):
///
/// ```toml
/// [[step]]
/// name = "create user 1"
/// dependencies = ["prepare database"]
/// precedence = 100
/// ```
///
/// Every field is optional at this level so that the validator, not the
/// deserializer, decides what a missing field means.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RawStep {
    /// The step name; its trimmed form becomes the step id.
    #[serde(default, alias = "name")]
    pub step: Option<String>,

    #[serde(default)]
    pub precedence: Option<RawPrecedence>,

    /// Absent and `[]` both mean "no dependencies".
    #[serde(default)]
    pub dependencies: Option<Vec<String>>,
}

/// Precedence exactly as the document spelled it.
///
/// Loaders replace every unquoted number with [`RawPrecedence::Literal`]
/// holding its source text, so `0x10`, `+10` and `5.0` reach the validator
/// as written. The typed numeric variants are for records built in code.
#[derive(Debug, Clone, PartialEq)]
pub enum RawPrecedence {
    Integer(i64),
    Unsigned(u64),
    Float(f64),
    /// A quoted string.
    Text(String),
    /// An unquoted scalar, verbatim.
    Literal(String),
    Bool(bool),
    /// Anything that is not a scalar: a sequence, a mapping, a TOML datetime.
    Other(String),
}

impl RawPrecedence {
    /// True for values the document wrote as a bare number.
    pub fn is_number(&self) -> bool {
        matches!(
            self,
            RawPrecedence::Integer(_)
                | RawPrecedence::Unsigned(_)
                | RawPrecedence::Float(_)
                | RawPrecedence::Literal(_)
        )
    }
}

impl fmt::Display for RawPrecedence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RawPrecedence::Integer(v) => write!(f, "{v}"),
            RawPrecedence::Unsigned(v) => write!(f, "{v}"),
            RawPrecedence::Float(v) => write!(f, "{v:?}"),
            RawPrecedence::Text(s) => write!(f, "{s:?}"),
            RawPrecedence::Literal(s) | RawPrecedence::Other(s) => f.write_str(s),
            RawPrecedence::Bool(b) => write!(f, "{b}"),
        }
    }
}

// Accepts any value so that a bad precedence is reported against its record
// instead of failing the whole document.
impl<'de> Deserialize<'de> for RawPrecedence {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_any(RawPrecedenceVisitor)
    }
}

struct RawPrecedenceVisitor;

impl<'de> Visitor<'de> for RawPrecedenceVisitor {
    type Value = RawPrecedence;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a precedence value")
    }

    fn visit_bool<E: de::Error>(self, v: bool) -> Result<Self::Value, E> {
        Ok(RawPrecedence::Bool(v))
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> Result<Self::Value, E> {
        Ok(RawPrecedence::Integer(v))
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> Result<Self::Value, E> {
        Ok(RawPrecedence::Unsigned(v))
    }

    fn visit_i128<E: de::Error>(self, v: i128) -> Result<Self::Value, E> {
        Ok(RawPrecedence::Literal(v.to_string()))
    }

    fn visit_u128<E: de::Error>(self, v: u128) -> Result<Self::Value, E> {
        Ok(RawPrecedence::Literal(v.to_string()))
    }

    fn visit_f64<E: de::Error>(self, v: f64) -> Result<Self::Value, E> {
        Ok(RawPrecedence::Float(v))
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<Self::Value, E> {
        Ok(RawPrecedence::Text(v.to_string()))
    }

    fn visit_string<E: de::Error>(self, v: String) -> Result<Self::Value, E> {
        Ok(RawPrecedence::Text(v))
    }

    fn visit_seq<A: SeqAccess<'de>>(self, mut seq: A) -> Result<Self::Value, A::Error> {
        while seq.next_element::<IgnoredAny>()?.is_some() {}
        Ok(RawPrecedence::Other("a sequence".to_string()))
    }

    fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<Self::Value, A::Error> {
        while map.next_entry::<IgnoredAny, IgnoredAny>()?.is_some() {}
        Ok(RawPrecedence::Other("a mapping".to_string()))
    }
}

/// TOML documents need a top-level table, so steps live under `[[step]]`.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub(crate) struct TomlJob {
    #[serde(default)]
    pub step: Vec<TomlStep>,
}

/// A `[[step]]` table. Same fields as [`RawStep`], with the precedence span
/// kept so the source spelling can be recovered.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub(crate) struct TomlStep {
    #[serde(default, alias = "name")]
    pub step: Option<String>,

    #[serde(default)]
    pub precedence: Option<Spanned<RawPrecedence>>,

    #[serde(default)]
    pub dependencies: Option<Vec<String>>,
}

impl TomlStep {
    pub(crate) fn into_raw(self, source: &str) -> RawStep {
        let precedence = self.precedence.map(|spanned| {
            let span = spanned.span();
            match spanned.into_inner() {
                value @ (RawPrecedence::Text(_) | RawPrecedence::Bool(_)) => value,
                value => source
                    .get(span)
                    .map(|text| RawPrecedence::Literal(text.trim().to_string()))
                    .unwrap_or(value),
            }
        });

        RawStep {
            step: self.step,
            precedence,
            dependencies: self.dependencies,
        }
    }
}

/// Serialization format of a job document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum JobFormat {
    Yaml,
    Toml,
}

impl JobFormat {
    /// Guess the format from a file extension. Anything that is not `.toml`
    /// is treated as YAML.
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|e| e.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("toml") => JobFormat::Toml,
            _ => JobFormat::Yaml,
        }
    }
}

impl FromStr for JobFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "yaml" | "yml" => Ok(JobFormat::Yaml),
            "toml" => Ok(JobFormat::Toml),
            other => Err(format!(
                "invalid job format: {other} (expected \"yaml\" or \"toml\")"
            )),
        }
    }
}
