// src/job/loader.rs

use std::fmt;
use std::path::Path;

use serde::Deserializer;
use serde::de::{DeserializeSeed, IgnoredAny, MapAccess, SeqAccess, Visitor};
use tracing::debug;

use crate::errors::{Result, StepdagError};
use crate::fs::FileSystem;
use crate::job::model::{JobFormat, RawPrecedence, RawStep, TomlJob};

/// Parse a job document into raw step records.
///
/// This only performs deserialization; it does **not** validate individual
/// records or the graph. Any document that cannot be read as a list of step
/// mappings is reported as [`StepdagError::MalformedInput`].
pub fn parse_job(text: &str, format: JobFormat) -> Result<Vec<RawStep>> {
    if text.trim().is_empty() {
        return Err(StepdagError::MalformedInput(
            "job document is empty".to_string(),
        ));
    }

    let records = match format {
        JobFormat::Yaml => {
            let mut records = serde_yaml::from_str::<Vec<RawStep>>(text).map_err(invalid_yaml)?;
            restore_yaml_literals(text, &mut records)?;
            records
        }
        JobFormat::Toml => toml::from_str::<TomlJob>(text)
            .map_err(|e| StepdagError::MalformedInput(format!("invalid TOML job: {e}")))?
            .step
            .into_iter()
            .map(|step| step.into_raw(text))
            .collect(),
    };

    debug!(?format, records = records.len(), "parsed job document");
    Ok(records)
}

/// Read a job file through `fs` and parse it.
///
/// `format` overrides the extension-based guess from [`JobFormat::from_path`].
pub fn load_from_path(
    fs: &dyn FileSystem,
    path: impl AsRef<Path>,
    format: Option<JobFormat>,
) -> Result<Vec<RawStep>> {
    let path = path.as_ref();
    let contents = fs.read_to_string(path)?;
    let format = format.unwrap_or_else(|| JobFormat::from_path(path));
    parse_job(&contents, format)
}

fn invalid_yaml(e: serde_yaml::Error) -> StepdagError {
    StepdagError::MalformedInput(format!("invalid YAML job: {e}"))
}

/// serde_yaml resolves plain scalars such as `0x10`, `0o10` or `+10` to
/// numbers before any visitor sees them. A second pass reads the precedence
/// of every numeric record as a string, which serde_yaml returns verbatim.
fn restore_yaml_literals(text: &str, records: &mut [RawStep]) -> Result<()> {
    let numeric: Vec<bool> = records
        .iter()
        .map(|r| r.precedence.as_ref().is_some_and(RawPrecedence::is_number))
        .collect();
    if !numeric.contains(&true) {
        return Ok(());
    }

    let spellings = PrecedenceSpellings(&numeric)
        .deserialize(serde_yaml::Deserializer::from_str(text))
        .map_err(invalid_yaml)?;

    for (record, spelling) in records.iter_mut().zip(spellings) {
        if let Some(spelling) = spelling {
            record.precedence = Some(RawPrecedence::Literal(spelling));
        }
    }
    Ok(())
}

/// Reads the step list again, one flag per record saying whether its
/// precedence should be captured as text.
struct PrecedenceSpellings<'a>(&'a [bool]);

impl<'de> DeserializeSeed<'de> for PrecedenceSpellings<'_> {
    type Value = Vec<Option<String>>;

    fn deserialize<D>(self, deserializer: D) -> std::result::Result<Self::Value, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_seq(self)
    }
}

impl<'de> Visitor<'de> for PrecedenceSpellings<'_> {
    type Value = Vec<Option<String>>;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a list of steps")
    }

    fn visit_seq<A>(self, mut seq: A) -> std::result::Result<Self::Value, A::Error>
    where
        A: SeqAccess<'de>,
    {
        let mut spellings = Vec::with_capacity(self.0.len());
        for &numeric in self.0 {
            match seq.next_element_seed(RecordSpelling { numeric })? {
                Some(spelling) => spellings.push(spelling),
                None => break,
            }
        }
        while seq.next_element::<IgnoredAny>()?.is_some() {}
        Ok(spellings)
    }
}

struct RecordSpelling {
    numeric: bool,
}

impl<'de> DeserializeSeed<'de> for RecordSpelling {
    type Value = Option<String>;

    fn deserialize<D>(self, deserializer: D) -> std::result::Result<Self::Value, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_map(self)
    }
}

impl<'de> Visitor<'de> for RecordSpelling {
    type Value = Option<String>;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a step mapping")
    }

    fn visit_map<A>(self, mut map: A) -> std::result::Result<Self::Value, A::Error>
    where
        A: MapAccess<'de>,
    {
        let mut spelling = None;
        while let Some(key) = map.next_key::<String>()? {
            if self.numeric && key == "precedence" {
                spelling = Some(map.next_value::<String>()?);
            } else {
                map.next_value::<IgnoredAny>()?;
            }
        }
        Ok(spelling)
    }
}
