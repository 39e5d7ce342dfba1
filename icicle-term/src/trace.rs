//! JSON trace files.

use std::fs;
use std::path::{Path, PathBuf};

use icicle::{IdValue, TraceData};
use serde::Deserialize;
use serde_json::Value;
use thiserror::Error;

use crate::cli::{Family, PackingKind, ValueModeKind};

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid trace file {path}: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("column '{column}' holds an unsupported id: {value}")]
    UnsupportedId { column: &'static str, value: String },
}

/// Column-oriented trace, as written by plotting front ends.
///
/// ```json
/// {
///   "labels": ["Eve", "Cain", "Seth"],
///   "parents": ["", "Eve", "Eve"],
///   "values": [10, 14, 12],
///   "family": "sunburst"
/// }
/// ```
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct TraceFile {
    pub labels: Vec<String>,
    pub parents: Vec<Value>,
    pub ids: Option<Vec<Value>>,
    pub values: Option<Vec<Option<f64>>>,
    pub hidden: Option<Vec<bool>>,
    pub text: Option<Vec<Option<String>>>,
    pub root_id: Option<String>,

    pub family: Option<Family>,
    pub packing: Option<PackingKind>,
    #[serde(rename = "branchvalues", alias = "value_mode")]
    pub value_mode: Option<ValueModeKind>,
    #[serde(rename = "maxdepth", alias = "max_depth")]
    pub max_depth: Option<usize>,
    pub level: Option<String>,
}

impl TraceFile {
    pub fn load(path: &Path) -> Result<Self, LoadError> {
        let json = fs::read_to_string(path).map_err(|source| LoadError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let file = Self::parse(&json).map_err(|source| LoadError::Json {
            path: path.to_path_buf(),
            source,
        })?;
        log::info!(
            "[trace] loaded {} rows from {}",
            file.labels.len(),
            path.display()
        );
        Ok(file)
    }

    pub fn parse(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    pub fn to_data(&self) -> Result<TraceData, LoadError> {
        let parents = id_column("parents", &self.parents)?;
        let mut data = TraceData::new(self.labels.iter().cloned(), parents);
        if let Some(ids) = &self.ids {
            data = data.ids(id_column("ids", ids)?);
        }
        if let Some(values) = &self.values {
            data = data.values(values.iter().copied());
        }
        if let Some(hidden) = &self.hidden {
            data = data.hidden(hidden.iter().copied());
        }
        if let Some(text) = &self.text {
            data = data.text(text.iter().cloned());
        }
        if let Some(root_id) = &self.root_id {
            data = data.root_id(root_id.clone());
        }
        Ok(data)
    }
}

fn id_column(column: &'static str, values: &[Value]) -> Result<Vec<IdValue>, LoadError> {
    values.iter().map(|v| id_value(column, v)).collect()
}

fn id_value(column: &'static str, value: &Value) -> Result<IdValue, LoadError> {
    Ok(match value {
        Value::Null => IdValue::Empty,
        Value::Bool(b) => IdValue::Bool(*b),
        Value::String(s) => IdValue::Str(s.clone()),
        Value::Number(n) => match n.as_i64() {
            Some(i) => IdValue::Int(i),
            None => IdValue::Float(n.as_f64().unwrap_or(f64::NAN)),
        },
        Value::Array(_) | Value::Object(_) => {
            return Err(LoadError::UnsupportedId {
                column,
                value: value.to_string(),
            })
        }
    })
}
