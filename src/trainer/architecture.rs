//! Dataset metadata and architecture config patching
//!
//! Both documents are handled as untyped YAML mappings: only the `nc` key is
//! read or written, everything else passes through unchanged.

use crate::error::{Error, Result};
use serde_yaml::{Mapping, Value};
use std::fs;
use std::path::Path;
use tracing::info;

/// Class-count key shared by `data.yaml` and architecture configs
pub const CLASS_COUNT_KEY: &str = "nc";

/// Read the class count (`nc`) from a dataset metadata file.
pub fn read_class_count(data_yaml: &Path) -> Result<u64> {
    let doc = load_mapping(data_yaml)?;
    let value = doc
        .get(CLASS_COUNT_KEY)
        .ok_or_else(|| Error::Metadata(format!("{} has no `nc` field", data_yaml.display())))?;

    parse_class_count(value)
}

fn parse_class_count(value: &Value) -> Result<u64> {
    let count = match value {
        Value::Number(n) => n.as_u64(),
        // Exporters sometimes quote the count.
        Value::String(s) => s.trim().parse::<u64>().ok(),
        _ => None,
    };

    match count {
        Some(n) if n > 0 => Ok(n),
        _ => Err(Error::Metadata(format!(
            "`nc` must be a positive integer, got {}",
            render(value)
        ))),
    }
}

/// Load the architecture template, overwrite its class count and write the
/// result to `custom`. The template itself is never written.
///
/// Output is a full rewrite, so repeated calls with the same inputs produce
/// byte-identical files.
pub fn write_custom_config(template: &Path, custom: &Path, class_count: u64) -> Result<()> {
    let mut doc = load_mapping(template)?;
    doc.insert(
        Value::String(CLASS_COUNT_KEY.to_string()),
        Value::Number(class_count.into()),
    );

    let yaml = serde_yaml::to_string(&doc)?;
    fs::write(custom, yaml)?;

    info!(
        template = %template.display(),
        custom = %custom.display(),
        nc = class_count,
        "Wrote custom model config"
    );
    Ok(())
}

fn load_mapping(path: &Path) -> Result<Mapping> {
    if !path.is_file() {
        return Err(Error::FileNotFound(path.to_path_buf()));
    }
    let content = fs::read_to_string(path)?;
    match serde_yaml::from_str::<Value>(&content)? {
        Value::Mapping(map) => Ok(map),
        _ => Err(Error::NotAMapping(path.to_path_buf())),
    }
}

fn render(value: &Value) -> String {
    serde_yaml::to_string(value)
        .map(|s| s.trim_end().to_string())
        .unwrap_or_else(|_| format!("{value:?}"))
}
