//! Desired-set files.
//!
//! A desired set is a JSON array. Each entry is an extension object in the
//! model's JSON form; the `kind` tag may be left out. Callouts may also be
//! given as plain strings.

use anyhow::{bail, Context, Result};
use bingads_model::{AdExtension, Callout};
use bingads_types::ExtensionKind;
use serde_json::Value;
use std::path::Path;

pub fn load_desired(path: &Path, kind: ExtensionKind) -> Result<Vec<AdExtension>> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read desired set {path:?}"))?;
    parse_desired(&text, kind).with_context(|| format!("Invalid desired set {path:?}"))
}

pub fn parse_desired(text: &str, kind: ExtensionKind) -> Result<Vec<AdExtension>> {
    let Value::Array(entries) = serde_json::from_str::<Value>(text)? else {
        bail!("expected a JSON array of {kind} extensions");
    };

    entries
        .into_iter()
        .enumerate()
        .map(|(index, entry)| {
            parse_entry(entry, kind).with_context(|| format!("entry {index}"))
        })
        .collect()
}

fn parse_entry(entry: Value, kind: ExtensionKind) -> Result<AdExtension> {
    match entry {
        Value::String(text) if kind == ExtensionKind::Callout => Ok(Callout::new(text).into()),
        Value::Object(mut fields) => {
            fields
                .entry("kind")
                .or_insert_with(|| Value::String(kind.to_string()));
            let ext: AdExtension = serde_json::from_value(Value::Object(fields))?;
            if ext.kind() != kind {
                bail!("expected a {kind} extension, found {}", ext.kind());
            }
            Ok(ext)
        }
        other => bail!("expected a {kind} object, found {other}"),
    }
}
