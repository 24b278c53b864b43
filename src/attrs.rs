//! `key=value` argument parsing
//!
//! Command lines describe attributes as `key=value` words. Values that read as
//! booleans (`true`, `F`, `1`, ...) become JSON booleans, everything else stays
//! a string. Update commands turn the same words into patch operations, where
//! an empty value removes the field.

use serde_json::{Value, json};

use crate::XcatError;
use crate::api::{Attributes, PatchOp};

type Result<T> = std::result::Result<T, XcatError>;

/// Node fields whose CLI name differs from the stored name
const NODE_FIELD_ALIASES: &[(&str, &str)] = &[("control", "control_info"), ("nics", "nics_info")];

fn parse_bool(value: &str) -> Option<bool> {
    match value {
        "1" | "t" | "T" | "true" | "TRUE" | "True" => Some(true),
        "0" | "f" | "F" | "false" | "FALSE" | "False" => Some(false),
        _ => None,
    }
}

fn to_value(value: &str) -> Value {
    parse_bool(value).map_or_else(|| json!(value), Value::Bool)
}

fn split_pair<'a>(pair: &'a str, whole: &str) -> Result<(&'a str, &'a str)> {
    match pair.split_once('=') {
        Some((key, value)) if !key.is_empty() => Ok((key, value)),
        _ => Err(XcatError::InvalidInput(format!(
            "The format of {whole} is not correct, expected key=value."
        ))),
    }
}

/// Parse `key=value` words into an attribute map; later keys win.
///
/// # Errors
/// Returns `InvalidInput` for a word without `=` or with an empty key.
pub fn parse_key_values<S: AsRef<str>>(args: &[S]) -> Result<Attributes> {
    let mut attrs = Attributes::new();
    for arg in args {
        let arg = arg.as_ref();
        let (key, value) = split_pair(arg, arg)?;
        attrs.insert(key.to_string(), to_value(value));
    }
    Ok(attrs)
}

/// Parse one comma-separated `key=value,key=value` list into a map.
///
/// # Errors
/// Returns `InvalidInput` if any pair is malformed.
pub fn parse_key_value_list(list: &str) -> Result<Attributes> {
    let mut attrs = Attributes::new();
    for pair in list.split(',').filter(|p| !p.is_empty()) {
        let (key, value) = split_pair(pair, list)?;
        attrs.insert(key.to_string(), to_value(value));
    }
    Ok(attrs)
}

/// Turn `path=value` words into patch operations.
///
/// A missing leading `/` is added. An empty value yields a `remove`.
///
/// # Errors
/// Returns `InvalidInput` for a word without `=`.
pub fn parse_patches<S: AsRef<str>>(args: &[S]) -> Result<Vec<PatchOp>> {
    args.iter()
        .map(|arg| {
            let arg = arg.as_ref();
            let (path, value) = split_pair(arg.trim_start_matches('/'), arg)?;
            let path = format!("/{path}");
            Ok(if value.is_empty() {
                PatchOp::Remove { path }
            } else {
                PatchOp::Add {
                    path,
                    value: value.to_string(),
                }
            })
        })
        .collect()
}

/// Rewrite the first path segment of node patches to the stored field name
/// (`/control/...` becomes `/control_info/...`).
#[must_use]
pub fn alias_node_paths(patches: Vec<PatchOp>) -> Vec<PatchOp> {
    let rewrite = |path: String| -> String {
        let trimmed = path.trim_start_matches('/');
        let (head, tail) = trimmed.split_once('/').unwrap_or((trimmed, ""));
        NODE_FIELD_ALIASES
            .iter()
            .find(|(alias, _)| *alias == head)
            .map_or(path.clone(), |(_, field)| {
                if tail.is_empty() {
                    format!("/{field}")
                } else {
                    format!("/{field}/{tail}")
                }
            })
    };
    patches
        .into_iter()
        .map(|patch| match patch {
            PatchOp::Add { path, value } => PatchOp::Add {
                path: rewrite(path),
                value,
            },
            PatchOp::Remove { path } => PatchOp::Remove {
                path: rewrite(path),
            },
        })
        .collect()
}

/// Shared attributes for `node create`
#[derive(Debug, Clone, Default)]
pub struct CreateOptions {
    /// One `key=value,...` list per network interface
    pub nics: Vec<String>,
    /// `key=value,...` list for the control plugin
    pub control: Option<String>,
    /// Plain `key=value` attributes
    pub attributes: Vec<String>,
}

impl CreateOptions {
    /// Build the attribute template every created node shares.
    ///
    /// Plain attributes are applied last and override `control_info` and
    /// `nics_info` when they use the same key.
    ///
    /// # Errors
    /// Returns `InvalidInput` for malformed `key=value` input or a `name` key.
    pub fn template(&self) -> Result<Attributes> {
        let mut template = Attributes::new();
        if let Some(control) = self.control.as_deref().filter(|c| !c.is_empty()) {
            template.insert(
                "control_info".into(),
                Value::Object(parse_key_value_list(control)?),
            );
        }
        if !self.nics.is_empty() {
            let nics = self
                .nics
                .iter()
                .map(|nic| parse_key_value_list(nic).map(Value::Object))
                .collect::<Result<Vec<_>>>()?;
            template.insert("nics_info".into(), json!({ "nics": nics }));
        }
        let attributes = parse_key_values(&self.attributes)?;
        if attributes.contains_key("name") {
            return Err(XcatError::InvalidInput(
                "name is taken from the node range and cannot be set as an attribute.".into(),
            ));
        }
        template.extend(attributes);
        Ok(template)
    }
}
