//! Front-matter parsing

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde::Serialize;
use serde_yaml::{Mapping, Value};
use std::collections::BTreeMap;

use crate::error::AttributeError;

/// A post file split into its front-matter attributes and markdown body
#[derive(Debug, Clone, PartialEq)]
pub struct FrontMatter {
    /// Raw attributes; empty when the file has no usable front-matter block
    pub attributes: Mapping,
    /// Everything after the closing delimiter
    pub body: String,
}

impl FrontMatter {
    /// Split `content` into attributes and body.
    ///
    /// Never fails: a missing, unterminated, or malformed block yields empty
    /// attributes, and the caller decides whether that is acceptable.
    pub fn parse(content: &str) -> Self {
        let content = content.strip_prefix('\u{feff}').unwrap_or(content);

        match split_block(content) {
            Some((yaml, body)) => Self {
                attributes: parse_yaml(yaml),
                body: body.trim_start_matches(['\n', '\r']).to_string(),
            },
            None => Self {
                attributes: Mapping::new(),
                body: content.to_string(),
            },
        }
    }
}

/// Find the `---` ... `---` (or `...`) block at the very start of `content`.
/// Returns (yaml, rest).
fn split_block(content: &str) -> Option<(&str, &str)> {
    let mut lines = content.split_inclusive('\n');
    let first = lines.next()?;
    if first.trim_end() != "---" {
        return None;
    }

    let start = first.len();
    let mut offset = start;
    for line in lines {
        let trimmed = line.trim_end();
        if trimmed == "---" || trimmed == "..." {
            return Some((&content[start..offset], &content[offset + line.len()..]));
        }
        offset += line.len();
    }

    None
}

fn parse_yaml(yaml: &str) -> Mapping {
    if yaml.trim().is_empty() {
        return Mapping::new();
    }

    match serde_yaml::from_str::<Value>(yaml) {
        Ok(Value::Mapping(mapping)) => mapping,
        Ok(Value::Null) => Mapping::new(),
        Ok(_) => {
            tracing::warn!("Front-matter is not a key/value mapping, ignoring it");
            Mapping::new()
        }
        Err(e) => {
            tracing::warn!("Failed to parse YAML front-matter, ignoring it: {}", e);
            Mapping::new()
        }
    }
}

/// Validated front-matter of a post
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PostAttributes {
    pub title: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,

    /// Any other keys, passed through untouched
    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

impl PostAttributes {
    /// Parse the date string into a NaiveDateTime
    pub fn parse_date(&self) -> Option<NaiveDateTime> {
        self.date.as_deref().and_then(parse_date_string)
    }
}

/// Check that a raw attribute mapping carries what a post needs.
pub fn validate_attributes(attributes: &Mapping) -> Result<PostAttributes, AttributeError> {
    let title = match attributes.get("title") {
        None | Some(Value::Null) => return Err(AttributeError::MissingTitle),
        Some(Value::String(s)) if !s.trim().is_empty() => s.clone(),
        Some(Value::Number(n)) => n.to_string(),
        Some(_) => return Err(AttributeError::InvalidTitle),
    };

    let date = match attributes.get("date") {
        None | Some(Value::Null) => None,
        Some(value) => Some(scalar_to_string(value).ok_or(AttributeError::InvalidDate)?),
    };

    let mut extra = BTreeMap::new();
    for (key, value) in attributes {
        let Some(key) = scalar_to_string(key) else {
            tracing::debug!("Skipping non-scalar front-matter key {:?}", key);
            continue;
        };
        if key != "title" && key != "date" {
            extra.insert(key, value.clone());
        }
    }

    Ok(PostAttributes { title, date, extra })
}

fn scalar_to_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

/// Render the front-matter block written for a new post.
///
/// The title goes through the YAML serializer so values such as `a: b`
/// come back out of [`FrontMatter::parse`] unchanged.
pub fn serialize_front_matter(title: &str) -> Result<String, serde_yaml::Error> {
    let mut block = Mapping::new();
    block.insert(
        Value::String("title".to_string()),
        Value::String(title.to_string()),
    );
    let yaml = serde_yaml::to_string(&block)?;
    Ok(format!("---\n{}---\n", yaml))
}

/// Parse a date string in various formats
fn parse_date_string(s: &str) -> Option<NaiveDateTime> {
    let s = s.trim();

    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.naive_local());
    }

    let datetime_formats = [
        "%Y-%m-%d %H:%M:%S",
        "%Y/%m/%d %H:%M:%S",
        "%Y-%m-%d %H:%M",
        "%Y/%m/%d %H:%M",
        "%Y-%m-%dT%H:%M:%S",
        "%Y-%m-%dT%H:%M:%S%.f",
    ];
    for fmt in datetime_formats {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, fmt) {
            return Some(dt);
        }
    }

    for fmt in ["%Y-%m-%d", "%Y/%m/%d"] {
        if let Ok(d) = NaiveDate::parse_from_str(s, fmt) {
            return d.and_hms_opt(0, 0, 0);
        }
    }

    None
}
