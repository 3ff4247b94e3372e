use hydro_models::schema::REQUIRED_FIELDS;
use serde::Deserialize;
use serde_json::Value;

/// Loosely-typed structured reply. Every field is optional so a partially
/// conforming reply still counts as structured.
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
pub struct StructuredAdvice {
    #[serde(default)]
    pub summary: Option<String>,
    #[serde(default)]
    pub advice: Option<String>,
    #[serde(default)]
    pub risk_level: Option<String>,
}

/// Body of the first ``` fence, with an optional `json` tag stripped.
fn fenced_block(text: &str) -> Option<&str> {
    let start = text.find("```")? + 3;
    let rest = &text[start..];
    let rest = rest.strip_prefix("json").unwrap_or(rest);
    let end = rest.find("```")?;
    Some(rest[..end].trim())
}

/// Parse backend text into [`StructuredAdvice`].
///
/// Only the whole reply, or the body of a fenced block, is considered, and
/// it must be an object carrying at least one advisory field. Objects
/// embedded in prose do not count. `None` sends the reply down the degraded
/// path.
pub fn parse_structured(raw: &str) -> Option<StructuredAdvice> {
    let trimmed = raw.trim();
    let candidate = if trimmed.starts_with('{') {
        trimmed
    } else {
        fenced_block(trimmed)?
    };

    let value: Value = serde_json::from_str(candidate).ok()?;
    let object = value.as_object()?;
    if !REQUIRED_FIELDS.iter().any(|field| object.contains_key(*field)) {
        return None;
    }
    serde_json::from_value(value).ok()
}
