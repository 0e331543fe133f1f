use super::error::ValidationError;
use crate::domain::audio::{AudioPromptSource, OutputFormat};
use serde_json::{Map, Value};

pub const DEFAULT_EXAGGERATION: f32 = 0.5;
pub const DEFAULT_CFG_WEIGHT: f32 = 0.5;

/// Canonical, validated job input.
///
/// `exaggeration` is documented for roughly [0.0, 1.5] and `cfg_weight` for
/// [0.0, 1.0]. Both are soft knobs: finite values outside those ranges are
/// passed to the model unchanged.
#[derive(Debug, Clone, PartialEq)]
pub struct SynthesisRequest {
    pub text: String,
    pub audio_prompt: Option<AudioPromptSource>,
    pub exaggeration: f32,
    pub cfg_weight: f32,
    pub output_format: OutputFormat,
    pub force_inline: bool,
}

/// Normalize a raw job `input` object
pub fn validate(input: &Value) -> Result<SynthesisRequest, ValidationError> {
    let empty = Map::new();
    let fields = match input {
        Value::Object(fields) => fields,
        Value::Null => &empty,
        _ => {
            return Err(ValidationError::InvalidParameter {
                name: "input",
                reason: "expected a JSON object".to_string(),
            })
        }
    };

    let text = match fields.get("text") {
        None | Some(Value::Null) => return Err(ValidationError::MissingField("text")),
        Some(Value::String(text)) => text.trim(),
        Some(_) => {
            return Err(ValidationError::InvalidParameter {
                name: "text",
                reason: "expected a string".to_string(),
            })
        }
    };
    if text.is_empty() {
        return Err(ValidationError::MissingField("text"));
    }

    let output_format = match fields.get("output_format") {
        None | Some(Value::Null) => OutputFormat::default(),
        Some(Value::String(raw)) => OutputFormat::parse(raw)
            .ok_or_else(|| ValidationError::UnsupportedFormat(raw.trim().to_string()))?,
        Some(other) => return Err(ValidationError::UnsupportedFormat(other.to_string())),
    };

    let exaggeration = number_field(fields, "exaggeration", DEFAULT_EXAGGERATION)?;
    let cfg_weight = number_field(fields, "cfg_weight", DEFAULT_CFG_WEIGHT)?;
    let force_inline = bool_field(fields, "return_base64", false)?;

    let audio_prompt = match fields.get("audio_prompt") {
        None | Some(Value::Null) => None,
        Some(Value::String(raw)) if raw.trim().is_empty() => None,
        Some(Value::String(raw)) => Some(AudioPromptSource::classify(raw)),
        Some(_) => {
            return Err(ValidationError::InvalidParameter {
                name: "audio_prompt",
                reason: "expected a URL or base64 string".to_string(),
            })
        }
    };

    Ok(SynthesisRequest {
        text: text.to_string(),
        audio_prompt,
        exaggeration,
        cfg_weight,
        output_format,
        force_inline,
    })
}

fn number_field(
    fields: &Map<String, Value>,
    name: &'static str,
    default: f32,
) -> Result<f32, ValidationError> {
    let invalid = |reason: String| ValidationError::InvalidParameter { name, reason };

    let value = match fields.get(name) {
        None | Some(Value::Null) => return Ok(default),
        Some(Value::Number(n)) => n
            .as_f64()
            .ok_or_else(|| invalid(format!("{} is not representable", n)))?,
        Some(Value::String(s)) => s
            .trim()
            .parse::<f64>()
            .map_err(|_| invalid(format!("'{}' is not a number", s)))?,
        Some(other) => return Err(invalid(format!("expected a number, got {}", other))),
    };

    let value = value as f32;
    if !value.is_finite() {
        return Err(invalid("must be a finite number".to_string()));
    }
    Ok(value)
}

fn bool_field(
    fields: &Map<String, Value>,
    name: &'static str,
    default: bool,
) -> Result<bool, ValidationError> {
    match fields.get(name) {
        None | Some(Value::Null) => Ok(default),
        Some(Value::Bool(b)) => Ok(*b),
        Some(Value::String(s)) => match s.trim().to_lowercase().as_str() {
            "true" | "1" | "yes" => Ok(true),
            "false" | "0" | "no" | "" => Ok(false),
            _ => Err(ValidationError::InvalidParameter {
                name,
                reason: format!("'{}' is not a boolean", s),
            }),
        },
        Some(other) => Err(ValidationError::InvalidParameter {
            name,
            reason: format!("expected a boolean, got {}", other),
        }),
    }
}
