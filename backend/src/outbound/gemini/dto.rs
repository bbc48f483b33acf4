//! Request and response shapes for `generateContent`.
//!
//! The model answers in free text; the first `{` to the last `}` of that text
//! is decoded into one of the two answer DTOs and validated into domain
//! types.

use serde::{Deserialize, Serialize};

use crate::domain::{Confidence, VerificationResult, WasteAmount, WasteClassification, WasteType};

#[derive(Debug, Serialize)]
pub(super) struct GenerateContentRequest<'a> {
    pub(super) contents: [ContentDto<'a>; 1],
}

#[derive(Debug, Serialize)]
pub(super) struct ContentDto<'a> {
    pub(super) parts: [PartDto<'a>; 2],
}

#[derive(Debug, Serialize)]
#[serde(untagged)]
pub(super) enum PartDto<'a> {
    Text { text: &'a str },
    InlineData { inline_data: InlineDataDto<'a> },
}

#[derive(Debug, Serialize)]
pub(super) struct InlineDataDto<'a> {
    pub(super) mime_type: &'a str,
    pub(super) data: &'a str,
}

impl<'a> GenerateContentRequest<'a> {
    pub(super) fn new(prompt: &'a str, mime_type: &'a str, data: &'a str) -> Self {
        Self {
            contents: [ContentDto {
                parts: [
                    PartDto::Text { text: prompt },
                    PartDto::InlineData {
                        inline_data: InlineDataDto { mime_type, data },
                    },
                ],
            }],
        }
    }
}

#[derive(Debug, Deserialize)]
pub(super) struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<CandidateDto>,
}

#[derive(Debug, Deserialize)]
struct CandidateDto {
    content: Option<CandidateContentDto>,
}

#[derive(Debug, Deserialize)]
struct CandidateContentDto {
    #[serde(default)]
    parts: Vec<CandidatePartDto>,
}

#[derive(Debug, Deserialize)]
struct CandidatePartDto {
    text: Option<String>,
}

impl GenerateContentResponse {
    /// Concatenated text parts of the first candidate.
    pub(super) fn into_text(self) -> Result<String, String> {
        let content = self
            .candidates
            .into_iter()
            .next()
            .and_then(|candidate| candidate.content)
            .ok_or_else(|| "response has no candidates".to_owned())?;
        let text = content
            .parts
            .into_iter()
            .filter_map(|part| part.text)
            .collect::<String>();
        if text.trim().is_empty() {
            return Err("response has no text".to_owned());
        }
        Ok(text)
    }
}

/// Slice from the first `{` to the last `}` of a model answer.
pub(super) fn extract_json_object(text: &str) -> Result<&str, String> {
    let start = text.find('{');
    let end = text.rfind('}');
    match (start, end) {
        (Some(start), Some(end)) if start < end => text
            .get(start..=end)
            .ok_or_else(|| "answer has no JSON object".to_owned()),
        _ => Err("answer has no JSON object".to_owned()),
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct ClassificationAnswerDto {
    waste_type: Option<String>,
    quantity: Option<serde_json::Value>,
    confidence: Option<f64>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct VerificationAnswerDto {
    waste_type_match: Option<bool>,
    quantity_match: Option<bool>,
    confidence: Option<f64>,
}

fn required<T>(value: Option<T>, key: &str) -> Result<T, String> {
    value.ok_or_else(|| format!("answer is missing `{key}`"))
}

fn confidence(value: Option<f64>) -> Result<Confidence, String> {
    Confidence::new(required(value, "confidence")?).map_err(|err| err.to_string())
}

impl ClassificationAnswerDto {
    pub(super) fn into_domain(self) -> Result<WasteClassification, String> {
        let waste_type = WasteType::new(required(self.waste_type, "wasteType")?)
            .map_err(|err| err.to_string())?;
        let quantity = match required(self.quantity, "quantity")? {
            serde_json::Value::String(text) => text,
            serde_json::Value::Number(number) => number.to_string(),
            other => return Err(format!("`quantity` must be text, got {other}")),
        };
        let quantity = WasteAmount::new(quantity).map_err(|err| err.to_string())?;
        Ok(WasteClassification {
            waste_type,
            quantity,
            confidence: confidence(self.confidence)?,
        })
    }
}

impl VerificationAnswerDto {
    pub(super) fn into_domain(self) -> Result<VerificationResult, String> {
        Ok(VerificationResult {
            waste_type_match: required(self.waste_type_match, "wasteTypeMatch")?,
            quantity_match: required(self.quantity_match, "quantityMatch")?,
            confidence: confidence(self.confidence)?,
        })
    }
}
