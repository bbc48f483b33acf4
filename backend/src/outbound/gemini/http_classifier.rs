//! Reqwest-backed Gemini waste classifier.
//!
//! This adapter owns transport details only: prompt construction, the
//! `generateContent` call, HTTP error mapping, and decoding the model's
//! answer into domain types.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Url};
use serde::de::DeserializeOwned;
use tracing::debug;
use zeroize::Zeroizing;

use super::dto::{
    ClassificationAnswerDto, GenerateContentRequest, GenerateContentResponse,
    VerificationAnswerDto, extract_json_object,
};
use crate::domain::ports::{WasteClassifier, WasteClassifierError};
use crate::domain::{VerificationResult, WasteAmount, WasteClassification, WasteImage, WasteType};
use crate::outbound::http_status::{UpstreamFailure, status_message};

const API_KEY_HEADER: &str = "x-goog-api-key";

const CLASSIFY_PROMPT: &str = "You are an expert in waste management and recycling. \
Analyze this image and provide:
1. The type of waste (e.g., plastic, paper, glass, metal, organic)
2. An estimate of the quantity or amount (in kg or liters)
3. Your confidence level in this assessment

Respond with only a JSON object like this:
{
  \"wasteType\": \"type of waste\",
  \"quantity\": \"estimated quantity with unit\",
  \"confidence\": confidence level as a number between 0 and 1
}";

fn verify_prompt(waste_type: &WasteType, amount: &WasteAmount) -> String {
    format!(
        "You are an expert in waste management and recycling. \
Analyze this image and provide:
1. Confirm if the waste type matches: {waste_type}
2. Estimate if the quantity matches: {amount}
3. Your confidence level in this assessment

Respond with only a JSON object like this:
{{
  \"wasteTypeMatch\": true or false,
  \"quantityMatch\": true or false,
  \"confidence\": confidence level as a number between 0 and 1
}}",
        waste_type = waste_type.as_ref(),
        amount = amount.as_ref(),
    )
}

/// Connection settings for the Gemini API.
pub struct GeminiConfig {
    /// Base URL, for example `https://generativelanguage.googleapis.com`.
    pub endpoint: Url,
    /// Model name such as `gemini-1.5-flash`.
    pub model: String,
    pub api_key: Zeroizing<String>,
    /// Upper bound for one model call.
    pub timeout: Duration,
}

/// `WasteClassifier` backed by Gemini `generateContent`.
pub struct GeminiWasteClassifier {
    client: Client,
    url: Url,
    api_key: Zeroizing<String>,
}

impl GeminiWasteClassifier {
    /// Build a classifier with a request timeout.
    ///
    /// # Errors
    ///
    /// Returns an error when the endpoint cannot carry a path or the reqwest
    /// client cannot be constructed.
    pub fn new(config: GeminiConfig) -> Result<Self, WasteClassifierError> {
        let url = generate_content_url(&config.endpoint, &config.model)?;
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|err| WasteClassifierError::transport(err.to_string()))?;
        Ok(Self {
            client,
            url,
            api_key: config.api_key,
        })
    }

    async fn generate<T>(&self, prompt: &str, image: &WasteImage) -> Result<T, WasteClassifierError>
    where
        T: DeserializeOwned,
    {
        let request = GenerateContentRequest::new(prompt, image.mime_type(), image.base64_data());
        let response = self
            .client
            .post(self.url.clone())
            .header(API_KEY_HEADER, self.api_key.as_str())
            .json(&request)
            .send()
            .await
            .map_err(map_transport_error)?;

        let status = response.status();
        let body = response.bytes().await.map_err(map_transport_error)?;
        if !status.is_success() {
            return Err(map_status_error(status, body.as_ref()));
        }
        parse_answer(body.as_ref())
    }
}

#[async_trait]
impl WasteClassifier for GeminiWasteClassifier {
    async fn classify(
        &self,
        image: &WasteImage,
    ) -> Result<WasteClassification, WasteClassifierError> {
        let answer: ClassificationAnswerDto = self.generate(CLASSIFY_PROMPT, image).await?;
        answer.into_domain().map_err(WasteClassifierError::decode)
    }

    async fn verify(
        &self,
        image: &WasteImage,
        waste_type: &WasteType,
        amount: &WasteAmount,
    ) -> Result<VerificationResult, WasteClassifierError> {
        let prompt = verify_prompt(waste_type, amount);
        let answer: VerificationAnswerDto = self.generate(&prompt, image).await?;
        answer.into_domain().map_err(WasteClassifierError::decode)
    }
}

fn generate_content_url(endpoint: &Url, model: &str) -> Result<Url, WasteClassifierError> {
    let model = model.trim();
    if model.is_empty() {
        return Err(WasteClassifierError::invalid_request(
            "model name must not be empty",
        ));
    }
    let method = format!("{model}:generateContent");
    let mut url = endpoint.clone();
    url.path_segments_mut()
        .map_err(|()| WasteClassifierError::invalid_request("endpoint cannot be a base URL"))?
        .pop_if_empty()
        .extend(["v1beta", "models", method.as_str()]);
    Ok(url)
}

fn parse_answer<T: DeserializeOwned>(body: &[u8]) -> Result<T, WasteClassifierError> {
    let envelope: GenerateContentResponse = serde_json::from_slice(body).map_err(|err| {
        WasteClassifierError::decode(format!("invalid generateContent payload: {err}"))
    })?;
    let text = envelope
        .into_text()
        .map_err(WasteClassifierError::decode)?;
    let object = extract_json_object(&text).map_err(WasteClassifierError::decode)?;
    serde_json::from_str(object).map_err(|err| {
        debug!(answer = %object, "model answer is not the expected JSON object");
        WasteClassifierError::decode(format!("invalid answer JSON: {err}"))
    })
}

fn map_transport_error(error: reqwest::Error) -> WasteClassifierError {
    if error.is_timeout() {
        WasteClassifierError::timeout(error.to_string())
    } else {
        WasteClassifierError::transport(error.to_string())
    }
}

fn map_status_error(status: reqwest::StatusCode, body: &[u8]) -> WasteClassifierError {
    let message = status_message(status, body);
    match UpstreamFailure::from_status(status) {
        UpstreamFailure::RateLimited => WasteClassifierError::rate_limited(message),
        UpstreamFailure::Timeout => WasteClassifierError::timeout(message),
        UpstreamFailure::InvalidRequest => WasteClassifierError::invalid_request(message),
        UpstreamFailure::Transport => WasteClassifierError::transport(message),
    }
}
