//! Career matching backends. The remote service replaces the local heuristic
//! engine entirely; both produce `CareerMatch` records so callers can switch.

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::warn;

use super::document_parser::DocumentTextLoader;
use super::errors::CoreError;
use super::models::{
    CandidateRecord, CareerMatch, DocumentContent, DocumentInput, RuntimeSettings, NOT_AVAILABLE,
};
use super::pipeline::CvPipeline;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum ScoringModel {
    #[serde(rename = "Onet-dataset")]
    OnetDataset,
    #[serde(rename = "Stack-Overflow")]
    StackOverflow,
    #[serde(rename = "ESCOU")]
    Escou,
}

impl ScoringModel {
    pub fn id(&self) -> &'static str {
        match self {
            ScoringModel::OnetDataset => "Onet-dataset",
            ScoringModel::StackOverflow => "Stack-Overflow",
            ScoringModel::Escou => "ESCOU",
        }
    }

    pub fn endpoint(&self) -> &'static str {
        match self {
            ScoringModel::OnetDataset => "/analyze/onet",
            ScoringModel::StackOverflow => "/analyze/stackoverflow",
            ScoringModel::Escou => "/analyze/escou",
        }
    }
}

impl fmt::Display for ScoringModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

impl FromStr for ScoringModel {
    type Err = CoreError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "onet-dataset" | "onet" => Ok(ScoringModel::OnetDataset),
            "stack-overflow" | "stackoverflow" => Ok(ScoringModel::StackOverflow),
            "escou" => Ok(ScoringModel::Escou),
            other => Err(CoreError::InvalidRequest(format!(
                "unknown scoring model '{other}'"
            ))),
        }
    }
}

impl From<&CandidateRecord> for CareerMatch {
    fn from(candidate: &CandidateRecord) -> Self {
        CareerMatch {
            title: candidate.position.clone(),
            description: format!(
                "{} ({} years of experience, {})",
                candidate.name, candidate.years_of_experience, candidate.location
            ),
            match_score: candidate.match_score,
            key_skills: candidate.skills.clone(),
            missing_skills: Vec::new(),
            salary: NOT_AVAILABLE.to_string(),
            growth: NOT_AVAILABLE.to_string(),
            image: String::new(),
        }
    }
}

#[async_trait]
pub trait CareerMatcher: Send + Sync {
    async fn match_document(&self, document: DocumentInput) -> anyhow::Result<Vec<CareerMatch>>;

    fn backend(&self) -> &'static str;
}

/// Runs the heuristic pipeline and maps the candidate to a single match.
pub struct LocalCareerMatcher {
    pipeline: Arc<CvPipeline>,
    loader: DocumentTextLoader,
}

impl LocalCareerMatcher {
    pub fn new(pipeline: Arc<CvPipeline>, loader: DocumentTextLoader) -> Self {
        Self { pipeline, loader }
    }
}

#[async_trait]
impl CareerMatcher for LocalCareerMatcher {
    async fn match_document(&self, document: DocumentInput) -> anyhow::Result<Vec<CareerMatch>> {
        let text = self.loader.load(&document.file_name, document.content)?;
        let processed = self.pipeline.process(&document.file_name, &text)?;
        Ok(vec![CareerMatch::from(&processed.candidate)])
    }

    fn backend(&self) -> &'static str {
        "local"
    }
}

#[derive(Debug, Serialize)]
struct TextAnalysisRequest<'a> {
    text: &'a str,
}

pub struct RemoteCareerMatcher {
    client: Client,
    base_url: String,
    model: ScoringModel,
    max_retries: usize,
    retry_delay_seconds: f64,
}

impl RemoteCareerMatcher {
    pub fn new(client: Client, settings: &RuntimeSettings, model: ScoringModel) -> Self {
        Self {
            client,
            base_url: settings.remote_base_url.trim_end_matches('/').to_string(),
            model,
            max_retries: settings.max_retries.max(1),
            retry_delay_seconds: settings.retry_delay_seconds,
        }
    }

    pub fn from_settings(settings: &RuntimeSettings, model: ScoringModel) -> anyhow::Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(settings.remote_timeout_seconds.max(1)))
            .build()
            .context("failed to build HTTP client for remote scoring")?;
        Ok(Self::new(client, settings, model))
    }

    pub fn endpoint_url(&self) -> String {
        format!("{}{}", self.base_url, self.model.endpoint())
    }

    async fn send_once(&self, document: &DocumentInput) -> anyhow::Result<Vec<CareerMatch>> {
        let request = self.client.post(self.endpoint_url());
        let request = match &document.content {
            DocumentContent::Text(text) => request.json(&TextAnalysisRequest { text }),
            DocumentContent::Bytes(bytes) => {
                let part = Part::bytes(bytes.clone()).file_name(document.file_name.clone());
                request.multipart(Form::new().part("file", part))
            }
            DocumentContent::Unreadable(reason) => {
                return Err(CoreError::unreadable(&document.file_name, reason.clone()).into());
            }
        };

        let response = request.send().await?;
        let status = response.status();
        let body = response.text().await.unwrap_or_default();
        if !status.is_success() {
            return Err(CoreError::RemoteScoring {
                status: status.as_u16(),
                body,
            }
            .into());
        }

        let matches = serde_json::from_str::<Vec<CareerMatch>>(&body)
            .context("failed to parse remote scoring response")?;
        Ok(matches)
    }
}

#[async_trait]
impl CareerMatcher for RemoteCareerMatcher {
    async fn match_document(&self, document: DocumentInput) -> anyhow::Result<Vec<CareerMatch>> {
        let mut attempt = 0;
        loop {
            match self.send_once(&document).await {
                Ok(matches) => return Ok(matches),
                Err(err) => {
                    attempt += 1;
                    if !is_retryable_error(&err) || attempt >= self.max_retries {
                        return Err(err);
                    }

                    let backoff_seconds =
                        self.retry_delay_seconds * 2_f64.powf((attempt - 1) as f64);
                    warn!(
                        file_name = %document.file_name,
                        model = %self.model,
                        attempt,
                        "remote scoring failed, retrying: {err}"
                    );
                    tokio::time::sleep(Duration::from_secs_f64(backoff_seconds.max(0.1))).await;
                }
            }
        }
    }

    fn backend(&self) -> &'static str {
        "remote"
    }
}

fn is_retryable_error(error: &anyhow::Error) -> bool {
    if let Some(core_error) = error.downcast_ref::<CoreError>() {
        return core_error.is_retryable();
    }

    if let Some(reqwest_error) = error.downcast_ref::<reqwest::Error>() {
        if reqwest_error.is_timeout() || reqwest_error.is_connect() {
            return true;
        }

        if let Some(status) = reqwest_error.status() {
            let code = status.as_u16();
            return code == 429 || code >= 500;
        }
    }

    false
}
