use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

pub const NOT_SPECIFIED: &str = "Not Specified";
pub const NOT_AVAILABLE: &str = "Not Available";

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(rename_all = "kebab-case")]
pub enum TemplateKind {
    Standard,
    Academic,
    Creative,
    Technical,
    Executive,
    AtsFriendly,
    Linkedin,
    Europass,
    Unknown,
}

impl TemplateKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            TemplateKind::Standard => "standard",
            TemplateKind::Academic => "academic",
            TemplateKind::Creative => "creative",
            TemplateKind::Technical => "technical",
            TemplateKind::Executive => "executive",
            TemplateKind::AtsFriendly => "ats-friendly",
            TemplateKind::Linkedin => "linkedin",
            TemplateKind::Europass => "europass",
            TemplateKind::Unknown => "unknown",
        }
    }
}

impl fmt::Display for TemplateKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Static catalog entry describing one CV template style.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TemplateProfile {
    pub id: TemplateKind,
    pub name: String,
    pub description: String,
    #[serde(default)]
    pub icon: String,
    /// Informational only, never used in scoring.
    pub parsing_accuracy: u8,
    #[serde(default)]
    pub keywords: Vec<String>,
    /// Case-insensitive regex sources matched against the file name.
    #[serde(default)]
    pub filename_patterns: Vec<String>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct TemplateClassification {
    pub template_id: TemplateKind,
    pub confidence: u32,
}

/// Display record for a classified document.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct TemplateInfo {
    pub id: TemplateKind,
    pub name: String,
    pub description: String,
    pub icon: String,
    pub confidence: u32,
    pub parsing_accuracy: u8,
}

impl TemplateInfo {
    pub fn from_profile(profile: &TemplateProfile, confidence: u32) -> Self {
        Self {
            id: profile.id,
            name: profile.name.clone(),
            description: profile.description.clone(),
            icon: profile.icon.clone(),
            confidence,
            parsing_accuracy: profile.parsing_accuracy,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ExperienceEntry {
    pub company: String,
    pub position: String,
    pub duration: String,
    pub description: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct EducationEntry {
    pub institution: String,
    pub degree: String,
    pub duration: String,
}

/// Document-wide contact fields. Every field is best-effort.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ContactDetails {
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub location: Option<String>,
    pub position: Option<String>,
}

/// Raw extraction output for one document, before placeholders are applied.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExtractedCvData {
    pub name: Option<String>,
    pub position: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub location: Option<String>,
    pub skills: Vec<String>,
    pub experience: Vec<ExperienceEntry>,
    pub education: Vec<EducationEntry>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct CandidateRecord {
    pub id: u64,
    pub name: String,
    pub position: String,
    pub email: String,
    pub phone: String,
    pub location: String,
    pub match_score: u32,
    pub skills: Vec<String>,
    pub experience: Vec<ExperienceEntry>,
    pub education: Vec<EducationEntry>,
    pub years_of_experience: u64,
    #[serde(default)]
    pub selected: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DocumentContent {
    Text(String),
    Bytes(Vec<u8>),
    /// The document could not be read at the source; it is reported as failed.
    Unreadable(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentInput {
    pub file_name: String,
    pub content: DocumentContent,
}

impl DocumentInput {
    pub fn text(file_name: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            file_name: file_name.into(),
            content: DocumentContent::Text(text.into()),
        }
    }

    pub fn bytes(file_name: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            file_name: file_name.into(),
            content: DocumentContent::Bytes(bytes),
        }
    }

    pub fn unreadable(file_name: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            file_name: file_name.into(),
            content: DocumentContent::Unreadable(reason.into()),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchResult {
    pub candidates: Vec<CandidateRecord>,
    pub success: Vec<String>,
    pub failed: Vec<String>,
    /// Documents never started because the batch was cancelled.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub skipped: Vec<String>,
    /// Keyed by file name. When two inputs share a name, the later one wins;
    /// both still appear in `success` and `candidates`.
    pub template_info: BTreeMap<String, TemplateInfo>,
}

impl BatchResult {
    pub fn summary(&self) -> BatchSummary {
        let mut template_counts: BTreeMap<TemplateKind, usize> = BTreeMap::new();
        for info in self.template_info.values() {
            *template_counts.entry(info.id).or_insert(0) += 1;
        }

        let average_confidence = if self.template_info.is_empty() {
            0
        } else {
            let total: u32 = self.template_info.values().map(|t| t.confidence).sum();
            (total as f64 / self.template_info.len() as f64).round() as u32
        };

        BatchSummary {
            total: self.success.len() + self.failed.len() + self.skipped.len(),
            succeeded: self.success.len(),
            failed: self.failed.len(),
            skipped: self.skipped.len(),
            template_counts,
            average_confidence,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct BatchSummary {
    pub total: usize,
    pub succeeded: usize,
    pub failed: usize,
    pub skipped: usize,
    pub template_counts: BTreeMap<TemplateKind, usize>,
    pub average_confidence: u32,
}

impl fmt::Display for BatchSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Successfully processed {} out of {} CVs",
            self.succeeded, self.total
        )?;
        if self.failed > 0 {
            write!(f, " ({} failed)", self.failed)?;
        }
        if self.skipped > 0 {
            write!(f, " ({} skipped)", self.skipped)?;
        }
        Ok(())
    }
}

/// Record shape returned by the remote career scoring service.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CareerMatch {
    pub title: String,
    pub description: String,
    pub match_score: u32,
    #[serde(default)]
    pub key_skills: Vec<String>,
    #[serde(default)]
    pub missing_skills: Vec<String>,
    #[serde(default)]
    pub salary: String,
    #[serde(default)]
    pub growth: String,
    #[serde(default)]
    pub image: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct RuntimeSettings {
    pub max_concurrent_documents: usize,
    pub catalog_path: String,
    pub remote_base_url: String,
    pub remote_timeout_seconds: u64,
    pub max_retries: usize,
    pub retry_delay_seconds: f64,
    pub log_filter: String,
}

impl Default for RuntimeSettings {
    fn default() -> Self {
        Self {
            max_concurrent_documents: 8,
            catalog_path: String::new(),
            remote_base_url: "http://127.0.0.1:8000/api".to_string(),
            remote_timeout_seconds: 60,
            max_retries: 3,
            retry_delay_seconds: 1.0,
            log_filter: "info".to_string(),
        }
    }
}
