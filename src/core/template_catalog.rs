use std::collections::HashSet;
use std::path::Path;

use anyhow::Context;
use regex::{Regex, RegexBuilder};

use super::errors::CoreError;
use super::models::{TemplateKind, TemplateProfile};

/// A profile with its patterns compiled once at catalog construction.
#[derive(Debug)]
pub struct CompiledProfile {
    pub profile: TemplateProfile,
    pub filename_patterns: Vec<Regex>,
    /// Whole-word matchers, applied to lowercased text.
    pub keyword_patterns: Vec<Regex>,
}

/// Immutable template catalog. Scorable profiles keep their declaration order,
/// which decides ties during classification.
#[derive(Debug)]
pub struct TemplateCatalog {
    profiles: Vec<CompiledProfile>,
    unknown: TemplateProfile,
}

impl TemplateCatalog {
    pub fn new(profiles: Vec<TemplateProfile>) -> Result<Self, CoreError> {
        let mut seen = HashSet::new();
        let mut unknown = None;
        let mut compiled = Vec::new();

        for profile in profiles {
            if !seen.insert(profile.id) {
                return Err(CoreError::InvalidCatalog(format!(
                    "duplicate template id '{}'",
                    profile.id
                )));
            }

            if profile.id == TemplateKind::Unknown {
                unknown = Some(profile);
                continue;
            }

            compiled.push(compile_profile(profile)?);
        }

        let unknown = unknown.ok_or_else(|| {
            CoreError::InvalidCatalog("missing the 'unknown' template".to_string())
        })?;

        if compiled.is_empty() {
            return Err(CoreError::InvalidCatalog(
                "catalog has no scorable templates".to_string(),
            ));
        }

        Ok(Self {
            profiles: compiled,
            unknown,
        })
    }

    pub fn builtin() -> Self {
        Self::new(builtin_profiles()).expect("built-in template catalog is valid")
    }

    pub fn from_json(json: &str) -> Result<Self, CoreError> {
        let profiles = serde_json::from_str::<Vec<TemplateProfile>>(json)
            .map_err(|err| CoreError::InvalidCatalog(format!("malformed catalog JSON: {err}")))?;
        Self::new(profiles)
    }

    pub async fn load(path: &Path) -> anyhow::Result<Self> {
        let json = tokio::fs::read_to_string(path)
            .await
            .with_context(|| format!("failed to read template catalog {}", path.display()))?;
        Ok(Self::from_json(&json)?)
    }

    pub fn profiles(&self) -> &[CompiledProfile] {
        &self.profiles
    }

    pub fn unknown(&self) -> &TemplateProfile {
        &self.unknown
    }

    pub fn profile(&self, id: TemplateKind) -> &TemplateProfile {
        self.profiles
            .iter()
            .map(|compiled| &compiled.profile)
            .find(|profile| profile.id == id)
            .unwrap_or(&self.unknown)
    }
}

fn compile_profile(profile: TemplateProfile) -> Result<CompiledProfile, CoreError> {
    let filename_patterns = profile
        .filename_patterns
        .iter()
        .map(|pattern| {
            RegexBuilder::new(pattern)
                .case_insensitive(true)
                .build()
                .map_err(|err| {
                    CoreError::InvalidCatalog(format!(
                        "template '{}' has invalid filename pattern '{pattern}': {err}",
                        profile.id
                    ))
                })
        })
        .collect::<Result<Vec<Regex>, CoreError>>()?;

    let keyword_patterns = profile
        .keywords
        .iter()
        .filter(|keyword| !keyword.trim().is_empty())
        .map(|keyword| {
            let source = format!(r"\b{}\b", regex::escape(&keyword.to_lowercase()));
            Regex::new(&source).map_err(|err| {
                CoreError::InvalidCatalog(format!(
                    "template '{}' has invalid keyword '{keyword}': {err}",
                    profile.id
                ))
            })
        })
        .collect::<Result<Vec<Regex>, CoreError>>()?;

    Ok(CompiledProfile {
        profile,
        filename_patterns,
        keyword_patterns,
    })
}

fn profile(
    id: TemplateKind,
    name: &str,
    description: &str,
    icon: &str,
    parsing_accuracy: u8,
    keywords: &[&str],
    filename_patterns: &[&str],
) -> TemplateProfile {
    TemplateProfile {
        id,
        name: name.to_string(),
        description: description.to_string(),
        icon: icon.to_string(),
        parsing_accuracy,
        keywords: keywords.iter().map(|k| k.to_string()).collect(),
        filename_patterns: filename_patterns.iter().map(|p| p.to_string()).collect(),
    }
}

pub fn builtin_profiles() -> Vec<TemplateProfile> {
    vec![
        profile(
            TemplateKind::Standard,
            "Standard Resume",
            "Traditional chronological format with clear sections",
            "file-text",
            85,
            &[
                "professional experience",
                "work history",
                "education",
                "skills",
                "references",
            ],
            &["resume", "cv"],
        ),
        profile(
            TemplateKind::Academic,
            "Academic CV",
            "Detailed format with publications and research experience",
            "graduation-cap",
            80,
            &[
                "publications",
                "research",
                "teaching experience",
                "grants",
                "conferences",
                "phd",
            ],
            &["academic", "phd", "research", "professor"],
        ),
        profile(
            TemplateKind::Creative,
            "Creative Resume",
            "Design-focused format with visual elements",
            "palette",
            65,
            &[
                "portfolio",
                "projects",
                "design",
                "creative",
                "art",
                "photography",
            ],
            &["creative", "design", "portfolio"],
        ),
        profile(
            TemplateKind::Technical,
            "Technical Resume",
            "Skills-focused format for technical roles",
            "code",
            90,
            &[
                "technical skills",
                "programming languages",
                "technologies",
                "projects",
                "github",
            ],
            &["tech", "developer", "engineer", "programming"],
        ),
        profile(
            TemplateKind::Executive,
            "Executive Resume",
            "Achievement-focused format for senior positions",
            "briefcase",
            75,
            &[
                "leadership",
                "strategy",
                "executive",
                "board",
                "revenue",
                "growth",
                "c-level",
            ],
            &["executive", "ceo", "cto", "cfo", "director", "vp", "manager"],
        ),
        profile(
            TemplateKind::AtsFriendly,
            "ATS-Friendly Resume",
            "Optimized for applicant tracking systems",
            "check-circle",
            95,
            &[
                "keywords",
                "core competencies",
                "professional summary",
                "achievements",
            ],
            &["ats", "applicant", "tracking"],
        ),
        profile(
            TemplateKind::Linkedin,
            "LinkedIn Export",
            "Resume exported from LinkedIn profile",
            "linkedin",
            88,
            &[
                "linkedin",
                "generated",
                "exported from linkedin",
                "www.linkedin.com",
            ],
            &["linkedin", "li_"],
        ),
        profile(
            TemplateKind::Europass,
            "Europass CV",
            "Standardized European CV format",
            "globe",
            92,
            &[
                "europass",
                "european",
                "language passport",
                "mobility",
                "eu format",
            ],
            &["europass", "eu_cv", "european"],
        ),
        profile(
            TemplateKind::Unknown,
            "Unknown Format",
            "Custom or unrecognized format",
            "help-circle",
            50,
            &[],
            &[],
        ),
    ]
}
