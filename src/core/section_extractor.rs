use once_cell::sync::Lazy;
use regex::Regex;

use super::models::{EducationEntry, ExperienceEntry};

static SKILL_TOKEN_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"[\w+#.\-]+").unwrap());
static STOP_WORD_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)^(and|the|or|in|at|by|to|of)$").unwrap());

static COMPANY_LINE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[A-Z][a-zA-Z\s&]+$").unwrap());
static DATE_RANGE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\d{4}(?:\s*[-–—]\s*(?:\d{4}|present))?").unwrap());
static INSTITUTION_LINE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)university|college|institute|school").unwrap());
static DEGREE_LINE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)bachelor|master|phd|diploma|degree").unwrap());

/// Tokenizes skill lines into a de-duplicated list, keeping first-seen order.
pub fn extract_skills<S: AsRef<str>>(lines: &[S]) -> Vec<String> {
    let mut skills: Vec<String> = Vec::new();

    for line in lines {
        for m in SKILL_TOKEN_RE.find_iter(line.as_ref()) {
            let token = m.as_str().trim();
            if token.chars().count() <= 2 || STOP_WORD_RE.is_match(token) {
                continue;
            }
            if !skills.iter().any(|existing| existing == token) {
                skills.push(token.to_string());
            }
        }
    }

    skills
}

/// Open experience entry while scanning a section.
#[derive(Debug, Default)]
struct ExperienceDraft {
    company: String,
    position: Option<String>,
    duration: Option<String>,
    description: Vec<String>,
}

impl ExperienceDraft {
    fn open(company: &str) -> Self {
        Self {
            company: company.to_string(),
            ..Default::default()
        }
    }

    fn accept(&mut self, line: &str) {
        if self.position.is_none() {
            self.position = Some(line.to_string());
        } else if DATE_RANGE_RE.is_match(line) {
            self.duration = Some(line.to_string());
        } else {
            self.description.push(line.to_string());
        }
    }

    fn finish(self) -> ExperienceEntry {
        ExperienceEntry {
            company: self.company,
            position: self.position.unwrap_or_default(),
            duration: self.duration.unwrap_or_default(),
            description: self.description.join(" "),
        }
    }
}

pub fn extract_experience<S: AsRef<str>>(lines: &[S]) -> Vec<ExperienceEntry> {
    let mut entries = Vec::new();
    let mut current: Option<ExperienceDraft> = None;

    for raw in lines {
        let line = raw.as_ref();
        if COMPANY_LINE_RE.is_match(line) {
            if let Some(draft) = current.take() {
                entries.push(draft.finish());
            }
            current = Some(ExperienceDraft::open(line));
        } else if let Some(draft) = current.as_mut() {
            draft.accept(line);
        }
    }

    if let Some(draft) = current {
        entries.push(draft.finish());
    }

    entries
}

#[derive(Debug, Default)]
struct EducationDraft {
    institution: String,
    degree: Option<String>,
    duration: Option<String>,
}

impl EducationDraft {
    fn open(institution: &str) -> Self {
        Self {
            institution: institution.to_string(),
            ..Default::default()
        }
    }

    // Lines that are neither a degree nor a date are dropped.
    fn accept(&mut self, line: &str) {
        if DEGREE_LINE_RE.is_match(line) {
            self.degree = Some(line.to_string());
        } else if DATE_RANGE_RE.is_match(line) {
            self.duration = Some(line.to_string());
        }
    }

    fn finish(self) -> EducationEntry {
        EducationEntry {
            institution: self.institution,
            degree: self.degree.unwrap_or_default(),
            duration: self.duration.unwrap_or_default(),
        }
    }
}

pub fn extract_education<S: AsRef<str>>(lines: &[S]) -> Vec<EducationEntry> {
    let mut entries = Vec::new();
    let mut current: Option<EducationDraft> = None;

    for raw in lines {
        let line = raw.as_ref();
        if INSTITUTION_LINE_RE.is_match(line) {
            if let Some(draft) = current.take() {
                entries.push(draft.finish());
            }
            current = Some(EducationDraft::open(line));
        } else if let Some(draft) = current.as_mut() {
            draft.accept(line);
        }
    }

    if let Some(draft) = current {
        entries.push(draft.finish());
    }

    entries
}
