use std::sync::Arc;

use once_cell::sync::Lazy;
use regex::Regex;

use super::models::{TemplateClassification, TemplateInfo, TemplateKind};
use super::template_catalog::{CompiledProfile, TemplateCatalog};

const FILENAME_PATTERN_POINTS: u32 = 10;
const KEYWORD_POINTS: u32 = 5;
const SECTION_HEADER_POINTS: u32 = 5;
const LINKEDIN_URL_BONUS: u32 = 30;
const EUROPASS_BONUS: u32 = 30;
const CURRICULUM_VITAE_BONUS: u32 = 10;

/// Winning scores below this fall back to the unknown template.
pub const MIN_MATCH_SCORE: u32 = 15;

static SECTION_HEADER_RES: Lazy<Vec<Regex>> = Lazy::new(|| {
    [
        "education",
        "experience",
        "skills",
        "employment",
        "projects",
        "certifications",
        "languages",
        "references",
    ]
    .iter()
    .map(|header| Regex::new(&format!(r"(?i)\b{header}\b")).unwrap())
    .collect()
});

static LINKEDIN_URL_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"linkedin\.com/in/").unwrap());
static EUROPASS_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)europass").unwrap());
static CURRICULUM_VITAE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)curriculum\s+vitae").unwrap());

/// Keyword and filename based template detection over an injected catalog.
#[derive(Debug, Clone)]
pub struct TemplateClassifier {
    catalog: Arc<TemplateCatalog>,
}

impl TemplateClassifier {
    pub fn new(catalog: Arc<TemplateCatalog>) -> Self {
        Self { catalog }
    }

    pub fn classify(&self, file_name: &str, text: &str) -> TemplateClassification {
        let lower = text.to_lowercase();
        let mut best: Option<(TemplateKind, u32)> = None;

        for compiled in self.catalog.profiles() {
            let score = score_profile(compiled, file_name, text, &lower);
            // Strictly greater, so earlier profiles win ties.
            if best.map_or(true, |(_, best_score)| score > best_score) {
                best = Some((compiled.profile.id, score));
            }
        }

        match best {
            Some((template_id, score)) => resolve_confidence(template_id, score),
            None => resolve_confidence(TemplateKind::Unknown, 0),
        }
    }

    pub fn describe(&self, classification: &TemplateClassification) -> TemplateInfo {
        let profile = self.catalog.profile(classification.template_id);
        TemplateInfo::from_profile(profile, classification.confidence)
    }
}

/// Raw score of one profile against a document. `lower` is `text` lowercased.
pub fn score_profile(compiled: &CompiledProfile, file_name: &str, text: &str, lower: &str) -> u32 {
    let mut score = 0;

    for pattern in &compiled.filename_patterns {
        if pattern.is_match(file_name) {
            score += FILENAME_PATTERN_POINTS;
        }
    }

    for keyword in &compiled.keyword_patterns {
        score += keyword.find_iter(lower).count() as u32 * KEYWORD_POINTS;
    }

    for header in SECTION_HEADER_RES.iter() {
        if header.is_match(text) {
            score += SECTION_HEADER_POINTS;
        }
    }

    match compiled.profile.id {
        TemplateKind::Linkedin if LINKEDIN_URL_RE.is_match(text) => score += LINKEDIN_URL_BONUS,
        TemplateKind::Europass if EUROPASS_RE.is_match(text) => score += EUROPASS_BONUS,
        TemplateKind::Standard if CURRICULUM_VITAE_RE.is_match(text) => {
            score += CURRICULUM_VITAE_BONUS
        }
        _ => {}
    }

    score
}

/// Maps the winning profile and its raw score to the reported classification.
pub fn resolve_confidence(template_id: TemplateKind, score: u32) -> TemplateClassification {
    if score < MIN_MATCH_SCORE {
        return TemplateClassification {
            template_id: TemplateKind::Unknown,
            confidence: 30 + score,
        };
    }

    TemplateClassification {
        template_id,
        confidence: (50 + score.min(45)).min(95),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::models::TemplateProfile;

    fn classifier() -> TemplateClassifier {
        TemplateClassifier::new(Arc::new(TemplateCatalog::builtin()))
    }

    #[test]
    fn threshold_boundary_between_unknown_and_matched() {
        let below = resolve_confidence(TemplateKind::Technical, 14);
        assert_eq!(below.template_id, TemplateKind::Unknown);
        assert_eq!(below.confidence, 44);

        let at = resolve_confidence(TemplateKind::Technical, 15);
        assert_eq!(at.template_id, TemplateKind::Technical);
        assert_eq!(at.confidence, 65);
    }

    #[test]
    fn confidence_stays_within_bounds_and_is_monotonic() {
        let mut previous = 0;
        for score in 0..500 {
            let classification = resolve_confidence(TemplateKind::Standard, score);
            assert!((30..=95).contains(&classification.confidence));
            if classification.template_id == TemplateKind::Unknown {
                assert!(classification.confidence < 45);
            }
            assert!(classification.confidence >= previous);
            previous = classification.confidence;
        }
    }

    #[test]
    fn resume_filename_and_standard_keywords_select_standard() {
        let text = "John Smith\njohn.smith@example.com\nPROFESSIONAL EXPERIENCE\nAcme Corp\n\
                    SKILLS\nReact, Node.js\nEDUCATION\nUniversity of Technology\n";
        let classification = classifier().classify("john_smith_resume.pdf", text);
        assert_eq!(classification.template_id, TemplateKind::Standard);
        // 10 filename + 15 keywords + 15 shared headers
        assert_eq!(classification.confidence, 90);
    }

    #[test]
    fn linkedin_url_bonus_wins_with_sparse_text() {
        let classification = classifier().classify("jane.pdf", "linkedin.com/in/janedoe");
        assert_eq!(classification.template_id, TemplateKind::Linkedin);
        assert_eq!(classification.confidence, 85);
    }

    #[test]
    fn linkedin_url_bonus_is_case_sensitive() {
        let catalog = TemplateCatalog::builtin();
        let linkedin = catalog
            .profiles()
            .iter()
            .find(|p| p.profile.id == TemplateKind::Linkedin)
            .unwrap();
        // keyword only; the url bonus needs the lowercase host
        let text = "LinkedIn.com/in/JaneDoe";
        assert_eq!(score_profile(linkedin, "x.pdf", text, &text.to_lowercase()), 5);

        let text = "linkedin.com/in/janedoe";
        assert_eq!(score_profile(linkedin, "x.pdf", text, &text.to_lowercase()), 35);
    }

    #[test]
    fn europass_and_curriculum_vitae_bonuses_apply_to_their_profile_only() {
        let catalog = TemplateCatalog::builtin();
        let text = "Europass Curriculum Vitae";
        let lower = text.to_lowercase();

        let europass = catalog
            .profiles()
            .iter()
            .find(|p| p.profile.id == TemplateKind::Europass)
            .unwrap();
        let standard = catalog
            .profiles()
            .iter()
            .find(|p| p.profile.id == TemplateKind::Standard)
            .unwrap();
        let creative = catalog
            .profiles()
            .iter()
            .find(|p| p.profile.id == TemplateKind::Creative)
            .unwrap();

        // keyword "europass" once plus the europass bonus
        assert_eq!(score_profile(europass, "x.pdf", text, &lower), 35);
        assert_eq!(score_profile(standard, "x.pdf", text, &lower), 10);
        assert_eq!(score_profile(creative, "x.pdf", text, &lower), 0);
    }

    #[test]
    fn keyword_occurrences_accumulate() {
        let catalog = TemplateCatalog::builtin();
        let academic = catalog
            .profiles()
            .iter()
            .find(|p| p.profile.id == TemplateKind::Academic)
            .unwrap();
        let text = "Research, research and more RESEARCH. Researcher.";
        let lower = text.to_lowercase();
        assert_eq!(score_profile(academic, "a.pdf", text, &lower), 15);
    }

    #[test]
    fn empty_document_is_unknown() {
        let classifier = classifier();
        let classification = classifier.classify("file1.pdf", "");
        assert_eq!(classification.template_id, TemplateKind::Unknown);
        assert_eq!(classification.confidence, 30);

        let info = classifier.describe(&classification);
        assert_eq!(info.name, "Unknown Format");
        assert_eq!(info.parsing_accuracy, 50);
    }

    #[test]
    fn classification_is_idempotent() {
        let classifier = classifier();
        let text = "Technical Skills\nGitHub projects\nProgramming Languages: Rust";
        let first = classifier.classify("dev_cv.pdf", text);
        let second = classifier.classify("dev_cv.pdf", text);
        assert_eq!(first, second);
    }

    #[test]
    fn ties_go_to_the_earlier_profile() {
        let shared = |id: TemplateKind| TemplateProfile {
            id,
            name: id.to_string(),
            description: String::new(),
            icon: String::new(),
            parsing_accuracy: 50,
            keywords: vec!["portfolio".to_string()],
            filename_patterns: vec![],
        };
        let mut unknown = shared(TemplateKind::Unknown);
        unknown.keywords.clear();

        let catalog = TemplateCatalog::new(vec![
            shared(TemplateKind::Creative),
            shared(TemplateKind::Technical),
            unknown,
        ])
        .unwrap();
        let classifier = TemplateClassifier::new(Arc::new(catalog));

        let classification = classifier.classify("a.pdf", "portfolio portfolio portfolio");
        assert_eq!(classification.template_id, TemplateKind::Creative);
        assert_eq!(classification.confidence, 65);
    }
}
