use std::sync::Arc;

use tracing::debug;

use super::classifier::TemplateClassifier;
use super::errors::CoreError;
use super::field_extractor;
use super::id_generator::IdGenerator;
use super::models::{
    CandidateRecord, ExtractedCvData, TemplateInfo, NOT_AVAILABLE, NOT_SPECIFIED,
};
use super::scoring;
use super::section_extractor;
use super::segmenter::{self, EDUCATION_HEADERS, EXPERIENCE_HEADERS, SKILLS_HEADERS};

/// Output of one successfully processed document.
#[derive(Debug, Clone)]
pub struct ProcessedDocument {
    pub candidate: CandidateRecord,
    pub template: TemplateInfo,
}

/// Single-document pipeline: classification, extraction and scoring.
pub struct CvPipeline {
    classifier: TemplateClassifier,
    ids: Arc<dyn IdGenerator>,
}

impl CvPipeline {
    pub fn new(classifier: TemplateClassifier, ids: Arc<dyn IdGenerator>) -> Self {
        Self { classifier, ids }
    }

    pub fn process(&self, file_name: &str, text: &str) -> Result<ProcessedDocument, CoreError> {
        if text.contains('\0') {
            return Err(CoreError::unreadable(file_name, "document contains binary content"));
        }

        let classification = self.classifier.classify(file_name, text);
        let extracted = extract_cv_data(text);
        let match_score = scoring::match_score(&extracted, classification.confidence);
        let years_of_experience = scoring::years_of_experience(&extracted.experience);

        debug!(
            file_name,
            template = %classification.template_id,
            confidence = classification.confidence,
            match_score,
            "document scored"
        );

        let name = extracted
            .name
            .clone()
            .or_else(|| {
                Some(field_extractor::name_from_file_name(file_name)).filter(|n| !n.is_empty())
            })
            .unwrap_or_else(|| NOT_SPECIFIED.to_string());

        let candidate = CandidateRecord {
            id: self.ids.next_id(),
            name,
            position: extracted
                .position
                .unwrap_or_else(|| NOT_SPECIFIED.to_string()),
            email: extracted.email.unwrap_or_else(|| NOT_AVAILABLE.to_string()),
            phone: extracted.phone.unwrap_or_else(|| NOT_AVAILABLE.to_string()),
            location: extracted
                .location
                .unwrap_or_else(|| NOT_SPECIFIED.to_string()),
            match_score,
            skills: extracted.skills,
            experience: extracted.experience,
            education: extracted.education,
            years_of_experience,
            selected: false,
        };

        Ok(ProcessedDocument {
            candidate,
            template: self.classifier.describe(&classification),
        })
    }
}

/// Runs the segmenter, section extractors and contact extractor over `text`.
pub fn extract_cv_data(text: &str) -> ExtractedCvData {
    let lines: Vec<&str> = text.lines().map(str::trim).collect();

    let skills = section_extractor::extract_skills(&segmenter::find_section(
        &lines,
        &SKILLS_HEADERS,
    ));
    let experience = section_extractor::extract_experience(&segmenter::find_section(
        &lines,
        &EXPERIENCE_HEADERS,
    ));
    let education = section_extractor::extract_education(&segmenter::find_section(
        &lines,
        &EDUCATION_HEADERS,
    ));

    let contact = field_extractor::extract_contact(text, &experience);

    ExtractedCvData {
        name: contact.name,
        position: contact.position,
        email: contact.email,
        phone: contact.phone,
        location: contact.location,
        skills,
        experience,
        education,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::id_generator::SequentialIdGenerator;
    use crate::core::models::TemplateKind;
    use crate::core::template_catalog::TemplateCatalog;

    const JOHN_SMITH_CV: &str = "John Smith
john.smith@example.com
+1 (555) 123-4567
Location: Austin, TX

PROFESSIONAL EXPERIENCE
Acme Corp
Software Engineer, Platform
2020 - Present
Built the payments service.

SKILLS
React, Node.js

EDUCATION
University of Technology
Bachelor of Science
2014 - 2018
";

    fn pipeline() -> CvPipeline {
        let classifier = TemplateClassifier::new(Arc::new(TemplateCatalog::builtin()));
        CvPipeline::new(classifier, Arc::new(SequentialIdGenerator::new(1)))
    }

    #[test]
    fn standard_resume_produces_full_candidate() {
        let processed = pipeline()
            .process("john_smith_resume.pdf", JOHN_SMITH_CV)
            .unwrap();

        assert_eq!(processed.template.id, TemplateKind::Standard);
        assert_eq!(processed.template.confidence, 90);

        let candidate = processed.candidate;
        assert_eq!(candidate.id, 1);
        assert_eq!(candidate.name, "John Smith");
        assert_eq!(candidate.email, "john.smith@example.com");
        assert_eq!(candidate.phone, "+1 (555) 123-4567");
        assert_eq!(candidate.location, "Austin, TX");
        assert_eq!(candidate.position, "Software Engineer, Platform");
        assert!(candidate.skills.contains(&"React".to_string()));
        assert!(candidate.skills.contains(&"Node.js".to_string()));
        assert_eq!(candidate.experience.len(), 1);
        assert_eq!(candidate.experience[0].description, "Built the payments service.");
        assert_eq!(candidate.education[0].degree, "Bachelor of Science");
        assert_eq!(candidate.years_of_experience, 2020);
        // 0.3*90 + 30 + 2*2 + 20
        assert_eq!(candidate.match_score, 81);
        assert!(!candidate.selected);
    }

    #[test]
    fn inline_header_content_is_extracted() {
        let text = "John Smith
john.smith@example.com
Professional Experience
Skills: React, Node.js
Education: University of Technology, B.S.
";
        let processed = pipeline().process("john_smith_resume.pdf", text).unwrap();

        assert_eq!(processed.template.id, TemplateKind::Standard);
        let candidate = processed.candidate;
        assert_eq!(candidate.name, "John Smith");
        assert_eq!(candidate.email, "john.smith@example.com");
        assert_eq!(&candidate.skills[..2], ["React", "Node.js"]);
        assert_eq!(candidate.education.len(), 1);
        assert_eq!(
            candidate.education[0].institution,
            "University of Technology, B.S."
        );
    }

    #[test]
    fn empty_text_yields_placeholder_candidate() {
        let processed = pipeline().process("file1.pdf", "").unwrap();

        assert_eq!(processed.template.id, TemplateKind::Unknown);
        assert_eq!(processed.template.confidence, 30);

        let candidate = processed.candidate;
        assert_eq!(candidate.name, "File1");
        assert_eq!(candidate.position, NOT_SPECIFIED);
        assert_eq!(candidate.email, NOT_AVAILABLE);
        assert_eq!(candidate.phone, NOT_AVAILABLE);
        assert_eq!(candidate.location, NOT_SPECIFIED);
        assert!(candidate.skills.is_empty());
        assert_eq!(candidate.years_of_experience, 0);
        assert_eq!(candidate.match_score, 9);
    }

    #[test]
    fn experience_durations_sum_leading_integers() {
        let text = "Jane Doe
EXPERIENCE
Tech Solutions Inc
Senior Developer, Frontend
2020 - Present
Digital Innovations
Frontend Developer, Web
2018 - 2020
";
        let processed = pipeline().process("jane.pdf", text).unwrap();
        assert_eq!(processed.candidate.experience.len(), 2);
        assert_eq!(processed.candidate.years_of_experience, 4038);
    }

    #[test]
    fn binary_content_is_rejected() {
        let err = pipeline().process("blob.pdf", "abc\0def").unwrap_err();
        assert!(matches!(err, CoreError::UnreadableDocument { .. }));
    }

    #[test]
    fn ids_come_from_the_injected_generator() {
        let pipeline = pipeline();
        let first = pipeline.process("a.pdf", "").unwrap();
        let second = pipeline.process("b.pdf", "").unwrap();
        assert_eq!(first.candidate.id, 1);
        assert_eq!(second.candidate.id, 2);
    }
}
