use once_cell::sync::Lazy;
use regex::Regex;

use super::models::{ContactDetails, ExperienceEntry};

static LABELED_NAME_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i:\bname)\s*:?[ \t]*([A-Z][a-z]+(?:[ \t]+[A-Z][a-z]+)+)").unwrap()
});
static CAPITALIZED_NAME_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[A-Z][a-z]+(?:[ \t]+[A-Z][a-z]+)+").unwrap());

static EMAIL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\b[\w.\-]+@[\w.\-]+\.\w+\b").unwrap());
static PHONE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?:\+\d{1,3}[-\s]?)?\(?\d{3}\)?[-\s]?\d{3}[-\s]?\d{4}").unwrap()
});

static LOCATION_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\b(?:location|address|based in)\s*:?\s*([^,\n]+(?:,[^,\n]+)?)").unwrap()
});
static POSITION_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\b(?:position|title|role)\s*:?\s*([^\n]+)").unwrap());

static FILE_EXTENSION_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\.(?:pdf|docx?|txt|md|rtf)$").unwrap());

/// Prefers a `Name:` label, otherwise the first run of two or more capitalized words.
pub fn extract_name(text: &str) -> Option<String> {
    if let Some(captures) = LABELED_NAME_RE.captures(text) {
        if let Some(name) = captures.get(1) {
            return Some(name.as_str().trim().to_string());
        }
    }

    CAPITALIZED_NAME_RE
        .find(text)
        .map(|m| m.as_str().trim().to_string())
}

pub fn extract_email(text: &str) -> Option<String> {
    EMAIL_RE.find(text).map(|m| m.as_str().to_string())
}

pub fn extract_phone(text: &str) -> Option<String> {
    PHONE_RE.find(text).map(|m| m.as_str().trim().to_string())
}

pub fn extract_location(text: &str) -> Option<String> {
    labeled_value(&LOCATION_RE, text)
}

pub fn extract_position(text: &str, experience: &[ExperienceEntry]) -> Option<String> {
    labeled_value(&POSITION_RE, text).or_else(|| {
        experience
            .first()
            .map(|entry| entry.position.trim())
            .filter(|position| !position.is_empty())
            .map(str::to_string)
    })
}

pub fn extract_contact(text: &str, experience: &[ExperienceEntry]) -> ContactDetails {
    ContactDetails {
        name: extract_name(text),
        email: extract_email(text),
        phone: extract_phone(text),
        location: extract_location(text),
        position: extract_position(text, experience),
    }
}

/// Turns `jane_doe-cv.pdf` into `Jane Doe Cv`.
pub fn name_from_file_name(file_name: &str) -> String {
    let stem = FILE_EXTENSION_RE.replace(file_name, "");
    stem.split(|c: char| c == '_' || c == '-' || c.is_whitespace())
        .filter(|word| !word.is_empty())
        .map(capitalize)
        .collect::<Vec<String>>()
        .join(" ")
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

fn labeled_value(regex: &Regex, text: &str) -> Option<String> {
    regex
        .captures(text)
        .and_then(|captures| captures.get(1))
        .map(|m| m.as_str().trim().to_string())
        .filter(|value| !value.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extract_name_prefers_label() {
        let text = "Curriculum Vitae\nName: Maria Garcia Lopez\nmaria@example.com";
        assert_eq!(extract_name(text), Some("Maria Garcia Lopez".to_string()));
    }

    #[test]
    fn extract_name_falls_back_to_first_capitalized_run() {
        assert_eq!(
            extract_name("John Smith\njohn.smith@example.com"),
            Some("John Smith".to_string())
        );
        assert_eq!(extract_name("JOHN SMITH\nsoftware engineer"), None);
    }

    #[test]
    fn extract_email_finds_standard_addresses() {
        assert_eq!(
            extract_email("Contact me at john.doe@example.com"),
            Some("john.doe@example.com".to_string())
        );
        assert_eq!(
            extract_email("Email: jane.smith@company.co.uk"),
            Some("jane.smith@company.co.uk".to_string())
        );
        assert_eq!(extract_email("No email here"), None);
    }

    #[test]
    fn extract_phone_accepts_common_shapes() {
        assert_eq!(
            extract_phone("Phone: +1 (555) 123-4567"),
            Some("+1 (555) 123-4567".to_string())
        );
        assert_eq!(
            extract_phone("call 555.123.4567 or 555-123-4567"),
            Some("555-123-4567".to_string())
        );
        assert_eq!(extract_phone("2019 - 2021"), None);
    }

    #[test]
    fn extract_location_keeps_one_extra_clause() {
        assert_eq!(
            extract_location("Location: San Francisco, CA, USA"),
            Some("San Francisco, CA".to_string())
        );
        assert_eq!(
            extract_location("Based in: Berlin"),
            Some("Berlin".to_string())
        );
        assert_eq!(extract_location("Nothing to see"), None);
    }

    #[test]
    fn extract_position_prefers_label_then_first_experience() {
        let experience = vec![ExperienceEntry {
            company: "Acme Corp".to_string(),
            position: "Staff Engineer, Infra".to_string(),
            ..Default::default()
        }];

        assert_eq!(
            extract_position("Title: Data Scientist\n", &experience),
            Some("Data Scientist".to_string())
        );
        assert_eq!(
            extract_position("no label", &experience),
            Some("Staff Engineer, Infra".to_string())
        );
        assert_eq!(extract_position("no label", &[]), None);
    }

    #[test]
    fn name_from_file_name_strips_extension_and_separators() {
        assert_eq!(name_from_file_name("john_smith_resume.pdf"), "John Smith Resume");
        assert_eq!(name_from_file_name("jane-doe.DOCX"), "Jane Doe");
        assert_eq!(name_from_file_name("file1.pdf"), "File1");
    }
}
