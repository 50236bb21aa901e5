use once_cell::sync::Lazy;
use regex::Regex;

/// Lines at or above this length are treated as prose, never as headers.
const MAX_HEADER_LEN: usize = 50;

pub const SKILLS_HEADERS: [&str; 3] = ["skills", "technical skills", "competencies"];
pub const EXPERIENCE_HEADERS: [&str; 3] = ["experience", "work experience", "employment"];
pub const EDUCATION_HEADERS: [&str; 2] = ["education", "academic background"];

static ALL_CAPS_HEADER_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[A-Z\s]{5,}$").unwrap());

/// Returns the trimmed, non-blank lines of the first section introduced by a
/// header containing one of `header_keywords`. Text after a `:` on the header
/// line (`Skills: Rust, Go`) opens the section. An ALL-CAPS line ends it.
pub fn find_section<S: AsRef<str>>(lines: &[S], header_keywords: &[&str]) -> Vec<String> {
    let keywords: Vec<String> = header_keywords.iter().map(|k| k.to_lowercase()).collect();
    let mut in_section = false;
    let mut section = Vec::new();

    for raw in lines {
        let line = raw.as_ref().trim();
        let lower = line.to_lowercase();

        let is_header = line.chars().count() < MAX_HEADER_LEN
            && keywords.iter().any(|k| lower.contains(k.as_str()));
        if is_header {
            in_section = true;
            if let Some((_, inline)) = line.split_once(':') {
                let inline = inline.trim();
                if !inline.is_empty() {
                    section.push(inline.to_string());
                }
            }
            continue;
        }

        if ALL_CAPS_HEADER_RE.is_match(line) && in_section {
            break;
        }

        if in_section && !line.is_empty() {
            section.push(line.to_string());
        }
    }

    section
}
