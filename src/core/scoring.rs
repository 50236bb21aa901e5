use once_cell::sync::Lazy;
use regex::Regex;

use super::models::{ExperienceEntry, ExtractedCvData};

const TEMPLATE_WEIGHT: f64 = 0.3;
const COMPLETENESS_WEIGHT: f64 = 30.0;
const SKILL_POINTS: f64 = 2.0;
const SKILL_CAP: f64 = 20.0;
const YEAR_POINTS: f64 = 2.0;
const YEARS_CAP: f64 = 20.0;
const REQUIRED_FIELD_COUNT: f64 = 5.0;

static FIRST_INTEGER_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\d+").unwrap());

/// Sums the first integer of every duration string. "2020 - Present" counts as 2020.
pub fn years_of_experience(experience: &[ExperienceEntry]) -> u64 {
    experience
        .iter()
        .filter_map(|entry| FIRST_INTEGER_RE.find(&entry.duration))
        .map(|m| m.as_str().parse::<u64>().unwrap_or(u64::MAX))
        .fold(0_u64, |total, years| total.saturating_add(years))
}

/// Fraction of name, position, skills, experience and education that are present.
pub fn completeness(data: &ExtractedCvData) -> f64 {
    let present = [
        is_present(data.name.as_deref()),
        is_present(data.position.as_deref()),
        !data.skills.is_empty(),
        !data.experience.is_empty(),
        !data.education.is_empty(),
    ]
    .iter()
    .filter(|present| **present)
    .count();

    present as f64 / REQUIRED_FIELD_COUNT
}

pub fn match_score(data: &ExtractedCvData, template_confidence: u32) -> u32 {
    let skills = (data.skills.len() as f64 * SKILL_POINTS).min(SKILL_CAP);
    let years = (years_of_experience(&data.experience) as f64 * YEAR_POINTS).min(YEARS_CAP);

    let score = template_confidence as f64 * TEMPLATE_WEIGHT
        + completeness(data) * COMPLETENESS_WEIGHT
        + skills
        + years;

    score.clamp(0.0, 100.0).round() as u32
}

fn is_present(value: Option<&str>) -> bool {
    value.is_some_and(|v| !v.trim().is_empty())
}
