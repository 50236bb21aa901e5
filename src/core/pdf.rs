use once_cell::sync::Lazy;
use regex::Regex;

static URL_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r#"https?://[^\s<>'"\)]+"#).unwrap());

/// PDF text extraction. Link annotations are appended so profile URLs
/// (LinkedIn in particular) reach the classifier even when they only exist
/// as hyperlinks.
#[derive(Debug, Default, Clone)]
pub struct PdfTextExtractor;

impl PdfTextExtractor {
    pub fn new() -> Self {
        Self
    }

    pub fn extract_text(&self, data: &[u8]) -> anyhow::Result<String> {
        let mut text = pdf_extract::extract_text_from_mem(data)?;

        let links = extract_hyperlinks(data);
        if !links.is_empty() {
            text.push('\n');
            text.push_str(&links.join("\n"));
        }

        Ok(text)
    }
}

fn extract_hyperlinks(data: &[u8]) -> Vec<String> {
    let raw = String::from_utf8_lossy(data);
    let mut links: Vec<String> = Vec::new();
    for m in URL_RE.find_iter(&raw) {
        let value = m.as_str().to_string();
        if !links
            .iter()
            .any(|existing: &String| existing.eq_ignore_ascii_case(&value))
        {
            links.push(value);
        }
    }

    links
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hyperlinks_are_deduplicated_case_insensitively() {
        let raw = b"<< /URI (https://www.linkedin.com/in/janedoe) >> \
                    << /URI (https://www.LinkedIn.com/in/JaneDoe) >> \
                    << /URI (https://github.com/janedoe) >>";
        let links = extract_hyperlinks(raw);
        assert_eq!(
            links,
            vec![
                "https://www.linkedin.com/in/janedoe".to_string(),
                "https://github.com/janedoe".to_string(),
            ]
        );
    }
}
