// src/relevance.rs
//! Keyword relevance gate: an item is in scope when any configured keyword
//! occurs, case-insensitively, somewhere in its title or summary.

/// One-off check against a plain keyword slice. The pipeline builds a
/// `KeywordSet` once instead.
pub fn is_relevant<S: AsRef<str>>(title: &str, summary: &str, keywords: &[S]) -> bool {
    KeywordSet::new(keywords).matches(title, summary)
}

/// Keywords prepared once (trimmed, lower-cased, deduped) and reused per item.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct KeywordSet {
    lowered: Vec<String>,
}

impl KeywordSet {
    pub fn new<S: AsRef<str>>(keywords: &[S]) -> Self {
        let mut lowered: Vec<String> = Vec::with_capacity(keywords.len());
        for k in keywords {
            let k = k.as_ref().trim().to_lowercase();
            if !k.is_empty() && !lowered.contains(&k) {
                lowered.push(k);
            }
        }
        Self { lowered }
    }

    pub fn len(&self) -> usize {
        self.lowered.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lowered.is_empty()
    }

    /// First keyword (in configured order) found in title+summary.
    pub fn first_match(&self, title: &str, summary: &str) -> Option<&str> {
        let hay = format!("{title} {summary}").to_lowercase();
        self.lowered
            .iter()
            .find(|k| hay.contains(k.as_str()))
            .map(String::as_str)
    }

    pub fn matches(&self, title: &str, summary: &str) -> bool {
        self.first_match(title, summary).is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn matches_case_insensitively_in_title_or_summary() {
        let kw = ["OpenAI", "機械学習"];
        assert!(is_relevant("openai raises funds", "", &kw));
        assert!(is_relevant("Quarterly results", "新しい機械学習モデル", &kw));
        assert!(!is_relevant("Weather report", "Sunny all week", &kw));
    }

    #[test]
    fn empty_summary_is_fine() {
        assert!(is_relevant("GPT update", "", &["gpt"]));
        assert!(!is_relevant("", "", &["gpt"]));
    }

    #[test]
    fn blank_keywords_never_match() {
        assert!(!is_relevant("anything", "at all", &["", "   "]));
        let empty: [&str; 0] = [];
        assert!(!is_relevant("anything", "at all", &empty));
    }

    #[test]
    fn substring_semantics_are_crude_on_purpose() {
        // "ai" inside "said" counts
        assert!(is_relevant("He said hello", "", &["AI"]));
    }

    #[test]
    fn keyword_set_dedups_and_reports_first_configured_match() {
        let raw = vec!["AI".to_string(), " ai ".into(), "Google".into(), "".into()];
        let set = KeywordSet::new(&raw);
        assert_eq!(set.len(), 2);
        // configured order, not position in the text
        assert_eq!(set.first_match("Google AI news", ""), Some("ai"));
        assert_eq!(set.first_match("Google I/O recap", ""), Some("google"));
        assert_eq!(set.first_match("Cooking", "pasta"), None);
    }
}
