/// Alternative keywords accepted for a connection option
///
/// The raw list is lowercased once when declared. Splitting keeps every
/// segment as written, including empty ones and surrounding spaces.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidKeywords {
    keywords: String,
}

impl ValidKeywords {
    pub fn new(keywords: &str) -> Self {
        Self {
            keywords: keywords.to_lowercase(),
        }
    }

    /// The normalized comma-separated list
    pub fn as_str(&self) -> &str {
        &self.keywords
    }

    pub fn keywords(&self) -> Vec<&str> {
        self.keywords.split(',').collect()
    }

    /// Whether `word` names one of the keywords, ignoring case and surrounding spaces
    pub fn contains(&self, word: &str) -> bool {
        let word = word.trim().to_lowercase();
        self.keywords.split(',').any(|k| k.trim() == word)
    }
}
