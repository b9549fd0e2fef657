/// Built-in adult-content keywords
pub const DEFAULT_BLOCKED_KEYWORDS: &[&str] = &[
    "porn", "porno", "xxx", "adult", "adultos", "sex", "sexo", "18+", "+18",
    "erotic", "erotica", "hentai", "nude", "desnudo", "onlyfans", "only fans",
    "brazzers", "playboy", "hustler", "penthouse", "venus", "private", "xlove",
    "uncensored", "nsfw", "milf", "hardcore", "softcore", "red light", "redlight",
    "hot", "sensual", "intimo",
];

/// Substring-based content policy over title and category text
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContentFilter {
    keywords: Vec<String>,
}

impl ContentFilter {
    /// Build a filter from any keyword list (trimmed, lowercased, empties dropped)
    pub fn new<I, S>(keywords: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let keywords = keywords
            .into_iter()
            .map(|k| k.as_ref().trim().to_lowercase())
            .filter(|k| !k.is_empty())
            .collect();
        Self { keywords }
    }

    /// Filter that blocks nothing
    pub fn allow_all() -> Self {
        Self { keywords: Vec::new() }
    }

    pub fn keywords(&self) -> &[String] {
        &self.keywords
    }

    /// True when "<title> <category>" contains any blocked keyword
    pub fn is_blocked(&self, title: &str, category: &str) -> bool {
        self.matched_keyword(title, category).is_some()
    }

    /// The first blocked keyword found, for logging
    pub fn matched_keyword(&self, title: &str, category: &str) -> Option<&str> {
        let text = format!("{} {}", title, category).to_lowercase();
        self.keywords
            .iter()
            .find(|k| text.contains(k.as_str()))
            .map(String::as_str)
    }
}

impl Default for ContentFilter {
    fn default() -> Self {
        Self::new(DEFAULT_BLOCKED_KEYWORDS)
    }
}
