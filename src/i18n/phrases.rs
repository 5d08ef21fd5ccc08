use regex::{NoExpand, Regex};
use std::sync::OnceLock;

/// Static phrase table covering the guide's fixed UI strings for one
/// target language. Used only once remote translation has failed.
#[derive(Debug)]
pub struct PhraseTable {
    /// Display name of the target language
    pub language: &'static str,

    /// (English source, translation) pairs
    pub entries: &'static [(&'static str, &'static str)],

    /// Word-bounded matchers, longest source first
    patterns: OnceLock<Vec<(Regex, &'static str)>>,
}

impl PhraseTable {
    /// Exact-match lookup. Surrounding whitespace on the input is ignored.
    pub fn exact(&self, text: &str) -> Option<&'static str> {
        let text = text.trim();
        self.entries
            .iter()
            .find(|(source, _)| *source == text)
            .map(|(_, translated)| *translated)
    }

    /// Replace every known phrase occurring inside `text`, longest phrases
    /// first so "Searching..." wins over "Search". A phrase only matches as
    /// whole words, so "Stop" leaves "Stopover" alone.
    ///
    /// Returns `None` when no phrase occurs in the text.
    pub fn substitute(&self, text: &str) -> Option<String> {
        let mut result = text.to_string();
        let mut replaced = false;
        for (pattern, translated) in self.patterns() {
            if pattern.is_match(&result) {
                result = pattern.replace_all(&result, NoExpand(translated)).into_owned();
                replaced = true;
            }
        }

        replaced.then_some(result)
    }

    fn patterns(&self) -> &[(Regex, &'static str)] {
        self.patterns.get_or_init(|| {
            let mut entries: Vec<_> = self.entries.iter().collect();
            entries.sort_by(|a, b| b.0.len().cmp(&a.0.len()));
            entries
                .into_iter()
                .filter_map(|(source, translated)| {
                    Regex::new(&word_bounded(source)).ok().map(|re| (re, *translated))
                })
                .collect()
        })
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Escaped pattern for `phrase`, with `\b` on each edge that is a word
/// character. "Searching..." still matches before a space.
fn word_bounded(phrase: &str) -> String {
    let is_word = |c: Option<char>| c.is_some_and(|c| c.is_alphanumeric() || c == '_');
    let mut pattern = String::new();
    if is_word(phrase.chars().next()) {
        pattern.push_str(r"\b");
    }
    pattern.push_str(&regex::escape(phrase));
    if is_word(phrase.chars().last()) {
        pattern.push_str(r"\b");
    }
    pattern
}

// ==================== Tamil Phrases ====================

pub static TAMIL_PHRASES: PhraseTable = PhraseTable {
    language: "Tamil",
    entries: &[
        // Language selection
        ("Choose your Language", "உங்கள் மொழியைத் தேர்ந்தெடுக்கவும்"),
        ("Search language...", "மொழியைத் தேடுக..."),
        ("Changing language", "மொழி மாற்றப்படுகிறது"),
        ("Redirecting to language selection screen", "மொழித் தேர்வுத் திரைக்குச் செல்கிறது"),
        // Home
        ("Discover Heritage", "பாரம்பரியத்தைக் கண்டறியுங்கள்"),
        ("Explore historical places around you", "உங்களைச் சுற்றியுள்ள வரலாற்று இடங்களை ஆராயுங்கள்"),
        ("Featured Sites", "சிறப்புத் தளங்கள்"),
        ("Popular", "பிரபலமானது"),
        ("Search", "தேடு"),
        ("Searching...", "தேடுகிறது..."),
        ("Reset", "மீட்டமை"),
        // Site detail
        ("Listen", "கேளுங்கள்"),
        ("Stop", "நிறுத்து"),
        ("Ask AI", "AI-யிடம் கேளுங்கள்"),
        ("View on Map", "வரைபடத்தில் காண்க"),
        ("Audio narration stopped", "ஒலி விவரிப்பு நிறுத்தப்பட்டது"),
        // Map search
        ("Interactive Map View", "ஊடாடும் வரைபடக் காட்சி"),
        ("Search for a heritage site", "பாரம்பரியத் தளத்தைத் தேடுங்கள்"),
        // Chat
        ("Ask a question...", "ஒரு கேள்வி கேளுங்கள்..."),
        ("You", "நீங்கள்"),
        ("Thank you for exploring with us!", "எங்களுடன் ஆராய்ந்ததற்கு நன்றி!"),
        (
            "Sorry, I'm having trouble responding right now. Please try again later.",
            "மன்னிக்கவும், இப்போது பதிலளிப்பதில் சிக்கல் உள்ளது. பின்னர் மீண்டும் முயற்சிக்கவும்.",
        ),
        // Errors
        ("Heritage site not found", "பாரம்பரியத் தளம் கிடைக்கவில்லை"),
        ("No heritage sites found for", "பாரம்பரியத் தளங்கள் எதுவும் கிடைக்கவில்லை:"),
        ("Could not find location for", "இருப்பிடம் கிடைக்கவில்லை:"),
    ],
    patterns: OnceLock::new(),
};
