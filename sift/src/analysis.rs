//! Text analysis pipeline shared by the query compiler (normalization and
//! tokenization) and the in-memory engine (stemming, shingles, edit
//! distance). Mirrors the analyzer chain a real engine is assumed to have
//! configured at schema-setup time: case folding, ASCII folding, Snowball
//! stemming, and adjacent-word merging for word-space normalization.

use rust_stemmers::{Algorithm, Stemmer};
use unicode_normalization::char::is_combining_mark;
use unicode_normalization::UnicodeNormalization;

/// Case-fold and ASCII-fold a string: lowercase, then NFD-decompose and
/// drop combining marks so "Jalapeño" folds to "jalapeno" and "ÅÄÖ" to
/// "aao".
pub fn fold(text: &str) -> String {
    text.to_lowercase()
        .nfd()
        .filter(|c| !is_combining_mark(*c))
        .collect()
}

/// Split folded text into tokens. Apostrophes join ("jerry's" →
/// "jerrys"), "&" reads as "and", "%" survives inside tokens ("1%"),
/// all other punctuation separates.
pub fn tokenize(text: &str) -> Vec<String> {
    let folded = fold(&text.replace('&', " and "));
    let mut tokens = Vec::new();
    let mut current = String::new();
    for c in folded.chars() {
        if c.is_alphanumeric() || c == '%' {
            current.push(c);
        } else if c == '\'' || c == '\u{2019}' {
            // joining apostrophe
        } else if !current.is_empty() {
            tokens.push(std::mem::take(&mut current));
        }
    }
    if !current.is_empty() {
        tokens.push(current);
    }
    tokens
}

/// Canonical form of a whole phrase: folded tokens re-joined with single
/// spaces. Used for exact-match comparison on both sides.
pub fn normalize_phrase(text: &str) -> String {
    tokenize(text).join(" ")
}

/// Adjacent-pair word merges ("pepper jack cheese" → ["pepperjack",
/// "jackcheese"]). Stored-side half of word-space normalization.
pub fn shingles(tokens: &[String]) -> Vec<String> {
    tokens.windows(2).map(|w| w.concat()).collect()
}

/// Edit distance between two tokens. With `transpositions`, an adjacent
/// swap counts as one edit (Damerau) rather than two.
pub fn edit_distance(a: &str, b: &str, transpositions: bool) -> usize {
    if transpositions {
        strsim::damerau_levenshtein(a, b)
    } else {
        strsim::levenshtein(a, b)
    }
}

/// Snowball stemmer plus the token pipeline above. One per engine; cheap
/// to construct, safe to share.
pub struct Analyzer {
    stemmer: Stemmer,
}

/// Analyzed variants of one field value, as the engine's index would hold
/// them.
#[derive(Debug, Clone)]
pub struct AnalyzedField {
    /// Folded tokens in order.
    pub tokens: Vec<String>,
    /// Stemmed tokens, position-aligned with `tokens`.
    pub stems: Vec<String>,
    /// Adjacent-pair merges and their stems.
    pub shingles: Vec<String>,
    pub shingle_stems: Vec<String>,
    /// Canonical whole-value form for exact matching.
    pub exact: String,
}

impl Default for Analyzer {
    fn default() -> Self {
        Self::new()
    }
}

impl Analyzer {
    pub fn new() -> Self {
        Self {
            stemmer: Stemmer::create(Algorithm::English),
        }
    }

    pub fn stem(&self, token: &str) -> String {
        self.stemmer.stem(token).into_owned()
    }

    pub fn analyze(&self, value: &str) -> AnalyzedField {
        let tokens = tokenize(value);
        let stems = tokens.iter().map(|t| self.stem(t)).collect();
        let shingles = shingles(&tokens);
        let shingle_stems = shingles.iter().map(|s| self.stem(s)).collect();
        AnalyzedField {
            exact: tokens.join(" "),
            tokens,
            stems,
            shingles,
            shingle_stems,
        }
    }
}
