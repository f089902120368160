use unicode_normalization::UnicodeNormalization;

const UNIGRAM_WEIGHT: f32 = 1.0;
const BIGRAM_WEIGHT: f32 = 0.5;

const STOPWORDS: &[&str] = &[
    "a", "an", "and", "are", "as", "at", "be", "by", "for", "from", "in", "is", "it", "of", "on",
    "or", "the", "to", "with",
];

/// Weighted hashing feature.
#[derive(Debug, Clone, PartialEq)]
pub struct WeightedToken {
    pub token: String,
    pub weight: f32,
}

impl WeightedToken {
    pub fn new(token: impl Into<String>, weight: f32) -> Self {
        Self {
            token: token.into(),
            weight,
        }
    }
}

/// Token format
/// - w:<word>          (single word)
/// - b:<word>_<word>   (adjacent pair, captures "machine learning" vs "learning")
pub fn tokenize_text(text: &str) -> Vec<WeightedToken> {
    let words = normalized_words(text);
    let mut tokens = Vec::with_capacity(words.len() * 2);

    for word in &words {
        tokens.push(WeightedToken::new(format!("w:{word}"), UNIGRAM_WEIGHT));
    }
    for pair in words.windows(2) {
        tokens.push(WeightedToken::new(
            format!("b:{}_{}", pair[0], pair[1]),
            BIGRAM_WEIGHT,
        ));
    }

    tokens
}

/// NFKC + lowercase words; `+` and `#` stay attached so "C++" and "C#" survive.
fn normalized_words(text: &str) -> Vec<String> {
    let normalized: String = text.nfkc().collect::<String>().to_lowercase();

    normalized
        .split(|c: char| !(c.is_alphanumeric() || c == '+' || c == '#'))
        .filter(|word| !word.is_empty() && !STOPWORDS.contains(word))
        .map(str::to_string)
        .collect()
}
