//! Text sentiment scoring.

use std::collections::HashMap;

/// Scores a piece of text on `[-1, 1]` (negative to positive).
pub trait SentimentScorer: Send + Sync {
    fn score(&self, text: &str) -> f64;

    /// Scores many texts, preserving order.
    fn score_batch(&self, texts: &[String]) -> Vec<f64> {
        texts.iter().map(|t| self.score(t)).collect()
    }
}

/// Normalization constant for the running sum (VADER style `x / sqrt(x² + α)`).
const NORM_ALPHA: f64 = 15.0;
/// How many tokens a negation word reaches forward.
const NEGATION_WINDOW: usize = 3;
const NEGATION_FACTOR: f64 = -0.74;

const POSITIVE: &[(&str, f64)] = &[
    ("beat", 1.2),
    ("beats", 1.2),
    ("bullish", 1.6),
    ("gain", 1.0),
    ("gains", 1.0),
    ("growth", 1.2),
    ("improve", 1.0),
    ("improved", 1.0),
    ("improves", 1.0),
    ("outperform", 1.4),
    ("profit", 1.2),
    ("profitable", 1.4),
    ("rally", 1.4),
    ("rebound", 1.0),
    ("record", 1.0),
    ("recovery", 1.0),
    ("rise", 1.0),
    ("rises", 1.0),
    ("soar", 1.6),
    ("soars", 1.6),
    ("strong", 1.0),
    ("surge", 1.4),
    ("surges", 1.4),
    ("upgrade", 1.2),
    ("upgraded", 1.2),
    ("exceed", 1.2),
    ("exceeds", 1.2),
    ("optimistic", 1.2),
    ("expansion", 0.8),
    ("dividend", 0.6),
];

const NEGATIVE: &[(&str, f64)] = &[
    ("bankruptcy", -2.4),
    ("bearish", -1.6),
    ("breach", -1.6),
    ("collapse", -2.0),
    ("concern", -1.0),
    ("concerns", -1.0),
    ("crash", -1.8),
    ("decline", -1.2),
    ("declines", -1.2),
    ("default", -2.0),
    ("delisting", -2.0),
    ("distress", -1.8),
    ("downgrade", -1.4),
    ("downgraded", -1.4),
    ("drop", -1.2),
    ("drops", -1.2),
    ("fall", -1.0),
    ("falls", -1.0),
    ("fraud", -2.4),
    ("insolvency", -2.4),
    ("investigation", -1.2),
    ("lawsuit", -1.2),
    ("layoff", -1.4),
    ("layoffs", -1.4),
    ("liquidation", -2.2),
    ("loss", -1.2),
    ("losses", -1.2),
    ("miss", -1.2),
    ("misses", -1.2),
    ("plunge", -1.6),
    ("plunges", -1.6),
    ("restatement", -1.6),
    ("restructuring", -1.0),
    ("risk", -0.6),
    ("slump", -1.4),
    ("warning", -1.0),
    ("weak", -1.0),
];

const NEGATIONS: &[&str] = &[
    "not", "no", "never", "without", "cannot", "isn't", "isnt", "wasn't", "wasnt",
    "doesn't", "doesnt", "didn't", "didnt", "won't", "wont", "hardly",
];

const INTENSIFIERS: &[(&str, f64)] = &[
    ("very", 1.3),
    ("sharply", 1.4),
    ("significantly", 1.3),
    ("dramatically", 1.5),
    ("slightly", 0.6),
    ("modestly", 0.7),
];

/// Rule-based financial sentiment from a word lexicon with negation and
/// intensifier handling.
#[derive(Debug, Clone)]
pub struct LexiconScorer {
    words: HashMap<&'static str, f64>,
    intensifiers: HashMap<&'static str, f64>,
}

impl Default for LexiconScorer {
    fn default() -> Self {
        Self::new()
    }
}

impl LexiconScorer {
    #[must_use]
    pub fn new() -> Self {
        Self {
            words: POSITIVE.iter().chain(NEGATIVE).copied().collect(),
            intensifiers: INTENSIFIERS.iter().copied().collect(),
        }
    }

    fn tokens(text: &str) -> Vec<String> {
        text.split(|c: char| !(c.is_alphanumeric() || c == '\''))
            .filter(|t| !t.is_empty())
            .map(str::to_lowercase)
            .collect()
    }
}

impl SentimentScorer for LexiconScorer {
    fn score(&self, text: &str) -> f64 {
        let tokens = Self::tokens(text);
        let mut sum = 0.0;

        for (i, tok) in tokens.iter().enumerate() {
            let Some(&base) = self.words.get(tok.as_str()) else {
                continue;
            };
            let mut value = base;

            if i > 0
                && let Some(&boost) = self.intensifiers.get(tokens[i - 1].as_str())
            {
                value *= boost;
            }

            let window = &tokens[i.saturating_sub(NEGATION_WINDOW)..i];
            if window.iter().any(|w| NEGATIONS.contains(&w.as_str())) {
                value *= NEGATION_FACTOR;
            }

            sum += value;
        }

        if sum == 0.0 {
            return 0.0;
        }
        (sum / (sum * sum + NORM_ALPHA).sqrt()).clamp(-1.0, 1.0)
    }
}
