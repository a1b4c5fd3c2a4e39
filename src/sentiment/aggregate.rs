use chrono::{DateTime, Utc};
use serde::{Serialize, Serializer};

use crate::core::RiskError;
use crate::core::models::round4;

const SECONDS_PER_DAY: f64 = 86_400.0;

/// Negative-event keywords matched (case-insensitively) against article text.
pub const DEFAULT_NEG_KEYWORDS: &[&str] = &[
    "default",
    "bankruptcy",
    "insolvency",
    "liquidation",
    "downgrade",
    "credit watch",
    "going concern",
    "fraud",
    "restatement",
    "restructuring",
    "mass layoff",
    "covenant breach",
    "distress",
    "delisting",
];

/// An article timestamp: parsed when possible, otherwise kept verbatim.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PublishedAt {
    Parsed(DateTime<Utc>),
    Unparsed(String),
}

impl PublishedAt {
    /// Parses an RFC 3339 timestamp (`Z` suffix included), keeping the raw
    /// string if that fails.
    #[must_use]
    pub fn parse(raw: &str) -> Self {
        match DateTime::parse_from_rfc3339(raw.trim()) {
            Ok(t) => PublishedAt::Parsed(t.with_timezone(&Utc)),
            Err(_) => PublishedAt::Unparsed(raw.to_string()),
        }
    }

    /// Age in fractional days relative to `now`, never negative.
    /// Unparseable timestamps count as brand new.
    #[must_use]
    pub fn age_days(&self, now: DateTime<Utc>) -> f64 {
        match self {
            PublishedAt::Parsed(t) => {
                let secs = (now - *t).num_milliseconds() as f64 / 1000.0;
                (secs / SECONDS_PER_DAY).max(0.0)
            }
            PublishedAt::Unparsed(_) => 0.0,
        }
    }
}

impl Serialize for PublishedAt {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            PublishedAt::Parsed(t) => {
                serializer.serialize_str(&t.to_rfc3339_opts(chrono::SecondsFormat::Secs, true))
            }
            PublishedAt::Unparsed(raw) => serializer.serialize_str(raw),
        }
    }
}

/// A scored news article.
#[derive(Debug, Clone, PartialEq)]
pub struct ArticleRecord {
    pub published_at: PublishedAt,
    pub title: String,
    pub text: String,
    sentiment_score: f64,
}

impl ArticleRecord {
    /// Creates a record; the score is clamped to `[-1, 1]` and a non-finite
    /// score becomes `0.0`.
    pub fn new(
        published_at: PublishedAt,
        title: impl Into<String>,
        text: impl Into<String>,
        sentiment_score: f64,
    ) -> Self {
        let sentiment_score = if sentiment_score.is_finite() {
            sentiment_score.clamp(-1.0, 1.0)
        } else {
            0.0
        };
        Self {
            published_at,
            title: title.into(),
            text: text.into(),
            sentiment_score,
        }
    }

    #[must_use]
    pub const fn sentiment_score(&self) -> f64 {
        self.sentiment_score
    }
}

/// One reported headline.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Headline {
    #[serde(rename = "publishedAt")]
    pub published_at: PublishedAt,
    pub title: String,
    /// Article score rounded to four decimals.
    #[serde(rename = "compound")]
    pub score: f64,
}

/// Recency-weighted summary of recent news for one company.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SentimentIndex {
    pub sentiment_7d: f64,
    #[serde(rename = "n_articles_7d")]
    pub article_count: usize,
    pub neg_event_spike: bool,
    pub top_headlines: Vec<Headline>,
}

impl SentimentIndex {
    /// The index reported when there is no usable news.
    #[must_use]
    pub const fn empty() -> Self {
        Self {
            sentiment_7d: 0.0,
            article_count: 0,
            neg_event_spike: false,
            top_headlines: Vec::new(),
        }
    }
}

impl Default for SentimentIndex {
    fn default() -> Self {
        Self::empty()
    }
}

/// Tunables for [`aggregate`].
#[derive(Debug, Clone)]
pub struct AggregatorConfig {
    /// Decay constant in days: an article of age `a` gets weight `exp(-a / decay_days)`.
    pub decay_days: f64,
    pub neg_keywords: Vec<String>,
    pub max_headlines: usize,
}

impl Default for AggregatorConfig {
    fn default() -> Self {
        Self {
            decay_days: 7.0,
            neg_keywords: DEFAULT_NEG_KEYWORDS.iter().map(|k| (*k).to_string()).collect(),
            max_headlines: 10,
        }
    }
}

impl AggregatorConfig {
    /// Checks that `decay_days` is finite and positive.
    ///
    /// # Errors
    ///
    /// Returns [`RiskError::InvalidInput`] otherwise.
    pub fn validate(&self) -> Result<(), RiskError> {
        if !self.decay_days.is_finite() || self.decay_days <= 0.0 {
            return Err(RiskError::InvalidInput(format!(
                "decay_days must be finite and positive, got {}",
                self.decay_days
            )));
        }
        Ok(())
    }

    fn is_negative_event(&self, article: &ArticleRecord) -> bool {
        if article.sentiment_score > 0.0 {
            return false;
        }
        let text = article.text.to_lowercase();
        self.neg_keywords
            .iter()
            .any(|kw| text.contains(&kw.to_lowercase()))
    }
}

/// Reduces scored articles to a [`SentimentIndex`] as of `now`.
///
/// The score is the decay-weighted mean of article scores, clamped to
/// `[-1, 1]`. Headlines keep the input order.
#[must_use]
pub fn aggregate(
    articles: &[ArticleRecord],
    now: DateTime<Utc>,
    cfg: &AggregatorConfig,
) -> SentimentIndex {
    if articles.is_empty() {
        return SentimentIndex::empty();
    }

    let mut weighted = 0.0;
    let mut total_weight = 0.0;
    let mut spike = false;

    for article in articles {
        let w = (-article.published_at.age_days(now) / cfg.decay_days).exp();
        weighted += article.sentiment_score * w;
        total_weight += w;
        spike = spike || cfg.is_negative_event(article);
    }

    let sentiment_7d = if total_weight > 0.0 {
        (weighted / total_weight).clamp(-1.0, 1.0)
    } else {
        0.0
    };

    let top_headlines = articles
        .iter()
        .take(cfg.max_headlines)
        .map(|a| Headline {
            published_at: a.published_at.clone(),
            title: a.title.clone(),
            score: round4(a.sentiment_score),
        })
        .collect();

    SentimentIndex {
        sentiment_7d,
        article_count: articles.len(),
        neg_event_spike: spike,
        top_headlines,
    }
}
