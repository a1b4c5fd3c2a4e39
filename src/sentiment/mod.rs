//! News sentiment: scoring, sources and the recency-weighted index.

mod aggregate;
mod scorer;
mod source;

pub use aggregate::{
    AggregatorConfig, ArticleRecord, DEFAULT_NEG_KEYWORDS, Headline, PublishedAt, SentimentIndex,
    aggregate,
};
pub use scorer::{LexiconScorer, SentimentScorer};
pub use source::{ArticleQuery, ArticleSource, NewsArticleSource, NoNews};
