//! riskpulse: company risk ratings adjusted by recent news sentiment.
//!
//! A base classifier rates a company as `Low`, `Medium`, `High` or `Highest`
//! risk from its financial ratios. Recent headlines are scored, reduced to a
//! recency-weighted sentiment index, and used to tilt the classifier's
//! probability distribution. Classification and news gathering run
//! concurrently; news problems never fail a request.
//!
//! The main entry point is [`RiskEngine`].

pub mod core;
pub mod engine;
pub mod model;
pub mod news;
pub mod sentiment;
pub mod tilt;

pub use crate::core::{
    FeatureContribution, NewsClient, NewsClientBuilder, ProbabilityDistribution, RatingLabel,
    RiskError, Settings, SharedResource,
};
pub use engine::{Outcome, PredictionReport, RiskEngine, RiskEngineBuilder};
pub use model::{
    Availability, BasePrediction, BasePredictor, CompanyInput, LogisticModel, LogisticPredictor,
};
pub use news::{NewsBuilder, NewsItem};
pub use sentiment::{
    AggregatorConfig, ArticleQuery, ArticleRecord, ArticleSource, LexiconScorer,
    NewsArticleSource, NoNews, PublishedAt, SentimentIndex, SentimentScorer, aggregate,
};
pub use tilt::{TiltConfig, TiltDebug, Tilted, apply_tilt};
