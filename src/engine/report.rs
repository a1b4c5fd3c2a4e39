use serde::Serialize;

use crate::core::{FeatureContribution, ProbabilityDistribution, RatingLabel};
use crate::model::{BasePrediction, CompanyInput};
use crate::sentiment::SentimentIndex;
use crate::tilt::{SkipReason, TiltDebug, Tilted};

/// The classifier's view, before news.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BaseSection {
    pub predicted_rating: RatingLabel,
    pub probabilities: ProbabilityDistribution,
    pub top_features: Vec<FeatureContribution>,
}

/// The rating after the news tilt.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AfterNewsSection {
    pub predicted_rating: RatingLabel,
    pub probabilities: ProbabilityDistribution,
    pub debug: TiltDebug,
}

/// Everything produced for one request. Both distributions are kept so the
/// effect of the news can be compared.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PredictionReport {
    pub symbol: String,
    pub sector: String,
    pub base: BaseSection,
    pub news: SentimentIndex,
    pub after_news: AfterNewsSection,
}

impl PredictionReport {
    pub(crate) fn assemble(
        input: &CompanyInput,
        base: BasePrediction,
        news: SentimentIndex,
        after: Tilted,
    ) -> Self {
        Self {
            symbol: input.symbol.clone(),
            sector: input.sector.clone(),
            base: BaseSection {
                predicted_rating: base.label(),
                probabilities: base.distribution,
                top_features: base.top_features,
            },
            news,
            after_news: AfterNewsSection {
                predicted_rating: after.label(),
                probabilities: after.distribution,
                debug: after.debug,
            },
        }
    }

    /// Neutral `Medium` record emitted when no real prediction could be made,
    /// so downstream parsers always find a well-formed payload.
    #[must_use]
    pub fn neutral(symbol: impl Into<String>, sector: impl Into<String>) -> Self {
        let dist = ProbabilityDistribution::neutral();
        Self {
            symbol: symbol.into(),
            sector: sector.into(),
            base: BaseSection {
                predicted_rating: dist.argmax(),
                probabilities: dist,
                top_features: Vec::new(),
            },
            news: SentimentIndex::empty(),
            after_news: AfterNewsSection {
                predicted_rating: dist.argmax(),
                probabilities: dist,
                debug: TiltDebug::Skipped {
                    skipped: SkipReason::TooFewArticles,
                },
            },
        }
    }
}

/// Which pipeline produced a report.
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    /// Full pipeline: classifier plus news tilt.
    Primary(PredictionReport),
    /// Rule-based heuristic; the classifier was unavailable.
    Degraded(PredictionReport),
}

impl Outcome {
    #[must_use]
    pub const fn report(&self) -> &PredictionReport {
        match self {
            Outcome::Primary(r) | Outcome::Degraded(r) => r,
        }
    }

    #[must_use]
    pub fn into_report(self) -> PredictionReport {
        match self {
            Outcome::Primary(r) | Outcome::Degraded(r) => r,
        }
    }

    #[must_use]
    pub const fn is_degraded(&self) -> bool {
        matches!(self, Outcome::Degraded(_))
    }
}
