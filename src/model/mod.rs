//! Base rating: the classifier seam, its logistic implementation and the
//! rule-based fallback.

pub mod heuristic;
mod input;
mod logistic;

pub use input::{CompanyInput, NUMERIC_COLUMNS};
pub use logistic::{LinearAttributor, LogisticModel, LogisticPredictor, TOP_FEATURES};

use crate::core::{FeatureContribution, ProbabilityDistribution, RatingLabel, RiskError};

/// Result of a base classifier call.
#[derive(Debug, Clone, PartialEq)]
pub struct BasePrediction {
    pub distribution: ProbabilityDistribution,
    /// Ranked attributions; empty when attribution was not requested.
    pub top_features: Vec<FeatureContribution>,
}

impl BasePrediction {
    /// The base rating.
    #[must_use]
    pub fn label(&self) -> RatingLabel {
        self.distribution.argmax()
    }
}

/// Whether a predictor can serve requests.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Availability {
    Ready,
    Unavailable(String),
}

/// A classifier producing a rating distribution from company ratios.
///
/// Implementations are synchronous and may be CPU-heavy; the engine runs them
/// on the blocking thread pool.
pub trait BasePredictor: Send + Sync {
    /// Checks (loading if necessary) that the predictor can run.
    fn availability(&self) -> Availability;

    /// Predicts the rating distribution for `input`; when `explain` is set,
    /// also returns the top feature attributions.
    ///
    /// # Errors
    ///
    /// Any error is fatal to the request.
    fn predict(&self, input: &CompanyInput, explain: bool) -> Result<BasePrediction, RiskError>;
}
