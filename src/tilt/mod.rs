//! Probability tilt: blends a news sentiment signal into a base rating
//! distribution.
//!
//! Positive sentiment shifts mass toward the low-risk labels and negative
//! sentiment toward the high-risk labels. The result is a convex blend of the
//! base distribution and a multiplicatively reweighted copy of it, so it stays
//! a valid distribution and equals the base when the signal is neutral.

use serde::Serialize;

use crate::core::{ProbabilityDistribution, RatingLabel, RiskError};
use crate::sentiment::SentimentIndex;

/// Tunables of [`apply_tilt`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TiltConfig {
    /// Below this many articles the base distribution is returned unchanged.
    pub min_articles: usize,
    /// Blend weight of the tilted distribution.
    pub alpha: f64,
    /// Sharpness of the per-label multipliers.
    pub gamma: f64,
    /// Amount subtracted from the sentiment when a negative event was seen.
    pub spike_boost: f64,
}

impl Default for TiltConfig {
    fn default() -> Self {
        Self {
            min_articles: 3,
            alpha: 0.2,
            gamma: 1.2,
            spike_boost: 0.25,
        }
    }
}

impl TiltConfig {
    /// Checks that `alpha` lies in `[0, 1]` and that `gamma` and
    /// `spike_boost` are finite and non-negative.
    ///
    /// # Errors
    ///
    /// Returns [`RiskError::InvalidInput`] naming the offending tunable.
    pub fn validate(&self) -> Result<(), RiskError> {
        if !(0.0..=1.0).contains(&self.alpha) {
            return Err(RiskError::InvalidInput(format!(
                "tilt alpha must be in [0, 1], got {}",
                self.alpha
            )));
        }
        if !self.gamma.is_finite() || self.gamma < 0.0 {
            return Err(RiskError::InvalidInput(format!(
                "tilt gamma must be finite and non-negative, got {}",
                self.gamma
            )));
        }
        if !self.spike_boost.is_finite() || self.spike_boost < 0.0 {
            return Err(RiskError::InvalidInput(format!(
                "tilt spike_boost must be finite and non-negative, got {}",
                self.spike_boost
            )));
        }
        Ok(())
    }
}

/// Why the tilt was not applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SkipReason {
    TooFewArticles,
}

/// Audit record of one tilt computation.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum TiltDebug {
    Applied {
        news_adj: f64,
        alpha: f64,
        gamma: f64,
        neg_event_spike: bool,
        n_articles_7d: usize,
    },
    Skipped { skipped: SkipReason },
}

/// Output of [`apply_tilt`].
#[derive(Debug, Clone, PartialEq)]
pub struct Tilted {
    pub distribution: ProbabilityDistribution,
    pub debug: TiltDebug,
}

impl Tilted {
    /// The after-news rating.
    #[must_use]
    pub fn label(&self) -> RatingLabel {
        self.distribution.argmax()
    }
}

fn multipliers(adj: f64, gamma: f64) -> [f64; 4] {
    let up = (-gamma * adj).exp();
    let mut m = [0.0; 4];
    m[RatingLabel::Low.index()] = (gamma * adj).exp();
    m[RatingLabel::Medium.index()] = (0.5 * gamma * adj).exp();
    m[RatingLabel::High.index()] = up;
    m[RatingLabel::Highest.index()] = up;
    m
}

/// Tilts `base` by the news signal.
///
/// With fewer than `cfg.min_articles` articles the base distribution is
/// returned as-is. Otherwise the adjusted sentiment
/// `adj = clamp(sentiment_7d - spike_boost * spike, -1, 1)` drives the
/// per-label multipliers `exp(γ·adj)` (Low), `exp(γ·adj/2)` (Medium) and
/// `exp(-γ·adj)` (High, Highest), and the result is
/// `normalize((1 - α)·base + α·normalize(base ⊙ mult))`.
///
/// # Errors
///
/// Returns [`RiskError::Data`] if the sentiment or a tunable is not finite.
pub fn apply_tilt(
    base: &ProbabilityDistribution,
    sentiment_7d: f64,
    neg_event_spike: bool,
    article_count: usize,
    cfg: &TiltConfig,
) -> Result<Tilted, RiskError> {
    if article_count < cfg.min_articles {
        return Ok(Tilted {
            distribution: *base,
            debug: TiltDebug::Skipped {
                skipped: SkipReason::TooFewArticles,
            },
        });
    }

    let spike = if neg_event_spike { cfg.spike_boost } else { 0.0 };
    let adj = (sentiment_7d - spike).clamp(-1.0, 1.0);
    if !adj.is_finite() || !cfg.gamma.is_finite() || !cfg.alpha.is_finite() {
        return Err(RiskError::Data(format!(
            "non-finite tilt input: adj={adj}, alpha={}, gamma={}",
            cfg.alpha, cfg.gamma
        )));
    }

    let probs = base.as_array();
    let mult = multipliers(adj, cfg.gamma);
    let tilted = ProbabilityDistribution::normalized(std::array::from_fn(|i| probs[i] * mult[i]))?;
    let t = tilted.as_array();
    let blended = std::array::from_fn(|i| (1.0 - cfg.alpha) * probs[i] + cfg.alpha * t[i]);
    let distribution = ProbabilityDistribution::normalized(blended)?;

    Ok(Tilted {
        distribution,
        debug: TiltDebug::Applied {
            news_adj: adj,
            alpha: cfg.alpha,
            gamma: cfg.gamma,
            neg_event_spike,
            n_articles_7d: article_count,
        },
    })
}

/// [`apply_tilt`] driven by a [`SentimentIndex`].
///
/// # Errors
///
/// See [`apply_tilt`].
pub fn tilt_with_index(
    base: &ProbabilityDistribution,
    index: &SentimentIndex,
    cfg: &TiltConfig,
) -> Result<Tilted, RiskError> {
    apply_tilt(
        base,
        index.sentiment_7d,
        index.neg_event_spike,
        index.article_count,
        cfg,
    )
}
