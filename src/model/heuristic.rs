//! Rule-based rating used when the classifier cannot be loaded.
//!
//! This is a coarse, separate algorithm: weighted thresholds on debt ratio,
//! net profit margin and return on assets mapped to four fixed distributions.
//! It never touches the news tilt.

use crate::core::{FeatureContribution, ProbabilityDistribution};
use crate::model::{BasePrediction, CompanyInput};

const DEFAULT_DEBT_RATIO: f64 = 0.5;
const DEFAULT_PROFIT_MARGIN: f64 = 0.1;
const DEFAULT_ROA: f64 = 0.05;

/// Distributions per band, in label order (`Low`, `Medium`, `High`, `Highest`).
const LOW_BAND: [f64; 4] = [0.70, 0.15, 0.10, 0.05];
const MEDIUM_BAND: [f64; 4] = [0.30, 0.40, 0.20, 0.10];
const HIGH_BAND: [f64; 4] = [0.15, 0.15, 0.45, 0.25];
const HIGHEST_BAND: [f64; 4] = [0.10, 0.10, 0.25, 0.55];

const FIXED_ATTRIBUTION: [(&str, f64); 3] = [
    ("debtRatio", 0.35),
    ("netProfitMargin", 0.25),
    ("returnOnAssets", 0.20),
];

/// Additive risk score in `[0, 0.75]`.
#[must_use]
pub fn risk_score(input: &CompanyInput) -> f64 {
    let debt = input.numeric("debtRatio").unwrap_or(DEFAULT_DEBT_RATIO);
    let margin = input
        .numeric("netProfitMargin")
        .unwrap_or(DEFAULT_PROFIT_MARGIN);
    let roa = input.numeric("returnOnAssets").unwrap_or(DEFAULT_ROA);

    let mut score = 0.0;
    score += if debt > 0.7 {
        0.3
    } else if debt > 0.5 {
        0.2
    } else if debt > 0.3 {
        0.1
    } else {
        0.0
    };
    score += if margin < 0.05 {
        0.25
    } else if margin < 0.1 {
        0.15
    } else if margin < 0.2 {
        0.05
    } else {
        0.0
    };
    score += if roa < 0.02 {
        0.2
    } else if roa < 0.05 {
        0.1
    } else {
        0.0
    };
    score
}

fn band(score: f64) -> [f64; 4] {
    if score >= 0.6 {
        HIGHEST_BAND
    } else if score >= 0.4 {
        HIGH_BAND
    } else if score >= 0.2 {
        MEDIUM_BAND
    } else {
        LOW_BAND
    }
}

/// Rates `input` without a classifier.
#[must_use]
pub fn rate(input: &CompanyInput, include_attribution: bool) -> BasePrediction {
    let score = risk_score(input);
    let distribution = ProbabilityDistribution::new(band(score))
        .unwrap_or_else(|_| ProbabilityDistribution::neutral());

    let top_features = if include_attribution {
        FIXED_ATTRIBUTION
            .iter()
            .map(|(f, c)| FeatureContribution {
                feature: (*f).to_string(),
                contribution: *c,
            })
            .collect()
    } else {
        Vec::new()
    };

    tracing::debug!(symbol = %input.symbol, score, "heuristic risk score");
    BasePrediction {
        distribution,
        top_features,
    }
}
