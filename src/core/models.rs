use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

use crate::core::RiskError;

/// Tolerance used when checking that a distribution sums to one.
pub const SUM_TOLERANCE: f64 = 1e-6;

/// The four risk ratings, ordered by severity.
///
/// Declaration order is significant: it is the tie-break order used by
/// [`ProbabilityDistribution::argmax`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum RatingLabel {
    Low,
    Medium,
    High,
    Highest,
}

impl RatingLabel {
    /// All labels in declaration (severity) order.
    pub const ALL: [RatingLabel; 4] = [
        RatingLabel::Low,
        RatingLabel::Medium,
        RatingLabel::High,
        RatingLabel::Highest,
    ];

    pub(crate) const fn index(self) -> usize {
        self as usize
    }

    /// Human readable rating, e.g. `"High Risk"`.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            RatingLabel::Low => "Low Risk",
            RatingLabel::Medium => "Medium Risk",
            RatingLabel::High => "High Risk",
            RatingLabel::Highest => "Highest Risk",
        }
    }

    /// Key used for this label inside a serialized probability map.
    #[must_use]
    pub const fn proba_key(self) -> &'static str {
        match self {
            RatingLabel::Low => "proba_Low_Risk",
            RatingLabel::Medium => "proba_Medium_Risk",
            RatingLabel::High => "proba_High_Risk",
            RatingLabel::Highest => "proba_Highest_Risk",
        }
    }
}

impl fmt::Display for RatingLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RatingLabel {
    type Err = RiskError;

    /// Accepts `"High Risk"`, `"High_Risk"` and `"High"` (case-insensitive).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let norm = s.trim().to_ascii_lowercase().replace('_', " ");
        let stem = norm.strip_suffix(" risk").unwrap_or(&norm);
        match stem {
            "low" => Ok(RatingLabel::Low),
            "medium" => Ok(RatingLabel::Medium),
            "high" => Ok(RatingLabel::High),
            "highest" => Ok(RatingLabel::Highest),
            _ => Err(RiskError::Data(format!("unknown rating label '{s}'"))),
        }
    }
}

impl Serialize for RatingLabel {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

/// A probability for each [`RatingLabel`].
///
/// Every value is non-negative and the values sum to one. The only ways to
/// obtain one are the validating [`ProbabilityDistribution::new`] and the
/// rescaling [`ProbabilityDistribution::normalized`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProbabilityDistribution([f64; 4]);

impl ProbabilityDistribution {
    /// Builds a distribution from probabilities in label order
    /// (`Low`, `Medium`, `High`, `Highest`).
    ///
    /// # Errors
    ///
    /// Returns [`RiskError::Data`] if any value is negative or non-finite, or if the
    /// values do not sum to one within [`SUM_TOLERANCE`].
    pub fn new(probs: [f64; 4]) -> Result<Self, RiskError> {
        if probs.iter().any(|p| !p.is_finite() || *p < 0.0) {
            return Err(RiskError::Data(format!(
                "probabilities must be finite and non-negative: {probs:?}"
            )));
        }
        let sum: f64 = probs.iter().sum();
        if (sum - 1.0).abs() > SUM_TOLERANCE {
            return Err(RiskError::Data(format!(
                "probabilities must sum to 1, got {sum}"
            )));
        }
        Ok(Self(probs))
    }

    /// Rescales non-negative weights so they sum to one.
    ///
    /// # Errors
    ///
    /// Returns [`RiskError::Data`] if a weight is negative or non-finite, or if all
    /// weights are zero.
    pub fn normalized(weights: [f64; 4]) -> Result<Self, RiskError> {
        if weights.iter().any(|w| !w.is_finite() || *w < 0.0) {
            return Err(RiskError::Data(format!(
                "weights must be finite and non-negative: {weights:?}"
            )));
        }
        let sum: f64 = weights.iter().sum();
        if sum <= 0.0 || !sum.is_finite() {
            return Err(RiskError::Data("weights sum to zero".into()));
        }
        Ok(Self(weights.map(|w| w / sum)))
    }

    /// Mostly-uniform distribution whose top label is `Medium`.
    #[must_use]
    pub const fn neutral() -> Self {
        Self([0.24, 0.28, 0.24, 0.24])
    }

    /// Probability assigned to `label`.
    #[must_use]
    pub const fn get(&self, label: RatingLabel) -> f64 {
        self.0[label.index()]
    }

    /// Probabilities in label order.
    #[must_use]
    pub const fn as_array(&self) -> [f64; 4] {
        self.0
    }

    /// The most probable label; ties go to the label declared first.
    #[must_use]
    pub fn argmax(&self) -> RatingLabel {
        let mut best = RatingLabel::Low;
        for label in RatingLabel::ALL {
            if self.get(label) > self.get(best) {
                best = label;
            }
        }
        best
    }

    /// Iterates `(label, probability)` pairs in label order.
    pub fn iter(&self) -> impl Iterator<Item = (RatingLabel, f64)> + '_ {
        RatingLabel::ALL.into_iter().map(|l| (l, self.get(l)))
    }
}

impl Serialize for ProbabilityDistribution {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(4))?;
        for (label, p) in self.iter() {
            map.serialize_entry(label.proba_key(), &p)?;
        }
        map.end()
    }
}

/// One entry of a ranked feature-attribution list.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FeatureContribution {
    #[serde(rename = "Feature")]
    pub feature: String,
    #[serde(rename = "Contribution")]
    pub contribution: f64,
}

/// Rounds to four decimal places, the precision used for reported scores.
#[must_use]
pub fn round4(x: f64) -> f64 {
    (x * 10_000.0).round() / 10_000.0
}
