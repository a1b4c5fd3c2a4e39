//! Multinomial logistic-regression classifier loaded from a JSON artifact.
//!
//! One artifact file carries the class order, numeric scaler, imputation
//! medians, one-hot vocabularies and weights. It may also carry the
//! training-set feature means used as the attribution baseline.

use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::core::models::round4;
use crate::core::{FeatureContribution, ProbabilityDistribution, RatingLabel, RiskError, SharedResource};
use crate::model::input::NUMERIC_COLUMNS;
use crate::model::{Availability, BasePrediction, BasePredictor, CompanyInput};

/// Number of attributions reported per prediction.
pub const TOP_FEATURES: usize = 3;

#[derive(Debug, Deserialize)]
struct Scaler {
    mean: Vec<f64>,
    scale: Vec<f64>,
}

#[derive(Debug, Deserialize)]
struct Categorical {
    name: String,
    categories: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct Artifact {
    classes: Vec<String>,
    numeric_features: Vec<String>,
    scaler: Scaler,
    medians: Vec<f64>,
    #[serde(default)]
    categorical: Vec<Categorical>,
    coefficients: Vec<Vec<f64>>,
    intercepts: Vec<f64>,
    #[serde(default)]
    background_mean: Option<Vec<f64>>,
}

/// A validated, ready-to-use classifier.
#[derive(Debug)]
pub struct LogisticModel {
    /// Row `i` of `coefficients` belongs to `labels[i]`.
    labels: [RatingLabel; 4],
    numeric: Vec<String>,
    mean: Vec<f64>,
    scale: Vec<f64>,
    medians: Vec<f64>,
    categorical: Vec<Categorical>,
    coefficients: Vec<Vec<f64>>,
    intercepts: Vec<f64>,
    background_mean: Vec<f64>,
}

fn data_err(msg: impl Into<String>) -> RiskError {
    RiskError::Data(msg.into())
}

impl LogisticModel {
    /// Loads an artifact file.
    ///
    /// # Errors
    ///
    /// Returns [`RiskError::ModelUnavailable`] if the file cannot be read or is
    /// not a consistent artifact.
    pub fn from_path(path: &Path) -> Result<Self, RiskError> {
        let raw = std::fs::read_to_string(path)
            .map_err(|e| RiskError::ModelUnavailable(format!("{}: {e}", path.display())))?;
        Self::from_json(&raw)
            .map_err(|e| RiskError::ModelUnavailable(format!("{}: {e}", path.display())))
    }

    /// Parses and validates an artifact.
    ///
    /// # Errors
    ///
    /// Returns [`RiskError::Json`] or [`RiskError::Data`] if the artifact is
    /// malformed or its dimensions disagree.
    pub fn from_json(raw: &str) -> Result<Self, RiskError> {
        let a: Artifact = serde_json::from_str(raw)?;

        if a.classes.len() != 4 {
            return Err(data_err(format!("expected 4 classes, got {}", a.classes.len())));
        }
        let mut labels = [RatingLabel::Low; 4];
        for (slot, class) in labels.iter_mut().zip(&a.classes) {
            *slot = class.parse()?;
        }
        for label in RatingLabel::ALL {
            if !labels.contains(&label) {
                return Err(data_err(format!("artifact has no class for {label}")));
            }
        }

        let n_num = a.numeric_features.len();
        if a.scaler.mean.len() != n_num || a.scaler.scale.len() != n_num || a.medians.len() != n_num
        {
            return Err(data_err("scaler/medians length differs from numeric_features"));
        }
        for name in &a.numeric_features {
            if !NUMERIC_COLUMNS.contains(&name.as_str()) {
                return Err(data_err(format!("unknown numeric feature '{name}'")));
            }
        }

        let n_features = n_num + a.categorical.iter().map(|c| c.categories.len()).sum::<usize>();
        if a.coefficients.len() != 4 || a.intercepts.len() != 4 {
            return Err(data_err("expected one coefficient row and intercept per class"));
        }
        if a.coefficients.iter().any(|row| row.len() != n_features) {
            return Err(data_err(format!(
                "coefficient rows must have {n_features} entries"
            )));
        }
        let background_mean = match a.background_mean {
            Some(bg) if bg.len() != n_features => {
                return Err(data_err("background_mean length differs from feature count"));
            }
            Some(bg) => bg,
            // Scaled numerics are centred; one-hot columns default to zero.
            None => vec![0.0; n_features],
        };

        Ok(Self {
            labels,
            numeric: a.numeric_features,
            mean: a.scaler.mean,
            scale: a.scaler.scale,
            medians: a.medians,
            categorical: a.categorical,
            coefficients: a.coefficients,
            intercepts: a.intercepts,
            background_mean,
        })
    }

    /// Names of the encoded features, e.g. `debtRatio`, `Sector_Technology`.
    #[must_use]
    pub fn feature_names(&self) -> Vec<String> {
        let mut names = self.numeric.clone();
        for col in &self.categorical {
            names.extend(col.categories.iter().map(|c| format!("{}_{c}", col.name)));
        }
        names
    }

    /// Encodes `input`: missing numerics are imputed with the training
    /// median, then standardized; categoricals are one-hot with unknown
    /// values mapping to all zeros.
    #[must_use]
    pub fn encode(&self, input: &CompanyInput) -> Vec<f64> {
        let mut x = Vec::with_capacity(self.background_mean.len());
        for (i, name) in self.numeric.iter().enumerate() {
            let raw = input.numeric(name).unwrap_or(self.medians[i]);
            let scale = if self.scale[i] == 0.0 { 1.0 } else { self.scale[i] };
            x.push((raw - self.mean[i]) / scale);
        }
        for col in &self.categorical {
            let value = input.categorical(&col.name).unwrap_or("Unknown");
            x.extend(col.categories.iter().map(|c| if c == value { 1.0 } else { 0.0 }));
        }
        x
    }

    fn row_index(&self, label: RatingLabel) -> usize {
        self.labels.iter().position(|l| *l == label).unwrap_or(0)
    }

    /// Class probabilities for an encoded feature vector.
    ///
    /// # Errors
    ///
    /// Returns [`RiskError::Model`] if the vector has the wrong length or the
    /// logits are not finite.
    pub fn predict_proba(&self, x: &[f64]) -> Result<ProbabilityDistribution, RiskError> {
        if x.len() != self.background_mean.len() {
            return Err(RiskError::Model(format!(
                "expected {} features, got {}",
                self.background_mean.len(),
                x.len()
            )));
        }
        let logits: Vec<f64> = self
            .coefficients
            .iter()
            .zip(&self.intercepts)
            .map(|(w, b)| w.iter().zip(x).map(|(w, x)| w * x).sum::<f64>() + b)
            .collect();
        if logits.iter().any(|z| !z.is_finite()) {
            return Err(RiskError::Model("non-finite logits".into()));
        }

        let max = logits.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        let exp: Vec<f64> = logits.iter().map(|z| (z - max).exp()).collect();
        let by_label = RatingLabel::ALL.map(|l| exp[self.row_index(l)]);
        ProbabilityDistribution::normalized(by_label).map_err(|e| RiskError::Model(e.to_string()))
    }
}

/// Exact additive attributions for a linear model: `w_c,k · (x_k − baseline_k)`.
#[derive(Debug)]
pub struct LinearAttributor {
    model: Arc<LogisticModel>,
    names: Vec<String>,
}

impl LinearAttributor {
    #[must_use]
    pub fn new(model: Arc<LogisticModel>) -> Self {
        let names = model.feature_names();
        Self { model, names }
    }

    /// The `top` largest contributions toward `label`, by absolute value.
    #[must_use]
    pub fn explain(&self, x: &[f64], label: RatingLabel, top: usize) -> Vec<FeatureContribution> {
        let row = &self.model.coefficients[self.model.row_index(label)];
        let mut contribs: Vec<(usize, f64)> = row
            .iter()
            .zip(x.iter().zip(&self.model.background_mean))
            .map(|(w, (x, bg))| w * (x - bg))
            .enumerate()
            .collect();
        contribs.sort_by(|a, b| b.1.abs().total_cmp(&a.1.abs()).then(a.0.cmp(&b.0)));
        contribs
            .into_iter()
            .take(top)
            .map(|(i, c)| FeatureContribution {
                feature: self.names[i].clone(),
                contribution: round4(c),
            })
            .collect()
    }
}

/// [`BasePredictor`] backed by a lazily loaded [`LogisticModel`].
///
/// The model is read on first use; the attribution engine is only built the
/// first time an explanation is requested.
pub struct LogisticPredictor {
    model: Arc<SharedResource<LogisticModel>>,
    attributor: SharedResource<LinearAttributor>,
}

impl std::fmt::Debug for LogisticPredictor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LogisticPredictor")
            .field("model", &self.model)
            .field("attributor", &self.attributor)
            .finish()
    }
}

impl LogisticPredictor {
    /// Predictor reading its artifact from `path` on first use.
    #[must_use]
    pub fn from_path(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        Self::with_loader(move || LogisticModel::from_path(&path))
    }

    /// Predictor built from an already-parsed model.
    #[must_use]
    pub fn from_model(model: LogisticModel) -> Self {
        let slot = std::sync::Mutex::new(Some(model));
        Self::with_loader(move || {
            slot.lock()
                .unwrap_or_else(std::sync::PoisonError::into_inner)
                .take()
                .ok_or_else(|| RiskError::ModelUnavailable("model already consumed".into()))
        })
    }

    fn with_loader<F>(load: F) -> Self
    where
        F: Fn() -> Result<LogisticModel, RiskError> + Send + Sync + 'static,
    {
        let model = Arc::new(SharedResource::new("classifier", load));
        let for_attr = model.clone();
        let attributor = SharedResource::new("attribution", move || {
            Ok(LinearAttributor::new(for_attr.get()?))
        });
        Self { model, attributor }
    }

    /// Whether the attribution engine has been built.
    #[must_use]
    pub fn attribution_loaded(&self) -> bool {
        self.attributor.is_loaded()
    }
}

impl BasePredictor for LogisticPredictor {
    fn availability(&self) -> Availability {
        match self.model.get() {
            Ok(_) => Availability::Ready,
            Err(e) => Availability::Unavailable(e.to_string()),
        }
    }

    fn predict(&self, input: &CompanyInput, explain: bool) -> Result<BasePrediction, RiskError> {
        let model = self.model.get()?;
        let x = model.encode(input);
        let distribution = model.predict_proba(&x)?;

        let top_features = if explain {
            self.attributor
                .get()?
                .explain(&x, distribution.argmax(), TOP_FEATURES)
        } else {
            Vec::new()
        };

        Ok(BasePrediction {
            distribution,
            top_features,
        })
    }
}
