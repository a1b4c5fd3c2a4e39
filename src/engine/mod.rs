//! Request orchestration: base classification and news sentiment run side by
//! side, then the tilt combines them into a [`PredictionReport`].

mod report;

pub use report::{AfterNewsSection, BaseSection, Outcome, PredictionReport};

use chrono::{DateTime, Utc};
use std::sync::Arc;
use std::time::Duration;

use crate::{
    core::{NewsClient, RiskError, Settings},
    model::{Availability, BasePredictor, CompanyInput, LogisticPredictor, heuristic},
    sentiment::{
        AggregatorConfig, ArticleQuery, ArticleSource, NewsArticleSource, NoNews, SentimentIndex,
        aggregate,
    },
    tilt::{TiltConfig, tilt_with_index},
};

const DEFAULT_NEWS_TIMEOUT: Duration = Duration::from_secs(10);

/// Produces risk reports for companies.
///
/// The engine owns its collaborators: a [`BasePredictor`] (mandatory input)
/// and an [`ArticleSource`] (best effort). Build one per process with
/// [`RiskEngine::builder`] or [`RiskEngine::from_settings`] and share it;
/// the heavy state inside the collaborators is loaded once on first use.
///
/// # Example
///
/// ```no_run
/// # use riskpulse::{CompanyInput, RiskEngine, Settings};
/// # #[tokio::main]
/// # async fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let engine = RiskEngine::from_settings(&Settings::from_env())?;
/// let input = CompanyInput::from_path(std::path::Path::new("company.json"))?;
/// let outcome = engine.run(&input).await?;
/// println!("{}", outcome.report().after_news.predicted_rating);
/// # Ok(())
/// # }
/// ```
pub struct RiskEngine {
    predictor: Arc<dyn BasePredictor>,
    source: Arc<dyn ArticleSource>,
    tilt: TiltConfig,
    aggregator: AggregatorConfig,
    include_attribution: bool,
    news_timeout: Duration,
    as_of: Option<DateTime<Utc>>,
}

impl std::fmt::Debug for RiskEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RiskEngine")
            .field("tilt", &self.tilt)
            .field("aggregator", &self.aggregator)
            .field("include_attribution", &self.include_attribution)
            .field("news_timeout", &self.news_timeout)
            .finish_non_exhaustive()
    }
}

impl RiskEngine {
    /// Create a new builder.
    pub fn builder() -> RiskEngineBuilder {
        RiskEngineBuilder::default()
    }

    /// Wires the production collaborators from environment settings: the
    /// logistic predictor reading `settings.model_path`, and the news source
    /// when a usable API key is configured (otherwise no news).
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be constructed.
    pub fn from_settings(settings: &Settings) -> Result<Self, RiskError> {
        let source: Arc<dyn ArticleSource> = match &settings.news_api_key {
            Some(key) => {
                let mut cb = NewsClient::builder()
                    .api_key(key.clone())
                    .timeout(settings.news_timeout);
                if let Some(base) = &settings.news_api_base {
                    cb = cb.base_news(base.clone());
                }
                Arc::new(NewsArticleSource::new(cb.build()?))
            }
            None => Arc::new(NoNews),
        };

        Self::builder()
            .predictor(Arc::new(LogisticPredictor::from_path(settings.model_path.clone())))
            .article_source(source)
            .include_attribution(settings.include_attribution)
            .news_timeout(settings.news_timeout)
            .build()
    }

    /// Chooses the pipeline up front: when the predictor reports it is ready
    /// the full pipeline runs ([`Outcome::Primary`]); otherwise the
    /// heuristic produces an [`Outcome::Degraded`] report.
    ///
    /// # Errors
    ///
    /// Propagates a failure of the primary pipeline (see [`predict`](Self::predict)).
    pub async fn run(&self, input: &CompanyInput) -> Result<Outcome, RiskError> {
        let predictor = self.predictor.clone();
        let availability = tokio::task::spawn_blocking(move || predictor.availability())
            .await
            .unwrap_or_else(|e| Availability::Unavailable(format!("availability check panicked: {e}")));

        match availability {
            Availability::Ready => self.predict(input).await.map(Outcome::Primary),
            Availability::Unavailable(reason) => {
                tracing::warn!(symbol = %input.symbol, %reason, "classifier unavailable; using heuristic rating");
                self.degraded(input).map(Outcome::Degraded)
            }
        }
    }

    /// Runs the full pipeline for one request.
    ///
    /// The classifier (on the blocking pool) and the news branch run
    /// concurrently and are both awaited. A classifier failure fails the
    /// request; any news failure or timeout yields an empty sentiment index,
    /// which leaves the rating untouched.
    ///
    /// # Errors
    ///
    /// Returns the classifier's error, or [`RiskError::Model`] if its task
    /// panicked.
    #[tracing::instrument(skip(self, input), err, fields(symbol = %input.symbol))]
    pub async fn predict(&self, input: &CompanyInput) -> Result<PredictionReport, RiskError> {
        let predictor = self.predictor.clone();
        let owned = input.clone();
        let explain = self.include_attribution;
        let base_branch = tokio::task::spawn_blocking(move || predictor.predict(&owned, explain));

        let query = ArticleQuery {
            symbol: input.symbol.clone(),
            company_name: input.search_name().to_string(),
        };

        let (base_res, index) = tokio::join!(base_branch, self.gather_sentiment(&query));

        let base = base_res
            .map_err(|e| RiskError::Model(format!("classifier task failed: {e}")))??;
        tracing::debug!(rating = %base.label(), "base prediction ready");

        let after = tilt_with_index(&base.distribution, &index, &self.tilt)?;
        tracing::info!(
            base = %base.label(),
            after_news = %after.label(),
            sentiment = index.sentiment_7d,
            articles = index.article_count,
            "prediction complete"
        );
        Ok(PredictionReport::assemble(input, base, index, after))
    }

    /// The heuristic report used when the classifier is unavailable.
    fn degraded(&self, input: &CompanyInput) -> Result<PredictionReport, RiskError> {
        let base = heuristic::rate(input, self.include_attribution);
        let index = SentimentIndex::empty();
        let after = tilt_with_index(&base.distribution, &index, &self.tilt)?;
        Ok(PredictionReport::assemble(input, base, index, after))
    }

    /// News branch: fetch, then aggregate. Never fails.
    async fn gather_sentiment(&self, query: &ArticleQuery) -> SentimentIndex {
        let fetched = tokio::time::timeout(self.news_timeout, self.source.fetch_articles(query))
            .await
            .map_err(RiskError::from)
            .and_then(|res| res);

        let articles = match fetched {
            Ok(articles) => articles,
            Err(e) => {
                tracing::warn!(symbol = %query.symbol, error = %e, "news unavailable; continuing without sentiment");
                return SentimentIndex::empty();
            }
        };

        let now = self.as_of.unwrap_or_else(Utc::now);
        let index = aggregate(&articles, now, &self.aggregator);
        if index.neg_event_spike {
            tracing::warn!(symbol = %query.symbol, "negative event detected in recent news");
        }
        index
    }
}

/* ----------------------- Builder ----------------------- */

#[derive(Default)]
pub struct RiskEngineBuilder {
    predictor: Option<Arc<dyn BasePredictor>>,
    source: Option<Arc<dyn ArticleSource>>,
    tilt: Option<TiltConfig>,
    aggregator: Option<AggregatorConfig>,
    include_attribution: Option<bool>,
    news_timeout: Option<Duration>,
    as_of: Option<DateTime<Utc>>,
}

impl RiskEngineBuilder {
    /// Set the base classifier. Required.
    pub fn predictor(mut self, predictor: Arc<dyn BasePredictor>) -> Self {
        self.predictor = Some(predictor);
        self
    }

    /// Set the news source. Default: no news.
    pub fn article_source(mut self, source: Arc<dyn ArticleSource>) -> Self {
        self.source = Some(source);
        self
    }

    /// Override the tilt tunables.
    pub fn tilt(mut self, cfg: TiltConfig) -> Self {
        self.tilt = Some(cfg);
        self
    }

    /// Override the aggregation tunables.
    pub fn aggregator(mut self, cfg: AggregatorConfig) -> Self {
        self.aggregator = Some(cfg);
        self
    }

    /// Compute feature attributions. Default: on.
    pub fn include_attribution(mut self, on: bool) -> Self {
        self.include_attribution = Some(on);
        self
    }

    /// Overall deadline of the news branch. Default: 10 seconds.
    pub fn news_timeout(mut self, dur: Duration) -> Self {
        self.news_timeout = Some(dur);
        self
    }

    /// Pin the reference time used for article ages.
    pub fn as_of(mut self, now: DateTime<Utc>) -> Self {
        self.as_of = Some(now);
        self
    }

    /// Builds the engine.
    ///
    /// # Errors
    ///
    /// Returns [`RiskError::InvalidInput`] if no predictor was set or a
    /// tilt or aggregation tunable is out of range.
    pub fn build(self) -> Result<RiskEngine, RiskError> {
        let predictor = self
            .predictor
            .ok_or_else(|| RiskError::InvalidInput("a base predictor is required".into()))?;
        let tilt = self.tilt.unwrap_or_default();
        tilt.validate()?;
        let aggregator = self.aggregator.unwrap_or_default();
        aggregator.validate()?;
        Ok(RiskEngine {
            predictor,
            source: self.source.unwrap_or_else(|| Arc::new(NoNews) as Arc<dyn ArticleSource>),
            tilt,
            aggregator,
            include_attribution: self.include_attribution.unwrap_or(true),
            news_timeout: self.news_timeout.unwrap_or(DEFAULT_NEWS_TIMEOUT),
            as_of: self.as_of,
        })
    }
}
