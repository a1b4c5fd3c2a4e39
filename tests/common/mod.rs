#![allow(dead_code)]

use chrono::{DateTime, TimeZone, Utc};
use futures::future::BoxFuture;
use httpmock::{Method::GET, Mock, MockServer};
use riskpulse::{
    ArticleQuery, ArticleRecord, ArticleSource, Availability, BasePrediction, BasePredictor,
    CompanyInput, FeatureContribution, NewsClient, ProbabilityDistribution, PublishedAt,
    RiskError,
};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::time::Duration;

pub const TEST_KEY: &str = "0123456789abcdef0123456789abcdef";

pub fn fixtures_dir() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures")
}

pub fn fixture(name: &str) -> String {
    let path = fixtures_dir().join(name);
    std::fs::read_to_string(&path)
        .unwrap_or_else(|e| panic!("failed to read fixture {}: {}", path.display(), e))
}

pub fn mock_everything<'a>(server: &'a MockServer, status: u16, body: String) -> Mock<'a> {
    server.mock(|when, then| {
        when.method(GET)
            .path("/everything")
            .header("X-Api-Key", TEST_KEY)
            .query_param("sortBy", "publishedAt")
            .query_param("language", "en");
        then.status(status)
            .header("content-type", "application/json")
            .body(body);
    })
}

pub fn news_client(server: &MockServer) -> NewsClient {
    NewsClient::builder()
        .api_key(TEST_KEY)
        .base_news(url::Url::parse(&server.base_url()).unwrap())
        .build()
        .unwrap()
}

/// Reference instant used by tests that pin "now".
pub fn now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 3, 10, 12, 0, 0).unwrap()
}

pub fn acme_input() -> CompanyInput {
    CompanyInput::from_json(&fixture("input_acme.json")).unwrap()
}

pub fn dist(p: [f64; 4]) -> ProbabilityDistribution {
    ProbabilityDistribution::new(p).unwrap()
}

pub fn assert_valid(d: &ProbabilityDistribution) {
    let sum: f64 = d.as_array().iter().sum();
    assert!((sum - 1.0).abs() < 1e-6, "sum = {sum}");
    assert!(d.as_array().iter().all(|p| *p >= 0.0), "negative entry in {d:?}");
}

pub fn article(age_days: f64, score: f64, text: &str) -> ArticleRecord {
    let secs = (age_days * 86_400.0) as i64;
    ArticleRecord::new(
        PublishedAt::Parsed(now() - chrono::Duration::seconds(secs)),
        format!("Acme headline ({score})"),
        text,
        score,
    )
}

/* ---------------- predictor doubles ---------------- */

/// Returns a fixed distribution after an optional blocking delay.
pub struct FixedPredictor {
    pub probs: [f64; 4],
    pub delay: Duration,
    pub calls: AtomicUsize,
    pub explained: AtomicBool,
}

impl FixedPredictor {
    pub fn new(probs: [f64; 4]) -> Self {
        Self {
            probs,
            delay: Duration::ZERO,
            calls: AtomicUsize::new(0),
            explained: AtomicBool::new(false),
        }
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }
}

impl BasePredictor for FixedPredictor {
    fn availability(&self) -> Availability {
        Availability::Ready
    }

    fn predict(&self, _input: &CompanyInput, explain: bool) -> Result<BasePrediction, RiskError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.explained.store(explain, Ordering::SeqCst);
        if !self.delay.is_zero() {
            std::thread::sleep(self.delay);
        }
        let top_features = if explain {
            vec![FeatureContribution {
                feature: "debtRatio".into(),
                contribution: -1.25,
            }]
        } else {
            Vec::new()
        };
        Ok(BasePrediction {
            distribution: ProbabilityDistribution::new(self.probs)?,
            top_features,
        })
    }
}

pub struct FailingPredictor;

impl BasePredictor for FailingPredictor {
    fn availability(&self) -> Availability {
        Availability::Ready
    }

    fn predict(&self, _input: &CompanyInput, _explain: bool) -> Result<BasePrediction, RiskError> {
        Err(RiskError::Model("feature matrix rejected".into()))
    }
}

pub struct UnavailablePredictor;

impl BasePredictor for UnavailablePredictor {
    fn availability(&self) -> Availability {
        Availability::Unavailable("artifact missing".into())
    }

    fn predict(&self, _input: &CompanyInput, _explain: bool) -> Result<BasePrediction, RiskError> {
        panic!("predict must not be called on an unavailable predictor");
    }
}

/* ---------------- article source doubles ---------------- */

/// Serves a fixed list of articles after an optional async delay.
pub struct StaticSource {
    pub articles: Vec<ArticleRecord>,
    pub delay: Duration,
    pub calls: AtomicUsize,
}

impl StaticSource {
    pub fn new(articles: Vec<ArticleRecord>) -> Self {
        Self {
            articles,
            delay: Duration::ZERO,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }
}

impl ArticleSource for StaticSource {
    fn fetch_articles<'a>(
        &'a self,
        _query: &'a ArticleQuery,
    ) -> BoxFuture<'a, Result<Vec<ArticleRecord>, RiskError>> {
        Box::pin(async move {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if !self.delay.is_zero() {
                tokio::time::sleep(self.delay).await;
            }
            Ok(self.articles.clone())
        })
    }
}

/// Always fails with the error built by the wrapped constructor.
pub struct FailingSource(pub fn() -> RiskError);

impl ArticleSource for FailingSource {
    fn fetch_articles<'a>(
        &'a self,
        _query: &'a ArticleQuery,
    ) -> BoxFuture<'a, Result<Vec<ArticleRecord>, RiskError>> {
        let err = (self.0)();
        Box::pin(async move { Err(err) })
    }
}
