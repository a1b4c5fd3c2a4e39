use futures::future::BoxFuture;
use std::sync::Arc;

use crate::{
    core::{NewsClient, RiskError, SharedResource},
    news::NewsBuilder,
    sentiment::{
        aggregate::{ArticleRecord, PublishedAt},
        scorer::{LexiconScorer, SentimentScorer},
    },
};

/// Identifies the company whose news is wanted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArticleQuery {
    pub symbol: String,
    /// Name searched for in headlines.
    pub company_name: String,
}

/// A supplier of scored articles.
///
/// This is the seam between the orchestrator and whatever actually fetches
/// and scores news, making it easy to substitute in tests.
pub trait ArticleSource: Send + Sync {
    /// Fetches scored articles for `query`. An empty vector means "no news".
    fn fetch_articles<'a>(
        &'a self,
        query: &'a ArticleQuery,
    ) -> BoxFuture<'a, Result<Vec<ArticleRecord>, RiskError>>;
}

/// Source that returns no articles. Used when news is disabled.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoNews;

impl ArticleSource for NoNews {
    fn fetch_articles<'a>(
        &'a self,
        _query: &'a ArticleQuery,
    ) -> BoxFuture<'a, Result<Vec<ArticleRecord>, RiskError>> {
        Box::pin(async { Ok(Vec::new()) })
    }
}

/// Fetches headlines from the news provider and scores them with a lazily
/// built scorer.
pub struct NewsArticleSource {
    client: NewsClient,
    scorer: Arc<SharedResource<Box<dyn SentimentScorer>>>,
    days: u32,
    language: String,
    page_size: u32,
}

impl std::fmt::Debug for NewsArticleSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NewsArticleSource")
            .field("client", &self.client)
            .field("scorer", &self.scorer)
            .field("days", &self.days)
            .finish_non_exhaustive()
    }
}

impl NewsArticleSource {
    /// Uses the built-in [`LexiconScorer`].
    #[must_use]
    pub fn new(client: NewsClient) -> Self {
        Self::with_scorer(client, || {
            Ok(Box::new(LexiconScorer::new()) as Box<dyn SentimentScorer>)
        })
    }

    /// Uses a custom scorer, built on first use by `load`.
    pub fn with_scorer<F>(client: NewsClient, load: F) -> Self
    where
        F: Fn() -> Result<Box<dyn SentimentScorer>, RiskError> + Send + Sync + 'static,
    {
        Self {
            client,
            scorer: Arc::new(SharedResource::new("sentiment-scorer", load)),
            days: 7,
            language: "en".to_string(),
            page_size: 20,
        }
    }

    /// Sets the search window in days. Default: 7.
    #[must_use]
    pub const fn days(mut self, days: u32) -> Self {
        self.days = days;
        self
    }

    /// Sets the article language. Default: `en`.
    #[must_use]
    pub fn language(mut self, language: impl Into<String>) -> Self {
        self.language = language.into();
        self
    }

    /// Sets the requested page size. Default: 20.
    #[must_use]
    pub const fn page_size(mut self, page_size: u32) -> Self {
        self.page_size = page_size;
        self
    }

    async fn fetch(&self, query: &ArticleQuery) -> Result<Vec<ArticleRecord>, RiskError> {
        let items = NewsBuilder::new(&self.client, query.company_name.clone())
            .days(self.days)
            .language(self.language.clone())
            .page_size(self.page_size)
            .fetch()
            .await?;

        if items.is_empty() {
            tracing::warn!(symbol = %query.symbol, "no relevant articles (company name not in headlines)");
            return Ok(Vec::new());
        }

        // Loading and scoring block; they run on the blocking pool.
        let scorer = self.scorer.clone();
        let texts: Vec<String> = items.iter().map(|i| i.text.clone()).collect();
        let scores = tokio::task::spawn_blocking(move || {
            scorer.get().map(|s| s.score_batch(&texts))
        })
        .await
        .map_err(|e| RiskError::Data(format!("scoring task failed: {e}")))??;
        tracing::info!(symbol = %query.symbol, articles = items.len(), "scored news articles");

        Ok(items
            .into_iter()
            .zip(scores)
            .map(|(item, score)| {
                ArticleRecord::new(
                    PublishedAt::parse(&item.published_at),
                    item.title,
                    item.text,
                    score,
                )
            })
            .collect())
    }
}

impl ArticleSource for NewsArticleSource {
    fn fetch_articles<'a>(
        &'a self,
        query: &'a ArticleQuery,
    ) -> BoxFuture<'a, Result<Vec<ArticleRecord>, RiskError>> {
        Box::pin(self.fetch(query))
    }
}
