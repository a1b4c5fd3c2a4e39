mod api;
mod model;
mod wire;

pub use model::NewsItem;

use chrono::{DateTime, Utc};

use crate::core::{NewsClient, RiskError};

/// A builder for fetching recent articles that mention a company.
pub struct NewsBuilder {
    client: NewsClient,
    company: String,
    days: u32,
    language: String,
    page_size: u32,
    now: Option<DateTime<Utc>>,
}

impl NewsBuilder {
    /// Creates a new `NewsBuilder` for the given company name.
    pub fn new(client: &NewsClient, company: impl Into<String>) -> Self {
        Self {
            client: client.clone(),
            company: company.into(),
            days: 7,
            language: "en".to_string(),
            page_size: 20,
            now: None,
        }
    }

    /// Sets how many days back to search. Default: 7.
    #[must_use]
    pub const fn days(mut self, days: u32) -> Self {
        self.days = days;
        self
    }

    /// Sets the article language filter. Default: `en`.
    #[must_use]
    pub fn language(mut self, language: impl Into<String>) -> Self {
        self.language = language.into();
        self
    }

    /// Sets the maximum number of articles requested. Default: 20.
    #[must_use]
    pub const fn page_size(mut self, page_size: u32) -> Self {
        self.page_size = page_size;
        self
    }

    /// Pins the end of the search window instead of using the current time.
    #[must_use]
    pub const fn as_of(mut self, now: DateTime<Utc>) -> Self {
        self.now = Some(now);
        self
    }

    /// Executes the request and returns the relevant articles.
    ///
    /// Articles whose headline does not contain the company name
    /// (case-insensitive) are dropped.
    ///
    /// # Errors
    ///
    /// Returns [`RiskError::Unauthorized`] or [`RiskError::RateLimited`] for
    /// HTTP 401/429, [`RiskError::Status`] for other non-success statuses, and
    /// HTTP/JSON errors for transport or decoding failures.
    #[tracing::instrument(skip(self), err, fields(company = %self.company))]
    pub async fn fetch(self) -> Result<Vec<NewsItem>, RiskError> {
        let query = api::NewsQuery {
            company: &self.company,
            days: self.days,
            language: &self.language,
            page_size: self.page_size,
            now: self.now.unwrap_or_else(Utc::now),
        };
        api::fetch_everything(&self.client, &query).await
    }
}

/// The full-text query sent for `company`.
#[must_use]
pub fn search_query(company: &str) -> String {
    api::build_query(company)
}
