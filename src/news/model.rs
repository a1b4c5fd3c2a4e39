use serde::Serialize;

/// A news article that passed the relevance filter, not yet scored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NewsItem {
    /// The headline of the article.
    pub title: String,
    /// Headline and description joined as `"<title>. <description>"`.
    pub text: String,
    /// Publication time exactly as the provider sent it (usually RFC 3339).
    pub published_at: String,
}
