use chrono::{DateTime, Duration, Utc};

use crate::{
    core::{NewsClient, RiskError},
    news::{model::NewsItem, wire},
};

pub(super) struct NewsQuery<'a> {
    pub(super) company: &'a str,
    pub(super) days: u32,
    pub(super) language: &'a str,
    pub(super) page_size: u32,
    pub(super) now: DateTime<Utc>,
}

pub(super) fn build_query(company: &str) -> String {
    format!("\"{company}\" AND (stock OR finance OR trading OR market OR investment)")
}

pub(super) async fn fetch_everything(
    client: &NewsClient,
    q: &NewsQuery<'_>,
) -> Result<Vec<NewsItem>, RiskError> {
    let from = q.now - Duration::days(i64::from(q.days));

    let mut url = client.base_news().join("everything")?;
    url.query_pairs_mut()
        .append_pair("q", &build_query(q.company))
        .append_pair("from", &from.date_naive().to_string())
        .append_pair("to", &q.now.date_naive().to_string())
        .append_pair("language", q.language)
        .append_pair("sortBy", "publishedAt")
        .append_pair("pageSize", &q.page_size.to_string());

    let resp = client
        .http()
        .get(url)
        .header("X-Api-Key", client.api_key())
        .send()
        .await?;

    match resp.status().as_u16() {
        200 => {}
        401 => return Err(RiskError::Unauthorized),
        429 => return Err(RiskError::RateLimited),
        status => {
            return Err(RiskError::Status {
                status,
                url: resp.url().to_string(),
            });
        }
    }

    let body = resp.text().await?;
    let envelope: wire::EverythingEnvelope = serde_json::from_str(&body)?;

    if envelope.status.as_deref() == Some("error") {
        return Err(RiskError::Data(format!(
            "news provider error {}: {}",
            envelope.code.unwrap_or_default(),
            envelope.message.unwrap_or_default()
        )));
    }

    let raw = envelope.articles.unwrap_or_default();
    let total = raw.len();
    let needle = q.company.to_lowercase();

    let items: Vec<NewsItem> = raw
        .into_iter()
        .filter_map(|a| {
            let title = a.title.unwrap_or_default();
            let desc = a.description.unwrap_or_default();
            let text = format!("{title}. {desc}").trim().to_string();
            // Only headlines that name the company count as relevant.
            if text.is_empty() || !title.to_lowercase().contains(&needle) {
                return None;
            }
            Some(NewsItem {
                title,
                text,
                published_at: a.published_at.unwrap_or_default(),
            })
        })
        .collect();

    tracing::debug!(
        company = q.company,
        total,
        relevant = items.len(),
        "news articles filtered"
    );
    Ok(items)
}
