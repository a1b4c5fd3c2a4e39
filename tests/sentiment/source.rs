use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use httpmock::MockServer;
use riskpulse::{
    ArticleQuery, ArticleSource, LexiconScorer, NewsArticleSource, NoNews, PublishedAt,
    SentimentScorer,
};

use crate::common::{fixture, mock_everything, news_client};

fn acme_query() -> ArticleQuery {
    ArticleQuery {
        symbol: "ACME".into(),
        company_name: "Acme Corp".into(),
    }
}

struct ConstScorer(f64);

impl SentimentScorer for ConstScorer {
    fn score(&self, _text: &str) -> f64 {
        self.0
    }
}

#[tokio::test]
async fn no_news_returns_nothing() {
    let articles = NoNews.fetch_articles(&acme_query()).await.unwrap();
    assert!(articles.is_empty());
}

#[tokio::test]
async fn news_source_scores_relevant_articles() {
    let server = MockServer::start();
    let mock = mock_everything(&server, 200, fixture("newsapi_everything_ACME.json"));

    let source = NewsArticleSource::new(news_client(&server));
    let articles = source.fetch_articles(&acme_query()).await.unwrap();
    mock.assert();

    assert_eq!(articles.len(), 5);
    let scores: Vec<f64> = articles.iter().map(|a| a.sentiment_score()).collect();
    assert!(scores[0] > 0.3, "record profit: {}", scores[0]);
    assert!(scores[1] < -0.3, "fraud probe: {}", scores[1]);
    assert_eq!(scores[2], 0.0);
    assert!(scores[3] > 0.0, "dividend: {}", scores[3]);
    assert!(scores[4] < 0.0, "missed estimates: {}", scores[4]);

    assert!(matches!(articles[0].published_at, PublishedAt::Parsed(_)));
    assert_eq!(
        articles[3].published_at,
        PublishedAt::Unparsed("not-a-date".into())
    );
}

fn counting_source(server: &MockServer, loads: &Arc<AtomicUsize>) -> NewsArticleSource {
    let counter = loads.clone();
    NewsArticleSource::with_scorer(news_client(server), move || {
        counter.fetch_add(1, Ordering::SeqCst);
        Ok(Box::new(ConstScorer(-0.4)) as Box<dyn SentimentScorer>)
    })
}

#[tokio::test]
async fn scorer_is_not_built_without_articles() {
    let server = MockServer::start();
    let mock = mock_everything(&server, 200, fixture("newsapi_empty.json"));

    let loads = Arc::new(AtomicUsize::new(0));
    let source = counting_source(&server, &loads);
    let articles = source.fetch_articles(&acme_query()).await.unwrap();

    mock.assert();
    assert!(articles.is_empty());
    assert_eq!(loads.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn scorer_is_built_once_across_requests() {
    let server = MockServer::start();
    let mock = mock_everything(&server, 200, fixture("newsapi_everything_ACME.json"));

    let loads = Arc::new(AtomicUsize::new(0));
    let source = counting_source(&server, &loads);
    for _ in 0..3 {
        let articles = source.fetch_articles(&acme_query()).await.unwrap();
        assert_eq!(articles.len(), 5);
        assert!(articles.iter().all(|a| a.sentiment_score() == -0.4));
    }

    mock.assert_hits(3);
    assert_eq!(loads.load(Ordering::SeqCst), 1);
}

#[test]
fn lexicon_batch_preserves_order() {
    let scorer = LexiconScorer::new();
    let texts = vec![
        "Profit soars".to_string(),
        "Quarterly update".to_string(),
        "Shares plunge".to_string(),
    ];
    let scores = scorer.score_batch(&texts);
    assert_eq!(scores.len(), 3);
    assert!(scores[0] > 0.0);
    assert_eq!(scores[1], 0.0);
    assert!(scores[2] < 0.0);
}

#[test]
fn intensifiers_amplify() {
    let scorer = LexiconScorer::new();
    assert!(scorer.score("Shares very strong") > scorer.score("Shares strong"));
    assert!(scorer.score("Shares slightly strong") < scorer.score("Shares strong"));
}
