use std::sync::Arc;

use httpmock::MockServer;
use riskpulse::{
    LogisticPredictor, NewsArticleSource, PublishedAt, RatingLabel, RiskEngine, Settings,
    TiltDebug,
};

use crate::common::{acme_input, fixture, fixtures_dir, mock_everything, news_client, now};

#[tokio::test]
async fn full_pipeline_against_recorded_news() {
    let server = MockServer::start();
    let mock = mock_everything(&server, 200, fixture("newsapi_everything_ACME.json"));

    let engine = RiskEngine::builder()
        .predictor(Arc::new(LogisticPredictor::from_path(
            fixtures_dir().join("model_lr.json"),
        )))
        .article_source(Arc::new(NewsArticleSource::new(news_client(&server))))
        .as_of(now())
        .build()
        .unwrap();

    let outcome = engine.run(&acme_input()).await.unwrap();
    mock.assert();
    assert!(!outcome.is_degraded());
    let report = outcome.report();

    assert_eq!(report.base.predicted_rating, RatingLabel::Low);
    assert_eq!(report.base.top_features.len(), 3);

    assert_eq!(report.news.article_count, 5);
    assert!(report.news.neg_event_spike, "fraud headline must flag a negative event");
    assert_eq!(report.news.top_headlines.len(), 5);
    assert_eq!(
        report.news.top_headlines[3].published_at,
        PublishedAt::Unparsed("not-a-date".into())
    );

    match report.after_news.debug {
        TiltDebug::Applied {
            news_adj,
            neg_event_spike,
            n_articles_7d,
            ..
        } => {
            assert!((news_adj - (report.news.sentiment_7d - 0.25)).abs() < 1e-12);
            assert!(neg_event_spike);
            assert_eq!(n_articles_7d, 5);
        }
        TiltDebug::Skipped { .. } => panic!("tilt skipped with five articles"),
    }

    let risk = |p: &riskpulse::ProbabilityDistribution| {
        p.get(RatingLabel::High) + p.get(RatingLabel::Highest)
    };
    assert!(risk(&report.after_news.probabilities) > risk(&report.base.probabilities));
}

#[tokio::test]
async fn settings_without_key_run_without_news() {
    let settings = Settings {
        model_path: fixtures_dir().join("model_lr.json"),
        ..Settings::default()
    };
    let engine = RiskEngine::from_settings(&settings).unwrap();

    let outcome = engine.run(&acme_input()).await.unwrap();
    assert!(!outcome.is_degraded());
    assert_eq!(outcome.report().news.article_count, 0);
}

#[tokio::test]
async fn settings_with_base_override_reach_the_mock() {
    let server = MockServer::start();
    let mock = mock_everything(&server, 200, fixture("newsapi_everything_ACME.json"));

    let settings = Settings {
        news_api_key: Some(crate::common::TEST_KEY.into()),
        news_api_base: Some(url::Url::parse(&server.base_url()).unwrap()),
        model_path: fixtures_dir().join("model_lr.json"),
        ..Settings::default()
    };
    let engine = RiskEngine::from_settings(&settings).unwrap();

    let report = engine.run(&acme_input()).await.unwrap().into_report();
    mock.assert();
    assert_eq!(report.news.article_count, 5);
}

#[tokio::test]
async fn missing_model_falls_back_to_heuristic() {
    let settings = Settings {
        model_path: fixtures_dir().join("absent_model.json"),
        ..Settings::default()
    };
    let engine = RiskEngine::from_settings(&settings).unwrap();

    let outcome = engine.run(&acme_input()).await.unwrap();
    assert!(outcome.is_degraded());
    assert_eq!(outcome.report().base.predicted_rating, RatingLabel::Low);
}
