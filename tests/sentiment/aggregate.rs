use chrono::Duration;
use riskpulse::{AggregatorConfig, ArticleRecord, PublishedAt, SentimentIndex, aggregate};

use crate::common::{article, now};

#[test]
fn no_articles_gives_the_empty_index() {
    let idx = aggregate(&[], now(), &AggregatorConfig::default());
    assert_eq!(idx, SentimentIndex::empty());
    assert_eq!(idx.sentiment_7d, 0.0);
    assert_eq!(idx.article_count, 0);
    assert!(!idx.neg_event_spike);
    assert!(idx.top_headlines.is_empty());
}

#[test]
fn single_fresh_article_is_its_own_score() {
    let idx = aggregate(&[article(0.0, -0.42, "")], now(), &AggregatorConfig::default());
    assert_eq!(idx.sentiment_7d, -0.42);
    assert_eq!(idx.article_count, 1);
}

#[test]
fn older_articles_weigh_less() {
    let articles = [article(0.0, 1.0, ""), article(7.0, -1.0, "")];
    let idx = aggregate(&articles, now(), &AggregatorConfig::default());

    let w = (-1.0_f64).exp();
    let expected = (1.0 - w) / (1.0 + w);
    assert!((idx.sentiment_7d - expected).abs() < 1e-9, "{}", idx.sentiment_7d);
    assert!(idx.sentiment_7d > 0.0);
}

#[test]
fn decay_constant_is_configurable() {
    let articles = [article(0.0, 1.0, ""), article(7.0, -1.0, "")];
    let cfg = AggregatorConfig {
        decay_days: 1e9,
        ..AggregatorConfig::default()
    };
    let idx = aggregate(&articles, now(), &cfg);
    assert!(idx.sentiment_7d.abs() < 1e-6, "{}", idx.sentiment_7d);
}

#[test]
fn unparseable_and_future_timestamps_count_as_fresh() {
    let raw = PublishedAt::parse("last tuesday");
    assert_eq!(raw, PublishedAt::Unparsed("last tuesday".into()));
    assert_eq!(raw.age_days(now()), 0.0);

    let future = PublishedAt::Parsed(now() + Duration::days(2));
    assert_eq!(future.age_days(now()), 0.0);

    let articles = [
        ArticleRecord::new(raw, "a", "", 1.0),
        article(14.0, -1.0, ""),
    ];
    let idx = aggregate(&articles, now(), &AggregatorConfig::default());
    let w = (-2.0_f64).exp();
    assert!((idx.sentiment_7d - (1.0 - w) / (1.0 + w)).abs() < 1e-9);
}

#[test]
fn timestamps_parse_with_offsets() {
    let t = PublishedAt::parse("2025-03-09T14:00:00+02:00");
    assert_eq!(t, PublishedAt::Parsed(now() - Duration::hours(24)));
    assert!((t.age_days(now()) - 1.0).abs() < 1e-12);
}

#[test]
fn spike_needs_keyword_and_non_positive_score() {
    let cfg = AggregatorConfig::default();

    let hit = aggregate(&[article(1.0, -0.5, "Lender warns of BANKRUPTCY risk")], now(), &cfg);
    assert!(hit.neg_event_spike);

    let zero = aggregate(&[article(1.0, 0.0, "Going concern doubts raised")], now(), &cfg);
    assert!(zero.neg_event_spike);

    let positive = aggregate(&[article(1.0, 0.2, "Fraud charges dropped")], now(), &cfg);
    assert!(!positive.neg_event_spike);

    let no_keyword = aggregate(&[article(1.0, -0.9, "Shares slump on weak demand")], now(), &cfg);
    assert!(!no_keyword.neg_event_spike);
}

#[test]
fn custom_keywords_replace_the_defaults() {
    let cfg = AggregatorConfig {
        neg_keywords: vec!["recall".into()],
        ..AggregatorConfig::default()
    };
    let idx = aggregate(
        &[
            article(0.0, -0.3, "Product recall widens"),
            article(0.0, -0.3, "Bankruptcy filing"),
        ],
        now(),
        &cfg,
    );
    assert!(idx.neg_event_spike);

    let idx = aggregate(&[article(0.0, -0.3, "Bankruptcy filing")], now(), &cfg);
    assert!(!idx.neg_event_spike);
}

#[test]
fn headlines_keep_input_order_and_are_capped() {
    let articles: Vec<ArticleRecord> = (0..12)
        .map(|i| article(f64::from(i) * 0.5, 0.123_456 - f64::from(i) * 0.01, ""))
        .collect();
    let idx = aggregate(&articles, now(), &AggregatorConfig::default());

    assert_eq!(idx.article_count, 12);
    assert_eq!(idx.top_headlines.len(), 10);
    for (h, a) in idx.top_headlines.iter().zip(&articles) {
        assert_eq!(h.title, a.title);
        assert_eq!(h.published_at, a.published_at);
    }
    assert_eq!(idx.top_headlines[0].score, 0.1235);
}

#[test]
fn scores_are_clamped_on_construction() {
    let now = now();
    assert_eq!(ArticleRecord::new(PublishedAt::Parsed(now), "t", "", 3.0).sentiment_score(), 1.0);
    assert_eq!(ArticleRecord::new(PublishedAt::Parsed(now), "t", "", -7.5).sentiment_score(), -1.0);
    assert_eq!(ArticleRecord::new(PublishedAt::Parsed(now), "t", "", f64::NAN).sentiment_score(), 0.0);

    let idx = aggregate(
        &[ArticleRecord::new(PublishedAt::Parsed(now), "t", "", 9.0)],
        now,
        &AggregatorConfig::default(),
    );
    assert!((-1.0..=1.0).contains(&idx.sentiment_7d));
}

#[test]
fn index_serializes_with_report_keys() {
    let articles = [
        article(0.0, 0.5, ""),
        ArticleRecord::new(PublishedAt::parse("not-a-date"), "raw", "", -0.25),
    ];
    let idx = aggregate(&articles, now(), &AggregatorConfig::default());
    let v = serde_json::to_value(&idx).unwrap();

    assert_eq!(v["n_articles_7d"], 2);
    assert_eq!(v["neg_event_spike"], false);
    assert_eq!(v["top_headlines"][0]["publishedAt"], "2025-03-10T12:00:00Z");
    assert_eq!(v["top_headlines"][0]["compound"], 0.5);
    assert_eq!(v["top_headlines"][1]["publishedAt"], "not-a-date");
    assert_eq!(v["top_headlines"][1]["title"], "raw");
}
