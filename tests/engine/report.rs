use std::sync::Arc;

use riskpulse::{PredictionReport, RatingLabel, RiskEngine};
use serde_json::json;

use crate::common::{FixedPredictor, StaticSource, acme_input, article, now};

#[tokio::test]
async fn report_json_uses_wire_names() {
    let articles = vec![
        article(0.0, 0.4, "Acme wins contract"),
        article(1.0, -0.2, "Acme faces restructuring"),
        article(2.0, 0.1, "Acme update"),
    ];
    let engine = RiskEngine::builder()
        .predictor(Arc::new(FixedPredictor::new([0.70, 0.15, 0.10, 0.05])))
        .article_source(Arc::new(StaticSource::new(articles)))
        .as_of(now())
        .build()
        .unwrap();

    let report = engine.predict(&acme_input()).await.unwrap();
    let v = serde_json::to_value(&report).unwrap();

    assert_eq!(v["symbol"], "ACME");
    assert_eq!(v["sector"], "Technology");
    assert_eq!(v["base"]["predicted_rating"], "Low Risk");
    assert_eq!(v["base"]["probabilities"]["proba_Low_Risk"], 0.7);
    assert_eq!(
        v["base"]["top_features"],
        json!([{ "Feature": "debtRatio", "Contribution": -1.25 }])
    );

    assert_eq!(v["news"]["n_articles_7d"], 3);
    assert_eq!(v["news"]["neg_event_spike"], true);
    assert_eq!(v["news"]["top_headlines"][1]["compound"], -0.2);
    assert_eq!(v["news"]["top_headlines"][1]["publishedAt"], "2025-03-09T12:00:00Z");

    let after = &v["after_news"];
    assert!(after["probabilities"]["proba_Highest_Risk"].is_f64());
    assert_eq!(after["debug"]["n_articles_7d"], 3);
    assert_eq!(after["debug"]["neg_event_spike"], true);
    assert_eq!(after["debug"]["alpha"], 0.2);
    assert!(after["debug"].get("skipped").is_none());
}

#[test]
fn neutral_report_is_well_formed() {
    let report = PredictionReport::neutral("ACME", "Technology");
    assert_eq!(report.base.predicted_rating, RatingLabel::Medium);
    assert_eq!(report.after_news.predicted_rating, RatingLabel::Medium);

    let v = serde_json::to_value(&report).unwrap();
    assert_eq!(v["base"]["predicted_rating"], "Medium Risk");
    assert_eq!(v["base"]["top_features"], json!([]));
    assert_eq!(v["news"]["n_articles_7d"], 0);
    assert_eq!(v["news"]["sentiment_7d"], 0.0);
    assert_eq!(v["after_news"]["debug"], json!({ "skipped": "too_few_articles" }));
    assert_eq!(v["after_news"]["probabilities"]["proba_Medium_Risk"], 0.28);
}
