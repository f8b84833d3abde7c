//! End-to-end pipeline tests against mocked ESearch/EFetch endpoints

mod common;

use common::{
    academic_article, article_set, company_article, create_mock_client, esearch_body,
    mount_efetch, mount_esearch,
};
use pubmed_paper_fetcher::{AffiliationClassifier, KeywordSets, PaperFetchError, PaperFetcher};
use serde_json::json;
use tracing_test::traced_test;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

#[tokio::test]
#[traced_test]
async fn test_pipeline_produces_rows_in_search_order() {
    let mock_server = MockServer::start().await;
    mount_esearch(&mock_server, &["300", "100", "200"]).await;
    mount_efetch(
        &mock_server,
        article_set(&[
            company_article("200"),
            academic_article("100"),
            company_article("300"),
        ]),
    )
    .await;

    let fetcher = PaperFetcher::new(create_mock_client(&mock_server));
    let rows = fetcher.run("kinase inhibitor", 20).await.unwrap();
    assert!(logs_contain("Pipeline completed"));

    let ids: Vec<&str> = rows.iter().map(|r| r.pmid.as_str()).collect();
    assert_eq!(ids, vec!["300", "200"]);

    let row = &rows[0];
    assert_eq!(row.title, "Kinase inhibitor efficacy in vivo");
    assert_eq!(row.publication_date, "2023");
    assert_eq!(row.authors, vec!["Jane Doe"]);
    assert_eq!(row.companies, vec!["XYZ Pharmaceuticals Inc."]);
    assert_eq!(row.emails, vec!["jdoe@xyz.com"]);
}

#[tokio::test]
#[traced_test]
async fn test_search_parameters_are_sent() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/esearch.fcgi"))
        .and(query_param("db", "pubmed"))
        .and(query_param("term", "cancer AND pharma[ad]"))
        .and(query_param("retmax", "42"))
        .and(query_param("retmode", "json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(esearch_body(&["1"])))
        .expect(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/efetch.fcgi"))
        .and(query_param("db", "pubmed"))
        .and(query_param("id", "1"))
        .and(query_param("retmode", "xml"))
        .respond_with(ResponseTemplate::new(200).set_body_string(article_set(&[company_article("1")])))
        .expect(1)
        .mount(&mock_server)
        .await;

    let fetcher = PaperFetcher::new(create_mock_client(&mock_server));
    let rows = fetcher.run("cancer AND pharma[ad]", 42).await.unwrap();
    assert_eq!(rows.len(), 1);
}

#[tokio::test]
#[traced_test]
async fn test_empty_search_stops_before_fetch() {
    let mock_server = MockServer::start().await;
    mount_esearch(&mock_server, &[]).await;

    Mock::given(method("GET"))
        .and(path("/efetch.fcgi"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&mock_server)
        .await;

    let fetcher = PaperFetcher::new(create_mock_client(&mock_server));
    let err = fetcher.run("nothing matches this", 20).await.unwrap_err();

    match err {
        PaperFetchError::EmptyResult { query } => assert_eq!(query, "nothing matches this"),
        other => panic!("expected EmptyResult, got {other:?}"),
    }
}

#[tokio::test]
#[traced_test]
async fn test_no_qualifying_articles_is_not_an_error() {
    let mock_server = MockServer::start().await;
    mount_esearch(&mock_server, &["1", "2"]).await;
    mount_efetch(
        &mock_server,
        article_set(&[academic_article("1"), academic_article("2")]),
    )
    .await;

    let fetcher = PaperFetcher::new(create_mock_client(&mock_server));
    let rows = fetcher.run("cohort", 20).await.unwrap();
    assert!(rows.is_empty());
}

#[tokio::test]
#[traced_test]
async fn test_search_http_error_is_transport_error() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/esearch.fcgi"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&mock_server)
        .await;

    let fetcher = PaperFetcher::new(create_mock_client(&mock_server));
    let err = fetcher.run("cancer", 20).await.unwrap_err();

    assert!(err.is_transport());
    assert!(matches!(err, PaperFetchError::ApiError { status: 500, .. }));
}

#[tokio::test]
#[traced_test]
async fn test_fetch_http_error_is_transport_error() {
    let mock_server = MockServer::start().await;
    mount_esearch(&mock_server, &["1"]).await;
    Mock::given(method("GET"))
        .and(path("/efetch.fcgi"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&mock_server)
        .await;

    let fetcher = PaperFetcher::new(create_mock_client(&mock_server));
    let err = fetcher.run("cancer", 20).await.unwrap_err();

    assert!(matches!(err, PaperFetchError::ApiError { status: 503, .. }));
}

#[tokio::test]
#[traced_test]
async fn test_non_article_set_fetch_body_is_fatal() {
    let mock_server = MockServer::start().await;
    mount_esearch(&mock_server, &["1", "2"]).await;
    mount_efetch(
        &mock_server,
        "<html><body>Service maintenance</body></html>".to_string(),
    )
    .await;

    let fetcher = PaperFetcher::new(create_mock_client(&mock_server));
    let err = fetcher.run("cancer", 20).await.unwrap_err();

    assert!(matches!(err, PaperFetchError::XmlParseError { .. }));
    assert!(!err.is_transport());
}

#[tokio::test]
#[traced_test]
async fn test_esearch_error_field_surfaces() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/esearch.fcgi"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"esearchresult": {"ERROR": "Invalid query syntax"}})),
        )
        .mount(&mock_server)
        .await;

    let fetcher = PaperFetcher::new(create_mock_client(&mock_server));
    let err = fetcher.run("((", 20).await.unwrap_err();

    match err {
        PaperFetchError::ApiError { message, .. } => assert_eq!(message, "Invalid query syntax"),
        other => panic!("expected ApiError, got {other:?}"),
    }
}

#[tokio::test]
#[traced_test]
async fn test_invalid_json_is_parse_error() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/esearch.fcgi"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>maintenance</html>"))
        .mount(&mock_server)
        .await;

    let fetcher = PaperFetcher::new(create_mock_client(&mock_server));
    let err = fetcher.run("cancer", 20).await.unwrap_err();

    assert!(matches!(err, PaperFetchError::JsonError(_)));
}

#[tokio::test]
#[traced_test]
async fn test_custom_keywords_change_qualification() {
    let mock_server = MockServer::start().await;
    mount_esearch(&mock_server, &["1", "2"]).await;
    mount_efetch(
        &mock_server,
        article_set(&[company_article("1"), academic_article("2")]),
    )
    .await;

    let keywords = KeywordSets::new(vec!["Public Health"], vec!["Pharmaceuticals"]);
    let fetcher = PaperFetcher::with_classifier(
        create_mock_client(&mock_server),
        AffiliationClassifier::new(keywords),
    );
    let rows = fetcher.run("anything", 20).await.unwrap();

    // "State University" no longer counts as academic; XYZ is now excluded.
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].pmid, "2");
    assert_eq!(rows[0].authors, vec!["Ann Poe"]);
    assert_eq!(
        rows[0].companies,
        vec!["School of Public Health, State University"]
    );
}
