//! Detail fetching tests: batching, filtering and error policy
//!
//! These tests use wiremock to simulate NCBI EFetch responses.

mod common;

use std::collections::HashSet;

use common::{
    academic_article, article_set, company_article, create_mock_client, create_mock_client_with,
    mount_efetch,
};
use pubmed_paper_fetcher::{ClientConfig, PaperFetchError};
use tracing_test::traced_test;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn ids(list: &[&str]) -> Vec<String> {
    list.iter().map(|s| s.to_string()).collect()
}

async fn mount_batch(server: &MockServer, id_param: &str, articles: &[&str]) {
    let body = article_set(&articles.iter().map(|id| company_article(id)).collect::<Vec<_>>());
    Mock::given(method("GET"))
        .and(path("/efetch.fcgi"))
        .and(query_param("id", id_param))
        .respond_with(ResponseTemplate::new(200).set_body_string(body))
        .expect(1)
        .mount(server)
        .await;
}

#[tokio::test]
#[traced_test]
async fn test_ids_are_split_into_batches() {
    let mock_server = MockServer::start().await;
    mount_batch(&mock_server, "1,2", &["1", "2"]).await;
    mount_batch(&mock_server, "3,4", &["3", "4"]).await;
    mount_batch(&mock_server, "5", &["5"]).await;

    let client = create_mock_client_with(&mock_server, ClientConfig::new().with_batch_size(2));
    let records = client
        .fetch_details(&ids(&["1", "2", "3", "4", "5"]))
        .await
        .expect("Batch fetch should succeed");

    let pmids: Vec<&str> = records.iter().map(|r| r.pmid.as_str()).collect();
    assert_eq!(pmids, vec!["1", "2", "3", "4", "5"]);
}

#[tokio::test]
#[traced_test]
async fn test_single_request_below_batch_size() {
    let mock_server = MockServer::start().await;
    mount_batch(&mock_server, "10,20,30", &["10", "20", "30"]).await;

    let client = create_mock_client(&mock_server);
    let records = client.fetch_details(&ids(&["10", "20", "30"])).await.unwrap();

    assert_eq!(records.len(), 3);
    // wiremock verifies expect(1) on drop
}

#[tokio::test]
#[traced_test]
async fn test_empty_input_makes_no_request() {
    let mock_server = MockServer::start().await;
    let client = create_mock_client(&mock_server);

    let records = client
        .fetch_details(&[])
        .await
        .expect("Empty batch should return Ok");
    assert!(records.is_empty());

    let received_requests = mock_server.received_requests().await.unwrap();
    assert_eq!(
        received_requests.len(),
        0,
        "No HTTP requests should be made for empty input"
    );
}

#[tokio::test]
#[traced_test]
async fn test_records_are_drawn_from_requested_ids() {
    let mock_server = MockServer::start().await;
    mount_efetch(
        &mock_server,
        article_set(&[
            company_article("1"),
            company_article("999"),
            academic_article("2"),
        ]),
    )
    .await;

    let requested = ids(&["1", "2", "3"]);
    let client = create_mock_client(&mock_server);
    let records = client.fetch_details(&requested).await.unwrap();

    assert!(records.len() <= requested.len());
    let allowed: HashSet<&str> = requested.iter().map(String::as_str).collect();
    assert!(records.iter().all(|r| allowed.contains(r.pmid.as_str())));
    assert_eq!(records.len(), 2);
    assert!(logs_contain("Dropping record that was not requested"));
}

#[tokio::test]
#[traced_test]
async fn test_repeated_record_is_returned_once() {
    let mock_server = MockServer::start().await;
    mount_efetch(
        &mock_server,
        article_set(&[company_article("1"), company_article("1"), company_article("2")]),
    )
    .await;

    let client = create_mock_client(&mock_server);
    let records = client.fetch_details(&ids(&["1", "2"])).await.unwrap();

    let pmids: Vec<&str> = records.iter().map(|r| r.pmid.as_str()).collect();
    assert_eq!(pmids, vec!["1", "2"]);
    assert!(logs_contain("already returned"));
}

#[tokio::test]
#[traced_test]
async fn test_records_follow_requested_order() {
    let mock_server = MockServer::start().await;
    mount_efetch(
        &mock_server,
        article_set(&[
            company_article("30"),
            academic_article("10"),
            company_article("20"),
        ]),
    )
    .await;

    let client = create_mock_client(&mock_server);
    let records = client.fetch_details(&ids(&["10", "20", "30"])).await.unwrap();

    let pmids: Vec<&str> = records.iter().map(|r| r.pmid.as_str()).collect();
    assert_eq!(pmids, vec!["10", "20", "30"]);
}

#[tokio::test]
#[traced_test]
async fn test_record_without_pmid_is_skipped() {
    let mock_server = MockServer::start().await;
    let broken = "<PubmedArticle><MedlineCitation><Article><ArticleTitle>Orphan</ArticleTitle></Article></MedlineCitation></PubmedArticle>".to_string();
    mount_efetch(
        &mock_server,
        article_set(&[broken, company_article("7")]),
    )
    .await;

    let client = create_mock_client(&mock_server);
    let records = client.fetch_details(&ids(&["7", "8"])).await.unwrap();

    assert_eq!(records.len(), 1);
    assert_eq!(records[0].pmid, "7");
    assert!(logs_contain("Skipping PubmedArticle without a PMID"));
}

#[tokio::test]
#[traced_test]
async fn test_malformed_xml_fails_batch() {
    let mock_server = MockServer::start().await;
    mount_efetch(
        &mock_server,
        "<PubmedArticleSet><PubmedArticle></Broken></PubmedArticleSet>".to_string(),
    )
    .await;

    let client = create_mock_client(&mock_server);
    let err = client.fetch_details(&ids(&["1"])).await.unwrap_err();

    assert!(matches!(err, PaperFetchError::XmlParseError { .. }));
}

#[tokio::test]
#[traced_test]
async fn test_api_params_are_appended() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/efetch.fcgi"))
        .and(query_param("email", "me@example.com"))
        .and(query_param("tool", "affiliation-report"))
        .respond_with(ResponseTemplate::new(200).set_body_string(article_set(&[company_article("1")])))
        .expect(1)
        .mount(&mock_server)
        .await;

    let config = ClientConfig::new()
        .with_email("me@example.com")
        .with_tool("affiliation-report");
    let client = create_mock_client_with(&mock_server, config);

    let records = client.fetch_details(&ids(&["1"])).await.unwrap();
    assert_eq!(records.len(), 1);

    let received_requests = mock_server.received_requests().await.unwrap();
    assert!(
        received_requests[0]
            .url
            .query_pairs()
            .all(|(key, _)| key != "api_key")
    );
}

async fn fetch_with_body(body: &str) -> PaperFetchError {
    let mock_server = MockServer::start().await;
    mount_efetch(&mock_server, body.to_string()).await;

    let client = create_mock_client(&mock_server);
    client.fetch_details(&ids(&["1"])).await.unwrap_err()
}

#[tokio::test]
#[traced_test]
async fn test_blank_body_is_parse_error() {
    let err = fetch_with_body("   ").await;
    assert!(matches!(err, PaperFetchError::XmlParseError { .. }));
    assert!(logs_contain("EFetch returned an empty body"));
}

#[tokio::test]
#[traced_test]
async fn test_json_body_is_parse_error() {
    let err = fetch_with_body(r#"{"error":"API rate limit exceeded"}"#).await;
    assert!(matches!(err, PaperFetchError::XmlParseError { .. }));
}

#[tokio::test]
#[traced_test]
async fn test_efetch_error_document_is_parse_error() {
    let err = fetch_with_body("<eFetchResult><ERROR>Empty id list</ERROR></eFetchResult>").await;
    match err {
        PaperFetchError::XmlParseError { message } => {
            assert!(message.contains("PubmedArticleSet"));
        }
        other => panic!("Expected XmlParseError, got {:?}", other),
    }
}
