//! Integration tests for the extractors against a mocked Tableau server

use serde_json::{Value, json};
use tableau_metadata_extractor::cli;
use tableau_metadata_extractor::client::{AUTH_HEADER, TableauClient};
use tableau_metadata_extractor::config::TableauConfig;
use tableau_metadata_extractor::error::find_tableau_error;
use tableau_metadata_extractor::etl::Extractor;
use tableau_metadata_extractor::storage::NdjsonReader;
use tableau_metadata_extractor::tableau::{DashboardTableExtractor, ExternalTableExtractor};
use wiremock::matchers::{body_partial_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const TOKEN: &str = "tok-1";

fn config(server: &MockServer) -> TableauConfig {
    TableauConfig::new(server.uri(), "3.10", "analytics", "bot", "secret")
        .with_cluster("prod")
        .with_database("warehouse")
        .with_external_cluster_name("external")
        .with_external_schema_name("flat_files")
        .with_excluded_projects(vec!["Sandbox".to_string()])
}

async fn mount_sign_in(server: &MockServer, expected_calls: u64) {
    Mock::given(method("POST"))
        .and(path("/api/3.10/auth/signin"))
        .and(body_partial_json(json!({
            "credentials": {
                "personalAccessTokenName": "bot",
                "personalAccessTokenSecret": "secret",
                "site": {"contentUrl": "analytics"}
            }
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "credentials": {
                "token": TOKEN,
                "site": {"id": "site-42", "contentUrl": "analytics"},
                "user": {"id": "user-1"}
            }
        })))
        .expect(expected_calls)
        .mount(server)
        .await;
}

async fn mount_query(server: &MockServer, body: Value) {
    Mock::given(method("POST"))
        .and(path("/api/metadata/graphql"))
        .and(header(AUTH_HEADER, TOKEN))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .mount(server)
        .await;
}

fn workbooks() -> Value {
    json!({
        "data": {
            "workbooks": [
                {
                    "name": "Sales",
                    "projectName": "P1",
                    "upstreamTables": [
                        {"name": "orders", "schema": "public",
                         "database": {"name": "wh", "connectionType": "postgres"}},
                        {"name": "Sheet1", "schema": "",
                         "database": {"name": "Budget.xlsx", "connectionType": "excel-direct"}}
                    ]
                },
                {
                    "name": "Scratch",
                    "projectName": "Sandbox",
                    "upstreamTables": []
                },
                {
                    "name": "Ops",
                    "projectName": "P2",
                    "upstreamTables": []
                }
            ]
        }
    })
}

#[tokio::test]
async fn test_sign_in_returns_site_id() {
    let server = MockServer::start().await;
    mount_sign_in(&server, 1).await;

    let client = TableauClient::try_new(&config(&server)).unwrap();
    assert_eq!(client.test_connection().await.unwrap(), "site-42");
    // A second call reuses the session
    assert_eq!(client.test_connection().await.unwrap(), "site-42");
    assert_eq!(client.session().site_id(), Some("site-42"));
}

#[tokio::test]
async fn test_dashboard_tables_end_to_end() {
    let server = MockServer::start().await;
    mount_sign_in(&server, 1).await;
    mount_query(&server, workbooks()).await;

    let config = config(&server);
    let client = TableauClient::try_new(&config).unwrap();
    let mut extractor = DashboardTableExtractor::try_new(client, &config).unwrap();

    let first = extractor.extract().await.unwrap().unwrap();
    assert_eq!(
        Value::Object(first),
        json!({
            "dashboard_group_id": "P1",
            "dashboard_id": "Sales",
            "cluster": "prod",
            "table_ids": [
                "warehouse://prod.public/orders",
                "exceldirect://external.Budget_xlsx/Sheet1"
            ],
            "product": "tableau"
        })
    );

    let second = extractor.extract().await.unwrap().unwrap();
    assert_eq!(second["dashboard_id"], "Ops");
    assert_eq!(second["table_ids"], json!([]));

    assert!(extractor.extract().await.unwrap().is_none());
    assert!(extractor.extract().await.unwrap().is_none());
}

#[tokio::test]
async fn test_configured_static_fields_replace_defaults() {
    let server = MockServer::start().await;
    mount_sign_in(&server, 1).await;
    mount_query(&server, workbooks()).await;

    let mut static_fields = serde_json::Map::new();
    static_fields.insert("product".to_string(), json!("tableau-online"));
    static_fields.insert("cluster".to_string(), json!("override"));
    let config = config(&server).with_static_fields(static_fields);

    let client = TableauClient::try_new(&config).unwrap();
    let mut extractor = DashboardTableExtractor::try_new(client, &config).unwrap();

    let record = extractor.extract().await.unwrap().unwrap();
    assert_eq!(record["product"], "tableau-online");
    assert_eq!(record["cluster"], "override");
}

#[tokio::test]
async fn test_external_tables_send_connection_types() {
    let server = MockServer::start().await;
    mount_sign_in(&server, 1).await;

    Mock::given(method("POST"))
        .and(path("/api/metadata/graphql"))
        .and(header(AUTH_HEADER, TOKEN))
        .and(body_partial_json(json!({
            "variables": {
                "externalTableTypes": ["excel-direct", "google-sheets", "salesforce", "textscan"]
            }
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": {
                "databases": [
                    {"name": "events.csv", "connectionType": "textscan",
                     "description": null, "tables": [{"name": "events.csv"}]}
                ]
            }
        })))
        .expect(1)
        .mount(&server)
        .await;

    let config = config(&server);
    let client = TableauClient::try_new(&config).unwrap();
    let mut extractor = ExternalTableExtractor::try_new(client, &config).unwrap();

    let record = extractor.extract().await.unwrap().unwrap();
    assert_eq!(
        Value::Object(record),
        json!({
            "cluster": "external",
            "database": "textscan",
            "schema": "flat_files",
            "name": "events.csv",
            "description": null
        })
    );
    assert!(extractor.extract().await.unwrap().is_none());
}

#[tokio::test]
async fn test_missing_data_is_query_error() {
    let server = MockServer::start().await;
    mount_sign_in(&server, 1).await;
    mount_query(
        &server,
        json!({"errors": [{"message": "Cannot query field 'workbookz'"}]}),
    )
    .await;

    let config = config(&server);
    let client = TableauClient::try_new(&config).unwrap();
    let mut extractor = DashboardTableExtractor::try_new(client, &config).unwrap();

    let err = extractor.extract().await.unwrap_err();
    let tableau_error = find_tableau_error(&err).unwrap();
    assert!(tableau_error.is_query());
    assert!(err.to_string().contains("workbookz"));

    // The failed extractor does not retry
    assert!(extractor.extract().await.unwrap().is_none());
}

#[tokio::test]
async fn test_rejected_sign_in_is_authentication_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/3.10/auth/signin"))
        .respond_with(ResponseTemplate::new(401).set_body_string("invalid token"))
        .mount(&server)
        .await;

    let config = config(&server);
    let client = TableauClient::try_new(&config).unwrap();
    let mut extractor = DashboardTableExtractor::try_new(client, &config).unwrap();

    let err = extractor.extract().await.unwrap_err();
    assert!(find_tableau_error(&err).unwrap().is_authentication());
}

#[tokio::test]
async fn test_dashboards_pipeline_writes_ndjson() {
    let server = MockServer::start().await;
    mount_sign_in(&server, 1).await;
    mount_query(
        &server,
        json!({
            "data": {
                "workbooks": [{
                    "id": "wb-1",
                    "name": "Sales",
                    "createdAt": "2020-01-01T00:00:00Z",
                    "description": null,
                    "projectName": "P1",
                    "projectVizportalUrlId": "12",
                    "vizportalUrlId": "34"
                }]
            }
        }),
    )
    .await;

    let config = config(&server);
    let output = tempfile::NamedTempFile::new().unwrap();

    let count = cli::extract_dashboards(&config, Some(output.path()))
        .await
        .unwrap();
    assert_eq!(count, 1);

    let lines = NdjsonReader::new(output.path()).read().unwrap();
    assert_eq!(lines.len(), 1);
    let dashboard = &lines[0];
    assert_eq!(dashboard["dashboard_group"], "P1");
    assert_eq!(dashboard["dashboard_name"], "Sales");
    assert_eq!(dashboard["description"], "");
    assert_eq!(dashboard["created_timestamp"], 1577836800);
    assert_eq!(dashboard["product"], "tableau");
    assert_eq!(dashboard["cluster"], "prod");
    assert_eq!(
        dashboard["dashboard_url"],
        format!("{}/#/workbooks/34/views", server.uri())
    );
}

#[tokio::test]
async fn test_all_excluded_run_clears_previous_output() {
    let server = MockServer::start().await;
    mount_sign_in(&server, 1).await;
    mount_query(
        &server,
        json!({
            "data": {
                "workbooks": [{
                    "name": "Scratch",
                    "projectName": "Sandbox",
                    "upstreamTables": []
                }]
            }
        }),
    )
    .await;

    let config = config(&server);
    let output = tempfile::NamedTempFile::new().unwrap();
    std::fs::write(output.path(), "{\"stale\":true}\n").unwrap();

    let count = cli::extract_dashboard_tables(&config, Some(output.path()))
        .await
        .unwrap();
    assert_eq!(count, 0);
    assert_eq!(std::fs::read_to_string(output.path()).unwrap(), "");
}

#[tokio::test]
async fn test_sign_in_without_site_id_is_authentication_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/3.10/auth/signin"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "credentials": {"token": TOKEN}
        })))
        .mount(&server)
        .await;

    let client = TableauClient::try_new(&config(&server)).unwrap();
    let err = client.test_connection().await.unwrap_err();
    assert!(find_tableau_error(&err).unwrap().is_authentication());
    assert!(client.session().site_id().is_none());
}

#[tokio::test]
async fn test_sign_in_without_token_is_authentication_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/3.10/auth/signin"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "credentials": {"site": {"id": "site-42"}}
        })))
        .mount(&server)
        .await;

    let client = TableauClient::try_new(&config(&server)).unwrap();
    let err = client.execute_query("query { workbooks { name } }", None).await.unwrap_err();
    assert!(find_tableau_error(&err).unwrap().is_authentication());
}

#[tokio::test]
async fn test_metadata_error_status_is_query_error() {
    let server = MockServer::start().await;
    mount_sign_in(&server, 1).await;
    Mock::given(method("POST"))
        .and(path("/api/metadata/graphql"))
        .respond_with(ResponseTemplate::new(503).set_body_string("maintenance"))
        .mount(&server)
        .await;

    let client = TableauClient::try_new(&config(&server)).unwrap();
    let err = client.execute_query("query { workbooks { name } }", None).await.unwrap_err();
    assert!(find_tableau_error(&err).unwrap().is_query());
    assert!(err.to_string().contains("503"));
    assert!(err.to_string().contains("maintenance"));
}

#[tokio::test]
async fn test_null_data_is_query_error() {
    let server = MockServer::start().await;
    mount_sign_in(&server, 1).await;
    mount_query(
        &server,
        json!({"data": null, "errors": [{"message": "Permission denied"}]}),
    )
    .await;

    let client = TableauClient::try_new(&config(&server)).unwrap();
    let err = client.execute_query("query { workbooks { name } }", None).await.unwrap_err();
    assert!(find_tableau_error(&err).unwrap().is_query());
    assert!(err.to_string().contains("Permission denied"));
}
