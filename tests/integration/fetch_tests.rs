use crate::{create_session, create_test_config, db_path, population_table};
use serde_json::json;
use statfin_crawler::config::OutputMode;
use statfin_crawler::output::RawRows;
use statfin_crawler::resolver::SelectorSet;
use statfin_crawler::{ResolveError, Session, StatError, TableOutput};
use wiremock::matchers::{body_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const TABLE: [&str; 2] = ["vrm", "pop.px"];

const CSV_BODY: &str = "\"Region\",\"2015 Population\",\"2016 Population\"\n\
                        \"Helsinki\",\"628208\",\"635181\"\n";

async fn mount_table(server: &MockServer) {
    Mock::given(method("GET"))
        .and(path(db_path(&TABLE)))
        .respond_with(ResponseTemplate::new(200).set_body_json(population_table()))
        .mount(server)
        .await;
}

/// Mounts a POST that only answers when the body selects these values
async fn mount_query(server: &MockServer, regions: &[&str], years: &[&str], body: ResponseTemplate) {
    Mock::given(method("POST"))
        .and(path(db_path(&TABLE)))
        .and(body_json(json!({
            "query": [
                {"code": "alue", "selection": {"filter": "item", "values": regions}},
                {"code": "vuosi", "selection": {"filter": "item", "values": years}}
            ],
            "response": {"format": "csv"}
        })))
        .respond_with(body)
        .expect(1)
        .mount(server)
        .await;
}

fn csv_response() -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_raw(CSV_BODY.as_bytes().to_vec(), "text/csv")
}

#[tokio::test]
async fn test_walk_to_fetches_labeled_table() {
    let server = MockServer::start().await;
    mount_table(&server).await;
    mount_query(&server, &["091"], &["2015", "2016"], csv_response()).await;

    let mut session = create_session(&server);
    let selectors = SelectorSet::new().with_one("Region", "Helsinki");

    let output = session
        .walk_to("vrm/pop.px", &selectors)
        .await
        .expect("fetch failed");

    let TableOutput::Labeled(table) = output else {
        panic!("expected labeled output");
    };
    assert_eq!(table.index_name, "Region");
    assert_eq!(table.len(), 1);
    assert_eq!(table.get("Helsinki", "2016 Population"), Some("635181"));

    let history = session.history();
    assert_eq!(history.len(), 1);
    assert_eq!(
        history.get("Population by region and year").map(|url| url.path()),
        Some(db_path(&TABLE).as_str())
    );
}

#[tokio::test]
async fn test_raw_mode_keeps_rows() {
    let server = MockServer::start().await;
    mount_table(&server).await;
    mount_query(&server, &["091"], &["2016"], csv_response()).await;

    let mut config = create_test_config(&server);
    config.output.mode = OutputMode::Raw;
    let mut session = Session::new(config).expect("Failed to create session");

    let selectors = SelectorSet::new()
        .with_one("alue", "091")
        .with_one("vuosi", "2016");
    let output = session
        .walk_to("vrm/pop.px", &selectors)
        .await
        .expect("fetch failed");

    let TableOutput::Raw(dataset) = output else {
        panic!("expected raw output");
    };
    assert_eq!(dataset.headers.len(), 3);
    assert_eq!(dataset.rows, vec![vec!["Helsinki", "628208", "635181"]]);
}

#[tokio::test]
async fn test_session_default_applies_to_later_tables() {
    let server = MockServer::start().await;
    mount_table(&server).await;
    mount_query(&server, &["091", "049"], &["2015", "2016"], csv_response()).await;

    let mut session = create_session(&server);
    session.set_default("Region", ["Helsinki", "Espoo"]);

    let output = session
        .walk_to("vrm/pop.px", &SelectorSet::new())
        .await
        .expect("fetch failed");
    assert_eq!(output.len(), 1);
}

#[tokio::test]
async fn test_year_range_selects_years() {
    let server = MockServer::start().await;
    mount_table(&server).await;
    mount_query(&server, &["SSS"], &["2016"], csv_response()).await;

    let mut session = create_session(&server);
    session.set_year_range(2016, 2017).expect("valid range");

    let selectors = SelectorSet::new().with_one("alue", "SSS");
    session
        .walk_to("vrm/pop.px", &selectors)
        .await
        .expect("fetch failed");
}

#[tokio::test]
async fn test_invalid_value_names_candidates() {
    let server = MockServer::start().await;
    mount_table(&server).await;

    let mut session = create_session(&server);
    let selectors = SelectorSet::new().with("Region", ["Helsinki", "Atlantis"]);

    let err = session
        .walk_to("vrm/pop.px", &selectors)
        .await
        .unwrap_err();

    match err {
        StatError::Resolve(ResolveError::InvalidValue { variable, values }) => {
            assert_eq!(variable, "alue");
            assert_eq!(values, vec!["Atlantis".to_string()]);
        }
        other => panic!("unexpected error: {other:?}"),
    }
    assert!(session.history().is_empty());
}

#[tokio::test]
async fn test_fetch_at_folder_is_invalid_state() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(db_path(&["vrm"])))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([{"id": "pop.px"}])))
        .mount(&server)
        .await;

    let mut session = create_session(&server);
    let result = session.walk_to("vrm", &SelectorSet::new()).await;

    assert!(matches!(result, Err(StatError::InvalidState { .. })));
}

#[tokio::test]
async fn test_no_content_yields_empty_table() {
    let server = MockServer::start().await;
    mount_table(&server).await;
    mount_query(
        &server,
        &["SSS", "091", "049"],
        &["2015", "2016"],
        ResponseTemplate::new(204),
    )
    .await;

    let mut session = create_session(&server);
    let output = session
        .walk_to("vrm/pop.px", &SelectorSet::new())
        .await
        .expect("fetch failed");

    assert!(output.is_empty());
}

#[tokio::test]
async fn test_latin1_body_is_decoded() {
    let server = MockServer::start().await;
    mount_table(&server).await;

    // "Pääkaupunkiseutu" in ISO-8859-1
    let mut body = b"\"Region\",\"2016\"\n\"P".to_vec();
    body.extend([0xE4, 0xE4]);
    body.extend(b"kaupunkiseutu\",\"1\"\n");
    mount_query(
        &server,
        &["SSS", "091", "049"],
        &["2015", "2016"],
        ResponseTemplate::new(200).set_body_raw(body, "text/csv"),
    )
    .await;

    let mut session = create_session(&server);
    let output = session
        .walk_to("vrm/pop.px", &SelectorSet::new())
        .await
        .expect("fetch failed");

    let dataset = output.into_dataset();
    assert_eq!(dataset.rows[0][0], "Pääkaupunkiseutu");
}

#[tokio::test]
async fn test_server_error_on_query_is_transient() {
    let server = MockServer::start().await;
    mount_table(&server).await;
    Mock::given(method("POST"))
        .and(path(db_path(&TABLE)))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let mut session = create_session(&server);
    let err = session
        .walk_to("vrm/pop.px", &SelectorSet::new())
        .await
        .unwrap_err();

    assert!(err.is_transient());
    assert!(session.history().is_empty());
}

#[tokio::test]
async fn test_fetch_into_raw_sink() {
    let server = MockServer::start().await;
    mount_table(&server).await;
    mount_query(&server, &["091"], &["2015", "2016"], csv_response()).await;

    let mut session = create_session(&server);
    session
        .navigator_mut()
        .set_path("vrm/pop.px")
        .await
        .expect("set_path failed");

    let selectors = SelectorSet::new().with_one("alue", "091");
    let dataset = session
        .fetch_into(&selectors, &RawRows)
        .await
        .expect("fetch failed");

    assert_eq!(
        dataset.headers,
        vec!["Region", "2015 Population", "2016 Population"]
    );
    assert_eq!(dataset.len(), 1);
    assert_eq!(session.history().len(), 1);
}
