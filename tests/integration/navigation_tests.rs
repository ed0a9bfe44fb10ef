use crate::{create_session, db_path, mount_get, population_table, ROOT};
use serde_json::json;
use statfin_crawler::node::Node;
use statfin_crawler::{NavState, StatError};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

#[tokio::test]
async fn test_move_to_index_appends_child_id() {
    let server = MockServer::start().await;
    mount_get(&server, ROOT, json!([{"id": "A"}, {"id": "B"}])).await;
    mount_get(&server, &db_path(&["A"]), json!([{"id": "A1"}])).await;

    let mut session = create_session(&server);
    let navigator = session.navigator_mut();

    navigator.move_to(0usize).await.expect("move failed");

    assert_eq!(navigator.location().segments(), ["A".to_string()]);
    assert_eq!(navigator.url().path(), db_path(&["A"]));
    assert_eq!(navigator.state(), NavState::AtFolder);
    assert_eq!(navigator.options(), vec![Some("A1")]);
}

#[tokio::test]
async fn test_move_to_every_valid_index() {
    let server = MockServer::start().await;
    mount_get(
        &server,
        ROOT,
        json!([{"id": "A"}, {"dbid": "B"}, {"id": "C", "text": "Third"}]),
    )
    .await;
    for id in ["A", "B", "C"] {
        mount_get(&server, &db_path(&[id]), json!([])).await;
    }

    let mut session = create_session(&server);
    for (index, id) in ["A", "B", "C"].into_iter().enumerate() {
        let navigator = session.navigator_mut();
        navigator.reset();
        navigator.move_to(index).await.expect("move failed");
        assert_eq!(navigator.location().segments(), [id.to_string()]);
    }
}

#[tokio::test]
async fn test_move_to_by_id() {
    let server = MockServer::start().await;
    mount_get(&server, ROOT, json!([{"id": "vrm"}, {"id": "tym"}])).await;
    mount_get(&server, &db_path(&["tym"]), json!([])).await;

    let mut session = create_session(&server);
    let navigator = session.navigator_mut();
    navigator.move_to("tym").await.expect("move failed");

    assert_eq!(navigator.url().path(), db_path(&["tym"]));
}

#[tokio::test]
async fn test_invalid_selections_are_rejected() {
    let server = MockServer::start().await;
    mount_get(&server, ROOT, json!([{"id": "A"}, {"text": "no id"}])).await;

    let mut session = create_session(&server);
    let navigator = session.navigator_mut();

    let out_of_range = navigator.move_to(5usize).await;
    assert!(matches!(out_of_range, Err(StatError::InvalidSelection { .. })));

    let unknown = navigator.move_to("Z").await;
    assert!(matches!(unknown, Err(StatError::InvalidSelection { .. })));

    let unnavigable = navigator.move_to(1usize).await;
    assert!(matches!(unnavigable, Err(StatError::InvalidSelection { .. })));

    assert!(navigator.location().is_root());
}

#[tokio::test]
async fn test_reaching_table_is_terminal() {
    let server = MockServer::start().await;
    mount_get(&server, ROOT, json!([{"id": "vrm"}])).await;
    mount_get(&server, &db_path(&["vrm"]), json!([{"id": "pop.px", "type": "t"}])).await;
    mount_get(&server, &db_path(&["vrm", "pop.px"]), population_table()).await;

    let mut session = create_session(&server);
    let navigator = session.navigator_mut();

    navigator.move_to("vrm").await.expect("move failed");
    let node = navigator.move_to(0usize).await.expect("move failed");
    assert!(node.is_table());

    assert_eq!(navigator.state(), NavState::AtTable);
    assert_eq!(navigator.title(), Some("Population by region and year"));
    assert!(navigator.options().is_empty());

    let result = navigator.move_to(0usize).await;
    assert!(matches!(result, Err(StatError::InvalidState { .. })));
}

#[tokio::test]
async fn test_refresh_is_idempotent() {
    let server = MockServer::start().await;
    mount_get(&server, ROOT, json!([{"id": "A"}, {"id": "B"}])).await;

    let mut session = create_session(&server);
    let navigator = session.navigator_mut();

    let first: Node = navigator.refresh().await.expect("refresh failed").clone();
    let second: Node = navigator.refresh().await.expect("refresh failed").clone();

    assert_eq!(first, second);
    assert!(navigator.location().is_root());
}

#[tokio::test]
async fn test_move_back() {
    let server = MockServer::start().await;
    mount_get(&server, ROOT, json!([{"id": "A"}])).await;
    mount_get(&server, &db_path(&["A"]), json!([{"id": "B"}])).await;
    mount_get(&server, &db_path(&["A", "B"]), population_table()).await;

    let mut session = create_session(&server);
    let navigator = session.navigator_mut();

    navigator.move_to("A").await.expect("move failed");
    navigator.move_to("B").await.expect("move failed");
    assert_eq!(navigator.state(), NavState::AtTable);

    navigator.move_back(1).await.expect("move back failed");
    assert_eq!(navigator.location().segments(), ["A".to_string()]);
    assert_eq!(navigator.state(), NavState::AtFolder);
    assert_eq!(navigator.title(), None);
    assert_eq!(navigator.options(), vec![Some("B")]);
}

#[tokio::test]
async fn test_move_back_clamps_to_root() {
    let server = MockServer::start().await;
    mount_get(&server, ROOT, json!([{"id": "A"}])).await;
    mount_get(&server, &db_path(&["A"]), json!([{"id": "B"}])).await;

    let mut session = create_session(&server);
    let navigator = session.navigator_mut();

    navigator.move_to("A").await.expect("move failed");
    navigator.move_back(10).await.expect("move back failed");

    assert!(navigator.location().is_root());
    assert_eq!(navigator.options(), vec![Some("A")]);
}

#[tokio::test]
async fn test_failed_move_keeps_location() {
    let server = MockServer::start().await;
    mount_get(&server, ROOT, json!([{"id": "gone"}])).await;
    Mock::given(method("GET"))
        .and(path(db_path(&["gone"])))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let mut session = create_session(&server);
    let navigator = session.navigator_mut();

    let err = navigator.move_to("gone").await.unwrap_err();
    assert!(err.is_transient());
    assert!(matches!(err, StatError::HttpStatus { status: 404, .. }));
    assert!(navigator.location().is_root());
}

#[tokio::test]
async fn test_malformed_response_surfaces() {
    let server = MockServer::start().await;
    mount_get(&server, ROOT, json!({"unexpected": true})).await;

    let mut session = create_session(&server);
    let result = session.navigator_mut().refresh().await;

    assert!(matches!(result, Err(StatError::MalformedResponse { .. })));
}

#[tokio::test]
async fn test_no_content_is_empty_folder() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(ROOT))
        .respond_with(ResponseTemplate::new(204))
        .mount(&server)
        .await;

    let mut session = create_session(&server);
    let navigator = session.navigator_mut();
    navigator.refresh().await.expect("refresh failed");

    assert!(navigator.options().is_empty());
    assert_eq!(navigator.state(), NavState::AtFolder);
}

#[tokio::test]
async fn test_set_path_jumps_to_table() {
    let server = MockServer::start().await;
    mount_get(&server, &db_path(&["vrm", "pop.px"]), population_table()).await;

    let mut session = create_session(&server);
    let navigator = session.navigator_mut();

    navigator
        .set_path("vrm/pop.px")
        .await
        .expect("set_path failed");
    assert_eq!(navigator.state(), NavState::AtTable);

    let full = format!("{}{}", server.uri(), db_path(&["vrm", "pop.px"]));
    navigator.set_path(&full).await.expect("set_path failed");
    assert_eq!(navigator.location().segments().len(), 2);
}

#[tokio::test]
async fn test_set_path_outside_root_is_rejected() {
    let server = MockServer::start().await;

    let mut session = create_session(&server);
    let result = session
        .navigator_mut()
        .set_path("http://example.com/other/db")
        .await;

    assert!(matches!(result, Err(StatError::InvalidSelection { .. })));
}

#[tokio::test]
async fn test_reset_makes_no_request() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .expect(0)
        .mount(&server)
        .await;

    let mut session = create_session(&server);
    session.navigator_mut().reset();

    assert!(session.navigator().node().is_none());
    assert_eq!(session.navigator().state(), NavState::AtFolder);
}

#[tokio::test]
async fn test_set_path_with_encoded_url_requests_it_once_encoded() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(db_path(&["v%C3%A4est%C3%B6", "t.px"])))
        .respond_with(ResponseTemplate::new(200).set_body_json(population_table()))
        .expect(1)
        .mount(&server)
        .await;

    let mut session = create_session(&server);
    let navigator = session.navigator_mut();

    let full = format!("{}{}", server.uri(), db_path(&["v%C3%A4est%C3%B6", "t.px"]));
    navigator.set_path(&full).await.expect("set_path failed");

    assert_eq!(navigator.state(), NavState::AtTable);
    assert_eq!(
        navigator.location().segments(),
        ["väestö".to_string(), "t.px".to_string()]
    );
    assert_eq!(navigator.location().depth(), 2);
}

#[tokio::test]
async fn test_set_path_rejects_dot_segments() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .expect(0)
        .mount(&server)
        .await;

    let mut session = create_session(&server);
    let navigator = session.navigator_mut();

    for bad in ["vrm/../tym/t.px", "./vrm", "vrm//t.px"] {
        let result = navigator.set_path(bad).await;
        assert!(matches!(result, Err(StatError::InvalidSelection { .. })));
    }
    assert!(navigator.location().is_root());
}
