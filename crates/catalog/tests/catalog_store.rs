use rusyle_catalog::{CatalogStore, EventQuery, messages};
use rusyle_client::{ApiClient, ClientConfig};
use rusyle_core::{EventId, EventStatus, ReviewDraft};
use serde_json::json;
use wiremock::matchers::{body_json, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn store_for(server: &MockServer) -> CatalogStore {
    let api = ApiClient::new(&ClientConfig::new(format!("{}/api", server.uri()))).unwrap();
    CatalogStore::new(api)
}

async fn mount_list(server: &MockServer, body: serde_json::Value) {
    Mock::given(method("GET"))
        .and(path("/api/events"))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .up_to_n_times(1)
        .mount(server)
        .await;
}

async fn mount_event(server: &MockServer, id: i64, body: serde_json::Value) {
    Mock::given(method("GET"))
        .and(path(format!("/api/events/{id}")))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .mount(server)
        .await;
}

#[tokio::test]
async fn fetch_events_replaces_previous_list() {
    let server = MockServer::start().await;
    mount_list(&server, json!([{"id": 1}])).await;
    mount_list(&server, json!([{"id": 2}])).await;

    let store = store_for(&server);
    store.fetch_events(&EventQuery::new()).await.unwrap();
    assert_eq!(store.events().len(), 1);

    let events = store.fetch_events(&EventQuery::new()).await.unwrap();
    let ids: Vec<i64> = store.events().iter().map(|e| e.id.get()).collect();
    assert_eq!(ids, vec![2]);
    assert_eq!(events, store.events());
    assert!(!store.loading());
}

#[tokio::test]
async fn fetch_events_forwards_query_and_keeps_order() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/events"))
        .and(query_param("status", "active"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"id": 9, "status": "active"},
            {"id": 3, "status": "past", "is_participant": true},
            {"id": 7, "status": "active", "is_participant": true}
        ])))
        .expect(1)
        .mount(&server)
        .await;

    let store = store_for(&server);
    store
        .fetch_events(&EventQuery::new().status(EventStatus::ACTIVE))
        .await
        .unwrap();

    let ids = |events: Vec<rusyle_core::Event>| {
        events.iter().map(|e| e.id.get()).collect::<Vec<_>>()
    };
    assert_eq!(ids(store.events()), vec![9, 3, 7]);
    assert_eq!(ids(store.active_events()), vec![9, 7]);
    assert_eq!(ids(store.past_events()), vec![3]);
    assert_eq!(ids(store.my_events()), vec![3, 7]);
}

#[tokio::test]
async fn fetch_events_failure_keeps_list_and_records_message() {
    let server = MockServer::start().await;
    mount_list(&server, json!([{"id": 1}])).await;
    Mock::given(method("GET"))
        .and(path("/api/events"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let store = store_for(&server);
    store.fetch_events(&EventQuery::new()).await.unwrap();

    let err = store.fetch_events(&EventQuery::new()).await.unwrap_err();
    assert_eq!(err.status(), Some(500));
    assert_eq!(store.events().len(), 1);
    assert_eq!(
        store.last_error().as_deref(),
        Some(messages::FETCH_EVENTS_FAILED)
    );
    assert!(!store.loading());
}

#[tokio::test]
async fn fetch_event_by_id_sets_current_only() {
    let server = MockServer::start().await;
    mount_list(&server, json!([{"id": 1, "title": "Old"}])).await;
    mount_event(&server, 1, json!({"id": 1, "title": "New"})).await;

    let store = store_for(&server);
    store.fetch_events(&EventQuery::new()).await.unwrap();
    let event = store.fetch_event_by_id(EventId::new(1)).await.unwrap();

    assert_eq!(event.title.as_deref(), Some("New"));
    assert_eq!(store.current_event(), Some(event));
    assert_eq!(store.events()[0].title.as_deref(), Some("Old"));
}

#[tokio::test]
async fn fetch_event_by_id_failure_prefers_server_message() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/events/404"))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({"error": "Not found"})))
        .mount(&server)
        .await;

    let store = store_for(&server);
    store.fetch_event_by_id(EventId::new(404)).await.unwrap_err();
    assert_eq!(store.last_error().as_deref(), Some("Not found"));
    assert!(store.current_event().is_none());
}

#[tokio::test]
async fn participate_updates_list_entry_and_current_event() {
    let server = MockServer::start().await;
    mount_list(
        &server,
        json!([{"id": 5, "status": "active", "is_participant": false}]),
    )
    .await;
    mount_event(
        &server,
        5,
        json!({"id": 5, "status": "active", "is_participant": false}),
    )
    .await;
    Mock::given(method("POST"))
        .and(path("/api/events/5/participate"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": 5, "status": "active", "is_participant": true
        })))
        .expect(1)
        .mount(&server)
        .await;

    let store = store_for(&server);
    store.fetch_events(&EventQuery::new()).await.unwrap();
    store.fetch_event_by_id(EventId::new(5)).await.unwrap();

    let updated = store.participate(EventId::new(5)).await.unwrap();

    assert!(updated.is_participant);
    assert!(store.events()[0].is_participant);
    assert!(store.current_event().unwrap().is_participant);
    assert_eq!(store.current_event().unwrap(), store.events()[0]);
    assert_eq!(store.my_events().len(), 1);
}

#[tokio::test]
async fn cancel_participation_updates_listed_event_without_current() {
    let server = MockServer::start().await;
    mount_list(
        &server,
        json!([
            {"id": 5, "status": "active", "is_participant": true},
            {"id": 6, "status": "active", "is_participant": true}
        ]),
    )
    .await;
    mount_event(&server, 6, json!({"id": 6, "status": "active", "is_participant": true})).await;
    Mock::given(method("POST"))
        .and(path("/api/events/5/cancel-participation"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": 5, "status": "active", "is_participant": false
        })))
        .mount(&server)
        .await;

    let store = store_for(&server);
    store.fetch_events(&EventQuery::new()).await.unwrap();
    store.fetch_event_by_id(EventId::new(6)).await.unwrap();

    store.cancel_participation(EventId::new(5)).await.unwrap();

    let events = store.events();
    assert!(!events[0].is_participant);
    assert!(events[1].is_participant);
    assert_eq!(store.current_event().unwrap().id, EventId::new(6));
    assert!(store.current_event().unwrap().is_participant);
}

#[tokio::test]
async fn participate_on_unlisted_event_updates_current_only() {
    let server = MockServer::start().await;
    mount_event(&server, 8, json!({"id": 8, "status": "active"})).await;
    Mock::given(method("POST"))
        .and(path("/api/events/8/participate"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": 8, "status": "active", "is_participant": true
        })))
        .mount(&server)
        .await;

    let store = store_for(&server);
    store.fetch_event_by_id(EventId::new(8)).await.unwrap();
    store.participate(EventId::new(8)).await.unwrap();

    assert!(store.events().is_empty());
    assert!(store.current_event().unwrap().is_participant);
}

#[tokio::test]
async fn participate_reconciles_on_requested_id() {
    let server = MockServer::start().await;
    mount_list(&server, json!([{"id": 5, "status": "active"}])).await;
    mount_event(&server, 5, json!({"id": 5, "status": "active"})).await;
    Mock::given(method("POST"))
        .and(path("/api/events/5/participate"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": 55, "status": "active", "is_participant": true
        })))
        .mount(&server)
        .await;

    let store = store_for(&server);
    store.fetch_events(&EventQuery::new()).await.unwrap();
    store.fetch_event_by_id(EventId::new(5)).await.unwrap();
    store.participate(EventId::new(5)).await.unwrap();

    let events = store.events();
    assert_eq!(events.len(), 1);
    assert_eq!(events[0].id, EventId::new(55));
    assert!(events[0].is_participant);
    assert_eq!(store.current_event(), Some(events[0].clone()));
}

#[tokio::test]
async fn mutation_failure_leaves_state_and_error_slot_untouched() {
    let server = MockServer::start().await;
    mount_list(
        &server,
        json!([{"id": 5, "status": "active", "is_participant": false}]),
    )
    .await;
    Mock::given(method("POST"))
        .and(path("/api/events/5/participate"))
        .respond_with(
            ResponseTemplate::new(400).set_body_json(json!({"error": "Мест нет"})),
        )
        .mount(&server)
        .await;

    let store = store_for(&server);
    store.fetch_events(&EventQuery::new()).await.unwrap();
    let before = store.snapshot();

    let err = store.participate(EventId::new(5)).await.unwrap_err();

    assert_eq!(err.server_message(), Some("Мест нет"));
    assert_eq!(store.snapshot(), before);
    assert_eq!(store.last_error(), None);
    assert!(!store.loading());
}

#[tokio::test]
async fn add_review_posts_draft_without_touching_state() {
    let server = MockServer::start().await;
    mount_list(&server, json!([{"id": 5, "status": "past"}])).await;
    Mock::given(method("POST"))
        .and(path("/api/events/5/review"))
        .and(body_json(json!({"rating": 4, "text": "Хорошо"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"status": "success"})))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/events/6/review"))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({"error": "duplicate"})))
        .mount(&server)
        .await;

    let store = store_for(&server);
    store.fetch_events(&EventQuery::new()).await.unwrap();
    let before = store.snapshot();

    let review = ReviewDraft::new(4, "Хорошо").unwrap();
    let body = store.add_review(EventId::new(5), &review).await.unwrap();
    assert_eq!(body["status"], "success");
    assert_eq!(store.snapshot(), before);

    let err = store.add_review(EventId::new(6), &review).await.unwrap_err();
    assert_eq!(err.server_message(), Some("duplicate"));
    assert_eq!(store.last_error(), None);
}
