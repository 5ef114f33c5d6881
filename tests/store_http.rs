use std::sync::Arc;

use httpmock::MockServer;
use serde_json::json;
use url::Url;

use postsync::application::store::{FetchOutcome, PostStore, StoreError};
use postsync::domain::posts::{FETCH_FAILED_MESSAGE, MutationKind, Post, PostDraft, PostId};
use postsync::infra::http::HttpPostService;
use postsync::presentation::terminal::TerminalView;

fn store(server: &MockServer) -> PostStore {
    let base = Url::parse(&server.base_url()).expect("base url");
    let service = HttpPostService::new(&base, "posts").expect("service");
    PostStore::new(Arc::new(service))
}

#[tokio::test]
async fn startup_load_then_crud_round() -> Result<(), StoreError> {
    let server = MockServer::start();
    let list = server.mock(|when, then| {
        when.method("GET").path("/posts");
        then.status(200)
            .header("content-type", "application/json")
            .body(concat!(
                r#"[{"userId":1,"id":1,"title":"A","body":"b"},"#,
                r#"{"userId":1,"id":2,"title":"B","body":"c"}]"#
            ));
    });
    let create = server.mock(|when, then| {
        when.method("POST")
            .path("/posts")
            .json_body(json!({"title": "New", "body": "post"}));
        then.status(201)
            .header("content-type", "application/json")
            .body(r#"{"id":101,"title":"New","body":"post"}"#);
    });
    let update = server.mock(|when, then| {
        when.method("PUT")
            .path("/posts/2")
            .json_body(json!({"userId": 1, "id": 2, "title": "B2", "body": "c2"}));
        then.status(200)
            .header("content-type", "application/json")
            .body(r#"{"userId":1,"id":2,"title":"B2","body":"c2"}"#);
    });
    let delete = server.mock(|when, then| {
        when.method("DELETE").path("/posts/1");
        then.status(200).body("{}");
    });

    let store = store(&server);
    let (view, _subscription) = TerminalView::attach(&store);

    assert_eq!(store.fetch_all().await, FetchOutcome::Applied { count: 2 });
    assert_eq!(view.renders(), 2);

    store.add(PostDraft::new("New", "post")).await?;

    let mut edited = store
        .read(|state| state.find(&PostId::Int(2)).cloned())
        .expect("post 2 loaded");
    edited.title = "B2".into();
    edited.body = "c2".into();
    store.update(edited).await?;

    store.delete(PostId::Int(1)).await?;

    list.assert();
    create.assert();
    update.assert();
    delete.assert();

    let state = store.state();
    let ids: Vec<_> = state.posts.iter().map(|post| post.id.clone()).collect();
    assert_eq!(ids, vec![PostId::Int(101), PostId::Int(2)]);
    assert_eq!(state.posts[1].title, "B2");
    assert!(!state.loading);
    assert!(state.error.is_none());
    assert_eq!(view.renders(), 5);
    assert_eq!(view.frame(), "[101] New\n    post\n\n[2] B2\n    c2\n");
    Ok(())
}

#[tokio::test]
async fn failed_load_shows_fixed_message() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method("GET").path("/posts");
        then.status(503).body("maintenance");
    });

    let store = store(&server);
    let (view, _subscription) = TerminalView::attach(&store);

    assert_eq!(store.fetch_all().await, FetchOutcome::Failed);

    let state = store.state();
    assert!(!state.loading);
    assert_eq!(state.error.as_deref(), Some(FETCH_FAILED_MESSAGE));
    assert!(state.posts.is_empty());
    assert_eq!(view.frame(), "Failed to fetch posts.\n");
}

#[tokio::test]
async fn failed_create_keeps_list_and_reports() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method("GET").path("/posts");
        then.status(200)
            .header("content-type", "application/json")
            .body(r#"[{"id":1,"title":"A","body":"b"}]"#);
    });
    server.mock(|when, then| {
        when.method("POST").path("/posts");
        then.status(500).body("boom");
    });

    let store = store(&server);
    store.fetch_all().await;

    let err = store
        .add(PostDraft::new("x", "y"))
        .await
        .expect_err("create should fail");

    assert_eq!(err.command(), MutationKind::Add);
    let state = store.state();
    assert_eq!(state.posts, vec![Post::new(1, "A", "b")]);
    assert!(state.error.is_none());
    let failure = state.mutation_error.expect("failure recorded");
    assert_eq!(failure.command, MutationKind::Add);
    assert!(failure.message.contains("500"));
}
