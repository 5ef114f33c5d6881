use std::fmt;

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Response, Url};
use serde::de::DeserializeOwned;
use tracing::debug;

use crate::application::service::{PostService, ServiceError};
use crate::config::ApiSettings;
use crate::domain::posts::{Post, PostDraft, PostId};

/// [`PostService`] speaking JSON over HTTP to a REST collection.
#[derive(Clone, Debug)]
pub struct HttpPostService {
    client: Client,
    collection: Url,
}

impl HttpPostService {
    /// `collection` is appended to the path of `base`, e.g. `posts` or
    /// `api/v1/posts`.
    pub fn new(base: &Url, collection: &str) -> Result<Self, ServiceError> {
        let mut url = base.clone();
        url.set_query(None);
        url.set_fragment(None);
        url.path_segments_mut()
            .map_err(|()| ServiceError::InvalidUrl(format!("`{base}` cannot be a base URL")))?
            .pop_if_empty()
            .extend(collection.split('/').filter(|segment| !segment.is_empty()));

        let client = Client::builder()
            .user_agent(Self::user_agent())
            .build()
            .map_err(ServiceError::network)?;
        Ok(Self {
            client,
            collection: url,
        })
    }

    pub fn from_settings(api: &ApiSettings) -> Result<Self, ServiceError> {
        Self::new(&api.base_url, &api.collection)
    }

    pub fn user_agent() -> &'static str {
        concat!("postsync/", env!("CARGO_PKG_VERSION"))
    }

    pub fn collection_url(&self) -> &Url {
        &self.collection
    }

    pub fn resource_url(&self, id: &PostId) -> Result<Url, ServiceError> {
        let mut url = self.collection.clone();
        url.path_segments_mut()
            .map_err(|()| {
                ServiceError::InvalidUrl(format!("`{}` cannot be a base URL", self.collection))
            })?
            .push(&id.to_string());
        Ok(url)
    }

    async fn send(&self, req: RequestBuilder) -> Result<Response, ServiceError> {
        let request = req.build().map_err(ServiceError::network)?;
        let method = request.method().clone();
        let resp = self
            .client
            .execute(request)
            .await
            .map_err(ServiceError::network)?;
        let status = resp.status();
        debug!(%method, url = %resp.url(), status = status.as_u16(), "posts request completed");
        if !status.is_success() {
            let body = error_body(resp.text().await);
            return Err(ServiceError::http(status.as_u16(), body));
        }
        Ok(resp)
    }

    async fn send_json<T: DeserializeOwned>(&self, req: RequestBuilder) -> Result<T, ServiceError> {
        let resp = self.send(req).await?;
        let bytes = resp.bytes().await.map_err(ServiceError::network)?;
        serde_json::from_slice(&bytes).map_err(ServiceError::decode)
    }
}

/// Body text of a failed response, or why it could not be read.
fn error_body<E: fmt::Display>(read: Result<String, E>) -> String {
    match read {
        Ok(text) => text,
        Err(err) => format!("<response body unreadable: {err}>"),
    }
}

#[async_trait]
impl PostService for HttpPostService {
    async fn list_posts(&self) -> Result<Vec<Post>, ServiceError> {
        let req = self.client.get(self.collection.clone());
        self.send_json(req).await
    }

    async fn create_post(&self, draft: &PostDraft) -> Result<Post, ServiceError> {
        let req = self.client.post(self.collection.clone()).json(draft);
        self.send_json(req).await
    }

    async fn update_post(&self, post: &Post) -> Result<Post, ServiceError> {
        let req = self.client.put(self.resource_url(&post.id)?).json(post);
        self.send_json(req).await
    }

    async fn delete_post(&self, id: &PostId) -> Result<PostId, ServiceError> {
        let req = self.client.delete(self.resource_url(id)?);
        self.send(req).await?;
        Ok(id.clone())
    }
}

#[cfg(test)]
mod tests {
    use httpmock::MockServer;
    use serde_json::json;

    use super::*;

    fn service(server: &MockServer) -> HttpPostService {
        let base = Url::parse(&server.base_url()).expect("base url");
        HttpPostService::new(&base, "posts").expect("service")
    }

    #[test]
    fn collection_path_is_appended_to_base() {
        let base = Url::parse("https://example.com/api/").expect("url");
        let service = HttpPostService::new(&base, "v1/posts").expect("service");

        assert_eq!(
            service.collection_url().as_str(),
            "https://example.com/api/v1/posts"
        );
        assert_eq!(
            service
                .resource_url(&PostId::Int(5))
                .expect("resource")
                .as_str(),
            "https://example.com/api/v1/posts/5"
        );
    }

    #[test]
    fn text_ids_are_percent_encoded() {
        let base = Url::parse("https://example.com").expect("url");
        let service = HttpPostService::new(&base, "posts").expect("service");

        let url = service
            .resource_url(&PostId::Text("a b/c".into()))
            .expect("resource");
        assert_eq!(url.as_str(), "https://example.com/posts/a%20b%2Fc");
    }

    #[test]
    fn non_base_url_is_rejected() {
        let base = Url::parse("mailto:someone@example.com").expect("url");
        let err = HttpPostService::new(&base, "posts").expect_err("cannot be a base");
        assert!(matches!(err, ServiceError::InvalidUrl(_)));
    }

    #[tokio::test]
    async fn list_posts_decodes_array() -> Result<(), ServiceError> {
        let server = MockServer::start();
        let mock = server.mock(|when, then| {
            when.method("GET").path("/posts");
            then.status(200)
                .header("content-type", "application/json")
                .body(concat!(
                    r#"[{"userId":1,"id":1,"title":"A","body":"b"},"#,
                    r#"{"id":"x","title":"B","body":"c"}]"#
                ));
        });

        let posts = service(&server).list_posts().await?;

        mock.assert();
        assert_eq!(posts.len(), 2);
        assert_eq!(posts[0].id, PostId::Int(1));
        assert_eq!(posts[1].id, PostId::Text("x".into()));
        Ok(())
    }

    #[tokio::test]
    async fn create_posts_json_draft() -> Result<(), ServiceError> {
        let server = MockServer::start();
        let mock = server.mock(|when, then| {
            when.method("POST")
                .path("/posts")
                .header("content-type", "application/json")
                .json_body(json!({"title": "Hello", "body": "World"}));
            then.status(201)
                .header("content-type", "application/json")
                .body(r#"{"id":101,"title":"Hello","body":"World"}"#);
        });

        let post = service(&server)
            .create_post(&PostDraft::new("Hello", "World"))
            .await?;

        mock.assert();
        assert_eq!(post, Post::new(101, "Hello", "World"));
        Ok(())
    }

    #[tokio::test]
    async fn update_puts_full_record() -> Result<(), ServiceError> {
        let server = MockServer::start();
        let mock = server.mock(|when, then| {
            when.method("PUT")
                .path("/posts/1")
                .header("content-type", "application/json")
                .json_body(json!({"id": 1, "title": "T2", "body": "B2"}));
            then.status(200)
                .header("content-type", "application/json")
                .body(r#"{"id":1,"title":"T2","body":"B2"}"#);
        });

        let post = service(&server)
            .update_post(&Post::new(1, "T2", "B2"))
            .await?;

        mock.assert();
        assert_eq!(post.title, "T2");
        Ok(())
    }

    #[tokio::test]
    async fn delete_accepts_empty_no_content() -> Result<(), ServiceError> {
        let server = MockServer::start();
        let mock = server.mock(|when, then| {
            when.method("DELETE").path("/posts/abc");
            then.status(204);
        });

        let id = service(&server)
            .delete_post(&PostId::Text("abc".into()))
            .await?;

        mock.assert();
        assert_eq!(id, PostId::Text("abc".into()));
        Ok(())
    }

    #[tokio::test]
    async fn non_success_status_is_http_error() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method("DELETE").path("/posts/3");
            then.status(404).body("missing");
        });

        let err = service(&server)
            .delete_post(&PostId::Int(3))
            .await
            .expect_err("404 should fail");

        match err {
            ServiceError::Http { status, body } => {
                assert_eq!(status, 404);
                assert_eq!(body, "missing");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn unreadable_error_body_keeps_the_read_error() {
        assert_eq!(error_body::<String>(Ok("missing".into())), "missing");
        assert_eq!(
            error_body(Err("connection reset")),
            "<response body unreadable: connection reset>"
        );
    }

    #[tokio::test]
    async fn malformed_body_is_decode_error() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method("GET").path("/posts");
            then.status(200).body("<html>not json</html>");
        });

        let err = service(&server)
            .list_posts()
            .await
            .expect_err("html should not decode");
        assert!(matches!(err, ServiceError::Decode(_)));
    }

    #[tokio::test]
    async fn unreachable_server_is_network_error() {
        let base = Url::parse("http://127.0.0.1:1").expect("url");
        let service = HttpPostService::new(&base, "posts").expect("service");

        let err = service.list_posts().await.expect_err("nothing listens on port 1");
        assert!(matches!(err, ServiceError::Network(_)));
    }
}
