use async_trait::async_trait;
use reqwest::{
    header::{HeaderMap, HeaderName, HeaderValue},
    Method,
};
use tracing::debug;
use url::Url;

use crate::{fetch::Fetch, options::RequestOptions};

/// [`Fetch`] over a `reqwest::Client`.
///
/// Relative addresses are joined onto `base_url`, the way a browser resolves
/// them against the page origin. Status codes are never inspected.
#[derive(Debug, Clone)]
pub struct ReqwestFetcher {
    client: reqwest::Client,
    base_url: Option<Url>,
}

impl ReqwestFetcher {
    pub fn new(base_url: Option<Url>) -> anyhow::Result<Self> {
        Ok(Self::with_client(reqwest::Client::builder().build()?, base_url))
    }

    pub fn with_client(client: reqwest::Client, base_url: Option<Url>) -> Self {
        Self { client, base_url }
    }

    pub fn base_url(&self) -> Option<&Url> {
        self.base_url.as_ref()
    }

    pub fn resolve(&self, url: &str) -> anyhow::Result<Url> {
        match Url::parse(url) {
            Ok(url) => Ok(url),
            Err(url::ParseError::RelativeUrlWithoutBase) => match &self.base_url {
                Some(base) => Ok(base.join(url)?),
                None => Err(anyhow::anyhow!("relative url without base url: {}", url)),
            },
            Err(e) => Err(e.into()),
        }
    }
}

// standard methods are upper-cased, anything else goes out verbatim
fn normalize_method(method: Option<&str>) -> anyhow::Result<Method> {
    let Some(method) = method else {
        return Ok(Method::GET);
    };

    const FORBIDDEN: [&str; 3] = ["CONNECT", "TRACE", "TRACK"];
    if FORBIDDEN.iter().any(|m| m.eq_ignore_ascii_case(method)) {
        return Err(anyhow::anyhow!("forbidden request method: {}", method));
    }

    const STANDARD: [&str; 6] = ["DELETE", "GET", "HEAD", "OPTIONS", "POST", "PUT"];
    match STANDARD.iter().find(|m| m.eq_ignore_ascii_case(method)) {
        Some(m) => Ok(Method::from_bytes(m.as_bytes())?),
        None => Ok(Method::from_bytes(method.as_bytes())?),
    }
}

#[async_trait]
impl Fetch for ReqwestFetcher {
    type Response = reqwest::Response;

    async fn fetch(&self, url: &str, options: RequestOptions) -> anyhow::Result<reqwest::Response> {
        let url = self.resolve(url)?;
        let method = normalize_method(options.method.as_deref())?;

        // every entry goes out, names differing only by case included
        let mut headers = HeaderMap::new();
        for (name, value) in options.headers.unwrap_or_default() {
            headers.append(
                HeaderName::from_bytes(name.as_bytes())?,
                HeaderValue::from_str(&value)?,
            );
        }

        if !options.extra.is_empty() {
            debug!(
                "request options not handled by reqwest: {:?}",
                options.extra.keys().collect::<Vec<_>>()
            );
        }

        debug!("{} {}", method, url);
        let mut req = self.client.request(method, url).headers(headers);
        if let Some(body) = options.body {
            req = req.body(body);
        }

        Ok(req.send().await?)
    }
}

#[cfg(test)]
mod tests {
    use std::net::SocketAddr;

    use axum::{
        http::{HeaderMap as AxumHeaderMap, Method as AxumMethod, StatusCode, Uri},
        routing::get,
        Json, Router,
    };
    use serde_json::{json, Value};

    use super::*;
    use crate::{
        constants::ACCESS_TOKEN_KEY,
        fetch::AuthFetch,
        storage::{MemoryStorage, TokenStorage},
    };

    async fn echo(method: AxumMethod, uri: Uri, headers: AxumHeaderMap, body: String) -> Json<Value> {
        let header = |name: &str| {
            headers
                .get_all(name)
                .iter()
                .filter_map(|v| v.to_str().ok())
                .map(|v| v.to_string())
                .collect::<Vec<_>>()
        };

        Json(json!({
            "method": method.as_str(),
            "path": uri.path(),
            "authorization": header("authorization"),
            "content_type": header("content-type"),
            "request_id": header("x-request-id"),
            "body": body,
        }))
    }

    async fn spawn_server() -> SocketAddr {
        let app = Router::new()
            .route("/broken", get(|| async { (StatusCode::INTERNAL_SERVER_ERROR, "boom") }))
            .fallback(echo);

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        addr
    }

    fn client_for(addr: SocketAddr, storage: MemoryStorage) -> AuthFetch<MemoryStorage, ReqwestFetcher> {
        let base = Url::parse(&format!("http://{}", addr)).unwrap();
        AuthFetch::new(storage, ReqwestFetcher::new(Some(base)).unwrap())
    }

    #[test]
    fn test_resolve() {
        let fetcher = ReqwestFetcher::new(Some(Url::parse("http://127.0.0.1:8000").unwrap())).unwrap();
        assert_eq!(
            fetcher.resolve("/api/data").unwrap().as_str(),
            "http://127.0.0.1:8000/api/data"
        );
        assert_eq!(
            fetcher.resolve("https://example.com/a").unwrap().as_str(),
            "https://example.com/a"
        );

        let fetcher = ReqwestFetcher::new(None).unwrap();
        assert!(fetcher.resolve("/api/data").is_err());
    }

    #[test]
    fn test_normalize_method() {
        assert_eq!(normalize_method(None).unwrap(), Method::GET);
        assert_eq!(normalize_method(Some("post")).unwrap(), Method::POST);
        assert_eq!(normalize_method(Some("Delete")).unwrap(), Method::DELETE);
        assert_eq!(normalize_method(Some("PATCH")).unwrap(), Method::PATCH);
        // not in the upper-cased set, kept as given
        assert_eq!(normalize_method(Some("patch")).unwrap().as_str(), "patch");
        assert!(normalize_method(Some("BAD METHOD")).is_err());
    }

    #[test]
    fn test_forbidden_methods_rejected() {
        for method in ["CONNECT", "trace", "Track"] {
            let err = normalize_method(Some(method)).unwrap_err();
            assert_eq!(err.to_string(), format!("forbidden request method: {}", method));
        }
    }

    #[tokio::test]
    async fn test_forbidden_method_never_sent() {
        let addr = spawn_server().await;
        let client = client_for(addr, MemoryStorage::new());

        let options = RequestOptions::default().with_method("TRACE");
        assert!(client.fetch("/api/data", Some(options)).await.is_err());
    }

    #[tokio::test]
    async fn test_injected_headers_on_the_wire() {
        let addr = spawn_server().await;
        let storage = MemoryStorage::new();
        storage.set_item(ACCESS_TOKEN_KEY, "abc123").unwrap();
        let client = client_for(addr, storage);

        let resp = client.fetch("/api/data", None).await.unwrap();
        assert!(resp.status().is_success());
        let echoed: Value = resp.json().await.unwrap();

        assert_eq!(echoed["method"], "GET");
        assert_eq!(echoed["path"], "/api/data");
        assert_eq!(echoed["authorization"], json!(["Bearer abc123"]));
        assert_eq!(echoed["content_type"], json!(["application/json"]));
    }

    #[tokio::test]
    async fn test_missing_token_on_the_wire() {
        let addr = spawn_server().await;
        let client = client_for(addr, MemoryStorage::new());

        let echoed: Value = client
            .fetch("/api/data", None)
            .await
            .unwrap()
            .json()
            .await
            .unwrap();

        assert_eq!(echoed["authorization"], json!(["Bearer null"]));
    }

    #[tokio::test]
    async fn test_method_body_and_caller_headers() {
        let addr = spawn_server().await;
        let client = client_for(addr, [(ACCESS_TOKEN_KEY, "abc123")].into_iter().collect());
        let options = RequestOptions::default()
            .with_method("post")
            .with_header("authorization", "Basic dXNlcjpwYXNz")
            .with_header("X-Request-Id", "42")
            .with_body(r#"{"title":"write tests"}"#);

        let echoed: Value = client
            .fetch("/projects/1/tasks", Some(options))
            .await
            .unwrap()
            .json()
            .await
            .unwrap();

        assert_eq!(echoed["method"], "POST");
        assert_eq!(echoed["path"], "/projects/1/tasks");
        assert_eq!(echoed["request_id"], json!(["42"]));
        // both entries reach the server, caller value first
        assert_eq!(
            echoed["authorization"],
            json!(["Basic dXNlcjpwYXNz", "Bearer abc123"])
        );
        assert_eq!(echoed["body"], r#"{"title":"write tests"}"#);
    }

    #[tokio::test]
    async fn test_case_variant_caller_headers_all_sent() {
        let addr = spawn_server().await;
        let client = client_for(addr, [(ACCESS_TOKEN_KEY, "abc123")].into_iter().collect());
        let options = RequestOptions::default()
            .with_header("x-request-id", "caller-1")
            .with_header("X-Request-Id", "caller-2")
            .with_header("authorization", "Basic xyz");

        let composed = client.compose(Some(options.clone())).unwrap();
        assert_eq!(composed.headers.as_ref().map(|h| h.len()), Some(5));

        let echoed: Value = client
            .fetch("/api/data", Some(options))
            .await
            .unwrap()
            .json()
            .await
            .unwrap();

        assert_eq!(echoed["request_id"], json!(["caller-1", "caller-2"]));
        assert_eq!(echoed["authorization"], json!(["Basic xyz", "Bearer abc123"]));
        assert_eq!(echoed["content_type"], json!(["application/json"]));
    }

    #[tokio::test]
    async fn test_error_status_passes_through() {
        let addr = spawn_server().await;
        let client = client_for(addr, MemoryStorage::new());

        let resp = client.fetch("/broken", None).await.unwrap();

        assert_eq!(resp.status(), reqwest::StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(resp.text().await.unwrap(), "boom");
    }

    #[tokio::test]
    async fn test_network_error_propagates() {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let client = client_for(addr, MemoryStorage::new());
        let err = client.fetch("/api/data", None).await.unwrap_err();

        assert!(err.downcast_ref::<reqwest::Error>().is_some());
    }
}
