use async_trait::async_trait;
use futures::future::{self, BoxFuture};
use tracing::debug;

use crate::{
    auth::bearer_value,
    constants::{ACCESS_TOKEN_KEY, AUTHORIZATION_HEADER, CONTENT_TYPE_HEADER, JSON_CONTENT_TYPE},
    options::{Headers, RequestOptions},
    storage::TokenStorage,
};

/// The platform's request primitive.
///
/// Implementations decide which [`RequestOptions`] fields they understand.
/// Whatever they return, success or failure, reaches the caller untouched.
#[async_trait]
pub trait Fetch: Send + Sync {
    type Response: Send;

    async fn fetch(&self, url: &str, options: RequestOptions) -> anyhow::Result<Self::Response>;
}

/// Returns `options` with its headers replaced by the caller's headers plus
/// `Authorization: Bearer <token>` and `Content-Type: application/json`.
///
/// The two injected entries are written last, so a caller header with the
/// exact same name is overwritten. `None` is the same as empty options.
pub fn compose_options<S>(storage: &S, options: Option<RequestOptions>) -> anyhow::Result<RequestOptions>
where
    S: TokenStorage + ?Sized,
{
    let mut options = options.unwrap_or_default();
    let token = storage.get_item(ACCESS_TOKEN_KEY)?;
    debug!("attach bearer token, present: {}", token.is_some());

    let mut headers = options.headers.take().unwrap_or_else(Headers::new);
    headers.insert(AUTHORIZATION_HEADER, bearer_value(token.as_deref()));
    headers.insert(CONTENT_TYPE_HEADER, JSON_CONTENT_TYPE);
    options.headers = Some(headers);

    Ok(options)
}

/// Reads the token, composes the headers and hands the request to `fetcher`.
///
/// The storage read happens before this returns; the network call runs when
/// the returned future is polled. A storage error comes back through the
/// future, same as a network error.
pub fn auth_fetch<'a, S, F>(
    storage: &S,
    fetcher: &'a F,
    url: &'a str,
    options: Option<RequestOptions>,
) -> BoxFuture<'a, anyhow::Result<F::Response>>
where
    S: TokenStorage + ?Sized,
    F: Fetch + ?Sized,
{
    match compose_options(storage, options) {
        Ok(options) => {
            debug!("auth fetch: {}", url);
            fetcher.fetch(url, options)
        }
        Err(e) => Box::pin(future::ready(Err(e))),
    }
}

/// Storage and fetcher bundled together so callers only pass the request.
pub struct AuthFetch<S, F> {
    storage: S,
    fetcher: F,
}

impl<S, F> AuthFetch<S, F>
where
    S: TokenStorage,
    F: Fetch,
{
    pub fn new(storage: S, fetcher: F) -> Self {
        Self { storage, fetcher }
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    pub fn fetcher(&self) -> &F {
        &self.fetcher
    }

    pub fn compose(&self, options: Option<RequestOptions>) -> anyhow::Result<RequestOptions> {
        compose_options(&self.storage, options)
    }

    pub fn fetch<'a>(
        &'a self,
        url: &'a str,
        options: Option<RequestOptions>,
    ) -> BoxFuture<'a, anyhow::Result<F::Response>> {
        auth_fetch(&self.storage, &self.fetcher, url, options)
    }
}
