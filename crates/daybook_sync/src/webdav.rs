//! WebDAV-style implementation of [`RemoteFileStore`] over reqwest.
//!
//! Speaks the minimal subset the sync engine needs: GET, PUT, HEAD (for
//! existence and `Last-Modified`), MKCOL, and a `Depth: 1` PROPFIND for
//! shallow listings. Authentication is HTTP Basic.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::{Method, StatusCode};

use crate::error::RemoteError;
use crate::remote::RemoteFileStore;

/// Client for one WebDAV endpoint.
pub struct WebdavStore {
    base_url: String,
    username: String,
    password: String,
    client: reqwest::Client,
}

impl WebdavStore {
    /// Create a client for a base URL with basic-auth credentials.
    pub fn new(
        base_url: impl Into<String>,
        username: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            username: username.into(),
            password: password.into(),
            client: reqwest::Client::new(),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    fn request(&self, method: Method, path: &str) -> reqwest::RequestBuilder {
        self.client
            .request(method, self.url(path))
            .basic_auth(&self.username, Some(&self.password))
    }

    fn method(name: &str) -> Result<Method, RemoteError> {
        Method::from_bytes(name.as_bytes())
            .map_err(|e| RemoteError::Network(format!("invalid method {}: {}", name, e)))
    }
}

/// Map a non-success status onto the remote error taxonomy.
fn status_error(status: StatusCode) -> RemoteError {
    match status {
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => RemoteError::Unauthorized,
        StatusCode::TOO_MANY_REQUESTS => RemoteError::RateLimited,
        other => RemoteError::Status {
            status: other.as_u16(),
        },
    }
}

#[async_trait]
impl RemoteFileStore for WebdavStore {
    async fn get(&self, path: &str) -> Result<Option<String>, RemoteError> {
        let resp = self.request(Method::GET, path).send().await?;
        match resp.status() {
            StatusCode::NOT_FOUND => Ok(None),
            status if status.is_success() => Ok(Some(resp.text().await?)),
            status => Err(status_error(status)),
        }
    }

    async fn put(&self, path: &str, content: &str) -> Result<(), RemoteError> {
        let resp = self
            .request(Method::PUT, path)
            .header("Content-Type", "text/markdown; charset=utf-8")
            .body(content.to_string())
            .send()
            .await?;
        let status = resp.status();
        // 200, 201, and 204 are all in the success range.
        if status.is_success() {
            Ok(())
        } else {
            Err(status_error(status))
        }
    }

    async fn exists(&self, path: &str) -> Result<bool, RemoteError> {
        let resp = self.request(Method::HEAD, path).send().await?;
        match resp.status() {
            StatusCode::NOT_FOUND => Ok(false),
            status if status.is_success() => Ok(true),
            status => Err(status_error(status)),
        }
    }

    async fn last_modified(&self, path: &str) -> Result<Option<DateTime<Utc>>, RemoteError> {
        let resp = self.request(Method::HEAD, path).send().await?;
        match resp.status() {
            StatusCode::NOT_FOUND => Ok(None),
            status if status.is_success() => Ok(resp
                .headers()
                .get(reqwest::header::LAST_MODIFIED)
                .and_then(|v| v.to_str().ok())
                .and_then(parse_http_date)),
            status => Err(status_error(status)),
        }
    }

    async fn list_dir(&self, path: &str) -> Result<Vec<String>, RemoteError> {
        let resp = self
            .request(Self::method("PROPFIND")?, path)
            .header("Depth", "1")
            .send()
            .await?;
        let status = resp.status();
        // 207 Multi-Status is the expected reply.
        if !status.is_success() {
            return Err(status_error(status));
        }
        Ok(extract_hrefs(&resp.text().await?))
    }

    async fn make_dir(&self, path: &str) -> Result<(), RemoteError> {
        let resp = self.request(Self::method("MKCOL")?, path).send().await?;
        match resp.status() {
            // 405 means the collection already exists; that counts as
            // success.
            StatusCode::METHOD_NOT_ALLOWED => Ok(()),
            status if status.is_success() => Ok(()),
            status => Err(status_error(status)),
        }
    }
}

/// Parse an HTTP `Last-Modified` value (RFC 7231 fixdate, which chrono's
/// RFC 2822 parser accepts).
fn parse_http_date(value: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc2822(value)
        .ok()
        .map(|dt| dt.with_timezone(&Utc))
}

/// Pull the `href` elements out of a PROPFIND multi-status body.
///
/// Deliberately lenient: servers vary in namespace prefixes (`D:href`,
/// `d:href`, bare `href`), and the engine only needs the paths.
fn extract_hrefs(body: &str) -> Vec<String> {
    let mut hrefs = Vec::new();
    for segment in body.split('<') {
        let Some((tag, rest)) = segment.split_once('>') else {
            continue;
        };
        let tag = tag.trim();
        if tag.starts_with('/') {
            continue;
        }
        let is_href = tag.eq_ignore_ascii_case("href")
            || tag
                .rsplit_once(':')
                .is_some_and(|(_, local)| local.eq_ignore_ascii_case("href"));
        let text = rest.trim();
        if is_href && !text.is_empty() {
            hrefs.push(text.to_string());
        }
    }
    hrefs
}
