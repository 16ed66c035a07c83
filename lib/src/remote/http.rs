use super::{BookmarkDto, BookmarkRequest, RemoteError, RemoteResult, RemoteService};
use crate::config::Config;
use crate::error::{Result, SecondBrainError};
use crate::models::{BookmarkId, CollectionId};
use log::debug;
use reqwest::blocking::{Client, RequestBuilder, Response};
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION};
use reqwest::Url;
use serde::de::DeserializeOwned;
use serde_json::json;

/// `RemoteService` over the JSON REST API
pub struct HttpRemote {
    client: Client,
    base_url: Url,
}

impl HttpRemote {
    pub fn new(config: &Config) -> Result<Self> {
        let base_url = parse_base_url(&config.api_base_url)?;

        let mut headers = HeaderMap::new();
        if let Some(token) = config.api_token.as_deref().filter(|t| !t.trim().is_empty()) {
            let mut value = HeaderValue::from_str(&format!("Bearer {}", token.trim()))
                .map_err(|e| SecondBrainError::Config(format!("api_token: {}", e)))?;
            value.set_sensitive(true);
            headers.insert(AUTHORIZATION, value);
        }

        let client = Client::builder()
            .user_agent(config.user_agent.as_str())
            .timeout(config.request_timeout())
            .default_headers(headers)
            .build()
            .map_err(RemoteError::from)?;

        Ok(Self { client, base_url })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    fn endpoint(&self, path: &str) -> RemoteResult<Url> {
        self.base_url
            .join(path)
            .map_err(|e| RemoteError::Decode(format!("bad endpoint '{}': {}", path, e)))
    }

    fn send(&self, request: RequestBuilder) -> RemoteResult<Response> {
        let resp = request.send()?;
        check_status(resp)
    }

    fn send_json<T: DeserializeOwned>(&self, request: RequestBuilder) -> RemoteResult<T> {
        let resp = self.send(request)?;
        let body = resp.text()?;
        serde_json::from_str(&body).map_err(|e| RemoteError::Decode(e.to_string()))
    }
}

impl RemoteService for HttpRemote {
    fn list(&self, collection_id: CollectionId) -> RemoteResult<Vec<BookmarkDto>> {
        let url = self.endpoint(&format!("collections/{}/bookmarks", collection_id))?;
        debug!("GET {}", url);
        self.send_json(self.client.get(url))
    }

    fn create(&self, request: &BookmarkRequest) -> RemoteResult<BookmarkDto> {
        let url = self.endpoint("bookmarks")?;
        debug!("POST {}", url);
        self.send_json(self.client.post(url).json(request))
    }

    fn update(&self, id: BookmarkId, request: &BookmarkRequest) -> RemoteResult<BookmarkDto> {
        let url = self.endpoint(&format!("bookmarks/{}", id))?;
        debug!("PUT {}", url);
        self.send_json(self.client.put(url).json(request))
    }

    fn delete(&self, id: BookmarkId) -> RemoteResult<()> {
        let url = self.endpoint(&format!("bookmarks/{}", id))?;
        debug!("DELETE {}", url);
        self.send(self.client.delete(url)).map(|_| ())
    }

    fn update_favorite(&self, id: BookmarkId, value: bool) -> RemoteResult<()> {
        let url = self.endpoint(&format!("bookmarks/{}/favorite", id))?;
        debug!("PATCH {} is_favorite={}", url, value);
        self.send(self.client.patch(url).json(&json!({ "is_favorite": value })))
            .map(|_| ())
    }

    fn update_archive(&self, id: BookmarkId, value: bool) -> RemoteResult<()> {
        let url = self.endpoint(&format!("bookmarks/{}/archive", id))?;
        debug!("PATCH {} is_archived={}", url, value);
        self.send(self.client.patch(url).json(&json!({ "is_archived": value })))
            .map(|_| ())
    }
}

/// Relative joins drop the last path segment unless the base ends in `/`
fn parse_base_url(raw: &str) -> Result<Url> {
    let mut raw = raw.trim().to_string();
    if !raw.ends_with('/') {
        raw.push('/');
    }
    Url::parse(&raw).map_err(|e| SecondBrainError::Config(format!("api_base_url '{}': {}", raw, e)))
}

fn check_status(resp: Response) -> RemoteResult<Response> {
    let status = resp.status();
    if status.is_success() {
        return Ok(resp);
    }

    let message = match status.as_u16() {
        401 => "HTTP 401 Unauthorized - check api_token in ~/.config/secondbrain/config.yml",
        403 => "HTTP 403 Forbidden - the token does not grant access to this resource",
        404 => "HTTP 404 Not Found - the bookmark or collection does not exist on the server",
        409 => "HTTP 409 Conflict - the server rejected the change",
        429 => "HTTP 429 Too Many Requests - You are being rate limited",
        500..=599 => "HTTP 5xx Server Error - The server is experiencing issues",
        _ => "HTTP request failed with non-success status",
    };
    Err(RemoteError::Status {
        status: status.as_u16(),
        message: message.to_string(),
    })
}
