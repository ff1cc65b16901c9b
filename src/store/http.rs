//! store::http
//!
//! Point store backed by a Firebase-Realtime-Database-style REST API.
//!
//! # Design
//!
//! Records live under a collection path, one JSON object per record id:
//!
//! | Operation | Request                                  | Body returned          |
//! |-----------|------------------------------------------|------------------------|
//! | list      | `GET    {base}/{collection}.json`        | object, array or `null`|
//! | get       | `GET    {base}/{collection}/{id}.json`   | fields or `null`       |
//! | create    | `POST   {base}/{collection}.json`        | `{"name": "<new id>"}` |
//! | update    | `GET` with ETag, then `PUT` + `if-match` | fields                 |
//! | delete    | `DELETE {base}/{collection}/{id}.json`   | `null`                 |
//!
//! When a token is configured it is sent as the `auth` query parameter.
//!
//! # Updates
//!
//! The database accepts writes to any path, so a plain write to a deleted
//! record would bring it back. An update first reads the record with
//! `X-Firebase-ETag: true`; a `null` body is `NotFound`. The write is then a
//! `PUT` conditioned on that ETag, and a `412` (the record changed or went
//! away in between) is also `NotFound`. Servers that send no ETag get an
//! unconditional `PATCH` after the existence check.
//!
//! # Listing
//!
//! The database returns an array instead of an object when record keys are
//! small sequential integers; array indices are used as keys and `null` holes
//! are dropped. An entry whose key is not a valid [`RecordId`] is skipped
//! with a warning. An entry whose body is not a `{name, coordinates}` object
//! is passed on with empty coordinates, so reconciliation reports it as
//! skipped. Coordinate text is not validated here.

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, ETAG, IF_MATCH, USER_AGENT};
use reqwest::{Client, RequestBuilder, Response, StatusCode, Url};
use serde::Deserialize;
use serde_json::Value;
use tracing::{debug, warn};

use super::traits::{PointListing, PointStore, StoreError};
use crate::core::types::{PointFields, RecordId};

/// Default collection path.
pub const DEFAULT_COLLECTION: &str = "points";

/// User-Agent header value for API requests.
const USER_AGENT_VALUE: &str = "pointmap";

/// Request header asking the database to return the record's ETag.
const ETAG_REQUEST_HEADER: &str = "X-Firebase-ETag";

/// HTTP point store.
pub struct HttpStore {
    client: Client,
    base: Url,
    collection: Vec<String>,
    auth_token: Option<String>,
}

// Custom Debug to avoid exposing auth_token
impl std::fmt::Debug for HttpStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpStore")
            .field("base", &self.base.as_str())
            .field("collection", &self.collection.join("/"))
            .field("has_auth_token", &self.auth_token.is_some())
            .finish()
    }
}

/// Body of a successful `POST`.
#[derive(Debug, Deserialize)]
struct CreateResponse {
    name: String,
}

/// Error body returned by the database.
#[derive(Debug, Deserialize)]
struct ErrorResponse {
    error: String,
}

impl HttpStore {
    /// Create a store rooted at `base_url` with the given collection path.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::InvalidResponse` if `base_url` is not an absolute
    /// http(s) URL or the collection path is empty.
    pub fn new(
        base_url: &str,
        collection: &str,
        auth_token: Option<String>,
    ) -> Result<Self, StoreError> {
        let base = Url::parse(base_url)
            .map_err(|e| StoreError::InvalidResponse(format!("invalid store url: {}", e)))?;
        if base.cannot_be_a_base() || !matches!(base.scheme(), "http" | "https") {
            return Err(StoreError::InvalidResponse(format!(
                "store url must be http(s): {}",
                base_url
            )));
        }

        let collection: Vec<String> = collection
            .split('/')
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .collect();
        if collection.is_empty() {
            return Err(StoreError::InvalidResponse(
                "collection path cannot be empty".into(),
            ));
        }

        Ok(Self {
            client: Client::new(),
            base,
            collection,
            auth_token: auth_token.filter(|t| !t.is_empty()),
        })
    }

    /// URL of the whole collection.
    fn collection_url(&self) -> Url {
        let mut segments = self.collection.clone();
        if let Some(last) = segments.last_mut() {
            last.push_str(".json");
        }
        self.url_for(&segments)
    }

    /// URL of a single record.
    fn record_url(&self, id: &RecordId) -> Url {
        let mut segments = self.collection.clone();
        segments.push(format!("{}.json", id));
        self.url_for(&segments)
    }

    fn url_for(&self, segments: &[String]) -> Url {
        let mut url = self.base.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty();
            for segment in segments {
                path.push(segment);
            }
        }
        if let Some(token) = &self.auth_token {
            url.query_pairs_mut().append_pair("auth", token);
        }
        url
    }

    fn headers() -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        headers.insert(USER_AGENT, HeaderValue::from_static(USER_AGENT_VALUE));
        headers
    }

    /// Send a request, mapping transport failures and error statuses.
    async fn send(&self, request: RequestBuilder) -> Result<Response, StoreError> {
        let response = request
            .headers(Self::headers())
            .send()
            .await
            .map_err(|e| StoreError::NetworkError(e.to_string()))?;

        let status = response.status();
        if status.is_success() {
            Ok(response)
        } else {
            Err(Self::error_from_response(response, status).await)
        }
    }

    /// Parse a JSON body from a successful response.
    async fn json<T: for<'de> Deserialize<'de>>(response: Response) -> Result<T, StoreError> {
        response
            .json()
            .await
            .map_err(|e| StoreError::InvalidResponse(format!("failed to parse response: {}", e)))
    }

    async fn error_from_response(response: Response, status: StatusCode) -> StoreError {
        let message = match response.json::<ErrorResponse>().await {
            Ok(body) => body.error,
            Err(_) => status
                .canonical_reason()
                .unwrap_or("Unknown error")
                .to_string(),
        };

        match status {
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => StoreError::AuthFailed(message),
            StatusCode::NOT_FOUND => StoreError::NotFound(message),
            StatusCode::TOO_MANY_REQUESTS => StoreError::RateLimited,
            _ if status.is_server_error() => StoreError::ApiError {
                status: status.as_u16(),
                message: format!("server error: {}", message),
            },
            _ => StoreError::ApiError {
                status: status.as_u16(),
                message,
            },
        }
    }
}

/// Convert a raw listing body into typed entries.
fn parse_listing(raw: Value) -> Result<PointListing, StoreError> {
    let entries: Vec<(String, Value)> = match raw {
        Value::Null => Vec::new(),
        Value::Object(map) => map.into_iter().collect(),
        Value::Array(items) => items
            .into_iter()
            .enumerate()
            .filter(|(_, value)| !value.is_null())
            .map(|(index, value)| (index.to_string(), value))
            .collect(),
        other => {
            return Err(StoreError::InvalidResponse(format!(
                "expected an object of points, got {}",
                other
            )))
        }
    };

    let mut listing = PointListing::new();
    for (key, value) in entries {
        let id = match RecordId::new(key.as_str()) {
            Ok(id) => id,
            Err(e) => {
                warn!(key = %key, error = %e, "skipping listing entry with invalid key");
                continue;
            }
        };
        let fields = match serde_json::from_value::<PointFields>(value.clone()) {
            Ok(fields) => fields,
            Err(e) => {
                warn!(id = %id, error = %e, "listing entry has unexpected shape");
                let name = value.get("name").and_then(Value::as_str).unwrap_or_default();
                PointFields::new(name, "")
            }
        };
        listing.insert(id, fields);
    }
    Ok(listing)
}

#[async_trait]
impl PointStore for HttpStore {
    fn name(&self) -> &'static str {
        "http"
    }

    async fn list(&self) -> Result<PointListing, StoreError> {
        let url = self.collection_url();
        debug!(collection = %self.collection.join("/"), "listing points");

        let response = self.send(self.client.get(url)).await?;
        let raw: Value = Self::json(response).await?;

        parse_listing(raw)
    }

    async fn get(&self, id: &RecordId) -> Result<PointFields, StoreError> {
        debug!(id = %id, "fetching point");

        let response = self.send(self.client.get(self.record_url(id))).await?;
        let fields: Option<PointFields> = Self::json(response).await?;

        fields.ok_or_else(|| StoreError::NotFound(format!("point {}", id)))
    }

    async fn create(&self, fields: PointFields) -> Result<RecordId, StoreError> {
        debug!(name = %fields.name, "creating point");

        let response = self
            .send(self.client.post(self.collection_url()).json(&fields))
            .await?;
        let created: CreateResponse = Self::json(response).await?;

        RecordId::new(created.name).map_err(|e| StoreError::InvalidResponse(e.to_string()))
    }

    async fn update(&self, id: &RecordId, fields: PointFields) -> Result<(), StoreError> {
        debug!(id = %id, "updating point");
        let url = self.record_url(id);

        let response = self
            .send(self.client.get(url.clone()).header(ETAG_REQUEST_HEADER, "true"))
            .await?;
        let etag = response.headers().get(ETAG).cloned();
        let current: Value = Self::json(response).await?;
        if current.is_null() {
            return Err(StoreError::NotFound(format!("point {}", id)));
        }

        let request = match etag {
            Some(etag) => self.client.put(url).header(IF_MATCH, etag),
            None => {
                debug!(id = %id, "no etag returned; updating without precondition");
                self.client.patch(url)
            }
        };
        match self.send(request.json(&fields)).await {
            Ok(_) => Ok(()),
            Err(StoreError::ApiError { status: 412, .. }) => {
                Err(StoreError::NotFound(format!("point {} changed or was removed", id)))
            }
            Err(e) => Err(e),
        }
    }

    async fn delete(&self, id: &RecordId) -> Result<(), StoreError> {
        debug!(id = %id, "deleting point");

        self.send(self.client.delete(self.record_url(id))).await?;
        Ok(())
    }
}
