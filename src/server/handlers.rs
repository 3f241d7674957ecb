//! Route handlers and error mapping.

use std::sync::Arc;

use axum::Json;
use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Response};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::{debug, warn};

use crate::core::{LeaderboardStats, PageRequest, PageResult, ResultSet, Source};
use crate::error::LbError;
use crate::server::{SharedState, render};
use crate::snapshot::SnapshotKey;

/// JSON error body `{error, code}` with a status derived from the error.
#[derive(Debug)]
pub struct ApiError(pub LbError);

impl ApiError {
    #[must_use]
    pub const fn status(&self) -> StatusCode {
        match &self.0 {
            LbError::InvalidRequest(_)
            | LbError::InvalidResultSet(_)
            | LbError::Serialization(_) => StatusCode::BAD_REQUEST,
            LbError::UnknownSource(_) => StatusCode::NOT_FOUND,
            LbError::StaleSnapshot(_) => StatusCode::GONE,
            LbError::Fetch { .. } => StatusCode::BAD_GATEWAY,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<LbError> for ApiError {
    fn from(err: LbError) -> Self {
        Self(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            warn!(target: "server", code = self.0.code(), error = %self.0, "request failed");
        }
        let payload = json!({ "error": self.0.to_string(), "code": self.0.code() });
        (status, Json(payload)).into_response()
    }
}

type ApiResult<T> = std::result::Result<T, ApiError>;

#[derive(Debug, Serialize)]
pub struct SnapshotResponse {
    pub token: String,
    pub source: Source,
    pub fetched_at: DateTime<Utc>,
    pub stats: LeaderboardStats,
}

/// Body of `POST /api/{source}/page`.
#[derive(Debug, Deserialize)]
pub struct PageBody {
    pub page_size: usize,
    pub page_number: usize,
    #[serde(default)]
    pub offset: Option<usize>,
    #[serde(default)]
    pub search_term: Option<String>,
    #[serde(default)]
    pub token: Option<String>,
    #[serde(default)]
    pub result_set: Option<ResultSet>,
}

/// Query string of `GET /{source}/page`.
#[derive(Debug, Deserialize)]
pub struct PageQuery {
    #[serde(default)]
    pub page_size: Option<usize>,
    #[serde(default)]
    pub page_number: Option<usize>,
    #[serde(default)]
    pub offset: Option<usize>,
    #[serde(default)]
    pub search: Option<String>,
    #[serde(default)]
    pub token: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct PageResponse {
    /// Absent when the page was computed from an inline result set.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,
    #[serde(flatten)]
    pub page: PageResult,
}

pub async fn health() -> impl IntoResponse {
    Json(json!({ "status": "ok", "service": "leaderboard" }))
}

/// `GET /api/{source}/snapshot`
pub async fn snapshot(
    State(state): State<SharedState>,
    Path(source): Path<String>,
) -> ApiResult<Json<SnapshotResponse>> {
    let source: Source = source.parse()?;
    let (key, result_set) = fetch_fresh(&state, source).await?;
    Ok(Json(SnapshotResponse {
        token: key.token(),
        source,
        fetched_at: result_set.fetched_at,
        stats: result_set.stats(),
    }))
}

/// `POST /api/{source}/page`
pub async fn page_json(
    State(state): State<SharedState>,
    Path(source): Path<String>,
    body: std::result::Result<Json<PageBody>, JsonRejection>,
) -> ApiResult<Json<PageResponse>> {
    let source: Source = source.parse()?;
    let Json(body) = body.map_err(|err| LbError::InvalidRequest(err.body_text()))?;

    let request = PageRequest {
        page_size: body.page_size,
        page_number: body.page_number,
        offset: body.offset,
        search_term: body.search_term,
    };
    let (key, result_set) =
        resolve_snapshot(&state, source, body.token.as_deref(), body.result_set).await?;
    let page = state.paginator.compute(&result_set, &request)?;

    Ok(Json(PageResponse {
        token: key.map(|key| key.token()),
        page,
    }))
}

/// `GET /{source}/page`
pub async fn page_html(
    State(state): State<SharedState>,
    Path(source): Path<String>,
    query: std::result::Result<Query<PageQuery>, QueryRejection>,
) -> ApiResult<Html<String>> {
    let source: Source = source.parse()?;
    let Query(query) = query.map_err(|err| LbError::InvalidRequest(err.body_text()))?;

    let request = PageRequest {
        page_size: query.page_size.unwrap_or(state.default_page_size),
        page_number: query.page_number.unwrap_or(1),
        offset: query.offset,
        search_term: None,
    }
    .with_search(query.search);
    let (key, result_set) = resolve_snapshot(&state, source, query.token.as_deref(), None).await?;
    let page = state.paginator.compute(&result_set, &request)?;
    let token = key.map(|key| key.token());

    Ok(Html(render::page_fragment(&page, token.as_deref(), &state.layout)?))
}

/// Pick the result set a page request runs against.
///
/// An inline result set wins, then an explicit token, then the newest cached
/// snapshot, and finally a fresh fetch.
async fn resolve_snapshot(
    state: &SharedState,
    source: Source,
    token: Option<&str>,
    inline: Option<ResultSet>,
) -> Result<(Option<SnapshotKey>, Arc<ResultSet>), LbError> {
    if let Some(result_set) = inline {
        if result_set.source != source {
            return Err(LbError::InvalidRequest(format!(
                "result set is for {} but the request targets {source}",
                result_set.source
            )));
        }
        result_set.validate()?;
        return Ok((None, Arc::new(result_set)));
    }

    if let Some(token) = token {
        let key: SnapshotKey = token.parse()?;
        if key.source != source {
            return Err(LbError::InvalidRequest(format!(
                "snapshot {token} belongs to {}",
                key.source
            )));
        }
        return state
            .cache
            .get(&key)
            .map(|result_set| (Some(key), result_set))
            .ok_or_else(|| LbError::StaleSnapshot(token.to_string()));
    }

    if let Some((key, result_set)) = state.cache.latest(source) {
        debug!(target: "server", %source, token = %key, "reusing cached snapshot");
        return Ok((Some(key), result_set));
    }

    let (key, result_set) = fetch_fresh(state, source).await?;
    Ok((Some(key), result_set))
}

/// Fetch on the blocking pool and cache the result.
async fn fetch_fresh(
    state: &SharedState,
    source: Source,
) -> Result<(SnapshotKey, Arc<ResultSet>), LbError> {
    let fetcher = Arc::clone(&state.fetcher);
    let result_set = tokio::task::spawn_blocking(move || fetcher.fetch(source))
        .await
        .map_err(|err| LbError::Fetch {
            tab: source,
            message: err.to_string(),
        })??;
    Ok(state.cache.insert(result_set))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_mapping() {
        let cases = [
            (LbError::InvalidRequest("x".into()), StatusCode::BAD_REQUEST),
            (LbError::InvalidResultSet("x".into()), StatusCode::BAD_REQUEST),
            (LbError::UnknownSource("x".into()), StatusCode::NOT_FOUND),
            (LbError::StaleSnapshot("x".into()), StatusCode::GONE),
            (
                LbError::Fetch {
                    tab: Source::Snark,
                    message: "down".into(),
                },
                StatusCode::BAD_GATEWAY,
            ),
            (LbError::Config("x".into()), StatusCode::INTERNAL_SERVER_ERROR),
        ];
        for (err, status) in cases {
            assert_eq!(ApiError::from(err).status(), status);
        }
    }

    #[test]
    fn page_body_accepts_minimal_json() {
        let body: PageBody = serde_json::from_str(r#"{"page_size":10,"page_number":1}"#).unwrap();
        assert!(body.token.is_none());
        assert!(body.result_set.is_none());
    }
}
