//! # PUT /<secret>/image.jpeg, PUT /<secret>/image.gif
//!
//! 固定パスへのアップロード。成功時は `text/uri-list` で公開URIを1行だけ返す。

use std::sync::Arc;

use axum::body::Bytes;
use axum::extract::State;
use axum::http::{header, HeaderMap, Uri};
use axum::response::{IntoResponse, Response};
use pixdrop_types::{ImageKind, MIME_URI_LIST};

use crate::config::ServerState;
use crate::error::ServerError;
use crate::ingest::{ingest, UploadRequest};

/// PUT /<secret>/image.jpeg
pub async fn handle_upload_jpeg(
    State(state): State<Arc<ServerState>>,
    headers: HeaderMap,
    uri: Uri,
    body: Bytes,
) -> Result<Response, ServerError> {
    handle_upload(&state, ImageKind::Jpeg, &headers, &uri, body).await
}

/// PUT /<secret>/image.gif
pub async fn handle_upload_gif(
    State(state): State<Arc<ServerState>>,
    headers: HeaderMap,
    uri: Uri,
    body: Bytes,
) -> Result<Response, ServerError> {
    handle_upload(&state, ImageKind::Gif, &headers, &uri, body).await
}

async fn handle_upload(
    state: &ServerState,
    variant: ImageKind,
    headers: &HeaderMap,
    uri: &Uri,
    body: Bytes,
) -> Result<Response, ServerError> {
    let content_type = headers
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok());

    // HTTP/2ではHostヘッダの代わりにリクエストターゲットのauthorityが使われる
    let host = headers
        .get(header::HOST)
        .and_then(|v| v.to_str().ok())
        .or_else(|| uri.authority().map(|a| a.as_str()));

    let public_uri = ingest(
        state,
        UploadRequest {
            content_type,
            variant,
            host,
            body,
        },
    )
    .await?;

    Ok(([(header::CONTENT_TYPE, MIME_URI_LIST)], public_uri.to_string()).into_response())
}
