//! # GET / とフォールバック

use axum::Json;
use pixdrop_types::{IndexResponse, NotFoundResponse};

/// GET / — 生存確認。
pub async fn handle_index() -> Json<IndexResponse> {
    Json(IndexResponse::default())
}

/// 未定義のパスへの応答。
///
/// 404ではなく200で返す。
pub async fn handle_not_found() -> Json<NotFoundResponse> {
    Json(NotFoundResponse::default())
}
