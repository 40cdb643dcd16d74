//! # GET /image/{name}
//!
//! 保存済み画像の配信。保存期間を過ぎていれば削除して「見つからない」を返す。

use std::sync::Arc;

use axum::extract::rejection::PathRejection;
use axum::extract::{Path, State};
use axum::http::header;
use axum::response::{IntoResponse, Response};
use axum::Json;
use pixdrop_types::{content_type_for, NotFoundResponse};

use crate::config::ServerState;
use crate::error::ServerError;
use crate::retrieval::{retrieve, Retrieval};

/// GET /image/{name} — 画像の取得。
///
/// 存在しない場合もステータスは200で、本体が `{"Not": "Found"}` になる。
/// UTF-8として読めない名前も同じ扱い。
pub async fn handle_get_image(
    State(state): State<Arc<ServerState>>,
    name: Result<Path<String>, PathRejection>,
) -> Result<Response, ServerError> {
    let Path(name) = match name {
        Ok(name) => name,
        Err(rejection) => {
            tracing::debug!("画像名を解釈できません: {}", rejection.body_text());
            return Ok(Json(NotFoundResponse::default()).into_response());
        }
    };

    let retrieval = retrieve(state.storage.as_ref(), &name, state.config.retention).await?;

    Ok(match retrieval {
        Retrieval::Found { name, data } => {
            ([(header::CONTENT_TYPE, content_type_for(&name))], data).into_response()
        }
        Retrieval::NotFound => Json(NotFoundResponse::default()).into_response(),
    })
}
