//! # ルーター構築

use std::sync::Arc;

use axum::extract::DefaultBodyLimit;
use axum::routing::{get, put};
use axum::Router;
use pixdrop_types::ImageKind;
use tower_http::trace::TraceLayer;

use crate::config::ServerState;
use crate::endpoints::{
    handle_get_image, handle_index, handle_not_found, handle_upload_gif, handle_upload_jpeg,
};

/// 全エンドポイントを登録したルーターを構築する。
///
/// アップロードのパスは設定の秘密パスから決まる。
/// ボディ上限を超えるリクエストは処理前に413で拒否される。
pub fn build_router(state: Arc<ServerState>) -> Router {
    let jpeg_route = state.config.upload_route(ImageKind::Jpeg);
    let gif_route = state.config.upload_route(ImageKind::Gif);
    let body_limit = state.config.max_upload_bytes;

    Router::new()
        .route("/", get(handle_index))
        .route(&jpeg_route, put(handle_upload_jpeg))
        .route(&gif_route, put(handle_upload_gif))
        .route("/image/{name}", get(handle_get_image))
        .fallback(handle_not_found)
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
