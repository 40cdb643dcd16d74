//! # アップロード処理
//!
//! 1. 宣言されたContent-Typeを検査する（バイト列を見る前に行う）
//! 2. 空ボディを拒否する
//! 3. 判定・デコード・正規化をブロッキングスレッドで実行する
//! 4. 公開URIのホストを解決する
//! 5. 正規化済みの画像があれば保存する
//! 6. 公開URIを返す

use axum::body::Bytes;
use pixdrop_core::prepare_upload;
use pixdrop_types::ImageKind;
use url::Url;

use crate::config::ServerState;
use crate::error::ServerError;
use crate::uri::{image_uri, public_base_url};

/// アップロード要求。
pub struct UploadRequest<'a> {
    /// `Content-Type` ヘッダの値
    pub content_type: Option<&'a str>,
    /// 呼ばれたエンドポイントの種別（ログ用。デコード経路はマジックバイトで決まる）
    pub variant: ImageKind,
    /// 公開URIに使うホスト
    pub host: Option<&'a str>,
    /// リクエストボディ
    pub body: Bytes,
}

/// アップロードを処理し、公開URIを返す。
pub async fn ingest(state: &ServerState, request: UploadRequest<'_>) -> Result<Url, ServerError> {
    let declared = request
        .content_type
        .and_then(ImageKind::from_mime_type)
        .ok_or_else(|| {
            ServerError::UnsupportedMediaType(request.content_type.unwrap_or_default().to_string())
        })?;

    if request.body.is_empty() {
        return Err(ServerError::EmptyPayload);
    }

    let policy = state.config.static_gif_policy;
    let body = request.body;
    let prepared = tokio::task::spawn_blocking(move || prepare_upload(&body, policy))
        .await
        .map_err(|e| ServerError::Internal(format!("spawn_blockingエラー: {e}")))??;

    // 画像の判定が済んでから、書き込み前に解決する
    let host = request
        .host
        .ok_or_else(|| ServerError::BadRequest("Hostがありません".to_string()))?;
    let base = public_base_url(host, state.config.force_https)?;

    match prepared.payload {
        Some(data) => {
            state
                .storage
                .store(&prepared.name, &data)
                .await
                .map_err(|e| ServerError::StorageWriteFailure(e.to_string()))?;
            tracing::info!(
                name = %prepared.name,
                kind = %prepared.kind,
                declared = %declared,
                endpoint = %request.variant,
                bytes = data.len(),
                "画像を保存しました"
            );
        }
        None => {
            tracing::warn!(
                name = %prepared.name,
                endpoint = %request.variant,
                "静止GIFのため保存せずにURIのみ返します"
            );
        }
    }

    image_uri(&base, &prepared.name)
}
