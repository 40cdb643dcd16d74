//! # サーバーエラー型
//!
//! アップロード系のエラーはすべてクライアントエラー（4xx）として返す。
//! 詳細はログにのみ出し、レスポンス本体には固定の文言だけを載せる。

use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use pixdrop_core::CoreError;
use pixdrop_types::ErrorResponse;

/// サーバーエラー型。
#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    /// 宣言されたContent-Typeが `image/jpeg` / `image/gif` 以外
    #[error("未対応のContent-Type: {0:?}")]
    UnsupportedMediaType(String),
    /// リクエストボディが空
    #[error("画像データがありません")]
    EmptyPayload,
    /// マジックバイトがJPEG/GIFに一致しない
    #[error("画像ファイルとして判定できません")]
    InvalidImage,
    /// 判定は通ったがデコード・再エンコードに失敗
    #[error("画像の処理に失敗: {0}")]
    DecodeFailure(String),
    /// 正規化済み画像の保存に失敗
    #[error("画像の保存に失敗: {0}")]
    StorageWriteFailure(String),
    /// 不正なリクエスト（Hostヘッダ不備など）
    #[error("不正なリクエスト: {0}")]
    BadRequest(String),
    /// 上記以外の予期しない失敗
    #[error("内部エラー: {0}")]
    Internal(String),
}

impl From<CoreError> for ServerError {
    fn from(e: CoreError) -> Self {
        match e {
            CoreError::UnknownFormat | CoreError::NotAnimated => ServerError::InvalidImage,
            CoreError::Decode(msg) | CoreError::Encode(msg) => ServerError::DecodeFailure(msg),
        }
    }
}

impl IntoResponse for ServerError {
    fn into_response(self) -> axum::response::Response {
        match &self {
            ServerError::Internal(_) | ServerError::StorageWriteFailure(_) => {
                tracing::error!("{}", self)
            }
            _ => tracing::info!("リクエストを拒否: {}", self),
        }

        match self {
            ServerError::UnsupportedMediaType(_) => {
                (StatusCode::UNSUPPORTED_MEDIA_TYPE, "Unsupported media type").into_response()
            }
            ServerError::EmptyPayload => {
                (StatusCode::BAD_REQUEST, "No image data received").into_response()
            }
            ServerError::InvalidImage => {
                (StatusCode::BAD_REQUEST, Json(ErrorResponse::invalid_image())).into_response()
            }
            ServerError::DecodeFailure(_) | ServerError::StorageWriteFailure(_) => {
                (StatusCode::BAD_REQUEST, "Failed to process the image").into_response()
            }
            ServerError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg).into_response(),
            ServerError::Internal(_) => {
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal server error").into_response()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes() {
        let cases = [
            (ServerError::UnsupportedMediaType("text/plain".into()), StatusCode::UNSUPPORTED_MEDIA_TYPE),
            (ServerError::EmptyPayload, StatusCode::BAD_REQUEST),
            (ServerError::InvalidImage, StatusCode::BAD_REQUEST),
            (ServerError::DecodeFailure("x".into()), StatusCode::BAD_REQUEST),
            (ServerError::StorageWriteFailure("x".into()), StatusCode::BAD_REQUEST),
            (ServerError::BadRequest("x".into()), StatusCode::BAD_REQUEST),
            (ServerError::Internal("x".into()), StatusCode::INTERNAL_SERVER_ERROR),
        ];
        for (error, status) in cases {
            assert_eq!(error.into_response().status(), status);
        }
    }

    #[test]
    fn test_core_error_mapping() {
        assert!(matches!(ServerError::from(CoreError::UnknownFormat), ServerError::InvalidImage));
        assert!(matches!(ServerError::from(CoreError::NotAnimated), ServerError::InvalidImage));
        assert!(matches!(
            ServerError::from(CoreError::Decode("bad".into())),
            ServerError::DecodeFailure(_)
        ));
        assert!(matches!(
            ServerError::from(CoreError::Encode("bad".into())),
            ServerError::DecodeFailure(_)
        ));
    }
}
