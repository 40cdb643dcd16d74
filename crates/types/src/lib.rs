//! # pixdrop 共有型定義
//!
//! サーバーとコアの両方で扱う値型、およびHTTPレスポンスのJSON本体を提供する。
//!
//! ## 対応フォーマット
//! | 種別 | 拡張子 | MIMEタイプ |
//! |------|--------|-----------|
//! | JPEG | `.jpeg` | `image/jpeg` |
//! | GIF  | `.gif`  | `image/gif`  |

use serde::{Deserialize, Serialize};

/// アップロード成功時のレスポンスMIMEタイプ。
/// 本体はURIを1行だけ含む。
pub const MIME_URI_LIST: &str = "text/uri-list";

/// 拡張子から種別を判定できないファイルに使うMIMEタイプ。
pub const MIME_OCTET_STREAM: &str = "application/octet-stream";

// ---------------------------------------------------------------------------
// 画像種別
// ---------------------------------------------------------------------------

/// 受け付ける画像フォーマット。
///
/// アップロードエンドポイントの種別（`image.jpeg` / `image.gif`）と、
/// マジックバイト判定の結果の両方をこの型で表す。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ImageKind {
    /// JPEG（EXIF回転補正の対象）
    Jpeg,
    /// GIF（アニメーションのみ再エンコードして保存）
    Gif,
}

impl ImageKind {
    /// 保存ファイル名に付与する拡張子（ドット付き）。
    pub fn extension(self) -> &'static str {
        match self {
            ImageKind::Jpeg => ".jpeg",
            ImageKind::Gif => ".gif",
        }
    }

    /// 対応するMIMEタイプ。
    pub fn mime_type(self) -> &'static str {
        match self {
            ImageKind::Jpeg => "image/jpeg",
            ImageKind::Gif => "image/gif",
        }
    }

    /// 宣言されたContent-Typeから種別を得る。
    ///
    /// 完全一致のみ受け付ける（前後の空白は無視）。
    /// `image/jpeg; charset=...` のようなパラメータ付きの値は拒否される。
    pub fn from_mime_type(value: &str) -> Option<Self> {
        match value.trim() {
            "image/jpeg" => Some(ImageKind::Jpeg),
            "image/gif" => Some(ImageKind::Gif),
            _ => None,
        }
    }

    /// 保存済みファイル名の拡張子から種別を得る。
    pub fn from_file_name(name: &str) -> Option<Self> {
        let (_, ext) = name.rsplit_once('.')?;
        if ext.eq_ignore_ascii_case("jpeg") || ext.eq_ignore_ascii_case("jpg") {
            Some(ImageKind::Jpeg)
        } else if ext.eq_ignore_ascii_case("gif") {
            Some(ImageKind::Gif)
        } else {
            None
        }
    }
}

impl std::fmt::Display for ImageKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ImageKind::Jpeg => f.write_str("jpeg"),
            ImageKind::Gif => f.write_str("gif"),
        }
    }
}

/// ファイル名から配信時のContent-Typeを決める。
pub fn content_type_for(name: &str) -> &'static str {
    ImageKind::from_file_name(name)
        .map(ImageKind::mime_type)
        .unwrap_or(MIME_OCTET_STREAM)
}

// ---------------------------------------------------------------------------
// レスポンス本体
// ---------------------------------------------------------------------------

/// `GET /` の生存確認レスポンス。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndexResponse {
    #[serde(rename = "UWU")]
    pub uwu: String,
}

impl Default for IndexResponse {
    fn default() -> Self {
        Self {
            uwu: "OwO".to_string(),
        }
    }
}

/// 存在しないリソースへのレスポンス。
///
/// ステータスは200で返す。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotFoundResponse {
    #[serde(rename = "Not")]
    pub not: String,
}

impl Default for NotFoundResponse {
    fn default() -> Self {
        Self {
            not: "Found".to_string(),
        }
    }
}

/// 画像として判定できなかったアップロードへのエラーレスポンス。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}

impl ErrorResponse {
    /// 不正な画像ファイル用のエラー本体。
    pub fn invalid_image() -> Self {
        Self {
            error: "Invalid image file.".to_string(),
        }
    }
}
