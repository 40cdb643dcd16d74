//! # 公開URIの構築
//!
//! リクエストのHostから `<scheme>://<host>/image/<name>` を組み立てる。
//! TLSを上流で終端する構成では、リクエスト自体がHTTPでも `https` を返す。

use url::Url;

use crate::error::ServerError;

/// 取得エンドポイントのパス接頭辞
pub const IMAGE_PATH_PREFIX: &str = "image/";

/// Hostヘッダの値から公開URIのベース（`<scheme>://<host>/`）を作る。
pub fn public_base_url(host: &str, force_https: bool) -> Result<Url, ServerError> {
    let host = host.trim();
    if host.is_empty()
        || host
            .chars()
            .any(|c| matches!(c, '/' | '\\' | '?' | '#' | '@') || c.is_whitespace())
    {
        return Err(ServerError::BadRequest(format!("不正なHost: {host:?}")));
    }

    let mut base = Url::parse(&format!("http://{host}/"))
        .map_err(|e| ServerError::BadRequest(format!("不正なHost {host:?}: {e}")))?;

    if force_https {
        base.set_scheme("https")
            .map_err(|()| ServerError::Internal("スキームの書き換えに失敗".to_string()))?;
    }

    Ok(base)
}

/// 保存名に対応する公開URI。
pub fn image_uri(base: &Url, name: &str) -> Result<Url, ServerError> {
    base.join(&format!("{IMAGE_PATH_PREFIX}{name}"))
        .map_err(|e| ServerError::Internal(format!("URIの構築に失敗: {e}")))
}
