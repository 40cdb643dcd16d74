//! # 画像の取得と遅延削除
//!
//! 保存期間を過ぎたファイルは取得要求のタイミングで削除し、見つからなかったものとして扱う。
//! バックグラウンドの掃除は行わないため、誰も取得しないファイルはそのまま残る。

use std::time::{Duration, SystemTime};

use pixdrop_core::{is_expired, sanitize_requested_name};

use crate::error::ServerError;
use crate::storage::{ImageStorage, StorageError};

/// 取得結果。見つからないことは異常ではない。
#[derive(Debug)]
pub enum Retrieval {
    /// 保存期間内のファイル
    Found {
        /// サニタイズ済みの保存名
        name: String,
        /// ファイル内容
        data: Vec<u8>,
    },
    /// 存在しない、または期限切れで削除した
    NotFound,
}

fn internal(e: StorageError) -> ServerError {
    ServerError::Internal(e.to_string())
}

/// 要求されたファイル名の画像を取得する。
pub async fn retrieve(
    storage: &dyn ImageStorage,
    requested: &str,
    retention: Duration,
) -> Result<Retrieval, ServerError> {
    // ディレクトリ成分は捨て、保存ディレクトリ直下のみを対象にする
    let Some(name) = sanitize_requested_name(requested) else {
        return Ok(Retrieval::NotFound);
    };

    let modified = match storage.modified_at(&name).await {
        Ok(Some(modified)) => modified,
        Ok(None) | Err(StorageError::InvalidName(_)) => return Ok(Retrieval::NotFound),
        Err(e) => return Err(internal(e)),
    };

    if is_expired(modified, SystemTime::now(), retention) {
        // 同時に別の要求が削除していても成功扱い
        storage.remove(&name).await.map_err(internal)?;
        tracing::info!(name = %name, "保存期間を過ぎた画像を削除しました");
        return Ok(Retrieval::NotFound);
    }

    match storage.load(&name).await.map_err(internal)? {
        Some(data) => Ok(Retrieval::Found { name, data }),
        None => Ok(Retrieval::NotFound),
    }
}
