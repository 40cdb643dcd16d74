//! # ローカルディレクトリストレージ
//!
//! 1つのディレクトリに `<uuid>.<jpeg|gif>` をフラットに並べる。

use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

use super::{ImageStorage, StorageError};

/// 書き込み途中のファイルに付ける接尾辞
const PARTIAL_SUFFIX: &str = ".partial";

/// ローカルディレクトリによる画像ストレージ実装。
pub struct LocalStorage {
    root: PathBuf,
}

impl LocalStorage {
    /// 保存先ディレクトリを開く。存在しなければ作成する。
    pub async fn open(root: impl Into<PathBuf>) -> Result<Self, StorageError> {
        let root = root.into();
        tokio::fs::create_dir_all(&root)
            .await
            .map_err(|source| StorageError::Io {
                name: root.display().to_string(),
                source,
            })?;
        Ok(Self { root })
    }

    /// 保存先ディレクトリ
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// 保存名からパスを求める。ベース名以外は受け付けない。
    fn path_for(&self, name: &str) -> Result<PathBuf, StorageError> {
        // `.` で始まる名前は書き込み途中の一時ファイル用
        if name.is_empty()
            || name.starts_with('.')
            || name.contains(['/', '\\', '\0'])
        {
            return Err(StorageError::InvalidName(name.to_string()));
        }
        Ok(self.root.join(name))
    }

    fn io_error(name: &str, source: std::io::Error) -> StorageError {
        StorageError::Io {
            name: name.to_string(),
            source,
        }
    }
}

#[async_trait::async_trait]
impl ImageStorage for LocalStorage {
    /// 一時ファイルに書き込んでからリネームする。
    async fn store(&self, name: &str, data: &[u8]) -> Result<(), StorageError> {
        let path = self.path_for(name)?;
        let partial = self.root.join(format!(".{name}{PARTIAL_SUFFIX}"));

        if let Err(e) = tokio::fs::write(&partial, data).await {
            let _ = tokio::fs::remove_file(&partial).await;
            return Err(Self::io_error(name, e));
        }
        if let Err(e) = tokio::fs::rename(&partial, &path).await {
            let _ = tokio::fs::remove_file(&partial).await;
            return Err(Self::io_error(name, e));
        }
        Ok(())
    }

    async fn modified_at(&self, name: &str) -> Result<Option<SystemTime>, StorageError> {
        let path = self.path_for(name)?;
        match tokio::fs::metadata(&path).await {
            Ok(meta) if meta.is_file() => meta
                .modified()
                .map(Some)
                .map_err(|e| Self::io_error(name, e)),
            Ok(_) => Ok(None),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(Self::io_error(name, e)),
        }
    }

    async fn load(&self, name: &str) -> Result<Option<Vec<u8>>, StorageError> {
        let path = self.path_for(name)?;
        match tokio::fs::read(&path).await {
            Ok(data) => Ok(Some(data)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(Self::io_error(name, e)),
        }
    }

    async fn remove(&self, name: &str) -> Result<(), StorageError> {
        let path = self.path_for(name)?;
        match tokio::fs::remove_file(&path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(Self::io_error(name, e)),
        }
    }
}
