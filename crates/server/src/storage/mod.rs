//! # 画像ストレージ
//!
//! 保存済み画像の置き場所を抽象化するインターフェース。
//! 名前はすべてフラットなベース名で扱い、ディレクトリ階層は持たない。
//! ローカルディレクトリ実装は `local` サブモジュールを参照。

pub mod local;

pub use local::LocalStorage;

use std::time::SystemTime;

/// ストレージ操作のエラー型。
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    /// ベース名として不正な名前（区切り文字や隠しファイル名を含む）
    #[error("不正な保存名: {0:?}")]
    InvalidName(String),
    /// 下位のI/Oエラー
    #[error("ストレージI/Oに失敗 ({name}): {source}")]
    Io {
        /// 対象の保存名
        name: String,
        #[source]
        source: std::io::Error,
    },
}

/// 画像ストレージの抽象インターフェース。
///
/// 実装は同じ名前への同時アクセスに対して安全でなければならない。
/// 特に `remove` の二重実行はエラーにしない。
#[async_trait::async_trait]
pub trait ImageStorage: Send + Sync {
    /// 画像を保存する。読み手が書きかけの内容を見ることはない。
    async fn store(&self, name: &str, data: &[u8]) -> Result<(), StorageError>;

    /// 最終更新時刻を返す。存在しなければ `None`。
    async fn modified_at(&self, name: &str) -> Result<Option<SystemTime>, StorageError>;

    /// 内容を読み出す。存在しなければ `None`。
    async fn load(&self, name: &str) -> Result<Option<Vec<u8>>, StorageError>;

    /// 削除する。既に存在しない場合も成功とする。
    async fn remove(&self, name: &str) -> Result<(), StorageError>;
}
