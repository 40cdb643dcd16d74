//! # サーバー設定・共有状態
//!
//! 環境変数からの設定読み込みとサーバーの共有状態の定義。
//! 設定は起動時に一度だけ構築し、`Arc<ServerState>` として各ハンドラに渡す。

use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

use anyhow::{bail, Context};
use pixdrop_core::{retention_from_days, StaticGifPolicy};
use pixdrop_types::ImageKind;

use crate::storage::ImageStorage;

/// デフォルトの保存期間（日）
const DEFAULT_RETENTION_DAYS: u64 = 7;

/// デフォルトの保存ディレクトリ
const DEFAULT_UPLOAD_DIR: &str = "uploads";

/// デフォルトの待ち受けアドレス
const DEFAULT_BIND_ADDR: &str = "0.0.0.0:5000";

/// アップロードの最大サイズ（16 MiB）
pub const DEFAULT_MAX_UPLOAD_BYTES: usize = 16 * 1024 * 1024;

/// サーバー設定。
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// 待ち受けアドレス
    pub bind_addr: SocketAddr,
    /// アップロードURLに含める秘密のパス（前後の `/` は除去済み）
    pub secret_path: String,
    /// 保存期間。これを超えたファイルは次の取得時に削除される。
    pub retention: Duration,
    /// 画像の保存先ディレクトリ
    pub upload_dir: PathBuf,
    /// 返却するURIのスキームを `https` に固定するか（上流でTLS終端する構成用）
    pub force_https: bool,
    /// リクエストボディの上限（バイト）
    pub max_upload_bytes: usize,
    /// 静止GIFの扱い
    pub static_gif_policy: StaticGifPolicy,
}

impl ServerConfig {
    /// 環境変数から構築する。
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// 任意のキー検索関数から構築する。
    ///
    /// 未設定のキーはデフォルト値を使うが、値が不正な場合はエラーにする。
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> anyhow::Result<Self> {
        let secret_path = lookup("PIXDROP_SECRET_PATH")
            .context("PIXDROP_SECRET_PATHが設定されていません")?;
        let secret_path = normalize_secret_path(&secret_path)?;

        let retention_days = match lookup("PIXDROP_RETENTION_DAYS") {
            Some(v) => v
                .trim()
                .parse::<u64>()
                .with_context(|| format!("PIXDROP_RETENTION_DAYSが不正です: {v}"))?,
            None => DEFAULT_RETENTION_DAYS,
        };

        let upload_dir = lookup("PIXDROP_UPLOAD_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_UPLOAD_DIR));

        let bind_addr = lookup("PIXDROP_BIND_ADDR").unwrap_or_else(|| DEFAULT_BIND_ADDR.to_string());
        let bind_addr: SocketAddr = bind_addr
            .trim()
            .parse()
            .with_context(|| format!("PIXDROP_BIND_ADDRが不正です: {bind_addr}"))?;

        let force_https = match lookup("PIXDROP_FORCE_HTTPS") {
            Some(v) => parse_bool(&v)
                .with_context(|| format!("PIXDROP_FORCE_HTTPSが不正です: {v}"))?,
            None => true,
        };

        let max_upload_bytes = match lookup("PIXDROP_MAX_UPLOAD_BYTES") {
            Some(v) => v
                .trim()
                .parse::<usize>()
                .with_context(|| format!("PIXDROP_MAX_UPLOAD_BYTESが不正です: {v}"))?,
            None => DEFAULT_MAX_UPLOAD_BYTES,
        };

        let static_gif_policy = match lookup("PIXDROP_STATIC_GIF") {
            Some(v) => v.parse::<StaticGifPolicy>().map_err(anyhow::Error::msg)?,
            None => StaticGifPolicy::default(),
        };

        Ok(Self {
            bind_addr,
            secret_path,
            retention: retention_from_days(retention_days),
            upload_dir,
            force_https,
            max_upload_bytes,
            static_gif_policy,
        })
    }

    /// 指定種別のアップロードルート（例: `/<secret>/image.jpeg`）。
    pub fn upload_route(&self, kind: ImageKind) -> String {
        format!("/{}/image{}", self.secret_path, kind.extension())
    }
}

/// 秘密パスの前後の `/` を除去し、ルート定義として使える値か検証する。
fn normalize_secret_path(raw: &str) -> anyhow::Result<String> {
    let trimmed = raw.trim().trim_matches('/');
    if trimmed.is_empty() {
        bail!("PIXDROP_SECRET_PATHが空です");
    }
    // ルーターのパラメータ・ワイルドカード構文や、URLとして意味を持つ文字は使えない
    if let Some(c) = trimmed
        .chars()
        .find(|c| matches!(c, '{' | '}' | '*' | ':' | '?' | '#' | '%') || c.is_whitespace())
    {
        bail!("PIXDROP_SECRET_PATHに使用できない文字が含まれています: {c:?}");
    }
    if trimmed.split('/').any(|segment| segment.is_empty() || segment == "." || segment == "..") {
        bail!("PIXDROP_SECRET_PATHに空または相対のセグメントが含まれています");
    }
    Ok(trimmed.to_string())
}

fn parse_bool(value: &str) -> anyhow::Result<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        other => bail!("真偽値として解釈できません: {other}"),
    }
}

/// サーバーの共有状態。
pub struct ServerState {
    /// 起動時に確定した設定
    pub config: ServerConfig,
    /// 画像の保存先（トレイトで抽象化）
    pub storage: Box<dyn ImageStorage>,
}
