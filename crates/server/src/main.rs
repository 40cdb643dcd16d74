//! # pixdrop サーバー
//!
//! 一時的な画像ホスティングサーバー。
//!
//! ## 役割
//! - 秘密パスへのJPEG / アニメーションGIFのアップロード受付
//! - フォーマット判定と正規化（GIFのディレイ固定、JPEGの回転補正）
//! - ランダムな名前での保存と公開URIの返却
//! - 取得時の保存期間チェックと期限切れファイルの削除
//!
//! ## API エンドポイント
//! - `PUT /<secret>/image.jpeg` — JPEGアップロード
//! - `PUT /<secret>/image.gif` — GIFアップロード
//! - `GET /image/{name}` — 画像取得
//! - `GET /` — 生存確認

mod app;
mod config;
mod endpoints;
mod error;
mod ingest;
mod retrieval;
mod storage;
mod uri;

use std::sync::Arc;

use tracing_subscriber::EnvFilter;

use crate::config::{ServerConfig, ServerState};
use crate::storage::LocalStorage;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let config = ServerConfig::from_env()?;
    let storage = LocalStorage::open(&config.upload_dir).await?;

    tracing::info!(
        upload_dir = %storage.root().display(),
        retention_secs = config.retention.as_secs(),
        force_https = config.force_https,
        static_gif = ?config.static_gif_policy,
        "設定を読み込みました"
    );

    let bind_addr = config.bind_addr;
    let state = Arc::new(ServerState {
        config,
        storage: Box::new(storage),
    });

    let app = app::build_router(state);

    tracing::info!("サーバーを {} で起動します", bind_addr);

    let listener = tokio::net::TcpListener::bind(bind_addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("サーバーを停止しました");
    Ok(())
}

/// Ctrl+C または SIGTERM を待つ。
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Ctrl+Cハンドラの登録に失敗: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!("SIGTERMハンドラの登録に失敗: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => tracing::info!("Ctrl+Cを受信、停止します"),
        _ = terminate => tracing::info!("SIGTERMを受信、停止します"),
    }
}
