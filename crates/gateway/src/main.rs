//! # Profiles Endpoint Gateway
//!
//! Mojang互換セッションサーバーAPIの一部を提供するHTTPサーバー。
//!
//! ## 役割
//! - UUIDから署名付きプロフィール（ユーザー名 + テクスチャ）を返却
//! - ユーザー名から正規のUUIDを返却
//! - アカウントストアのヘルスチェック
//!
//! ## API エンドポイント
//! - `GET /api/minecraft/session/profile/{uuid}` (`/profile/{uuid}`) — プロフィール取得
//! - `GET /api/mojang/profiles/{username}` (`/uuid/{username}`) — UUID検索
//! - `GET /healthcheck` — ヘルスチェック

mod chrly;
mod config;
mod endpoints;
mod error;
mod middleware;
mod storage;

#[cfg(test)]
mod test_helpers;

use std::sync::Arc;

use axum::routing::get;
use axum::Router;
use profiles_core::{LocalSigner, ProfileComposer};
use profiles_crypto::KeyOrigin;
use tracing_subscriber::EnvFilter;

use crate::chrly::ChrlyClient;
use crate::config::{GatewayConfig, GatewayState};
use crate::endpoints::{handle_healthcheck, handle_profile, handle_uuid_by_username};
use crate::storage::MySqlAccounts;

/// ルーターを構築する。
fn build_router(state: Arc<GatewayState>) -> Router {
    Router::new()
        .route("/api/minecraft/session/profile/{uuid}", get(handle_profile))
        .route("/profile/{uuid}", get(handle_profile))
        .route("/api/mojang/profiles/{username}", get(handle_uuid_by_username))
        .route("/uuid/{username}", get(handle_uuid_by_username))
        .route("/healthcheck", get(handle_healthcheck))
        .layer(axum::middleware::from_fn(middleware::log_requests))
        .with_state(state)
}

/// SIGINT / SIGTERM を待つ。
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "SIGINTハンドラの登録に失敗");
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "SIGTERMハンドラの登録に失敗");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("シャットダウンします");
}

// ---------------------------------------------------------------------------
// エントリポイント
// ---------------------------------------------------------------------------

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = GatewayConfig::from_env()?;

    let default_filter = if config.debug { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter)),
        )
        .init();

    // 署名鍵
    let (signing_key, origin) = profiles_crypto::load_or_generate(config.signing_key.as_deref())
        .map_err(|e| anyhow::anyhow!("SIGNING_KEYの読み込みに失敗しました: {e}"))?;
    if origin == KeyOrigin::Generated {
        tracing::warn!(
            "署名用の秘密鍵を生成しました。永続化するには SIGNING_KEY に有効なRSA秘密鍵を設定してください"
        );
    }
    let signer = LocalSigner::new(signing_key);
    tracing::info!(
        fingerprint = %profiles_crypto::public_key_fingerprint(signer.public_key())?,
        "署名用公開鍵"
    );

    // アカウントストア（MySQL）
    let accounts = MySqlAccounts::connect(&config.mysql).await?;

    // テクスチャサービス（Chrly）
    let textures = ChrlyClient::new(config.chrly_url.clone(), reqwest::Client::new());

    let state = Arc::new(GatewayState {
        composer: ProfileComposer::new(Arc::new(accounts), Arc::new(textures), Arc::new(signer)),
        request_timeout: config.request_timeout,
    });

    let app = build_router(state);

    let addr = config.listen_addr();
    tracing::info!("Gatewayを {} で起動します", addr);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

// ---------------------------------------------------------------------------
// テスト
// ---------------------------------------------------------------------------
