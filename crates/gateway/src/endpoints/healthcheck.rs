//! # GET /healthcheck
//!
//! アカウントストアへの疎通を確認する。

use std::collections::BTreeMap;
use std::sync::Arc;

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use profiles_types::HealthReport;

use crate::config::GatewayState;

/// GET /healthcheck — ヘルスチェック。
///
/// 全チェックが成功すれば200、いずれかが失敗すれば503。
pub async fn handle_healthcheck(
    State(state): State<Arc<GatewayState>>,
) -> (StatusCode, Json<HealthReport>) {
    let mysql = match tokio::time::timeout(state.request_timeout, state.composer.accounts().ping())
        .await
    {
        Ok(Ok(())) => Ok(()),
        Ok(Err(e)) => Err(e.to_string()),
        Err(_) => Err("タイムアウトしました".to_string()),
    };

    let mut details = BTreeMap::new();
    let healthy = match mysql {
        Ok(()) => {
            details.insert("mysql".to_string(), "OK".to_string());
            true
        }
        Err(message) => {
            tracing::warn!(check = "mysql", error = %message, "ヘルスチェックに失敗");
            details.insert("mysql".to_string(), message);
            false
        }
    };

    let (status, label) = if healthy {
        (StatusCode::OK, "OK")
    } else {
        (StatusCode::SERVICE_UNAVAILABLE, "Unavailable")
    };

    (
        status,
        Json(HealthReport {
            status: label.to_string(),
            details,
        }),
    )
}
