//! # GET /api/minecraft/session/profile/{uuid}
//!
//! UUIDから署名付き（または署名なし）のプロフィールを返す。

use std::sync::Arc;

use axum::extract::rejection::PathRejection;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use profiles_core::should_sign;

use super::with_deadline;
use crate::config::GatewayState;
use crate::error::GatewayError;

/// クエリパラメータ（出現順のキーと値の組）。
///
/// 同じキーが複数回現れても拒否せず、最初の値を採用する。
pub type QueryPairs = Vec<(String, String)>;

/// 指定したキーの最初の値を返す。
pub fn first_param<'a>(pairs: &'a [(String, String)], key: &str) -> Option<&'a str> {
    pairs
        .iter()
        .find(|(k, _)| k == key)
        .map(|(_, v)| v.as_str())
}

/// GET /api/minecraft/session/profile/{uuid} — プロフィール取得。
///
/// UUIDの形式が不正（UTF-8として復号できないものを含む）、
/// またはアカウントが存在しない場合は204を返す。
pub async fn handle_profile(
    State(state): State<Arc<GatewayState>>,
    path: Result<Path<String>, PathRejection>,
    Query(query): Query<QueryPairs>,
) -> Result<Response, GatewayError> {
    let uuid = match path {
        Ok(Path(uuid)) => uuid,
        Err(rejection) => {
            tracing::debug!(error = %rejection, "UUIDを解釈できません");
            return Ok(StatusCode::NO_CONTENT.into_response());
        }
    };

    let sign = should_sign(first_param(&query, "unsigned"));

    let profile = with_deadline(
        state.request_timeout,
        state.composer.profile_by_uuid(&uuid, sign),
    )
    .await?;

    match profile {
        Some(profile) => Ok(Json(profile).into_response()),
        None => {
            tracing::debug!(uuid = %uuid, "プロフィールが見つかりません");
            Ok(StatusCode::NO_CONTENT.into_response())
        }
    }
}
