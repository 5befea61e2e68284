//! # GET /api/mojang/profiles/{username}
//!
//! ユーザー名からUUIDと正しい大文字小文字のユーザー名を返す。

use std::sync::Arc;

use axum::extract::rejection::PathRejection;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;

use super::with_deadline;
use crate::config::GatewayState;
use crate::error::GatewayError;

/// GET /api/mojang/profiles/{username} — UUID検索。
///
/// アカウントが存在しない場合、ユーザー名をUTF-8として復号できない場合は204を返す。
pub async fn handle_uuid_by_username(
    State(state): State<Arc<GatewayState>>,
    path: Result<Path<String>, PathRejection>,
) -> Result<Response, GatewayError> {
    let username = match path {
        Ok(Path(username)) => username,
        Err(rejection) => {
            tracing::debug!(error = %rejection, "ユーザー名を解釈できません");
            return Ok(StatusCode::NO_CONTENT.into_response());
        }
    };

    let found = with_deadline(
        state.request_timeout,
        state.composer.uuid_by_username(&username),
    )
    .await?;

    match found {
        Some(found) => Ok(Json(found).into_response()),
        None => {
            tracing::debug!(username = %username, "アカウントが見つかりません");
            Ok(StatusCode::NO_CONTENT.into_response())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::{test_state, MockAccounts, MockTextures};

    #[tokio::test]
    async fn test_uuid_found_and_missing() {
        let state = test_state(MockAccounts::notch(), MockTextures::Empty);

        let response = handle_uuid_by_username(State(state.clone()), Ok(Path("NOTCH".to_string())))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let response = handle_uuid_by_username(State(state), Ok(Path("jeb_".to_string())))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NO_CONTENT);
    }

    #[tokio::test]
    async fn test_uuid_storage_failure() {
        let state = test_state(MockAccounts::failing(), MockTextures::Empty);
        let result = handle_uuid_by_username(State(state), Ok(Path("notch".to_string()))).await;
        assert!(matches!(result, Err(GatewayError::Upstream(_))));
    }
}
