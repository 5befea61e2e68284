//! # Gateway エラー型
//!
//! リクエスト処理中のエラーはすべてここでレスポンスに変換され、プロセスを落とさない。
//! 「見つからない」はエラーではなく、各エンドポイントが204を返す。

use axum::http::StatusCode;
use profiles_core::CoreError;

/// Gatewayエラー型。
#[derive(Debug, thiserror::Error)]
pub enum GatewayError {
    /// アカウントストアまたはテクスチャサービスの障害
    #[error("依存サービスの呼び出しに失敗: {0}")]
    Upstream(String),
    /// 署名処理の失敗（鍵・設定の問題）
    #[error("署名処理に失敗: {0}")]
    Signing(String),
    /// リクエスト処理の期限切れ
    #[error("リクエスト処理がタイムアウトしました")]
    Timeout,
    /// 内部エラー
    #[error("内部エラー: {0}")]
    Internal(String),
}

impl From<CoreError> for GatewayError {
    fn from(err: CoreError) -> Self {
        match &err {
            CoreError::Accounts(_) | CoreError::Textures(_) => {
                GatewayError::Upstream(err.to_string())
            }
            CoreError::Signing(_) => GatewayError::Signing(err.to_string()),
            CoreError::Serialization(_) => GatewayError::Internal(err.to_string()),
        }
    }
}

impl GatewayError {
    /// ログ上の分類
    pub fn kind(&self) -> &'static str {
        match self {
            GatewayError::Upstream(_) => "upstream",
            GatewayError::Signing(_) => "signing",
            GatewayError::Timeout => "timeout",
            GatewayError::Internal(_) => "internal",
        }
    }
}

impl axum::response::IntoResponse for GatewayError {
    fn into_response(self) -> axum::response::Response {
        let status = match &self {
            GatewayError::Upstream(_) | GatewayError::Signing(_) | GatewayError::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
            GatewayError::Timeout => StatusCode::GATEWAY_TIMEOUT,
        };

        match &self {
            GatewayError::Timeout => tracing::warn!(kind = self.kind(), "{self}"),
            _ => tracing::error!(kind = self.kind(), error = %self, "リクエスト処理に失敗"),
        }

        (status, self.to_string()).into_response()
    }
}

#[cfg(test)]
mod tests {
    use axum::response::IntoResponse;

    use super::*;

    #[test]
    fn test_core_error_mapping() {
        let err: GatewayError = CoreError::Accounts("down".to_string()).into();
        assert!(matches!(err, GatewayError::Upstream(_)));

        let err: GatewayError = CoreError::Textures("down".to_string()).into();
        assert!(matches!(err, GatewayError::Upstream(_)));

        let err: GatewayError =
            CoreError::Signing(profiles_crypto::CryptoError::Sign("bad".to_string())).into();
        assert!(matches!(err, GatewayError::Signing(_)));
    }

    #[test]
    fn test_status_codes() {
        assert_eq!(
            GatewayError::Upstream("x".to_string()).into_response().status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            GatewayError::Signing("x".to_string()).into_response().status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            GatewayError::Timeout.into_response().status(),
            StatusCode::GATEWAY_TIMEOUT
        );
    }
}
