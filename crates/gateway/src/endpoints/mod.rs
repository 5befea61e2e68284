//! # Gatewayエンドポイント

pub mod healthcheck;
pub mod profile;
pub mod uuid;

pub use healthcheck::handle_healthcheck;
pub use profile::handle_profile;
pub use uuid::handle_uuid_by_username;

use std::future::Future;
use std::time::Duration;

use profiles_core::CoreError;

use crate::error::GatewayError;

/// 期限付きで処理を実行する。
///
/// 期限を超えた場合は処理中のFutureを破棄し（外部呼び出しも打ち切られる）、
/// 部分的な結果は返さない。
pub(crate) async fn with_deadline<T, F>(timeout: Duration, fut: F) -> Result<T, GatewayError>
where
    F: Future<Output = Result<T, CoreError>>,
{
    tokio::time::timeout(timeout, fut)
        .await
        .map_err(|_| GatewayError::Timeout)?
        .map_err(GatewayError::from)
}
