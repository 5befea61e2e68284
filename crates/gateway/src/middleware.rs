//! # リクエストログ
//!
//! リクエストごとにメソッド・URI・ステータス・処理時間を1行で記録する。

use std::time::Instant;

use axum::extract::Request;
use axum::middleware::Next;
use axum::response::Response;

/// リクエストログミドルウェア。
pub async fn log_requests(request: Request, next: Next) -> Response {
    let method = request.method().clone();
    let uri = request.uri().clone();
    let started = Instant::now();

    let response = next.run(request).await;

    tracing::info!(
        method = %method,
        uri = %uri,
        status = response.status().as_u16(),
        elapsed_ms = started.elapsed().as_millis() as u64,
        "\"{method} {uri}\" {}",
        response.status().as_u16()
    );

    response
}
