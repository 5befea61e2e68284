//! # Chrly テクスチャサービスクライアント
//!
//! `GET {base_url}/textures/{username}` でテクスチャJSONを取得する。
//! 204はカスタムテクスチャなし、それ以外の非2xxは障害として扱う。

use profiles_core::{CoreError, TexturesProvider};
use reqwest::{StatusCode, Url};

/// Chrlyによるテクスチャサービス実装。
pub struct ChrlyClient {
    /// ベースURL（末尾スラッシュなし）
    base_url: String,
    /// HTTPクライアント
    http_client: reqwest::Client,
}

impl ChrlyClient {
    /// 新しいクライアントを作成する。
    pub fn new(base_url: impl Into<String>, http_client: reqwest::Client) -> Self {
        Self {
            base_url: base_url.into(),
            http_client,
        }
    }

    /// ユーザー名をパスセグメントとしてエスケープしたURLを構築する。
    fn textures_url(&self, username: &str) -> Result<Url, CoreError> {
        let mut url = Url::parse(&self.base_url)
            .map_err(|e| CoreError::Textures(format!("ChrlyのURLが不正です: {e}")))?;
        url.path_segments_mut()
            .map_err(|_| CoreError::Textures(format!("ChrlyのURLが不正です: {}", self.base_url)))?
            .pop_if_empty()
            .push("textures")
            .push(username);
        Ok(url)
    }
}

#[async_trait::async_trait]
impl TexturesProvider for ChrlyClient {
    async fn get_textures_by_username(
        &self,
        username: &str,
    ) -> Result<Option<Vec<u8>>, CoreError> {
        let url = self.textures_url(username)?;
        let response = self
            .http_client
            .get(url)
            .send()
            .await
            .map_err(|e| CoreError::Textures(format!("Chrlyへのリクエストに失敗: {e}")))?;

        let status = response.status();
        if status == StatusCode::NO_CONTENT {
            return Ok(None);
        }
        if !status.is_success() {
            return Err(CoreError::Textures(format!(
                "Chrlyがエラーを返しました: HTTP {status}"
            )));
        }

        let body = response
            .bytes()
            .await
            .map_err(|e| CoreError::Textures(format!("Chrlyのレスポンス読み取りに失敗: {e}")))?;
        Ok(Some(body.to_vec()))
    }
}

#[cfg(test)]
mod tests {
    use axum::extract::Path;
    use axum::http::StatusCode as AxumStatus;
    use axum::response::IntoResponse;

    use super::*;

    /// モックChrlyサーバーを起動し、ベースURLを返す
    async fn start_mock_chrly() -> String {
        let app = axum::Router::new().route(
            "/textures/{username}",
            axum::routing::get(|Path(username): Path<String>| async move {
                match username.as_str() {
                    "Notch" => (
                        AxumStatus::OK,
                        r#"{"SKIN":{"url":"http://ely.by/notch.png"}}"#,
                    )
                        .into_response(),
                    "with space" => (AxumStatus::OK, r#"{"escaped":true}"#).into_response(),
                    "broken" => AxumStatus::INTERNAL_SERVER_ERROR.into_response(),
                    _ => AxumStatus::NO_CONTENT.into_response(),
                }
            }),
        );

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let port = listener.local_addr().unwrap().port();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        tokio::time::sleep(std::time::Duration::from_millis(50)).await;

        format!("http://127.0.0.1:{port}")
    }

    #[tokio::test]
    async fn test_textures_found() {
        let client = ChrlyClient::new(start_mock_chrly().await, reqwest::Client::new());
        let textures = client.get_textures_by_username("Notch").await.unwrap().unwrap();
        assert_eq!(textures, br#"{"SKIN":{"url":"http://ely.by/notch.png"}}"#);
    }

    #[tokio::test]
    async fn test_no_content_is_absent() {
        let client = ChrlyClient::new(start_mock_chrly().await, reqwest::Client::new());
        assert!(client.get_textures_by_username("nobody").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_username_is_escaped() {
        let client = ChrlyClient::new(start_mock_chrly().await, reqwest::Client::new());
        let textures = client.get_textures_by_username("with space").await.unwrap();
        assert_eq!(textures.unwrap(), br#"{"escaped":true}"#);
    }

    #[tokio::test]
    async fn test_error_status_is_failure() {
        let client = ChrlyClient::new(start_mock_chrly().await, reqwest::Client::new());
        let err = client.get_textures_by_username("broken").await.unwrap_err();
        assert!(matches!(err, CoreError::Textures(_)));
    }

    #[tokio::test]
    async fn test_unreachable_service() {
        // ポート1は接続を拒否される
        let client = ChrlyClient::new("http://127.0.0.1:1", reqwest::Client::new());
        assert!(client.get_textures_by_username("Notch").await.is_err());
    }

    #[test]
    fn test_textures_url() {
        let client = ChrlyClient::new("http://skinsystem.ely.by", reqwest::Client::new());
        assert_eq!(
            client.textures_url("a/b?c").unwrap().as_str(),
            "http://skinsystem.ely.by/textures/a%2Fb%3Fc"
        );

        let client = ChrlyClient::new("http://chrly/api", reqwest::Client::new());
        assert_eq!(
            client.textures_url("Notch").unwrap().as_str(),
            "http://chrly/api/textures/Notch"
        );
    }
}
