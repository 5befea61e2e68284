//! テスト用のモックとGatewayStateの構築ヘルパー。

use std::sync::{Arc, OnceLock};
use std::time::Duration;

use profiles_core::{AccountsRepository, CoreError, LocalSigner, ProfileComposer, TexturesProvider};
use profiles_crypto::RsaPrivateKey;

use crate::config::GatewayState;

pub const NOTCH_UUID: &str = "069a79f4-44e9-4726-a5be-fca90e38aaf5";
pub const NOTCH_ID: &str = "069a79f444e94726a5befca90e38aaf5";

/// テスト用のモックアカウントストア。Notchのみ登録されている。
pub struct MockAccounts {
    fail: bool,
}

impl MockAccounts {
    pub fn notch() -> Self {
        Self { fail: false }
    }

    pub fn failing() -> Self {
        Self { fail: true }
    }

    fn check(&self) -> Result<(), CoreError> {
        if self.fail {
            return Err(CoreError::Accounts("Connection refused".to_string()));
        }
        Ok(())
    }
}

#[async_trait::async_trait]
impl AccountsRepository for MockAccounts {
    async fn find_username_by_uuid(&self, uuid: &str) -> Result<Option<String>, CoreError> {
        self.check()?;
        Ok((uuid == NOTCH_UUID).then(|| "Notch".to_string()))
    }

    async fn find_uuid_by_username(
        &self,
        username: &str,
    ) -> Result<Option<(String, String)>, CoreError> {
        self.check()?;
        Ok(username
            .eq_ignore_ascii_case("notch")
            .then(|| (NOTCH_UUID.to_string(), "Notch".to_string())))
    }

    async fn ping(&self) -> Result<(), CoreError> {
        self.check()
    }
}

/// テスト用のモックテクスチャサービス
pub enum MockTextures {
    Empty,
    Json(&'static str),
    Failing,
    /// 応答を返さない（タイムアウトの確認用）
    Hanging,
}

#[async_trait::async_trait]
impl TexturesProvider for MockTextures {
    async fn get_textures_by_username(
        &self,
        _username: &str,
    ) -> Result<Option<Vec<u8>>, CoreError> {
        match self {
            MockTextures::Empty => Ok(None),
            MockTextures::Json(json) => Ok(Some(json.as_bytes().to_vec())),
            MockTextures::Failing => Err(CoreError::Textures("HTTP 502".to_string())),
            MockTextures::Hanging => std::future::pending().await,
        }
    }
}

/// 鍵生成はテスト間で共有する
pub fn test_key() -> &'static RsaPrivateKey {
    static KEY: OnceLock<RsaPrivateKey> = OnceLock::new();
    KEY.get_or_init(|| profiles_crypto::generate_private_key(1024).unwrap())
}

/// テスト用GatewayStateを構築するヘルパー
pub fn test_state(accounts: MockAccounts, textures: MockTextures) -> Arc<GatewayState> {
    let composer = ProfileComposer::new(
        Arc::new(accounts),
        Arc::new(textures),
        Arc::new(LocalSigner::new(test_key().clone())),
    );

    Arc::new(GatewayState {
        composer,
        request_timeout: Duration::from_millis(200),
    })
}
