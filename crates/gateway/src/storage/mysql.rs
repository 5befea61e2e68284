//! # MySQL アカウントストア実装
//!
//! `accounts` テーブルから有効なアカウント（`status = 10`）のみを検索する。

use std::time::Duration;

use profiles_core::{AccountsRepository, CoreError};
use sqlx::mysql::{MySqlConnectOptions, MySqlPool, MySqlPoolOptions};
use sqlx::Connection;

use crate::config::{MySqlConfig, MySqlProtocol};

/// 有効なアカウントのステータス値
const ACTIVE_STATUS: i32 = 10;

/// プールの最大接続数
const MAX_CONNECTIONS: u32 = 10;

/// 接続の最大寿命
const CONN_MAX_LIFETIME: Duration = Duration::from_secs(3 * 60);

/// MySQLによるアカウントストア実装。
pub struct MySqlAccounts {
    pool: MySqlPool,
}

impl MySqlAccounts {
    /// 既存の接続プールから作成する。
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }

    /// 設定から接続プールを作成する。
    pub async fn connect(config: &MySqlConfig) -> anyhow::Result<Self> {
        let mut options = MySqlConnectOptions::new()
            .username(&config.user)
            .password(&config.password);
        options = match config.protocol {
            MySqlProtocol::Tcp => options.host(&config.host).port(config.port),
            MySqlProtocol::Unix => options.socket(&config.host),
        };
        if !config.database.is_empty() {
            options = options.database(&config.database);
        }

        let pool = MySqlPoolOptions::new()
            .max_connections(MAX_CONNECTIONS)
            .max_lifetime(CONN_MAX_LIFETIME)
            .connect_with(options)
            .await
            .map_err(|e| anyhow::anyhow!("MySQLへの接続に失敗しました: {e}"))?;

        tracing::info!(
            host = %config.host,
            database = %config.database,
            "MySQLに接続しました"
        );

        Ok(Self::new(pool))
    }
}

#[async_trait::async_trait]
impl AccountsRepository for MySqlAccounts {
    async fn find_username_by_uuid(&self, uuid: &str) -> Result<Option<String>, CoreError> {
        sqlx::query_scalar::<_, String>(
            "SELECT username FROM accounts WHERE uuid = ? AND status = ? LIMIT 1",
        )
        .bind(uuid)
        .bind(ACTIVE_STATUS)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| CoreError::Accounts(format!("UUIDによるアカウント検索に失敗: {e}")))
    }

    async fn find_uuid_by_username(
        &self,
        username: &str,
    ) -> Result<Option<(String, String)>, CoreError> {
        sqlx::query_as::<_, (String, String)>(
            "SELECT uuid, username FROM accounts WHERE username = ? AND status = ? LIMIT 1",
        )
        .bind(username)
        .bind(ACTIVE_STATUS)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| CoreError::Accounts(format!("ユーザー名によるアカウント検索に失敗: {e}")))
    }

    async fn ping(&self) -> Result<(), CoreError> {
        let mut conn = self
            .pool
            .acquire()
            .await
            .map_err(|e| CoreError::Accounts(format!("接続の取得に失敗: {e}")))?;
        conn.ping()
            .await
            .map_err(|e| CoreError::Accounts(format!("pingに失敗: {e}")))
    }
}
