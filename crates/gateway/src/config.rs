//! # Gateway設定・共有状態
//!
//! 環境変数からの設定読み込みとGatewayの共有状態の定義。

use std::time::Duration;

use profiles_core::ProfileComposer;

/// Gatewayの共有状態。
pub struct GatewayState {
    /// プロフィール組み立て役（アカウントストア・テクスチャサービス・署名鍵を保持）
    pub composer: ProfileComposer,
    /// リクエストごとの処理期限。超過すると処理中の外部呼び出しを打ち切る。
    pub request_timeout: Duration,
}

/// MySQLへの接続方式。
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MySqlProtocol {
    /// TCP（host:port）
    Tcp,
    /// Unixドメインソケット（hostをソケットパスとして扱う）
    Unix,
}

/// MySQL接続設定。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MySqlConfig {
    /// 接続方式
    pub protocol: MySqlProtocol,
    /// ホスト名（Unixの場合はソケットパス）
    pub host: String,
    /// ポート番号
    pub port: u16,
    /// データベース名（空の場合は指定しない）
    pub database: String,
    /// ユーザー名
    pub user: String,
    /// パスワード
    pub password: String,
}

/// Gatewayの起動設定。
#[derive(Debug, Clone)]
pub struct GatewayConfig {
    /// 待ち受けホスト
    pub http_host: String,
    /// 待ち受けポート
    pub http_port: u16,
    /// デバッグログを有効にするか
    pub debug: bool,
    /// アカウントストア
    pub mysql: MySqlConfig,
    /// テクスチャサービス（Chrly）のベースURL（末尾スラッシュなし）
    pub chrly_url: String,
    /// PEMエンコードされたPKCS#1秘密鍵。未設定の場合は一時鍵を生成する。
    pub signing_key: Option<String>,
    /// リクエストごとの処理期限
    pub request_timeout: Duration,
}

impl GatewayConfig {
    /// 環境変数から読み込む。
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// 任意のキー参照関数から読み込む。
    pub fn from_lookup<F>(lookup: F) -> anyhow::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str, default: &str| lookup(key).unwrap_or_else(|| default.to_string());

        let protocol = match get("DB_MYSQL_PROTOCOL", "tcp").as_str() {
            "tcp" => MySqlProtocol::Tcp,
            "unix" => MySqlProtocol::Unix,
            other => anyhow::bail!("DB_MYSQL_PROTOCOLは \"tcp\" または \"unix\" である必要があります: {other}"),
        };

        let timeout_secs: u64 = parse(&get("REQUEST_TIMEOUT_SECS", "10"), "REQUEST_TIMEOUT_SECS")?;
        if timeout_secs == 0 {
            anyhow::bail!("REQUEST_TIMEOUT_SECSは1以上である必要があります");
        }

        Ok(Self {
            http_host: get("HTTP_HOST", "0.0.0.0"),
            http_port: parse(&get("HTTP_PORT", "8080"), "HTTP_PORT")?,
            debug: parse_bool(&get("DEBUG", "false")),
            mysql: MySqlConfig {
                protocol,
                host: get("DB_MYSQL_HOST", "localhost"),
                port: parse(&get("DB_MYSQL_PORT", "3306"), "DB_MYSQL_PORT")?,
                database: get("DB_MYSQL_DATABASE", ""),
                user: get("DB_MYSQL_USER", "root"),
                password: get("DB_MYSQL_PASSWORD", ""),
            },
            chrly_url: get("CHRLY_URL", "http://skinsystem.ely.by")
                .trim_end_matches('/')
                .to_string(),
            signing_key: lookup("SIGNING_KEY").filter(|s| !s.trim().is_empty()),
            request_timeout: Duration::from_secs(timeout_secs),
        })
    }

    /// 待ち受けアドレス
    pub fn listen_addr(&self) -> String {
        format!("{}:{}", self.http_host, self.http_port)
    }
}

fn parse<T>(value: &str, key: &str) -> anyhow::Result<T>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    value
        .trim()
        .parse()
        .map_err(|e| anyhow::anyhow!("{key}の値が不正です ({value:?}): {e}"))
}

fn parse_bool(value: &str) -> bool {
    matches!(value.trim().to_ascii_lowercase().as_str(), "1" | "true" | "yes" | "on")
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn config_from(pairs: &[(&str, &str)]) -> anyhow::Result<GatewayConfig> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        GatewayConfig::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_defaults() {
        let config = config_from(&[]).unwrap();
        assert_eq!(config.listen_addr(), "0.0.0.0:8080");
        assert!(!config.debug);
        assert_eq!(config.mysql.protocol, MySqlProtocol::Tcp);
        assert_eq!(config.mysql.host, "localhost");
        assert_eq!(config.mysql.port, 3306);
        assert_eq!(config.mysql.user, "root");
        assert_eq!(config.chrly_url, "http://skinsystem.ely.by");
        assert!(config.signing_key.is_none());
        assert_eq!(config.request_timeout, Duration::from_secs(10));
    }

    #[test]
    fn test_overrides() {
        let config = config_from(&[
            ("HTTP_PORT", "9000"),
            ("DEBUG", "true"),
            ("DB_MYSQL_PROTOCOL", "unix"),
            ("DB_MYSQL_HOST", "/run/mysqld/mysqld.sock"),
            ("DB_MYSQL_DATABASE", "ely"),
            ("CHRLY_URL", "http://chrly:80//"),
            ("SIGNING_KEY", "   "),
            ("REQUEST_TIMEOUT_SECS", "3"),
        ])
        .unwrap();

        assert_eq!(config.http_port, 9000);
        assert!(config.debug);
        assert_eq!(config.mysql.protocol, MySqlProtocol::Unix);
        assert_eq!(config.mysql.database, "ely");
        assert_eq!(config.chrly_url, "http://chrly:80");
        assert!(config.signing_key.is_none(), "空白のみの鍵は未設定扱い");
        assert_eq!(config.request_timeout, Duration::from_secs(3));
    }

    #[test]
    fn test_invalid_values() {
        assert!(config_from(&[("HTTP_PORT", "http")]).is_err());
        assert!(config_from(&[("DB_MYSQL_PORT", "70000")]).is_err());
        assert!(config_from(&[("DB_MYSQL_PROTOCOL", "udp")]).is_err());
        assert!(config_from(&[("REQUEST_TIMEOUT_SECS", "0")]).is_err());
    }
}
