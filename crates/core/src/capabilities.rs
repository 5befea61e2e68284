//! # 外部依存の抽象インターフェース
//!
//! アカウントストアとテクスチャサービスをトレイトで抽象化する。
//! 本番実装はGateway側（MySQL、Chrly）にあり、テストではモックに差し替える。
//!
//! いずれのメソッドも「見つからない」を `Ok(None)` で、通信・ストレージ障害を
//! `Err` で返す。両者を混同してはならない。

use crate::CoreError;

/// UUIDとユーザー名の対応を解決するアカウントストア。
#[async_trait::async_trait]
pub trait AccountsRepository: Send + Sync {
    /// 正規化済みUUIDから有効なアカウントのユーザー名を取得する。
    async fn find_username_by_uuid(&self, uuid: &str) -> Result<Option<String>, CoreError>;

    /// ユーザー名からUUIDと正しい大文字小文字のユーザー名を取得する。
    ///
    /// 返却するユーザー名は問い合わせの大文字小文字によらず、ストアに保存されたものを使う。
    async fn find_uuid_by_username(
        &self,
        username: &str,
    ) -> Result<Option<(String, String)>, CoreError>;

    /// ストアへの疎通確認。
    async fn ping(&self) -> Result<(), CoreError>;
}

/// ユーザー名からテクスチャJSONを取得するテクスチャサービス。
#[async_trait::async_trait]
pub trait TexturesProvider: Send + Sync {
    /// テクスチャJSONのバイト列を取得する。
    ///
    /// カスタムテクスチャがない場合は `Ok(None)`。
    async fn get_textures_by_username(&self, username: &str)
        -> Result<Option<Vec<u8>>, CoreError>;
}
