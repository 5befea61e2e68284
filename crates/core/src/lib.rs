//! # Profiles Endpoint Core
//!
//! UUIDの正規化、アカウント・テクスチャの解決、署名付きプロフィールの組み立てを実装する。
//!
//! ## 処理フロー
//! 1. UUIDを正規化する（不正な形式は「見つからない」として扱う）
//! 2. アカウントストアからユーザー名を解決する
//! 3. テクスチャサービスからテクスチャJSONを取得する
//! 4. `textures` プロパティを組み立ててBase64エンコードする
//! 5. 要求された場合、各プロパティに個別の署名を付与する

pub mod capabilities;
pub mod composer;
pub mod signer;
pub mod uuid;

pub use capabilities::{AccountsRepository, TexturesProvider};
pub use composer::{should_sign, ProfileComposer};
pub use signer::{LocalSigner, ProfileSigner};

/// Coreモジュールのエラー型
#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    /// アカウントストアへの問い合わせに失敗
    #[error("アカウント情報の取得に失敗しました: {0}")]
    Accounts(String),
    /// テクスチャサービスへの問い合わせに失敗、または不正なテクスチャJSON
    #[error("テクスチャ情報の取得に失敗しました: {0}")]
    Textures(String),
    /// プロパティへの署名に失敗
    #[error("プロパティの署名に失敗しました: {0}")]
    Signing(#[from] profiles_crypto::CryptoError),
    /// プロフィールのシリアライズに失敗
    #[error("プロフィールのシリアライズに失敗しました: {0}")]
    Serialization(String),
}

impl CoreError {
    /// ログ上でエラーの発生源を区別するための分類。
    ///
    /// 依存サービスの障害は `upstream`、ローカルの鍵・設定の問題は `signing`。
    pub fn kind(&self) -> &'static str {
        match self {
            CoreError::Accounts(_) | CoreError::Textures(_) => "upstream",
            CoreError::Signing(_) => "signing",
            CoreError::Serialization(_) => "internal",
        }
    }
}

/// Base64エンジン（Standard）
pub fn b64() -> base64::engine::GeneralPurpose {
    base64::engine::general_purpose::STANDARD
}
