//! # Profiles Endpoint 共有型定義
//!
//! Mojang互換セッションサーバーAPIが返却するデータ構造をRust構造体として提供する。
//!
//! ## エンコーディング規則
//! - UUID: 内部では小文字ハイフン区切り36文字、ワイヤー上ではハイフンなし32文字
//! - Base64: プロパティ値と署名（Standard、パディングあり）

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::value::RawValue;

// ---------------------------------------------------------------------------
// 定数
// ---------------------------------------------------------------------------

/// テクスチャプロパティの名前
pub const TEXTURES_PROPERTY_NAME: &str = "textures";

/// 装飾用の固定プロパティの名前
pub const DECORATIVE_PROPERTY_NAME: &str = "ely";

/// 装飾用の固定プロパティの値（リクエスト内容に依存しない）
pub const DECORATIVE_PROPERTY_VALUE: &str = "but why are you asking?";

/// テクスチャが存在しない場合に埋め込む空のJSONオブジェクト
pub const EMPTY_TEXTURES: &str = "{}";

// ---------------------------------------------------------------------------
// アカウント
// ---------------------------------------------------------------------------

/// アカウントストアから解決されたプレイヤーの識別情報。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerIdentity {
    /// 小文字ハイフン区切りの正規UUID
    pub uuid: String,
    /// ストアに保存された大文字小文字のままのユーザー名
    pub username: String,
}

// ---------------------------------------------------------------------------
// プロフィールドキュメント
// ---------------------------------------------------------------------------

/// プロフィールに含まれる名前付きプロパティ。
/// 値はBase64、署名は要求された場合のみ付与される。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignedProperty {
    /// プロパティ名
    pub name: String,
    /// Base64エンコードされた値
    pub value: String,
    /// Base64エンコードされたRSA署名（SHA1withRSA）
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub signature: Option<String>,
}

impl SignedProperty {
    /// 署名なしのプロパティを作成する。
    pub fn unsigned(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
            signature: None,
        }
    }
}

/// `GET /api/minecraft/session/profile/{uuid}` のレスポンス。
///
/// `properties` の順序は常に `textures`、装飾プロパティの順。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProfileDocument {
    /// ハイフンなし32文字のUUID
    pub id: String,
    /// ユーザー名
    pub name: String,
    /// プロパティ一覧
    pub properties: Vec<SignedProperty>,
}

impl ProfileDocument {
    /// 名前でプロパティを検索する。
    pub fn property(&self, name: &str) -> Option<&SignedProperty> {
        self.properties.iter().find(|p| p.name == name)
    }
}

/// `textures` プロパティの値をBase64デコードした中身。
///
/// フィールド順はクライアント互換のため固定
/// （timestamp, profileId, profileName, textures）。
/// `textures` はテクスチャサービスが返したJSONをエスケープせずに埋め込む。
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TexturesPayload {
    /// 生成時刻（UNIXミリ秒）
    pub timestamp: i64,
    /// ハイフンなし32文字のUUID
    pub profile_id: String,
    /// ユーザー名
    pub profile_name: String,
    /// テクスチャ情報（不透明なJSON）
    pub textures: Box<RawValue>,
}

// ---------------------------------------------------------------------------
// UUID検索
// ---------------------------------------------------------------------------

/// `GET /api/mojang/profiles/{username}` のレスポンス。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UuidLookupResponse {
    /// ハイフンなし32文字のUUID
    pub id: String,
    /// 正しい大文字小文字のユーザー名
    pub name: String,
}

// ---------------------------------------------------------------------------
// ヘルスチェック
// ---------------------------------------------------------------------------

/// `GET /healthcheck` のレスポンス。
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthReport {
    /// 全チェックが通れば "OK"、そうでなければ "Unavailable"
    pub status: String,
    /// チェック名ごとの結果（"OK" またはエラーメッセージ）
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub details: BTreeMap<String, String>,
}
