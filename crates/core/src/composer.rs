//! # プロフィールの組み立て
//!
//! UUID正規化 → ユーザー名解決 → テクスチャ取得 → プロパティ構築 → 署名
//! の順に処理し、Mojang互換のプロフィールドキュメントを返す。
//!
//! ドキュメントはリクエストごとに新しく構築する（`timestamp` により毎回内容が変わる）。

use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};

use base64::Engine;
use profiles_types::*;
use serde_json::value::RawValue;

use crate::capabilities::{AccountsRepository, TexturesProvider};
use crate::signer::ProfileSigner;
use crate::uuid;
use crate::{b64, CoreError};

/// `unsigned` クエリパラメータから署名の要否を判定する。
///
/// 値が文字列 `"false"` と完全一致する場合のみ署名する。
/// パラメータがない場合やその他の値では署名しない。
pub fn should_sign(unsigned: Option<&str>) -> bool {
    unsigned == Some("false")
}

/// 現在時刻（UNIXミリ秒）
fn system_clock() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as i64)
        .unwrap_or_default()
}

/// プロフィールドキュメントの組み立て役。
///
/// 共有される状態は読み取り専用の依存サービスのみで、リクエスト間で可変状態を持たない。
pub struct ProfileComposer {
    accounts: Arc<dyn AccountsRepository>,
    textures: Arc<dyn TexturesProvider>,
    signer: Arc<dyn ProfileSigner>,
    clock: fn() -> i64,
}

impl ProfileComposer {
    /// 依存サービスを受け取って作成する。
    pub fn new(
        accounts: Arc<dyn AccountsRepository>,
        textures: Arc<dyn TexturesProvider>,
        signer: Arc<dyn ProfileSigner>,
    ) -> Self {
        Self {
            accounts,
            textures,
            signer,
            clock: system_clock,
        }
    }

    /// `timestamp` に使う時計を差し替える。
    pub fn with_clock(mut self, clock: fn() -> i64) -> Self {
        self.clock = clock;
        self
    }

    /// アカウントストア
    pub fn accounts(&self) -> &Arc<dyn AccountsRepository> {
        &self.accounts
    }

    /// UUIDからプロフィールを取得する。
    ///
    /// UUIDの形式が不正な場合とアカウントが存在しない場合は `Ok(None)`。
    pub async fn profile_by_uuid(
        &self,
        raw_uuid: &str,
        sign: bool,
    ) -> Result<Option<ProfileDocument>, CoreError> {
        let Ok(uuid) = uuid::normalize(raw_uuid) else {
            return Ok(None);
        };

        let Some(username) = self.accounts.find_username_by_uuid(uuid.as_str()).await? else {
            return Ok(None);
        };

        let textures = self.textures.get_textures_by_username(&username).await?;

        let identity = PlayerIdentity {
            uuid: uuid.as_str().to_string(),
            username,
        };
        self.build_profile(&identity, textures.as_deref(), sign)
            .map(Some)
    }

    /// ユーザー名からUUIDと正しい大文字小文字のユーザー名を取得する。
    ///
    /// アカウントが存在しない場合は `Ok(None)`。
    pub async fn uuid_by_username(
        &self,
        username: &str,
    ) -> Result<Option<UuidLookupResponse>, CoreError> {
        let found = self.accounts.find_uuid_by_username(username).await?;
        Ok(found.map(|(id, name)| UuidLookupResponse {
            id: uuid::simple(&id),
            name,
        }))
    }

    /// 解決済みの識別情報とテクスチャからプロフィールを組み立てる。
    ///
    /// `textures` が `None` または JSON の `null` の場合は空オブジェクト `{}` を埋め込む。
    pub fn build_profile(
        &self,
        identity: &PlayerIdentity,
        textures: Option<&[u8]>,
        sign: bool,
    ) -> Result<ProfileDocument, CoreError> {
        let profile_id = uuid::simple(&identity.uuid);

        let textures: Option<Box<RawValue>> = match textures {
            Some(bytes) => Some(
                serde_json::from_slice(bytes)
                    .map_err(|e| CoreError::Textures(format!("テクスチャJSONが不正です: {e}")))?,
            ),
            None => None,
        };
        let textures = match textures {
            Some(raw) if raw.get().trim() != "null" => raw,
            _ => RawValue::from_string(EMPTY_TEXTURES.to_string())
                .map_err(|e| CoreError::Serialization(e.to_string()))?,
        };

        let payload = TexturesPayload {
            timestamp: (self.clock)(),
            profile_id: profile_id.clone(),
            profile_name: identity.username.clone(),
            textures,
        };
        let payload_json = serde_json::to_vec(&payload)
            .map_err(|e| CoreError::Serialization(format!("texturesのシリアライズに失敗: {e}")))?;

        let mut textures_property =
            SignedProperty::unsigned(TEXTURES_PROPERTY_NAME, b64().encode(payload_json));
        let mut decorative_property =
            SignedProperty::unsigned(DECORATIVE_PROPERTY_NAME, DECORATIVE_PROPERTY_VALUE);

        if sign {
            // 値が異なるため、署名はプロパティごとに個別に計算する
            for property in [&mut textures_property, &mut decorative_property] {
                let signature = self.signer.sign(property.value.as_bytes())?;
                property.signature = Some(b64().encode(signature));
            }
        }

        Ok(ProfileDocument {
            id: profile_id,
            name: identity.username.clone(),
            properties: vec![textures_property, decorative_property],
        })
    }
}
