//! # Profiles Endpoint 暗号処理
//!
//! Minecraftクライアントが検証するプロフィール署名の生成と、
//! 署名鍵のブートストラップ・公開鍵エクスポートを実装する。
//!
//! ## 暗号アルゴリズム
//! | 用途 | アルゴリズム |
//! |------|------------|
//! | 署名 | RSA PKCS#1 v1.5 + SHA-1 |
//! | 秘密鍵形式 | PKCS#1 DER（PEMで包む） |
//! | 公開鍵形式 | SubjectPublicKeyInfo（DER / PEM "PUBLIC KEY"） |
//! | 公開鍵フィンガープリント | SHA-256 |

use std::str::FromStr;

use rsa::pkcs1::{DecodeRsaPrivateKey, EncodeRsaPrivateKey};
use rsa::pkcs8::{EncodePublicKey, LineEnding};
use rsa::Pkcs1v15Sign;
use sha1::{Digest, Sha1};
use sha2::Sha256;

pub use rsa::{RsaPrivateKey, RsaPublicKey};

/// 署名鍵が未設定の場合に生成するRSA鍵のビット長
pub const DEFAULT_KEY_BITS: usize = 2048;

/// 暗号処理のエラー型
#[derive(Debug, thiserror::Error)]
pub enum CryptoError {
    /// RSA鍵生成エラー
    #[error("RSA鍵の生成に失敗しました: {0}")]
    KeyGeneration(String),
    /// PEMブロックのデコードエラー
    #[error("PEM鍵のデコードに失敗しました: {0}")]
    PemDecode(String),
    /// PKCS#1秘密鍵のパースエラー
    #[error("PKCS#1秘密鍵のパースに失敗しました: {0}")]
    KeyParse(String),
    /// 鍵のエンコードエラー
    #[error("鍵のエンコードに失敗しました: {0}")]
    KeyEncode(String),
    /// RSA署名エラー
    #[error("RSA署名に失敗しました: {0}")]
    Sign(String),
    /// RSA署名検証エラー
    #[error("RSA署名検証に失敗しました")]
    SignatureVerify,
    /// 未対応の公開鍵形式
    #[error("不正な鍵形式です: \"der\" または \"pem\" を指定してください (指定値: {0:?})")]
    UnsupportedFormat(String),
}

// ---------------------------------------------------------------------------
// 公開鍵形式
// ---------------------------------------------------------------------------

/// 公開鍵のエクスポート形式。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyFormat {
    /// ASN.1 DERエンコードのSubjectPublicKeyInfo
    Der,
    /// DERを "PUBLIC KEY" PEMブロックで包んだもの
    Pem,
}

impl FromStr for KeyFormat {
    type Err = CryptoError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "der" => Ok(KeyFormat::Der),
            "pem" => Ok(KeyFormat::Pem),
            other => Err(CryptoError::UnsupportedFormat(other.to_string())),
        }
    }
}

// ---------------------------------------------------------------------------
// 鍵のブートストラップ
// ---------------------------------------------------------------------------

/// 署名鍵の出自。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyOrigin {
    /// 設定値から読み込んだ永続的な鍵
    Configured,
    /// 起動時に生成した一時的な鍵（再起動で失われる）
    Generated,
}

/// 新しいRSA秘密鍵を生成する。
pub fn generate_private_key(bits: usize) -> Result<RsaPrivateKey, CryptoError> {
    let mut rng = rand::rngs::OsRng;
    RsaPrivateKey::new(&mut rng, bits).map_err(|e| CryptoError::KeyGeneration(e.to_string()))
}

/// PEMブロックからPKCS#1秘密鍵を読み込む。
///
/// PEMのラベルは問わない。ブロックの中身はPKCS#1 DERでなければならない。
pub fn parse_private_key_pem(pem: &str) -> Result<RsaPrivateKey, CryptoError> {
    let (_label, der_bytes) = der::pem::decode_vec(pem.trim().as_bytes())
        .map_err(|e| CryptoError::PemDecode(e.to_string()))?;

    RsaPrivateKey::from_pkcs1_der(&der_bytes).map_err(|e| CryptoError::KeyParse(e.to_string()))
}

/// 秘密鍵をPKCS#1 PEM（"RSA PRIVATE KEY"）にエンコードする。
pub fn encode_private_key_pem(key: &RsaPrivateKey) -> Result<String, CryptoError> {
    key.to_pkcs1_pem(LineEnding::LF)
        .map(|pem| pem.to_string())
        .map_err(|e| CryptoError::KeyEncode(e.to_string()))
}

/// 設定された鍵を読み込むか、未設定であれば一時的な鍵を生成する。
///
/// 空文字列（空白のみを含む）は未設定とみなす。
pub fn load_or_generate(configured: Option<&str>) -> Result<(RsaPrivateKey, KeyOrigin), CryptoError> {
    match configured.map(str::trim).filter(|s| !s.is_empty()) {
        Some(pem) => Ok((parse_private_key_pem(pem)?, KeyOrigin::Configured)),
        None => Ok((generate_private_key(DEFAULT_KEY_BITS)?, KeyOrigin::Generated)),
    }
}

// ---------------------------------------------------------------------------
// 署名・検証
// ---------------------------------------------------------------------------

/// SHA-1ダイジェストを計算する。
fn sha1_digest(data: &[u8]) -> Vec<u8> {
    let mut hasher = Sha1::new();
    hasher.update(data);
    hasher.finalize().to_vec()
}

/// SHA-1でダイジェストを取り、RSA PKCS#1 v1.5で署名する。
pub fn sha1_rsa_sign(key: &RsaPrivateKey, data: &[u8]) -> Result<Vec<u8>, CryptoError> {
    let digest = sha1_digest(data);
    key.sign(Pkcs1v15Sign::new::<Sha1>(), &digest)
        .map_err(|e| CryptoError::Sign(e.to_string()))
}

/// SHA1withRSA署名を検証する。
pub fn sha1_rsa_verify(
    key: &RsaPublicKey,
    data: &[u8],
    signature: &[u8],
) -> Result<(), CryptoError> {
    let digest = sha1_digest(data);
    key.verify(Pkcs1v15Sign::new::<Sha1>(), &digest, signature)
        .map_err(|_| CryptoError::SignatureVerify)
}

// ---------------------------------------------------------------------------
// 公開鍵エクスポート
// ---------------------------------------------------------------------------

/// 公開鍵を指定形式でエクスポートする。
pub fn export_public_key(key: &RsaPublicKey, format: KeyFormat) -> Result<Vec<u8>, CryptoError> {
    match format {
        KeyFormat::Der => key
            .to_public_key_der()
            .map(|doc| doc.as_bytes().to_vec())
            .map_err(|e| CryptoError::KeyEncode(e.to_string())),
        KeyFormat::Pem => key
            .to_public_key_pem(LineEnding::LF)
            .map(String::into_bytes)
            .map_err(|e| CryptoError::KeyEncode(e.to_string())),
    }
}

/// 公開鍵DERのSHA-256ハッシュ（16進数）。ログ出力用。
pub fn public_key_fingerprint(key: &RsaPublicKey) -> Result<String, CryptoError> {
    let der_bytes = export_public_key(key, KeyFormat::Der)?;
    Ok(hex::encode(Sha256::digest(&der_bytes)))
}
