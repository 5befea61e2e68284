//! # プロフィール署名
//!
//! プロパティ値への署名と検証用公開鍵の公開を抽象化する。

use profiles_crypto::{CryptoError, KeyFormat, RsaPrivateKey, RsaPublicKey};

/// プロパティ値に署名するサービス。
///
/// 同期的なインターフェース。プロセス全体で1つの鍵のみを扱う。
pub trait ProfileSigner: Send + Sync {
    /// SHA1withRSAで署名する。
    fn sign(&self, data: &[u8]) -> Result<Vec<u8>, CryptoError>;

    /// 公開鍵を `"der"` または `"pem"` 形式で取得する。
    /// それ以外の形式は [`CryptoError::UnsupportedFormat`]。
    fn get_public_key(&self, format: &str) -> Result<Vec<u8>, CryptoError>;
}

/// プロセス内に保持したRSA秘密鍵で署名する実装。
///
/// 鍵は起動時に一度だけ読み込まれ、実行中に差し替えられることはない。
pub struct LocalSigner {
    key: RsaPrivateKey,
    public_key: RsaPublicKey,
}

impl LocalSigner {
    /// 秘密鍵から署名サービスを作成する。
    pub fn new(key: RsaPrivateKey) -> Self {
        let public_key = key.to_public_key();
        Self { key, public_key }
    }

    /// 検証用公開鍵
    pub fn public_key(&self) -> &RsaPublicKey {
        &self.public_key
    }
}

impl ProfileSigner for LocalSigner {
    fn sign(&self, data: &[u8]) -> Result<Vec<u8>, CryptoError> {
        profiles_crypto::sha1_rsa_sign(&self.key, data)
    }

    fn get_public_key(&self, format: &str) -> Result<Vec<u8>, CryptoError> {
        let format: KeyFormat = format.parse()?;
        profiles_crypto::export_public_key(&self.public_key, format)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_local_signer() {
        let signer = LocalSigner::new(profiles_crypto::generate_private_key(1024).unwrap());

        let signature = signer.sign(b"data").unwrap();
        profiles_crypto::sha1_rsa_verify(signer.public_key(), b"data", &signature).unwrap();

        let pem = signer.get_public_key("pem").unwrap();
        assert!(pem.starts_with(b"-----BEGIN PUBLIC KEY-----"));
        let der = signer.get_public_key("der").unwrap();
        assert_eq!(der[0], 0x30, "DERはSEQUENCEで始まる");

        assert!(matches!(
            signer.get_public_key("ssh"),
            Err(CryptoError::UnsupportedFormat(_))
        ));
    }
}
