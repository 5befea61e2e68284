//! # UUIDの正規化
//!
//! クライアントから受け取ったUUID風の文字列を小文字ハイフン区切り36文字に正規化する。
//! 16進数であるかは検証しない（ASCIIであることと長さのみ検証する）。

/// ハイフンを除いたUUIDのバイト数
const SIMPLE_LEN: usize = 32;

/// ハイフンを挿入する区切り（8-4-4-4-12）
const GROUPS: [usize; 5] = [8, 4, 4, 4, 12];

/// UUIDの形式が不正。
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("不正なUUID: ハイフンを除いた長さが{length}バイトです（ASCII 32文字である必要があります）")]
pub struct InvalidUuid {
    /// ハイフンを除いたバイト数
    pub length: usize,
}

/// 小文字ハイフン区切り36文字のUUID。
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CanonicalUuid(String);

impl CanonicalUuid {
    /// ハイフン区切りの文字列
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// UUID風の文字列を正規化する。
///
/// ハイフンを全て取り除き、残りが32バイトのASCIIでなければ [`InvalidUuid`]。
/// 条件を満たせば8-4-4-4-12の位置にハイフンを挿入する。
pub fn normalize(raw: &str) -> Result<CanonicalUuid, InvalidUuid> {
    let stripped = simple(raw);
    if stripped.len() != SIMPLE_LEN || !stripped.is_ascii() {
        return Err(InvalidUuid {
            length: stripped.len(),
        });
    }
    let stripped = stripped.to_ascii_lowercase();

    let mut canonical = String::with_capacity(SIMPLE_LEN + GROUPS.len() - 1);
    let mut offset = 0;
    for (i, len) in GROUPS.iter().enumerate() {
        if i > 0 {
            canonical.push('-');
        }
        // ASCIIのみなのでバイト境界は文字境界と一致する
        canonical.push_str(&stripped[offset..offset + len]);
        offset += len;
    }

    Ok(CanonicalUuid(canonical))
}

/// ハイフンを取り除く。
pub fn simple(uuid: &str) -> String {
    uuid.replace('-', "")
}
