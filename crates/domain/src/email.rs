//! # メールアドレス
//!
//! 送信元・宛先として使うメールアドレスの値オブジェクト。

use derive_more::Display;

use crate::DomainError;

/// アドレスの最大オクテット数（RFC 5321 の Forward-path 上限）
const MAX_LEN: usize = 254;

/// メールアドレス（値オブジェクト）
///
/// 生成時に最低限の構造検証を行う。厳密な構文検査は送信時に
/// メールライブラリ側で行われる。
#[derive(Debug, Clone, PartialEq, Eq, Display)]
#[display("{_0}")]
pub struct EmailAddress(String);

impl EmailAddress {
    /// メールアドレスを作成する
    ///
    /// # バリデーション
    ///
    /// - 前後の空白は除去する
    /// - 空文字列ではない
    /// - `local@domain` の形式で、どちらも空でない
    /// - UTF-8 で最大 254 オクテット
    pub fn new(value: impl Into<String>) -> Result<Self, DomainError> {
        let value = value.into().trim().to_string();

        if value.is_empty() {
            return Err(DomainError::Validation(
                "メールアドレスは必須です".to_string(),
            ));
        }

        let Some((local, domain)) = value.rsplit_once('@') else {
            return Err(DomainError::Validation(format!(
                "メールアドレスの形式が不正です: {value}"
            )));
        };

        if local.is_empty() || domain.is_empty() || domain.contains(char::is_whitespace) {
            return Err(DomainError::Validation(format!(
                "メールアドレスの形式が不正です: {value}"
            )));
        }

        if value.len() > MAX_LEN {
            return Err(DomainError::Validation(format!(
                "メールアドレスは{MAX_LEN}バイト以内である必要があります"
            )));
        }

        Ok(Self(value))
    }

    /// 文字列参照を取得する
    pub fn as_str(&self) -> &str {
        &self.0
    }
}
