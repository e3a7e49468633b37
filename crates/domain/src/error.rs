//! # ドメイン層エラー定義
//!
//! 値オブジェクトの生成時に検出されるルール違反を表現する。

use thiserror::Error;

/// ドメイン層で発生するエラー
#[derive(Debug, Error)]
pub enum DomainError {
    /// バリデーションエラー
    ///
    /// 設定値などの入力が値オブジェクトの制約に違反している場合に使用する。
    #[error("バリデーションエラー: {0}")]
    Validation(String),
}
