//! # 通知
//!
//! メール通知に関するドメインモデルを定義する。
//!
//! ## 設計方針
//!
//! - **送信元は送信側の責務**: `EmailMessage` は宛先と内容のみを持ち、
//!   送信元アドレスは `NotificationSender` 実装が保持する
//! - **単一のエラー種別**: 認証・ネットワーク・メッセージ構築の失敗を区別せず
//!   [`NotificationError::SendFailed`] に集約する

use thiserror::Error;

use crate::email::EmailAddress;

/// 通知送信エラー
#[derive(Debug, Error)]
pub enum NotificationError {
    /// メール送信に失敗
    ///
    /// 保持する文字列は失敗理由の詳細で、呼び出しレスポンスにそのまま載る。
    #[error("メール送信に失敗: {0}")]
    SendFailed(String),

    /// 送信設定が不正（起動時に検出される）
    #[error("送信設定が不正: {0}")]
    Setup(String),
}

impl NotificationError {
    /// 失敗理由の詳細を返す
    pub fn detail(&self) -> &str {
        match self {
            Self::SendFailed(detail) | Self::Setup(detail) => detail,
        }
    }
}

/// メールメッセージ
///
/// `NotificationSender` に渡される送信単位。本文はプレーンテキストのみ。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmailMessage {
    /// 送信先メールアドレス
    pub to:        EmailAddress,
    /// 件名
    pub subject:   String,
    /// プレーンテキスト本文
    pub text_body: String,
}
