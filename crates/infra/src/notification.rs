//! # 通知送信
//!
//! メール送信を担当するインフラストラクチャモジュール。
//!
//! ## 設計方針
//!
//! - **trait による抽象化**: `NotificationSender` trait でメール送信を抽象化
//! - **2 つの実装**: SMTP（リレー経由の本番送信）、Noop（ドライラン用）
//! - **環境変数切替**: `NOTIFICATION_BACKEND` でランタイム選択
//! - **1 回限りの送信**: リトライ・バックオフは行わない

mod noop;
mod smtp;

use async_trait::async_trait;
use loadalert_domain::notification::{EmailMessage, NotificationError};
pub use noop::NoopNotificationSender;
pub use smtp::{SmtpCredentials, SmtpNotificationSender, SmtpPassword, SmtpSecurity, SmtpSettings};

/// メール送信トレイト
///
/// 送信の具体的な方法を抽象化する。SMTP / Noop の 2 実装を環境変数で切り替え、
/// テストでは `mock::MockNotificationSender` を使う。
#[async_trait]
pub trait NotificationSender: Send + Sync {
    /// メールを送信する
    ///
    /// 送信先がメッセージを受理した時点で `Ok` を返す。配送確認は行わない。
    async fn send_email(&self, email: &EmailMessage) -> Result<(), NotificationError>;
}
