//! # LoadAlert インフラ層
//!
//! 外部システム（SMTP リレー）との通信を担当するインフラストラクチャ層。
//!
//! ## 依存関係
//!
//! ```text
//! alert-function → infra → domain
//! ```
//!
//! ドメイン層はインフラ層に依存しない。
//!
//! ## モジュール構成
//!
//! - [`notification`] - メール送信の抽象と SMTP / Noop 実装
//! - `mock` - テスト用の記録型送信実装（`test-utils` feature）

pub mod notification;

#[cfg(feature = "test-utils")]
pub mod mock;

pub use notification::{NotificationSender, NoopNotificationSender, SmtpNotificationSender};
