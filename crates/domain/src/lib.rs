//! # LoadAlert ドメイン層
//!
//! EC2 高負荷アラートメールのドメインモデルを定義する。
//!
//! ## 依存関係の方向
//!
//! ```text
//! alert-function → infra → domain
//! ```
//!
//! ドメイン層はメール送信の具体的な方法（SMTP 等）には一切依存しない。
//!
//! ## モジュール構成
//!
//! - [`error`] - ドメイン層で発生するエラーの定義
//! - [`email`] - メールアドレス値オブジェクト
//! - [`notification`] - メールメッセージと送信エラー
//! - [`alert`] - 高負荷アラートの固定文面と呼び出し結果
//!
//! ## 使用例
//!
//! ```rust
//! use loadalert_domain::{alert, email::EmailAddress};
//!
//! let to = EmailAddress::new("oncall@example.com").unwrap();
//! let message = alert::unusual_load_alert(to);
//! assert_eq!(message.subject, alert::SUBJECT);
//! ```

pub mod alert;
pub mod email;
pub mod error;
pub mod notification;

pub use error::DomainError;
