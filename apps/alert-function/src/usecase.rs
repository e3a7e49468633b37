//! # ユースケース層
//!
//! - [`alert`] - 高負荷アラートメールの送信

pub mod alert;

pub use alert::AlertNotifier;
