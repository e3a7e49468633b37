//! # LoadAlert 共有ユーティリティ
//!
//! アラート関数とインフラ層で共通に使うユーティリティを提供する。
//!
//! ## 設計方針
//!
//! - ビジネスロジックを含まない純粋なユーティリティのみを配置
//! - トレーシング関連の依存は `observability` feature の背後に置く

pub mod event_log;
pub mod invocation_response;
pub mod observability;

pub use invocation_response::{InvocationBody, InvocationResponse};
