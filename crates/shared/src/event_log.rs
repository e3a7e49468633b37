//! # ビジネスイベントログとエラーコンテキストの構造化ヘルパー
//!
//! CloudWatch Logs Insights や `jq` で調査しやすいよう、ログフィールドの
//! 命名規約とヘルパーマクロを提供する。
//!
//! ## ビジネスイベント
//!
//! [`log_business_event!`] マクロで出力する。`event.kind = "business_event"` マーカーが
//! 自動付与され、`jq 'select(.["event.kind"] == "business_event")'` でフィルタできる。
//!
//! ## エラーコンテキスト
//!
//! `tracing::error!` に `error.category` + `error.kind` フィールドを直接追加する。
//! 定数は [`error`] モジュールで提供。
//!
//! ## フィールド命名規約
//!
//! ドット記法（`event.category`、`error.kind`）を使用。JSON 出力でフラットなキーになる。

/// ビジネスイベントを構造化ログとして出力する。
///
/// `event.kind = "business_event"` マーカーを自動付与し、
/// `tracing::info!` レベルで出力する。呼び出し側クレートは `tracing` に依存すること。
///
/// ## 必須フィールド（慣例）
///
/// - `event.category`: イベントカテゴリ（[`event::category`] の定数を使用）
/// - `event.action`: アクション名（[`event::action`] の定数を使用）
/// - `event.result`: 結果（[`event::result`] の定数を使用）
#[macro_export]
macro_rules! log_business_event {
    ($($args:tt)*) => {
        ::tracing::info!(
            event.kind = "business_event",
            $($args)*
        )
    };
}

/// イベントフィールドの定数
pub mod event {
    /// イベントカテゴリ
    pub mod category {
        pub const ALERT: &str = "alert";
        pub const INVOCATION: &str = "invocation";
    }

    /// イベントアクション
    pub mod action {
        // アラート
        pub const ALERT_SENT: &str = "alert.sent";
        pub const ALERT_FAILED: &str = "alert.failed";

        // 呼び出し
        pub const RUNTIME_STARTED: &str = "runtime.started";
        pub const INVOCATION_COMPLETED: &str = "invocation.completed";
    }

    /// イベント結果
    pub mod result {
        pub const SUCCESS: &str = "success";
        pub const FAILURE: &str = "failure";
    }
}

/// エラーコンテキストフィールドの定数
pub mod error {
    /// エラーカテゴリ
    pub mod category {
        /// 外部サービス呼び出し（SMTP リレー、Runtime API）
        pub const EXTERNAL_SERVICE: &str = "external_service";
        /// 起動時の設定
        pub const CONFIGURATION: &str = "configuration";
    }

    /// エラー種別
    pub mod kind {
        pub const SMTP: &str = "smtp";
        pub const RUNTIME_API: &str = "runtime_api";
        pub const ENVIRONMENT: &str = "environment";
    }
}

#[cfg(test)]
mod tests {
    #[test]
    fn test_log_business_eventがコンパイルできる() {
        // サブスクライバ未設定でもパニックしないこと
        log_business_event!(
            event.category = super::event::category::ALERT,
            event.action = super::event::action::ALERT_SENT,
            event.result = super::event::result::SUCCESS,
            "テストイベント"
        );
    }
}
