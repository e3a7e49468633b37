//! # 呼び出しハンドラ
//!
//! 1 回の呼び出しでアラートを送信し、結果を `{statusCode, body}` に変換する。
//!
//! | 結果 | statusCode | body |
//! |------|-----------|------|
//! | 送信成功 | 200 | `{"message": "Email sent successfully"}` |
//! | 送信失敗 | 500 | `{"error": "<失敗理由>"}` |
//!
//! ハンドラ自体は失敗しない。イベントとコンテキストはログのためにのみ参照する。

use loadalert_domain::alert::{InvocationOutcome, SUCCESS_MESSAGE};
use loadalert_shared::{InvocationResponse, event_log::event, log_business_event};
use serde_json::Value;

use crate::usecase::AlertNotifier;

/// 呼び出しコンテキスト
///
/// Runtime API のレスポンスヘッダーから組み立てる。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvocationContext {
    /// 呼び出しごとのリクエスト ID
    pub request_id:           String,
    /// 実行期限（UNIX エポックミリ秒）
    pub deadline_ms:          Option<u64>,
    /// 呼び出された関数の ARN
    pub invoked_function_arn: Option<String>,
    /// X-Ray トレースヘッダー
    pub trace_id:             Option<String>,
}

impl InvocationContext {
    /// ローカル実行用のコンテキスト
    pub fn local() -> Self {
        Self {
            request_id:           "local".to_string(),
            deadline_ms:          None,
            invoked_function_arn: None,
            trace_id:             None,
        }
    }
}

/// 呼び出しを処理する
///
/// アラートを 1 回送信し、成否をステータスコードと JSON 本文に変換する。
#[tracing::instrument(
    name = "invocation",
    skip_all,
    fields(request_id = %context.request_id)
)]
pub async fn handle_invocation(
    notifier: &AlertNotifier,
    event: &Value,
    context: &InvocationContext,
) -> InvocationResponse {
    tracing::debug!(payload = %event, deadline_ms = ?context.deadline_ms, "呼び出しを受信");

    let outcome = InvocationOutcome::from(notifier.notify().await);
    let response = into_response(&outcome);

    let result = if outcome.is_sent() {
        event::result::SUCCESS
    } else {
        event::result::FAILURE
    };
    log_business_event!(
        event.category = event::category::INVOCATION,
        event.action = event::action::INVOCATION_COMPLETED,
        event.result = result,
        status_code = response.status_code,
        "呼び出し完了"
    );

    response
}

/// 呼び出し結果をレスポンスに変換する
pub fn into_response(outcome: &InvocationOutcome) -> InvocationResponse {
    match outcome {
        InvocationOutcome::Sent => InvocationResponse::ok(SUCCESS_MESSAGE),
        InvocationOutcome::Failed { reason } => InvocationResponse::internal_error(reason.clone()),
    }
}
