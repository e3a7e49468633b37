//! # Lambda Runtime API クライアント
//!
//! カスタムランタイム（`provided.al2023`）として Lambda の Runtime API と通信し、
//! 呼び出しを 1 件ずつ受け取ってハンドラに渡す。
//!
//! ```text
//! ┌──────────────┐  GET  /runtime/invocation/next         ┌──────────────┐
//! │  Runtime API │ ─────────────────────────────────────▶ │   関数本体   │
//! │   (Lambda)   │ ◀───────────────────────────────────── │              │
//! └──────────────┘  POST /runtime/invocation/{id}/response└──────────────┘
//! ```
//!
//! 呼び出しは逐次処理する。Runtime API 自体との通信に失敗した場合のみループを抜け、
//! プロセスの再起動は Lambda に任せる。

use loadalert_shared::{
    InvocationResponse,
    event_log::{error, event},
    log_business_event,
};
use reqwest::{Response, header::HeaderMap};
use serde::Serialize;
use serde_json::Value;

use crate::{
    error::RuntimeError,
    handler::{InvocationContext, handle_invocation},
    usecase::AlertNotifier,
};

/// Runtime API のバージョン
const API_VERSION: &str = "2018-06-01";

/// 初期化エラーの種別（`Lambda-Runtime-Function-Error-Type`）
const INIT_ERROR_TYPE: &str = "Runtime.InitError";

/// Runtime API のヘッダー名
pub mod header {
    pub const REQUEST_ID: &str = "lambda-runtime-aws-request-id";
    pub const DEADLINE_MS: &str = "lambda-runtime-deadline-ms";
    pub const INVOKED_FUNCTION_ARN: &str = "lambda-runtime-invoked-function-arn";
    pub const TRACE_ID: &str = "lambda-runtime-trace-id";
    pub const FUNCTION_ERROR_TYPE: &str = "lambda-runtime-function-error-type";
}

/// Runtime API から受け取った 1 件の呼び出し
#[derive(Debug, Clone)]
pub struct Invocation {
    /// プラットフォームから渡されたイベント（本文が JSON でなければ `null`）
    pub event:   Value,
    /// 呼び出しコンテキスト
    pub context: InvocationContext,
}

/// エラー報告の本文
#[derive(Debug, Serialize)]
struct ErrorReport<'a> {
    #[serde(rename = "errorMessage")]
    error_message: &'a str,
    #[serde(rename = "errorType")]
    error_type:    &'a str,
}

/// Runtime API クライアント
#[derive(Clone)]
pub struct RuntimeClient {
    base_url: String,
    client:   reqwest::Client,
}

impl RuntimeClient {
    /// 新しい RuntimeClient を作成する
    ///
    /// # 引数
    ///
    /// - `runtime_api`: `AWS_LAMBDA_RUNTIME_API` の値（例: `127.0.0.1:9001`）
    ///
    /// 次の呼び出しを待つロングポーリングのため、リクエストタイムアウトは設定しない。
    pub fn new(runtime_api: &str) -> Self {
        Self {
            base_url: format!("http://{}/{API_VERSION}", runtime_api.trim_end_matches('/')),
            client:   reqwest::Client::new(),
        }
    }

    /// 次の呼び出しを取得する
    ///
    /// `GET /runtime/invocation/next`。呼び出しが届くまでブロックする。
    pub async fn next_invocation(&self) -> Result<Invocation, RuntimeError> {
        let url = format!("{}/runtime/invocation/next", self.base_url);
        let response = ensure_success(self.client.get(&url).send().await?, &url)?;

        let context = context_from_headers(response.headers())?;
        let body = response.bytes().await?;

        let event = if body.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&body).unwrap_or_else(|e| {
                tracing::warn!(
                    request_id = %context.request_id,
                    error = %e,
                    "イベント本文を JSON として解釈できないため null として扱う"
                );
                Value::Null
            })
        };

        Ok(Invocation { event, context })
    }

    /// 呼び出しのレスポンスを返す
    ///
    /// `POST /runtime/invocation/{request_id}/response`
    pub async fn post_response(
        &self,
        request_id: &str,
        response: &InvocationResponse,
    ) -> Result<(), RuntimeError> {
        let url = format!("{}/runtime/invocation/{request_id}/response", self.base_url);
        let result = self.client.post(&url).json(response).send().await?;
        ensure_success(result, &url)?;
        Ok(())
    }

    /// 初期化エラーを報告する
    ///
    /// `POST /runtime/init/error`。設定不備などで呼び出しを処理できない場合に使う。
    pub async fn post_init_error(&self, message: &str) -> Result<(), RuntimeError> {
        let url = format!("{}/runtime/init/error", self.base_url);
        let report = ErrorReport {
            error_message: message,
            error_type:    INIT_ERROR_TYPE,
        };

        let result = self
            .client
            .post(&url)
            .header(header::FUNCTION_ERROR_TYPE, INIT_ERROR_TYPE)
            .json(&report)
            .send()
            .await?;
        ensure_success(result, &url)?;
        Ok(())
    }
}

/// 呼び出しを 1 件処理する
///
/// 次の呼び出しを取得し、ハンドラの結果をそのまま返す。
pub async fn run_once(
    client: &RuntimeClient,
    notifier: &AlertNotifier,
) -> Result<(), RuntimeError> {
    let invocation = client.next_invocation().await?;
    let response = handle_invocation(notifier, &invocation.event, &invocation.context).await;
    client
        .post_response(&invocation.context.request_id, &response)
        .await
}

/// 呼び出しループ
///
/// Runtime API との通信に失敗するまで呼び出しを処理し続ける。
pub async fn run(client: &RuntimeClient, notifier: &AlertNotifier) -> Result<(), RuntimeError> {
    log_business_event!(
        event.category = event::category::INVOCATION,
        event.action = event::action::RUNTIME_STARTED,
        event.result = event::result::SUCCESS,
        "Runtime API の呼び出しループを開始"
    );

    loop {
        if let Err(e) = run_once(client, notifier).await {
            tracing::error!(
                error.category = error::category::EXTERNAL_SERVICE,
                error.kind = error::kind::RUNTIME_API,
                error = %e,
                "Runtime API との通信に失敗したため終了"
            );
            return Err(e);
        }
    }
}

fn ensure_success(response: Response, url: &str) -> Result<Response, RuntimeError> {
    let status = response.status();
    if status.is_success() {
        Ok(response)
    } else {
        Err(RuntimeError::UnexpectedStatus {
            status: status.as_u16(),
            url:    url.to_string(),
        })
    }
}

fn context_from_headers(headers: &HeaderMap) -> Result<InvocationContext, RuntimeError> {
    let get = |name: &str| {
        headers
            .get(name)
            .and_then(|value| value.to_str().ok())
            .map(str::to_string)
    };

    Ok(InvocationContext {
        request_id:           get(header::REQUEST_ID)
            .ok_or(RuntimeError::MissingHeader(header::REQUEST_ID))?,
        deadline_ms:          get(header::DEADLINE_MS).and_then(|value| value.parse().ok()),
        invoked_function_arn: get(header::INVOKED_FUNCTION_ARN),
        trace_id:             get(header::TRACE_ID),
    })
}
