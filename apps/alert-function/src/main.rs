//! # 高負荷アラート関数
//!
//! 呼び出されるたびに EC2 高負荷アラートメールを SMTP リレー経由で 1 通送信し、
//! `{statusCode, body}` を返す Lambda 関数（カスタムランタイム）。
//!
//! ## 実行モード
//!
//! | `AWS_LAMBDA_RUNTIME_API` | 動作 |
//! |--------------------------|------|
//! | 設定あり | Runtime API から呼び出しを受け取り続ける |
//! | 未設定 | `null` イベントで 1 回だけ実行し、レスポンスを標準出力に書く |
//!
//! 環境変数の一覧は [`loadalert_function::config`] を参照。
//!
//! ## 起動方法
//!
//! ```bash
//! # ローカルでドライラン
//! NOTIFICATION_BACKEND=noop ALERT_TO_ADDRESS=oncall@example.com \
//!   cargo run -p loadalert-function
//!
//! # Mailpit に送信
//! SMTP_HOST=localhost SMTP_PORT=1025 SMTP_SECURITY=none \
//!   ALERT_FROM_ADDRESS=alerts@example.com ALERT_TO_ADDRESS=oncall@example.com \
//!   cargo run -p loadalert-function
//! ```

mod app_builder;

use anyhow::Context as _;
use loadalert_function::{
    config::{self, AlertConfig},
    handler::{InvocationContext, handle_invocation},
    runtime::{self, RuntimeClient},
};
use loadalert_shared::{
    InvocationBody,
    event_log::error,
    observability::{self, TracingConfig},
};
use serde_json::Value;
use tracing::Instrument as _;

/// サービス名（ルートスパンの `service` フィールド）
const SERVICE_NAME: &str = "loadalert-function";

/// アラート関数のエントリーポイント
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // .env ファイルを読み込む（存在する場合）
    dotenvy::dotenv().ok();

    let tracing_config = TracingConfig::from_env(SERVICE_NAME);
    observability::init_tracing(&tracing_config);

    let span = tracing::info_span!("app", service = %tracing_config.service_name);
    start().instrument(span).await
}

async fn start() -> anyhow::Result<()> {
    let runtime_client = config::runtime_api_from_env().map(|api| RuntimeClient::new(&api));

    let notifier = match AlertConfig::from_env()
        .map_err(anyhow::Error::from)
        .and_then(|config| app_builder::build_notifier(&config).map_err(anyhow::Error::from))
    {
        Ok(notifier) => notifier,
        Err(e) => {
            tracing::error!(
                error.category = error::category::CONFIGURATION,
                error.kind = error::kind::ENVIRONMENT,
                error = %e,
                "初期化に失敗しました"
            );
            if let Some(client) = &runtime_client
                && let Err(report_error) = client.post_init_error(&e.to_string()).await
            {
                tracing::error!(error = %report_error, "初期化エラーの報告に失敗しました");
            }
            return Err(e.context("初期化に失敗しました"));
        }
    };

    match runtime_client {
        Some(client) => {
            tracing::info!("Runtime API モードで起動します");
            runtime::run(&client, &notifier).await?;
        }
        None => {
            tracing::info!("AWS_LAMBDA_RUNTIME_API が未設定のためローカルで 1 回だけ実行します");
            let response =
                handle_invocation(&notifier, &Value::Null, &InvocationContext::local()).await;
            println!(
                "{}",
                serde_json::to_string_pretty(&response).context("レスポンスの出力に失敗しました")?
            );
            match response
                .decode_body()
                .context("レスポンス本文の解析に失敗しました")?
            {
                InvocationBody::Message(_) => {}
                InvocationBody::Error(reason) => {
                    anyhow::bail!("アラートメールの送信に失敗しました: {reason}");
                }
            }
        }
    }

    Ok(())
}
