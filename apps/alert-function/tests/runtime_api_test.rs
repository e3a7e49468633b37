//! # Runtime API クライアントの統合テスト
//!
//! axum で Lambda Runtime API を模したサーバーを立て、
//! 呼び出しの取得 → ハンドラ実行 → レスポンス返却の一連の流れを検証する。
//!
//! - 呼び出しごとにリクエスト ID 固有の URL へレスポンスが 1 回だけ送られる
//! - 送信成功 / 失敗がそれぞれ 200 / 500 のレスポンスになる
//! - 初期化エラーが所定のヘッダーと本文で報告される

use std::{
    net::SocketAddr,
    sync::{
        Arc,
        Mutex,
        atomic::{AtomicUsize, Ordering},
    },
    time::Duration,
};

use axum::{
    Json,
    Router,
    extract::{Path, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
};
use loadalert_domain::email::EmailAddress;
use loadalert_function::{
    error::RuntimeError,
    runtime::{RuntimeClient, run, run_once},
    usecase::AlertNotifier,
};
use loadalert_infra::mock::MockNotificationSender;
use pretty_assertions::assert_eq;
use serde_json::{Value, json};
use tokio::net::TcpListener;

const REQUEST_ID: &str = "8476a536-e9f4-11e8-9739-2dfe598c3fcd";

/// Runtime API エミュレータの状態
#[derive(Clone)]
struct EmulatorState {
    /// `/next` が返すステータス
    next_status:     StatusCode,
    /// `/next` がリクエスト ID ヘッダーを付けるか
    with_request_id: bool,
    /// `/next` が返す本文
    next_body:       String,
    /// 何回目の `/next` から 500 を返すか（0 始まり）
    fail_from_poll:  Option<usize>,
    /// `/next` が呼ばれた回数
    polls:           Arc<AtomicUsize>,
    /// 受け取ったレスポンス（リクエスト ID, 本文）
    responses:       Arc<Mutex<Vec<(String, Value)>>>,
    /// 受け取った初期化エラー（エラー種別ヘッダー, 本文）
    init_errors:     Arc<Mutex<Vec<(Option<String>, Value)>>>,
}

impl Default for EmulatorState {
    fn default() -> Self {
        Self {
            next_status:     StatusCode::OK,
            with_request_id: true,
            next_body:       json!({ "source": "aws.cloudwatch" }).to_string(),
            fail_from_poll:  None,
            polls:           Arc::default(),
            responses:       Arc::default(),
            init_errors:     Arc::default(),
        }
    }
}

async fn next_invocation(State(state): State<EmulatorState>) -> Response {
    let poll = state.polls.fetch_add(1, Ordering::SeqCst);
    if state.fail_from_poll.is_some_and(|from| poll >= from) {
        return StatusCode::INTERNAL_SERVER_ERROR.into_response();
    }

    let mut headers = HeaderMap::new();
    if state.with_request_id {
        headers.insert("lambda-runtime-aws-request-id", REQUEST_ID.parse().unwrap());
    }
    headers.insert("lambda-runtime-deadline-ms", "1542409706888".parse().unwrap());
    headers.insert(
        "lambda-runtime-invoked-function-arn",
        "arn:aws:lambda:us-east-2:123456789012:function:load-alert"
            .parse()
            .unwrap(),
    );
    headers.insert(
        "lambda-runtime-trace-id",
        "Root=1-5bef4de7-ad49b0e87f6ef6c87fc2e700".parse().unwrap(),
    );

    (state.next_status, headers, state.next_body.clone()).into_response()
}

async fn invocation_response(
    State(state): State<EmulatorState>,
    Path(request_id): Path<String>,
    Json(body): Json<Value>,
) -> StatusCode {
    state.responses.lock().unwrap().push((request_id, body));
    StatusCode::ACCEPTED
}

async fn init_error(
    State(state): State<EmulatorState>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> StatusCode {
    let error_type = headers
        .get("lambda-runtime-function-error-type")
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);
    state.init_errors.lock().unwrap().push((error_type, body));
    StatusCode::ACCEPTED
}

/// エミュレータを起動し、`AWS_LAMBDA_RUNTIME_API` 相当のアドレスを返す
async fn start_emulator(state: EmulatorState) -> SocketAddr {
    let app = Router::new()
        .route("/2018-06-01/runtime/invocation/next", get(next_invocation))
        .route(
            "/2018-06-01/runtime/invocation/{request_id}/response",
            post(invocation_response),
        )
        .route("/2018-06-01/runtime/init/error", post(init_error))
        .with_state(state);

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    addr
}

fn notifier(sender: &MockNotificationSender) -> AlertNotifier {
    AlertNotifier::new(
        Arc::new(sender.clone()),
        EmailAddress::new("oncall@example.com").unwrap(),
    )
}

#[tokio::test]
async fn test_送信成功時に200レスポンスをリクエストid宛てに返す() {
    let state = EmulatorState::default();
    let addr = start_emulator(state.clone()).await;
    let client = RuntimeClient::new(&addr.to_string());
    let sender = MockNotificationSender::new();

    run_once(&client, &notifier(&sender)).await.unwrap();

    let responses = state.responses.lock().unwrap().clone();
    assert_eq!(
        responses,
        vec![(
            REQUEST_ID.to_string(),
            json!({
                "statusCode": 200,
                "body": "{\"message\":\"Email sent successfully\"}"
            })
        )]
    );
    assert_eq!(sender.sent_messages().len(), 1);
}

#[tokio::test]
async fn test_送信失敗時に500レスポンスを返す() {
    let state = EmulatorState::default();
    let addr = start_emulator(state.clone()).await;
    let client = RuntimeClient::new(&addr.to_string());
    let sender = MockNotificationSender::failing("Connection refused (os error 111)");

    run_once(&client, &notifier(&sender)).await.unwrap();

    let responses = state.responses.lock().unwrap().clone();
    assert_eq!(responses.len(), 1);
    assert_eq!(
        responses[0].1,
        json!({
            "statusCode": 500,
            "body": "{\"error\":\"Connection refused (os error 111)\"}"
        })
    );
}

#[tokio::test]
async fn test_呼び出しごとにレスポンスを1回ずつ返す() {
    let state = EmulatorState::default();
    let addr = start_emulator(state.clone()).await;
    let client = RuntimeClient::new(&addr.to_string());
    let sender = MockNotificationSender::new();
    let notifier = notifier(&sender);

    for _ in 0..3 {
        run_once(&client, &notifier).await.unwrap();
    }

    assert_eq!(state.responses.lock().unwrap().len(), 3);
    assert_eq!(sender.sent_messages().len(), 3);
}

#[tokio::test]
async fn test_next_invocationがイベントとコンテキストを返す() {
    let addr = start_emulator(EmulatorState::default()).await;
    let client = RuntimeClient::new(&addr.to_string());

    let invocation = client.next_invocation().await.unwrap();

    assert_eq!(invocation.event, json!({ "source": "aws.cloudwatch" }));
    assert_eq!(invocation.context.request_id, REQUEST_ID);
    assert_eq!(invocation.context.deadline_ms, Some(1_542_409_706_888));
    assert_eq!(
        invocation.context.invoked_function_arn.as_deref(),
        Some("arn:aws:lambda:us-east-2:123456789012:function:load-alert")
    );
    assert_eq!(
        invocation.context.trace_id.as_deref(),
        Some("Root=1-5bef4de7-ad49b0e87f6ef6c87fc2e700")
    );
}

#[tokio::test]
async fn test_jsonでないイベント本文はnullとして扱う() {
    let addr = start_emulator(EmulatorState {
        next_body: "not json".to_string(),
        ..EmulatorState::default()
    })
    .await;
    let client = RuntimeClient::new(&addr.to_string());

    let invocation = client.next_invocation().await.unwrap();

    assert_eq!(invocation.event, Value::Null);
}

#[tokio::test]
async fn test_リクエストidがない場合はmissing_headerを返す() {
    let addr = start_emulator(EmulatorState {
        with_request_id: false,
        ..EmulatorState::default()
    })
    .await;
    let client = RuntimeClient::new(&addr.to_string());

    let result = client.next_invocation().await;

    assert!(matches!(result, Err(RuntimeError::MissingHeader(_))));
}

#[tokio::test]
async fn test_runtime_apiのエラーステータスはunexpected_statusになる() {
    let state = EmulatorState {
        next_status: StatusCode::INTERNAL_SERVER_ERROR,
        ..EmulatorState::default()
    };
    let addr = start_emulator(state.clone()).await;
    let client = RuntimeClient::new(&addr.to_string());
    let sender = MockNotificationSender::new();

    let result = run_once(&client, &notifier(&sender)).await;

    assert!(matches!(
        result,
        Err(RuntimeError::UnexpectedStatus { status: 500, .. })
    ));
    assert!(sender.sent_messages().is_empty(), "メールは送信されないこと");
    assert!(state.responses.lock().unwrap().is_empty());
}

#[tokio::test]
async fn test_runはruntime_apiが失敗するまで呼び出しを処理し続ける() {
    let state = EmulatorState {
        fail_from_poll: Some(1),
        ..EmulatorState::default()
    };
    let addr = start_emulator(state.clone()).await;
    let client = RuntimeClient::new(&addr.to_string());
    let sender = MockNotificationSender::new();

    let result = tokio::time::timeout(Duration::from_secs(5), run(&client, &notifier(&sender)))
        .await
        .expect("run は Runtime API の失敗で終了すること");

    assert!(matches!(
        result,
        Err(RuntimeError::UnexpectedStatus { status: 500, .. })
    ));
    assert_eq!(state.polls.load(Ordering::SeqCst), 2);
    assert_eq!(state.responses.lock().unwrap().len(), 1);
    assert_eq!(sender.sent_messages().len(), 1);
}

#[tokio::test]
async fn test_初期化エラーを種別ヘッダー付きで報告する() {
    let state = EmulatorState::default();
    let addr = start_emulator(state.clone()).await;
    let client = RuntimeClient::new(&addr.to_string());

    client
        .post_init_error("環境変数 ALERT_TO_ADDRESS が設定されていません")
        .await
        .unwrap();

    let init_errors = state.init_errors.lock().unwrap().clone();
    assert_eq!(
        init_errors,
        vec![(
            Some("Runtime.InitError".to_string()),
            json!({
                "errorMessage": "環境変数 ALERT_TO_ADDRESS が設定されていません",
                "errorType": "Runtime.InitError"
            })
        )]
    );
}

#[tokio::test]
async fn test_runtime_apiに接続できない場合はnetworkエラーになる() {
    // 起動直後に閉じたリスナーのアドレスには誰も待ち受けていない
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    let client = RuntimeClient::new(&addr.to_string());

    let result = client.next_invocation().await;

    assert!(matches!(result, Err(RuntimeError::Network(_))));
}
