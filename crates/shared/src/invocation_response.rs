//! # 呼び出しレスポンス
//!
//! 関数呼び出しの戻り値 `{ "statusCode": u16, "body": "<JSON 文字列>" }` を提供する。
//!
//! ## 設計
//!
//! - `body` は JSON オブジェクトではなく JSON を文字列化したもの（API Gateway プロキシ互換）
//! - 本文は成功時 `{"message": ...}`、失敗時 `{"error": ...}` のいずれか
//! - 純粋なデータ構造。ステータスの決定はドメイン層の責務

use serde::{Deserialize, Serialize};

/// 成功時のステータスコード
pub const STATUS_OK: u16 = 200;
/// 失敗時のステータスコード
pub const STATUS_INTERNAL_ERROR: u16 = 500;

/// レスポンス本文
///
/// 外部タグ付き enum としてシリアライズされるため、
/// `Message("x")` は `{"message":"x"}`、`Error("x")` は `{"error":"x"}` になる。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InvocationBody {
    /// 成功メッセージ
    Message(String),
    /// 失敗理由
    Error(String),
}

/// 関数呼び出しのレスポンス
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InvocationResponse {
    #[serde(rename = "statusCode")]
    pub status_code: u16,
    pub body:        String,
}

impl InvocationResponse {
    /// ステータスコードと本文から作成する
    ///
    /// 本文は JSON 文字列化して `body` に格納する。
    pub fn new(status_code: u16, body: &InvocationBody) -> Self {
        Self {
            status_code,
            body: Self::encode_body(body),
        }
    }

    /// 200 OK（`{"message": ...}`）
    pub fn ok(message: impl Into<String>) -> Self {
        Self::new(STATUS_OK, &InvocationBody::Message(message.into()))
    }

    /// 500 Internal Server Error（`{"error": ...}`）
    pub fn internal_error(error: impl Into<String>) -> Self {
        Self::new(STATUS_INTERNAL_ERROR, &InvocationBody::Error(error.into()))
    }

    /// `body` を構造化して取り出す
    pub fn decode_body(&self) -> Result<InvocationBody, serde_json::Error> {
        serde_json::from_str(&self.body)
    }

    fn encode_body(body: &InvocationBody) -> String {
        // 文字列のみを含む enum のシリアライズは失敗しない
        serde_json::to_string(body)
            .unwrap_or_else(|_| String::from(r#"{"error":"response encoding failed"}"#))
    }
}
