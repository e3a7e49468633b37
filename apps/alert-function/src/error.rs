//! # アラート関数のエラー定義
//!
//! 起動時の設定エラーと、Runtime API との通信エラーを定義する。
//! メール送信の失敗はエラーではなく呼び出し結果として扱うため、ここには含まない。

use thiserror::Error;

/// 設定読み込みエラー
#[derive(Debug, Error)]
pub enum ConfigError {
    /// 必須の環境変数が未設定
    #[error("環境変数 {0} が設定されていません")]
    Missing(&'static str),

    /// 環境変数の値が不正
    #[error("環境変数 {name} の値が不正です: {reason}")]
    Invalid {
        /// 環境変数名
        name:   &'static str,
        /// 不正と判断した理由
        reason: String,
    },
}

/// Runtime API 通信エラー
#[derive(Debug, Error)]
pub enum RuntimeError {
    /// ネットワークエラー
    #[error("Runtime API との通信に失敗: {0}")]
    Network(String),

    /// 2xx 以外のステータス
    #[error("Runtime API が予期しないステータスを返却: {status} ({url})")]
    UnexpectedStatus {
        /// HTTP ステータスコード
        status: u16,
        /// リクエスト URL
        url:    String,
    },

    /// 必須ヘッダーの欠落
    #[error("Runtime API のレスポンスに {0} ヘッダーがありません")]
    MissingHeader(&'static str),
}

impl From<reqwest::Error> for RuntimeError {
    fn from(err: reqwest::Error) -> Self {
        RuntimeError::Network(err.to_string())
    }
}
