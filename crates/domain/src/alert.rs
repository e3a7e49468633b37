//! # 高負荷アラート
//!
//! EC2 インスタンスの異常負荷を知らせる固定文面のアラートメールと、
//! 1 回の呼び出し結果を定義する。
//!
//! ## ドメイン用語
//!
//! | 型 | ドメイン用語 | 用途 |
//! |---|------------|------|
//! | [`unusual_load_alert`] | 高負荷アラート | 固定の件名・本文を持つメール |
//! | [`InvocationOutcome`] | 呼び出し結果 | 送信成功 / 失敗理由の二値 |
//!
//! 件名と本文は定数で、テンプレート展開は行わない。

use crate::{
    email::EmailAddress,
    notification::{EmailMessage, NotificationError},
};

/// アラートメールの件名
pub const SUBJECT: &str = "Immediate Attention Required: Unusual Load on EC2 Instance";

/// アラートメールの本文
pub const BODY: &str = concat!(
    "Dear Team,\n",
    "\n",
    "We have detected an unusual load on one of our EC2 instances. While our auto-scaling \
     setup is active and will automatically manage the increased demand by provisioning \
     additional instances, this unexpected spike in usage may lead to higher operational \
     costs.\n",
    "\n",
    "Action Required:\n",
    "\n",
    "Immediate Review: Please investigate the source of this unusual load to determine the \
     cause and address any underlying issues.\n",
    "Cost Management: Monitor the auto-scaling activities closely to understand the impact \
     on our AWS billing. Adjust thresholds and scaling policies if necessary to optimize \
     cost efficiency.\n",
    "Performance Assurance: Ensure that all additional instances are functioning correctly \
     and maintaining our performance standards during this period of increased load.\n",
    "Your prompt attention to this matter is crucial to ensure system stability and \
     cost-effective operations. Please provide an update on your findings and any corrective \
     actions taken.\n",
    "\n",
    "Thank you for your cooperation.",
);

/// 送信成功時にレスポンスへ載せるメッセージ
pub const SUCCESS_MESSAGE: &str = "Email sent successfully";

/// 高負荷アラートメールを組み立てる
///
/// 件名・本文は常に同じ。宛先のみデプロイ設定から渡される。
pub fn unusual_load_alert(to: EmailAddress) -> EmailMessage {
    EmailMessage {
        to,
        subject: SUBJECT.to_string(),
        text_body: BODY.to_string(),
    }
}

/// 1 回の呼び出しの結果
///
/// 送信処理の `Result` を畳み込んだもの。リトライや部分成功は存在しない。
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InvocationOutcome {
    /// リレーがメッセージを受理した
    Sent,
    /// 送信に失敗した
    Failed {
        /// 失敗理由の詳細
        reason: String,
    },
}

impl InvocationOutcome {
    /// 送信成功か
    pub fn is_sent(&self) -> bool {
        matches!(self, Self::Sent)
    }
}

impl From<Result<(), NotificationError>> for InvocationOutcome {
    fn from(result: Result<(), NotificationError>) -> Self {
        match result {
            Ok(()) => Self::Sent,
            Err(e) => Self::Failed {
                reason: e.detail().to_string(),
            },
        }
    }
}
