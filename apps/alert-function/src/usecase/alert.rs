//! # アラート送信ユースケース
//!
//! 固定文面のアラートメールを 1 回だけ送信し、結果を記録する。
//!
//! ## 設計方針
//!
//! - **1 回限り**: リトライ・バックオフ・冪等キーは持たない
//! - **結果の返却**: 失敗は握りつぶさず `Result` で返し、呼び出し側が応答に変換する
//! - **依存性注入**: `NotificationSender` は trait オブジェクトで受け取る

use std::sync::Arc;

use loadalert_domain::{
    alert,
    email::EmailAddress,
    notification::{EmailMessage, NotificationError},
};
use loadalert_infra::NotificationSender;
use loadalert_shared::{
    event_log::{error, event},
    log_business_event,
};

/// アラート送信ユースケース
///
/// 起動時にアラートメールを組み立てておき、呼び出しごとに同じメッセージを送る。
pub struct AlertNotifier {
    sender:  Arc<dyn NotificationSender>,
    message: EmailMessage,
}

impl AlertNotifier {
    pub fn new(sender: Arc<dyn NotificationSender>, to: EmailAddress) -> Self {
        Self {
            sender,
            message: alert::unusual_load_alert(to),
        }
    }

    /// 送信するメッセージ
    pub fn message(&self) -> &EmailMessage {
        &self.message
    }

    /// アラートメールを送信する
    ///
    /// 送信先がメッセージを受理すれば `Ok(())`。失敗理由はそのまま返す。
    pub async fn notify(&self) -> Result<(), NotificationError> {
        let result = self.sender.send_email(&self.message).await;

        match &result {
            Ok(()) => {
                log_business_event!(
                    event.category = event::category::ALERT,
                    event.action = event::action::ALERT_SENT,
                    event.result = event::result::SUCCESS,
                    alert.recipient = %self.message.to,
                    alert.subject = %self.message.subject,
                    "アラートメール送信成功"
                );
            }
            Err(e) => {
                log_business_event!(
                    event.category = event::category::ALERT,
                    event.action = event::action::ALERT_FAILED,
                    event.result = event::result::FAILURE,
                    error.category = error::category::EXTERNAL_SERVICE,
                    error.kind = error::kind::SMTP,
                    alert.recipient = %self.message.to,
                    error = %e,
                    "アラートメール送信失敗"
                );
            }
        }

        result
    }
}
