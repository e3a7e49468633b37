//! Noop 通知送信実装
//!
//! メールを実際に送信せず、ログ出力のみ行う。
//! `NOTIFICATION_BACKEND=noop` でのドライランに使用する。

use async_trait::async_trait;
use loadalert_domain::notification::{EmailMessage, NotificationError};

use super::NotificationSender;

/// Noop 通知送信
///
/// 宛先と件名をログに残し、常に送信成功として扱う。
#[derive(Debug, Clone)]
pub struct NoopNotificationSender;

#[async_trait]
impl NotificationSender for NoopNotificationSender {
    async fn send_email(&self, email: &EmailMessage) -> Result<(), NotificationError> {
        tracing::info!(
            alert.recipient = %email.to,
            alert.subject = %email.subject,
            body_bytes = email.text_body.len(),
            "ドライラン: アラートメールを送信せず受理扱いにする"
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use loadalert_domain::{alert, email::EmailAddress};

    use super::*;

    #[tokio::test]
    async fn send_emailがエラーを返さない() {
        let sender = NoopNotificationSender;
        let email = alert::unusual_load_alert(EmailAddress::new("test@example.com").unwrap());

        let result = sender.send_email(&email).await;
        assert!(result.is_ok());
    }
}
