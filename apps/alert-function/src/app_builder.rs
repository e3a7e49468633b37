//! # アラート関数の構築
//!
//! 設定から送信バックエンドとユースケースを組み立てる。
//! `main.rs` は起動シーケンスと実行モードの切り替えに集中する。

use std::sync::Arc;

use loadalert_domain::notification::NotificationError;
use loadalert_function::{
    config::{AlertConfig, SenderConfig},
    usecase::AlertNotifier,
};
use loadalert_infra::{NoopNotificationSender, NotificationSender, SmtpNotificationSender};

/// 設定からアラート送信ユースケースを構築する
pub fn build_notifier(config: &AlertConfig) -> Result<AlertNotifier, NotificationError> {
    tracing::info!(
        backend = %config.sender.backend(),
        recipient = %config.to_address,
        "送信バックエンドを構築"
    );

    let sender: Arc<dyn NotificationSender> = match &config.sender {
        SenderConfig::Smtp(settings) => {
            tracing::info!(
                host = %settings.host,
                port = settings.port,
                security = %settings.security,
                from = %settings.from_address,
                "通知バックエンド: SMTP"
            );
            Arc::new(SmtpNotificationSender::new(settings.clone())?)
        }
        SenderConfig::Noop => {
            tracing::info!("通知バックエンド: Noop（メールは送信されません）");
            Arc::new(NoopNotificationSender)
        }
    };

    let notifier = AlertNotifier::new(sender, config.to_address.clone());
    tracing::debug!(
        subject = %notifier.message().subject,
        body_bytes = notifier.message().text_body.len(),
        "アラートメールを組み立て"
    );

    Ok(notifier)
}
