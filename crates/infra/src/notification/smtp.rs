//! SMTP 通知送信実装
//!
//! lettre の `AsyncSmtpTransport` を使用してメールを送信する。
//! 本番では TLS（SMTPS, 465 番）で SMTP リレーに接続し、認証情報でログインする。
//! 開発環境では Mailpit などの平文 SMTP サーバーにも接続できる。

use async_trait::async_trait;
use lettre::{
    AsyncSmtpTransport,
    AsyncTransport,
    Tokio1Executor,
    message::{Mailbox, Message, header::ContentType},
    transport::smtp::authentication::Credentials,
};
use loadalert_domain::{
    email::EmailAddress,
    notification::{EmailMessage, NotificationError},
};
use strum::{Display, EnumString};

use super::NotificationSender;

/// SMTP 接続の暗号化方式
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Display, EnumString)]
#[strum(serialize_all = "lowercase")]
pub enum SmtpSecurity {
    /// 接続直後から TLS（SMTPS）
    #[default]
    Tls,
    /// 平文で接続し STARTTLS で昇格
    StartTls,
    /// 暗号化なし（ローカル開発用）
    #[strum(serialize = "none")]
    Plaintext,
}

impl SmtpSecurity {
    /// 方式ごとの標準ポート
    pub fn default_port(self) -> u16 {
        match self {
            Self::Tls => 465,
            Self::StartTls => 587,
            Self::Plaintext => 25,
        }
    }

    /// 認証情報が必須か
    ///
    /// 暗号化された接続では必ずログインする。
    pub fn requires_credentials(self) -> bool {
        !matches!(self, Self::Plaintext)
    }
}

/// SMTP パスワード
///
/// # セキュリティ
///
/// Debug 出力ではパスワードの値をマスクする。
#[derive(Clone)]
pub struct SmtpPassword(String);

impl std::fmt::Debug for SmtpPassword {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("SmtpPassword").field(&"[REDACTED]").finish()
    }
}

impl SmtpPassword {
    /// パスワードを作成する
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// 文字列参照を取得する
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// SMTP 認証情報
#[derive(Debug, Clone)]
pub struct SmtpCredentials {
    /// ログインユーザー名
    pub username: String,
    /// パスワード
    pub password: SmtpPassword,
}

/// SMTP 接続設定
#[derive(Debug, Clone)]
pub struct SmtpSettings {
    /// リレーのホスト名（例: "smtp.gmail.com"）
    pub host:         String,
    /// リレーのポート番号
    pub port:         u16,
    /// 暗号化方式
    pub security:     SmtpSecurity,
    /// 認証情報（`SmtpSecurity::Plaintext` の場合は省略可）
    pub credentials:  Option<SmtpCredentials>,
    /// 送信元メールアドレス
    pub from_address: EmailAddress,
}

/// SMTP 通知送信
///
/// `lettre::AsyncSmtpTransport<Tokio1Executor>` をラップする。
/// コネクションプールは使わず、送信ごとに接続して QUIT で切断する。
pub struct SmtpNotificationSender {
    transport: AsyncSmtpTransport<Tokio1Executor>,
    from:      Mailbox,
}

impl SmtpNotificationSender {
    /// 新しい SMTP 送信インスタンスを作成
    ///
    /// ネットワーク接続はまだ行わない。TLS パラメータの構築や
    /// 送信元アドレスの解析に失敗した場合は [`NotificationError::Setup`] を返す。
    pub fn new(settings: SmtpSettings) -> Result<Self, NotificationError> {
        let builder = match settings.security {
            SmtpSecurity::Tls => AsyncSmtpTransport::<Tokio1Executor>::relay(&settings.host)
                .map_err(|e| NotificationError::Setup(format!("TLS 設定の構築に失敗: {e}")))?,
            SmtpSecurity::StartTls => {
                AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&settings.host)
                    .map_err(|e| NotificationError::Setup(format!("TLS 設定の構築に失敗: {e}")))?
            }
            // builder_dangerous: TLS なしで接続（Mailpit 等のローカル SMTP 向け）
            SmtpSecurity::Plaintext => {
                AsyncSmtpTransport::<Tokio1Executor>::builder_dangerous(&settings.host)
            }
        };

        let mut builder = builder.port(settings.port);
        if let Some(credentials) = settings.credentials {
            builder = builder.credentials(Credentials::new(
                credentials.username,
                credentials.password.as_str().to_string(),
            ));
        }

        let from = settings
            .from_address
            .as_str()
            .parse::<Mailbox>()
            .map_err(|e| NotificationError::Setup(format!("送信元アドレス不正: {e}")))?;

        Ok(Self {
            transport: builder.build(),
            from,
        })
    }

    /// 送信する MIME メッセージを組み立てる
    fn build_message(&self, email: &EmailMessage) -> Result<Message, NotificationError> {
        let to = email
            .to
            .as_str()
            .parse::<Mailbox>()
            .map_err(|e| NotificationError::SendFailed(e.to_string()))?;

        Message::builder()
            .from(self.from.clone())
            .to(to)
            .subject(&email.subject)
            .header(ContentType::TEXT_PLAIN)
            .body(email.text_body.clone())
            .map_err(|e| NotificationError::SendFailed(e.to_string()))
    }
}

#[async_trait]
impl NotificationSender for SmtpNotificationSender {
    async fn send_email(&self, email: &EmailMessage) -> Result<(), NotificationError> {
        let message = self.build_message(email)?;

        let response = self
            .transport
            .send(message)
            .await
            .map_err(|e| NotificationError::SendFailed(e.to_string()))?;

        tracing::debug!(
            code = %response.code(),
            "SMTP リレーがメッセージを受理"
        );

        Ok(())
    }
}
