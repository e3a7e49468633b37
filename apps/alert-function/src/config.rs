//! # アラート関数の設定
//!
//! 環境変数から送信バックエンド・SMTP リレー・宛先の設定を読み込む。
//! 認証情報はコードに埋め込まず、Lambda の環境変数（Secrets Manager 連携を含む）で注入する。
//!
//! ## 環境変数
//!
//! | 変数名 | 必須 | 説明 |
//! |--------|------|------|
//! | `NOTIFICATION_BACKEND` | No | `smtp`（デフォルト）または `noop` |
//! | `SMTP_HOST` | No | リレーのホスト名（デフォルト: `smtp.gmail.com`） |
//! | `SMTP_PORT` | No | ポート番号（デフォルト: 暗号化方式の標準ポート） |
//! | `SMTP_SECURITY` | No | `tls`（デフォルト）/ `starttls` / `none` |
//! | `SMTP_USERNAME` | TLS 時 **Yes** | ログインユーザー名 |
//! | `SMTP_PASSWORD` | TLS 時 **Yes** | パスワード |
//! | `ALERT_FROM_ADDRESS` | No | 送信元（デフォルト: `SMTP_USERNAME`） |
//! | `ALERT_TO_ADDRESS` | **Yes** | 宛先 |
//! | `AWS_LAMBDA_RUNTIME_API` | No | Runtime API のホスト（未設定ならローカル実行） |

use std::env;

use loadalert_domain::email::EmailAddress;
use loadalert_infra::notification::{SmtpCredentials, SmtpPassword, SmtpSecurity, SmtpSettings};
use strum::{Display, EnumString};

use crate::error::ConfigError;

/// SMTP ホストのデフォルト値
const DEFAULT_SMTP_HOST: &str = "smtp.gmail.com";

/// Runtime API のホストを示す環境変数
pub const RUNTIME_API_VAR: &str = "AWS_LAMBDA_RUNTIME_API";

/// 送信バックエンドの種別
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Display, EnumString)]
#[strum(serialize_all = "lowercase")]
pub enum NotificationBackend {
    /// SMTP リレー経由で送信
    #[default]
    Smtp,
    /// 送信しない（ログ出力のみ）
    Noop,
}

/// 送信バックエンドごとの設定
#[derive(Debug, Clone)]
pub enum SenderConfig {
    /// SMTP リレーの接続設定
    Smtp(SmtpSettings),
    /// ドライラン
    Noop,
}

impl SenderConfig {
    /// バックエンド種別を返す
    pub fn backend(&self) -> NotificationBackend {
        match self {
            Self::Smtp(_) => NotificationBackend::Smtp,
            Self::Noop => NotificationBackend::Noop,
        }
    }
}

/// アラート関数の設定
///
/// Debug 出力ではパスワードがマスクされるため、そのままログに出してよい。
#[derive(Debug, Clone)]
pub struct AlertConfig {
    /// 送信バックエンド設定
    pub sender:     SenderConfig,
    /// アラートの宛先
    pub to_address: EmailAddress,
}

impl AlertConfig {
    /// 環境変数から設定を読み込む
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// 任意の変数ソースから設定を読み込む
    ///
    /// 空文字列（空白のみを含む）の値は未設定として扱う。
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |name: &str| lookup(name).filter(|value| !value.trim().is_empty());

        let backend = match get("NOTIFICATION_BACKEND") {
            Some(value) => value
                .trim()
                .to_ascii_lowercase()
                .parse::<NotificationBackend>()
                .map_err(|_| ConfigError::Invalid {
                    name:   "NOTIFICATION_BACKEND",
                    reason: format!("smtp または noop を指定してください: {value}"),
                })?,
            None => NotificationBackend::default(),
        };

        let to_address =
            address(&get, "ALERT_TO_ADDRESS")?.ok_or(ConfigError::Missing("ALERT_TO_ADDRESS"))?;

        let sender = match backend {
            NotificationBackend::Smtp => SenderConfig::Smtp(smtp_settings(&get)?),
            NotificationBackend::Noop => SenderConfig::Noop,
        };

        Ok(Self { sender, to_address })
    }
}

/// Runtime API のホストを環境変数から取得する
///
/// 設定読み込みに失敗した場合も初期化エラーを報告できるよう、
/// [`AlertConfig`] とは独立して読む。
pub fn runtime_api_from_env() -> Option<String> {
    env::var(RUNTIME_API_VAR)
        .ok()
        .filter(|value| !value.trim().is_empty())
}

fn smtp_settings<F>(get: &F) -> Result<SmtpSettings, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let security = match get("SMTP_SECURITY") {
        Some(value) => value
            .trim()
            .to_ascii_lowercase()
            .parse::<SmtpSecurity>()
            .map_err(|_| ConfigError::Invalid {
                name:   "SMTP_SECURITY",
                reason: format!("tls / starttls / none のいずれかを指定してください: {value}"),
            })?,
        None => SmtpSecurity::default(),
    };

    let host = get("SMTP_HOST")
        .map(|value| value.trim().to_string())
        .unwrap_or_else(|| DEFAULT_SMTP_HOST.to_string());

    let port = match get("SMTP_PORT") {
        Some(value) => value
            .trim()
            .parse::<u16>()
            .ok()
            .filter(|port| *port != 0)
            .ok_or_else(|| ConfigError::Invalid {
                name:   "SMTP_PORT",
                reason: format!("有効なポート番号である必要があります: {value}"),
            })?,
        None => security.default_port(),
    };

    let username = get("SMTP_USERNAME");
    let password = get("SMTP_PASSWORD");
    let credentials = match (username.clone(), password) {
        (Some(username), Some(password)) => Some(SmtpCredentials {
            username: username.trim().to_string(),
            password: SmtpPassword::new(password),
        }),
        (None, None) if !security.requires_credentials() => None,
        (None, _) => return Err(ConfigError::Missing("SMTP_USERNAME")),
        (Some(_), None) => return Err(ConfigError::Missing("SMTP_PASSWORD")),
    };

    // 送信元は明示指定がなければログインユーザー名を使う
    let from_address = match address(get, "ALERT_FROM_ADDRESS")? {
        Some(from) => from,
        None => match username {
            Some(username) => EmailAddress::new(username).map_err(|e| ConfigError::Invalid {
                name:   "SMTP_USERNAME",
                reason: e.to_string(),
            })?,
            None => return Err(ConfigError::Missing("ALERT_FROM_ADDRESS")),
        },
    };

    Ok(SmtpSettings {
        host,
        port,
        security,
        credentials,
        from_address,
    })
}

fn address<F>(get: &F, name: &'static str) -> Result<Option<EmailAddress>, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    get(name)
        .map(|value| {
            EmailAddress::new(value).map_err(|e| ConfigError::Invalid {
                name,
                reason: e.to_string(),
            })
        })
        .transpose()
}
