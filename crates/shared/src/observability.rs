//! # Observability 基盤
//!
//! トレーシング初期化とログ出力形式の設定を提供する。
//! 環境変数 `LOG_FORMAT` による JSON / Pretty 出力の切り替えに対応し、
//! マネージドランタイム（Lambda）上では CloudWatch 向けの出力に寄せる。

/// Lambda 実行環境で必ず設定される環境変数
const LAMBDA_FUNCTION_NAME_VAR: &str = "AWS_LAMBDA_FUNCTION_NAME";

/// ログ出力形式
///
/// 環境変数 `LOG_FORMAT` で切り替える。
/// 未設定の場合は実行環境に応じて決まる（[`LogFormat::resolve`] を参照）。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    /// JSON 形式（Lambda / 本番環境向け）
    Json,
    /// 人間が読みやすい形式（ローカル実行向け）
    #[default]
    Pretty,
}

impl LogFormat {
    /// 文字列からログ形式をパースする
    ///
    /// 不正な値の場合は [`Pretty`](LogFormat::Pretty) にフォールバックし、
    /// stderr に警告を出力する。トレーシング初期化前に呼ばれるため `eprintln!` を使う。
    pub fn parse(s: &str) -> Self {
        match s {
            "json" => Self::Json,
            "pretty" => Self::Pretty,
            other => {
                eprintln!("WARNING: unknown LOG_FORMAT={other:?}, falling back to pretty");
                Self::Pretty
            }
        }
    }

    /// 明示指定と実行環境からログ形式を決定する
    ///
    /// - `LOG_FORMAT` が指定されていればそれに従う
    /// - 未指定かつマネージドランタイム上なら [`Json`](LogFormat::Json)
    /// - それ以外は [`Pretty`](LogFormat::Pretty)
    pub fn resolve(explicit: Option<&str>, managed_runtime: bool) -> Self {
        match explicit {
            Some(value) => Self::parse(value),
            None if managed_runtime => Self::Json,
            None => Self::Pretty,
        }
    }
}

/// トレーシング初期化設定
#[derive(Debug, Clone)]
pub struct TracingConfig {
    /// サービス名（ルートスパンの `service` フィールドに出力）
    pub service_name:    String,
    /// ログ出力形式
    pub log_format:      LogFormat,
    /// Lambda 上で動作しているか
    ///
    /// true の場合、タイムスタンプと ANSI カラーを出力しない。
    /// CloudWatch Logs が行ごとに時刻を付与するため。
    pub managed_runtime: bool,
}

impl TracingConfig {
    /// 新しい設定を作成する
    pub fn new(
        service_name: impl Into<String>,
        log_format: LogFormat,
        managed_runtime: bool,
    ) -> Self {
        Self {
            service_name: service_name.into(),
            log_format,
            managed_runtime,
        }
    }

    /// 環境変数から設定を読み取る
    ///
    /// `LOG_FORMAT` と `AWS_LAMBDA_FUNCTION_NAME` の有無で出力形式を決定する。
    pub fn from_env(service_name: impl Into<String>) -> Self {
        let managed_runtime = std::env::var_os(LAMBDA_FUNCTION_NAME_VAR).is_some();
        let explicit = std::env::var("LOG_FORMAT").ok();
        Self::new(
            service_name,
            LogFormat::resolve(explicit.as_deref(), managed_runtime),
            managed_runtime,
        )
    }
}

/// トレーシングを初期化する
///
/// `RUST_LOG` 環境変数でログレベルを制御可能。
/// 未設定の場合は `"info,loadalert=debug"` をデフォルトとする。
///
/// JSON モードでは `timestamp`（Lambda 外のみ）, `level`, `target`, `message` が
/// トップレベルに出力される。
#[cfg(feature = "observability")]
pub fn init_tracing(config: &TracingConfig) {
    use tracing_subscriber::{Layer as _, layer::SubscriberExt, util::SubscriberInitExt};

    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "info,loadalert=debug".into());

    let fmt_layer = match (config.log_format, config.managed_runtime) {
        (LogFormat::Json, false) => tracing_subscriber::fmt::layer()
            .json()
            .flatten_event(true)
            .with_target(true)
            .with_current_span(true)
            .with_span_list(false)
            .boxed(),
        (LogFormat::Json, true) => tracing_subscriber::fmt::layer()
            .json()
            .flatten_event(true)
            .with_target(true)
            .with_current_span(true)
            .with_span_list(false)
            .without_time()
            .boxed(),
        (LogFormat::Pretty, false) => tracing_subscriber::fmt::layer().boxed(),
        (LogFormat::Pretty, true) => tracing_subscriber::fmt::layer()
            .with_ansi(false)
            .without_time()
            .boxed(),
    };

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt_layer)
        .init();
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    // ===== LogFormat::parse テスト =====

    #[test]
    fn test_parse_jsonでjsonを返す() {
        assert_eq!(LogFormat::parse("json"), LogFormat::Json);
    }

    #[test]
    fn test_parse_不正な値でprettyにフォールバックする() {
        assert_eq!(LogFormat::parse("unknown"), LogFormat::Pretty);
        assert_eq!(LogFormat::parse(""), LogFormat::Pretty);
        assert_eq!(LogFormat::parse("JSON"), LogFormat::Pretty);
    }

    // ===== LogFormat::resolve テスト =====

    #[test]
    fn test_resolve_lambda上で未指定ならjson() {
        assert_eq!(LogFormat::resolve(None, true), LogFormat::Json);
    }

    #[test]
    fn test_resolve_ローカルで未指定ならpretty() {
        assert_eq!(LogFormat::resolve(None, false), LogFormat::Pretty);
    }

    #[test]
    fn test_resolve_明示指定が実行環境より優先される() {
        assert_eq!(LogFormat::resolve(Some("pretty"), true), LogFormat::Pretty);
        assert_eq!(LogFormat::resolve(Some("json"), false), LogFormat::Json);
    }

    #[test]
    fn test_newでフィールドが正しく設定される() {
        let config = TracingConfig::new("alert-function", LogFormat::Json, true);

        assert_eq!(config.service_name, "alert-function");
        assert_eq!(config.log_format, LogFormat::Json);
        assert!(config.managed_runtime);
    }
}
