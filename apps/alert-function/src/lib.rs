//! # 高負荷アラート関数ライブラリ
//!
//! 呼び出しごとに固定文面のアラートメールを 1 通送信する関数のコアモジュール。
//!
//! ## モジュール構成
//!
//! - `config`: 環境変数からの設定読み込み
//! - `error`: 設定・Runtime API のエラー型
//! - `usecase`: アラート送信ユースケース
//! - `handler`: 呼び出しハンドラ（結果をステータスコードと JSON 本文に変換）
//! - `runtime`: Lambda Runtime API クライアントと呼び出しループ

pub mod config;
pub mod error;
pub mod handler;
pub mod runtime;
pub mod usecase;
