//! 作成リクエストパーサー
//!
//! HTTPリクエストボディをパースして作成リクエストに変換する。
//! 検証は必須フィールドの存在チェックのみで、`values`の形状は制約しない。

use lambda_http::Body;
use serde::Deserialize;
use serde_json::Value;
use thiserror::Error;

/// リクエストボディのパースエラー
#[derive(Debug, Clone, Error, PartialEq)]
pub enum ParseError {
    /// リクエストボディが存在しない
    #[error("missing request body")]
    MissingBody,

    /// リクエストボディがUTF-8文字列でない
    #[error("request body is not valid UTF-8")]
    InvalidUtf8,

    /// JSONパースまたは必須フィールドの欠落
    #[error("invalid request body: {0}")]
    InvalidJson(String),
}

/// パース済みの作成リクエスト
///
/// ワイヤ上のフィールド名は呼び出し元の契約に従う（`type`、`nameDashboard`）。
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct CreateItemRequest {
    /// アイテム種別（複合キーの前半）
    #[serde(rename = "type")]
    pub item_type: String,

    /// アイテム名（複合キーの後半）
    #[serde(rename = "nameDashboard")]
    pub name: String,

    /// 任意のペイロード（省略可）
    #[serde(default)]
    pub values: Option<Value>,
}

/// 作成リクエストパーサー
pub struct RequestParser;

impl RequestParser {
    /// HTTPボディからテキストを取り出す
    ///
    /// # 戻り値
    /// * `Ok(&str)` - ボディのテキスト
    /// * `Err(ParseError)` - ボディが空、またはUTF-8でない場合
    pub fn extract_body(body: &Body) -> Result<&str, ParseError> {
        match body {
            Body::Text(text) => Ok(text.as_str()),
            Body::Binary(bytes) => std::str::from_utf8(bytes).map_err(|_| ParseError::InvalidUtf8),
            Body::Empty => Err(ParseError::MissingBody),
            // `lambda_http::Body`は#[non_exhaustive]のため網羅にはワイルドカードが必要。
            // Text/Binary/Empty以外の変種は存在せず、到達しない。
            _ => Err(ParseError::MissingBody),
        }
    }

    /// ボディテキストをパースしてCreateItemRequestに変換
    ///
    /// `type`と`nameDashboard`は必須。欠落時のserdeのエラーメッセージが
    /// そのまま失敗の説明として呼び出し元に返る。
    pub fn parse_create(body: &str) -> Result<CreateItemRequest, ParseError> {
        serde_json::from_str(body).map_err(|e| ParseError::InvalidJson(e.to_string()))
    }
}
