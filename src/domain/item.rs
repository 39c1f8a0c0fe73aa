//! ダッシュボードアイテムエンティティ
//!
//! ストアに永続化される唯一のエンティティ。キーは`type`と`name`を
//! `#`で連結した複合キーとして書き込み時に決定的に構築される。

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// ストアに保存されるアイテム
///
/// `id`は複合キー（`{type}#{name}`）。`values`は呼び出し元が指定した
/// 任意のJSONペイロードで、未指定の場合は属性ごと省略される。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Item {
    /// 複合キー
    pub id: String,

    /// 任意のペイロード（未指定なら属性自体を持たない）
    #[serde(skip_serializing_if = "Option::is_none")]
    pub values: Option<Value>,
}

impl Item {
    /// `type`と`name`から複合キーを構築して新しいアイテムを作成
    pub fn new(item_type: &str, name: &str, values: Option<Value>) -> Self {
        Self {
            id: Self::compose_id(item_type, name),
            values,
        }
    }

    /// 複合キーを生成
    /// フォーマット: {type}#{name}
    pub fn compose_id(item_type: &str, name: &str) -> String {
        format!("{}#{}", item_type, name)
    }
}
