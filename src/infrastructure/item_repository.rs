//! DynamoDBでダッシュボードアイテムを管理するためのリポジトリ
//!
//! ストアとの接点はこのトレイトのみ。書き込みはキー単位のupsert、
//! 読み取りはキー前方一致のスキャンで、どちらも1回のAPI呼び出し。

use async_trait::async_trait;
use aws_sdk_dynamodb::Client as DynamoDbClient;
use aws_sdk_dynamodb::types::AttributeValue;
use serde_json::Value;
use thiserror::Error;

use crate::domain::Item;

/// リポジトリ操作のエラー型
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ItemRepositoryError {
    /// DynamoDBへの書き込みに失敗
    #[error("Write error: {0}")]
    WriteError(String),

    /// DynamoDBからの読み取りに失敗
    #[error("Read error: {0}")]
    ReadError(String),

    /// データのシリアライズ/デシリアライズに失敗
    #[error("Serialization error: {0}")]
    SerializationError(String),
}

/// アイテム永続化用トレイト
///
/// 異なる実装を可能にします（実際のDynamoDB、テスト用モック）。
#[async_trait]
pub trait ItemRepository: Send + Sync {
    /// アイテムをキー単位でupsert保存
    ///
    /// 同じ`id`を持つ既存レコードは上書きされる。
    async fn put(&self, item: &Item) -> Result<(), ItemRepositoryError>;

    /// `id`が指定プレフィックスで始まるアイテムを全件スキャンで取得
    ///
    /// 空のプレフィックスは全レコードにマッチする。
    async fn scan_by_prefix(&self, prefix: &str) -> Result<Vec<Item>, ItemRepositoryError>;
}

/// ItemRepositoryのDynamoDB実装
#[derive(Debug, Clone)]
pub struct DynamoItemRepository {
    /// DynamoDBクライアント
    client: DynamoDbClient,
    /// アイテムテーブル名
    table_name: String,
}

impl DynamoItemRepository {
    /// 新しいDynamoItemRepositoryを作成
    ///
    /// # 引数
    /// * `client` - DynamoDBクライアント
    /// * `table_name` - アイテムテーブルの名前
    pub fn new(client: DynamoDbClient, table_name: String) -> Self {
        Self { client, table_name }
    }

    /// ペイロードをDynamoDB属性値に変換
    fn values_to_attribute(values: &Value) -> Result<AttributeValue, ItemRepositoryError> {
        serde_dynamo::to_attribute_value(values)
            .map_err(|e| ItemRepositoryError::SerializationError(e.to_string()))
    }

    /// DynamoDB属性値をペイロードに復元
    fn attribute_to_values(attr: AttributeValue) -> Result<Value, ItemRepositoryError> {
        serde_dynamo::from_attribute_value(attr)
            .map_err(|e| ItemRepositoryError::SerializationError(e.to_string()))
    }
}

#[async_trait]
impl ItemRepository for DynamoItemRepository {
    async fn put(&self, item: &Item) -> Result<(), ItemRepositoryError> {
        let mut builder = self
            .client
            .put_item()
            .table_name(&self.table_name)
            .item("id", AttributeValue::S(item.id.clone()));

        // valuesが未指定の場合はid属性のみのレコードになる
        if let Some(values) = &item.values {
            builder = builder.item("values", Self::values_to_attribute(values)?);
        }

        builder
            .send()
            .await
            .map_err(|e| ItemRepositoryError::WriteError(e.into_service_error().to_string()))?;

        Ok(())
    }

    async fn scan_by_prefix(&self, prefix: &str) -> Result<Vec<Item>, ItemRepositoryError> {
        // スキャンは最初の1ページのみ。LastEvaluatedKeyの継続読み取りは行わない
        let result = self
            .client
            .scan()
            .table_name(&self.table_name)
            .filter_expression("begins_with(id, :prefix)")
            .expression_attribute_values(":prefix", AttributeValue::S(prefix.to_string()))
            .send()
            .await
            .map_err(|e| ItemRepositoryError::ReadError(e.into_service_error().to_string()))?;

        let mut items = Vec::new();

        if let Some(rows) = result.items {
            for mut row in rows {
                let id = row
                    .get("id")
                    .and_then(|v| v.as_s().ok())
                    .cloned()
                    .ok_or_else(|| {
                        ItemRepositoryError::SerializationError(
                            "Missing id attribute".to_string(),
                        )
                    })?;

                let values = match row.remove("values") {
                    Some(attr) => Some(Self::attribute_to_values(attr)?),
                    None => None,
                };

                items.push(Item { id, values });
            }
        }

        Ok(items)
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use serde_json::json;
    use std::collections::BTreeMap;
    use std::sync::{Arc, Mutex};

    // ==================== エラー型テスト ====================

    #[test]
    fn test_item_repository_error_write_error_display() {
        let error = ItemRepositoryError::WriteError("connection timed out".to_string());
        assert_eq!(error.to_string(), "Write error: connection timed out");
    }

    #[test]
    fn test_item_repository_error_read_error_display() {
        let error = ItemRepositoryError::ReadError("throughput exceeded".to_string());
        assert_eq!(error.to_string(), "Read error: throughput exceeded");
    }

    #[test]
    fn test_item_repository_error_serialization_error_display() {
        let error = ItemRepositoryError::SerializationError("invalid format".to_string());
        assert_eq!(error.to_string(), "Serialization error: invalid format");
    }

    // エラー型の等価性テスト
    #[test]
    fn test_item_repository_error_equality() {
        assert_eq!(
            ItemRepositoryError::WriteError("test".to_string()),
            ItemRepositoryError::WriteError("test".to_string())
        );
        assert_ne!(
            ItemRepositoryError::WriteError("test".to_string()),
            ItemRepositoryError::ReadError("test".to_string())
        );
    }

    // ==================== 属性値変換テスト ====================

    // ペイロードがDynamoDB属性値を経由して元の値に戻る
    #[test]
    fn test_values_attribute_conversion() {
        let values = json!({"theme": "dark", "columns": 3});

        let attr = DynamoItemRepository::values_to_attribute(&values).unwrap();
        let restored = DynamoItemRepository::attribute_to_values(attr).unwrap();

        assert_eq!(restored, values);
    }

    // 文字列ペイロードはS属性になる
    #[test]
    fn test_string_values_become_string_attribute() {
        let attr = DynamoItemRepository::values_to_attribute(&json!("test data")).unwrap();
        assert_eq!(attr.as_s().ok(), Some(&"test data".to_string()));
    }

    // ==================== モックアイテムリポジトリ ====================

    /// ユニットテスト用のモックItemRepository
    ///
    /// BTreeMapでキー順を固定し、スキャン順のアサーションを安定させる。
    #[derive(Debug, Clone)]
    pub(crate) struct MockItemRepository {
        /// 保存されたアイテム: id -> Item
        items: Arc<Mutex<BTreeMap<String, Item>>>,
        /// 次の操作で返すエラー（エラーパスのテスト用）
        next_error: Arc<Mutex<Option<ItemRepositoryError>>>,
    }

    impl MockItemRepository {
        pub(crate) fn new() -> Self {
            Self {
                items: Arc::new(Mutex::new(BTreeMap::new())),
                next_error: Arc::new(Mutex::new(None)),
            }
        }

        pub(crate) fn set_next_error(&self, error: ItemRepositoryError) {
            *self.next_error.lock().unwrap() = Some(error);
        }

        pub(crate) fn item_count(&self) -> usize {
            self.items.lock().unwrap().len()
        }

        pub(crate) fn get_item_sync(&self, id: &str) -> Option<Item> {
            self.items.lock().unwrap().get(id).cloned()
        }

        fn take_error(&self) -> Option<ItemRepositoryError> {
            self.next_error.lock().unwrap().take()
        }
    }

    #[async_trait]
    impl ItemRepository for MockItemRepository {
        async fn put(&self, item: &Item) -> Result<(), ItemRepositoryError> {
            if let Some(error) = self.take_error() {
                return Err(error);
            }

            self.items
                .lock()
                .unwrap()
                .insert(item.id.clone(), item.clone());
            Ok(())
        }

        async fn scan_by_prefix(&self, prefix: &str) -> Result<Vec<Item>, ItemRepositoryError> {
            if let Some(error) = self.take_error() {
                return Err(error);
            }

            let items = self.items.lock().unwrap();
            Ok(items
                .values()
                .filter(|item| item.id.starts_with(prefix))
                .cloned()
                .collect())
        }
    }

    // ==================== モックリポジトリを使用したテスト ====================

    // 保存したアイテムがキーで取得できる
    #[tokio::test]
    async fn test_mock_repo_put_item() {
        let repo = MockItemRepository::new();
        let item = Item::new("dashboard", "Main", Some(json!("test data")));

        repo.put(&item).await.unwrap();

        assert_eq!(repo.item_count(), 1);
        let saved = repo.get_item_sync("dashboard#Main").unwrap();
        assert_eq!(saved.values, Some(json!("test data")));
    }

    // 同じキーへの2回目の書き込みは上書きになる
    #[tokio::test]
    async fn test_mock_repo_put_same_key_overwrites() {
        let repo = MockItemRepository::new();

        let first = Item::new("dashboard", "Main", Some(json!("first")));
        let second = Item::new("dashboard", "Main", Some(json!("second")));

        repo.put(&first).await.unwrap();
        repo.put(&second).await.unwrap();

        // 2件ではなく1件のまま、内容は後勝ち
        assert_eq!(repo.item_count(), 1);
        let saved = repo.get_item_sync("dashboard#Main").unwrap();
        assert_eq!(saved.values, Some(json!("second")));
    }

    // プレフィックスに一致するアイテムのみが返る
    #[tokio::test]
    async fn test_mock_repo_scan_by_prefix() {
        let repo = MockItemRepository::new();

        repo.put(&Item::new("dashboard", "Main", None)).await.unwrap();
        repo.put(&Item::new("dashboard", "Sub", None)).await.unwrap();
        repo.put(&Item::new("widget", "Chart", None)).await.unwrap();

        let result = repo.scan_by_prefix("dashboard").await.unwrap();

        assert_eq!(result.len(), 2);
        assert!(result.iter().all(|item| item.id.starts_with("dashboard")));
    }

    // 空のプレフィックスは全件を返す
    #[tokio::test]
    async fn test_mock_repo_scan_empty_prefix_returns_all() {
        let repo = MockItemRepository::new();

        repo.put(&Item::new("dashboard", "Main", None)).await.unwrap();
        repo.put(&Item::new("widget", "Chart", None)).await.unwrap();

        let result = repo.scan_by_prefix("").await.unwrap();

        assert_eq!(result.len(), 2);
    }

    // 一致しないプレフィックスは空集合を返す
    #[tokio::test]
    async fn test_mock_repo_scan_no_match() {
        let repo = MockItemRepository::new();

        repo.put(&Item::new("dashboard", "Main", None)).await.unwrap();

        let result = repo.scan_by_prefix("report").await.unwrap();

        assert!(result.is_empty());
    }

    // エラーパスのテスト
    #[tokio::test]
    async fn test_mock_repo_put_error() {
        let repo = MockItemRepository::new();
        repo.set_next_error(ItemRepositoryError::WriteError(
            "DynamoDB unavailable".to_string(),
        ));

        let item = Item::new("dashboard", "Main", None);
        let result = repo.put(&item).await;

        assert_eq!(
            result.unwrap_err(),
            ItemRepositoryError::WriteError("DynamoDB unavailable".to_string())
        );
        assert_eq!(repo.item_count(), 0);
    }

    #[tokio::test]
    async fn test_mock_repo_scan_error() {
        let repo = MockItemRepository::new();
        repo.set_next_error(ItemRepositoryError::ReadError(
            "DynamoDB unavailable".to_string(),
        ));

        let result = repo.scan_by_prefix("").await;

        assert!(result.is_err());
    }
}
