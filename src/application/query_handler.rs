//! クエリリクエストハンドラー
//!
//! キー前方一致のスキャンを1回実行して一致アイテムを返す。

use thiserror::Error;
use tracing::debug;

use crate::domain::Item;
use crate::infrastructure::{ItemRepository, ItemRepositoryError};

/// クエリ処理のエラー型
#[derive(Debug, Error, Clone, PartialEq)]
pub enum QueryItemsError {
    /// ストアのスキャンに失敗
    #[error("{0}")]
    Backend(ItemRepositoryError),
}

impl From<ItemRepositoryError> for QueryItemsError {
    fn from(err: ItemRepositoryError) -> Self {
        QueryItemsError::Backend(err)
    }
}

/// クエリリクエストを処理するハンドラー
pub struct QueryHandler<R>
where
    R: ItemRepository,
{
    /// アイテムリポジトリ
    repo: R,
}

impl<R> QueryHandler<R>
where
    R: ItemRepository,
{
    /// 新しいQueryHandlerを作成
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// プレフィックスに一致するアイテムをスキャンで取得
    ///
    /// 空のプレフィックスは全件取得になる。結果はストアのスキャン順のまま返す。
    pub async fn handle(&self, type_prefix: &str) -> Result<Vec<Item>, QueryItemsError> {
        let items = self.repo.scan_by_prefix(type_prefix).await?;

        debug!(prefix = type_prefix, count = items.len(), "スキャン完了");

        Ok(items)
    }
}
