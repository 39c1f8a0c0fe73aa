//! 作成リクエストハンドラー
//!
//! リクエストボディをパースし、複合キーを構築してストアに1回書き込む。

use lambda_http::Body;
use thiserror::Error;
use tracing::{info, trace};

use crate::application::request_parser::{ParseError, RequestParser};
use crate::domain::Item;
use crate::infrastructure::{ItemRepository, ItemRepositoryError};

/// 作成処理のエラー型
///
/// 入力の検証エラーとストア障害を型として区別する。どちらも呼び出し元には
/// 同じステータスコードで返るが、ログ消費者は区別できる。
#[derive(Debug, Error, Clone, PartialEq)]
pub enum CreateItemError {
    /// 入力が欠落または不正
    #[error("{0}")]
    Validation(ParseError),

    /// ストアへの書き込みに失敗
    #[error("{0}")]
    Backend(ItemRepositoryError),
}

impl From<ParseError> for CreateItemError {
    fn from(err: ParseError) -> Self {
        CreateItemError::Validation(err)
    }
}

impl From<ItemRepositoryError> for CreateItemError {
    fn from(err: ItemRepositoryError) -> Self {
        CreateItemError::Backend(err)
    }
}

/// 作成リクエストを処理するハンドラー
pub struct CreateHandler<R>
where
    R: ItemRepository,
{
    /// アイテムリポジトリ
    repo: R,
}

impl<R> CreateHandler<R>
where
    R: ItemRepository,
{
    /// 新しいCreateHandlerを作成
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// 作成リクエストを処理
    ///
    /// # 処理フロー
    /// 1. ボディをパースして`type`と`nameDashboard`を取り出す
    /// 2. 複合キー（`{type}#{name}`）でアイテムを構築
    /// 3. ストアにupsert保存（同一キーは上書き）
    ///
    /// # 引数
    /// * `body` - HTTPリクエストボディ
    ///
    /// # 戻り値
    /// * `Ok(Item)` - 保存されたアイテム
    /// * `Err(CreateItemError)` - 検証エラーまたはストア障害
    pub async fn handle(&self, body: &Body) -> Result<Item, CreateItemError> {
        let text = RequestParser::extract_body(body)?;
        let request = RequestParser::parse_create(text)?;

        let item = Item::new(&request.item_type, &request.name, request.values);

        trace!(item_id = %item.id, "アイテム保存開始");

        self.repo.put(&item).await?;

        info!(item_id = %item.id, "アイテム保存完了");

        Ok(item)
    }
}
