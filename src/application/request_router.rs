//! HTTPメソッドディスパッチ
//!
//! 受信イベントのメソッドを検査し、POSTは作成ハンドラー、GETはクエリ
//! ハンドラーに委譲する。それ以外のメソッドは固定のエラーレスポンスを返す。
//! ディスパッチは呼び出しごとに独立で、状態を持たない。

use lambda_http::http::header::CONTENT_TYPE;
use lambda_http::{Body, Request, RequestExt, Response};
use serde::Serialize;
use serde_json::json;
use tracing::{error, info, warn};

use crate::application::create_handler::{CreateHandler, CreateItemError};
use crate::application::query_handler::QueryHandler;
use crate::infrastructure::ItemRepository;

/// メソッドディスパッチを行うルーター
///
/// リポジトリは構築時に1回注入され、以後は読み取り専用で共有される。
pub struct RequestRouter<R>
where
    R: ItemRepository + Clone,
{
    /// 作成ハンドラー
    create_handler: CreateHandler<R>,
    /// クエリハンドラー
    query_handler: QueryHandler<R>,
}

impl<R> RequestRouter<R>
where
    R: ItemRepository + Clone,
{
    /// 新しいRequestRouterを作成
    pub fn new(repo: R) -> Self {
        Self {
            create_handler: CreateHandler::new(repo.clone()),
            query_handler: QueryHandler::new(repo),
        }
    }

    /// リクエストをメソッドに応じたハンドラーにディスパッチ
    ///
    /// # レスポンス
    /// * POST成功: 201 + 確認メッセージ
    /// * GET成功: 200 + 一致アイテムの配列
    /// * 処理失敗: 400 + `error`フィールド
    /// * その他のメソッド: 400 + 固定メッセージ
    pub async fn dispatch(&self, request: Request) -> Response<Body> {
        match request.method().as_str() {
            "POST" => self.handle_create(&request).await,
            "GET" => self.handle_query(&request).await,
            method => {
                warn!(method = method, "未対応のHTTPメソッド");
                json_response(400, &json!({"message": "Invalid HTTP Method"}))
            }
        }
    }

    /// 作成リクエストを処理してレスポンスを生成
    async fn handle_create(&self, request: &Request) -> Response<Body> {
        match self.create_handler.handle(request.body()).await {
            Ok(item) => {
                info!(item_id = %item.id, "作成リクエスト成功");
                json_response(201, &json!({"message": "Item created successfully"}))
            }
            Err(err) => {
                // ステータスコードは同一だが、ログ上では失敗の種類を区別する
                match &err {
                    CreateItemError::Validation(_) => {
                        warn!(error = %err, "作成リクエストの検証失敗");
                    }
                    CreateItemError::Backend(_) => {
                        error!(error = %err, "アイテム書き込み失敗");
                    }
                }
                json_response(400, &json!({"error": err.to_string()}))
            }
        }
    }

    /// クエリリクエストを処理してレスポンスを生成
    async fn handle_query(&self, request: &Request) -> Response<Body> {
        // typeパラメータ、またはパラメータコンテナ自体が無い場合は
        // 「フィルタ指定なし」として空プレフィックスを使う
        let params = request.query_string_parameters();
        let type_prefix = params.first("type").unwrap_or("");

        match self.query_handler.handle(type_prefix).await {
            Ok(items) => {
                info!(prefix = type_prefix, count = items.len(), "クエリリクエスト成功");
                json_response(200, &items)
            }
            Err(err) => {
                error!(error = %err, prefix = type_prefix, "アイテムスキャン失敗");
                json_response(400, &json!({"error": err.to_string()}))
            }
        }
    }
}

/// JSONボディを持つHTTPレスポンスを構築
fn json_response<T: Serialize>(status: u16, body: &T) -> Response<Body> {
    let body_json = serde_json::to_string(body).expect("レスポンスボディのシリアライズに失敗");

    Response::builder()
        .status(status)
        .header(CONTENT_TYPE, "application/json")
        .body(Body::Text(body_json))
        .expect("レスポンスの構築に失敗")
}
