//! ダッシュボードアイテムAPI Lambdaエントリポイント
//!
//! API Gateway経由のHTTPリクエストを処理し、POSTはアイテム作成、
//! GETはキー前方一致検索としてルーターに委譲する。

use dashboard_api::application::RequestRouter;
use dashboard_api::infrastructure::{
    DynamoDbConfig, DynamoDbConfigError, DynamoItemRepository, init_logging,
};
use lambda_http::http::header::CONTENT_TYPE;
use lambda_http::{Body, Error, Request, Response, run, service_fn};
use tokio::sync::OnceCell;
use tracing::{error, info};

/// DynamoDB設定の静的インスタンス
///
/// Lambda warm start時にクライアントを再利用するため、
/// 一度初期化した設定を静的に保持する。
static DYNAMODB_CONFIG: OnceCell<DynamoDbConfig> = OnceCell::const_new();

/// DynamoDB設定を取得（初期化されていなければ初期化）
async fn get_dynamodb_config() -> Result<&'static DynamoDbConfig, DynamoDbConfigError> {
    DYNAMODB_CONFIG
        .get_or_try_init(|| async { DynamoDbConfig::from_env().await })
        .await
}

#[tokio::main]
async fn main() -> Result<(), Error> {
    // 構造化ログを初期化
    init_logging();

    info!("アイテムAPI Lambda関数を初期化");

    // Lambda関数を実行
    run(service_fn(handler)).await
}

/// HTTPリクエストハンドラー
///
/// # 処理フロー
/// 1. DynamoDB設定を取得（warm startではクライアントを再利用）
/// 2. リポジトリを作成してルーターに注入
/// 3. メソッドに応じたハンドラーにディスパッチ
async fn handler(request: Request) -> Result<Response<Body>, Error> {
    info!(
        method = %request.method(),
        path = request.uri().path(),
        "HTTPリクエスト受信"
    );

    // DynamoDB設定を環境から読み込み
    let config = match get_dynamodb_config().await {
        Ok(config) => config,
        Err(err) => {
            error!(error = %err, "DynamoDB設定読み込み失敗");
            let response = Response::builder()
                .status(500)
                .header(CONTENT_TYPE, "application/json")
                .body(Body::Text(
                    r#"{"message":"Internal server error"}"#.to_string(),
                ))
                .expect("レスポンスの構築に失敗");
            return Ok(response);
        }
    };

    // リポジトリを作成してディスパッチ
    let repo = DynamoItemRepository::new(config.client().clone(), config.table_name().to_string());
    let router = RequestRouter::new(repo);

    Ok(router.dispatch(request).await)
}
