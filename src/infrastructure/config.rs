//! DynamoDB接続設定

use aws_sdk_dynamodb::Client as DynamoDbClient;
use thiserror::Error;

/// DynamoDB設定のエラー型
#[derive(Debug, Error)]
pub enum DynamoDbConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),
}

/// テーブル名とクライアントを持つDynamoDB設定
///
/// この構造体は環境変数から読み込んだDynamoDBクライアントとテーブル名を保持します。
/// テーブル名は以下の環境変数で設定:
/// - DYNAMODB_TABLE: ダッシュボードアイテム保存用テーブル
#[derive(Debug, Clone)]
pub struct DynamoDbConfig {
    /// DynamoDBクライアントインスタンス
    client: DynamoDbClient,
    /// アイテムテーブル名
    table_name: String,
}

impl DynamoDbConfig {
    /// 環境からAWS設定を読み込み、環境変数からテーブル名を読み取って新しいDynamoDbConfigを作成
    ///
    /// 環境変数:
    /// - AWS認証情報: aws-configにより自動読み込み
    /// - DYNAMODB_TABLE: アイテム用DynamoDBテーブル名
    pub async fn from_env() -> Result<Self, DynamoDbConfigError> {
        // 環境からAWS設定を読み込み（認証情報、リージョンなど）
        let aws_config = aws_config::load_defaults(aws_config::BehaviorVersion::latest()).await;

        // AWS設定からDynamoDBクライアントを作成
        let client = DynamoDbClient::new(&aws_config);

        // 環境変数からテーブル名を読み込み
        let table_name = std::env::var("DYNAMODB_TABLE")
            .map_err(|_| DynamoDbConfigError::MissingEnvVar("DYNAMODB_TABLE".to_string()))?;

        Ok(Self { client, table_name })
    }

    /// 明示的な値で新しいDynamoDbConfigを作成（テスト用）
    pub fn new(client: DynamoDbClient, table_name: String) -> Self {
        Self { client, table_name }
    }

    /// DynamoDBクライアントへの参照を取得
    pub fn client(&self) -> &DynamoDbClient {
        &self.client
    }

    /// アイテムテーブル名を取得
    pub fn table_name(&self) -> &str {
        &self.table_name
    }
}
