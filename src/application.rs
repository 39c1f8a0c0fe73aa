// アプリケーション層モジュール
pub mod create_handler;
pub mod query_handler;
pub mod request_parser;
pub mod request_router;

// 再エクスポート
pub use create_handler::{CreateHandler, CreateItemError};
pub use query_handler::{QueryHandler, QueryItemsError};
pub use request_parser::{CreateItemRequest, ParseError, RequestParser};
pub use request_router::RequestRouter;
