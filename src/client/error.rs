/// 客户端侧错误
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    #[error("wallet returned no accounts")]
    NoAccounts,

    #[error("wallet request failed: {0}")]
    Wallet(String),

    #[error("invalid backend url: {0}")]
    InvalidUrl(String),

    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("backend responded {status}: {message}")]
    Status { status: u16, message: String },
}
