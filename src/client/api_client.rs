//! 后端 HTTP 客户端

use async_trait::async_trait;
use reqwest::{Response, Url};
use serde::Deserialize;

use crate::{api::wallet_api::BalanceResponse, client::error::ClientError, domain::ConnectionRecord};

/// 客户端依赖的两个后端调用
#[async_trait]
pub trait WalletApi: Send + Sync {
    async fn connect(&self, address: &str) -> Result<ConnectionRecord, ClientError>;

    async fn balance(&self, address: &str) -> Result<String, ClientError>;
}

pub struct HttpWalletApi {
    http: reqwest::Client,
    base_url: Url,
}

#[derive(Deserialize)]
struct ErrorPayload {
    error: String,
}

impl HttpWalletApi {
    pub fn new(base_url: &str) -> Result<Self, ClientError> {
        let base_url =
            Url::parse(base_url).map_err(|e| ClientError::InvalidUrl(format!("{}: {}", base_url, e)))?;
        if base_url.cannot_be_a_base() {
            return Err(ClientError::InvalidUrl(base_url.to_string()));
        }

        Ok(Self {
            http: reqwest::Client::new(),
            base_url,
        })
    }

    /// 按路径段拼接，地址作为单独一段进行转义
    fn endpoint(&self, segments: &[&str]) -> Result<Url, ClientError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| ClientError::InvalidUrl(self.base_url.to_string()))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    /// 非 2xx 视为失败，尽量取出 `{ error }` 中的消息
    async fn check(response: Response) -> Result<Response, ClientError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        let message = serde_json::from_str::<ErrorPayload>(&body)
            .map(|p| p.error)
            .unwrap_or(body);

        Err(ClientError::Status {
            status: status.as_u16(),
            message,
        })
    }
}

#[async_trait]
impl WalletApi for HttpWalletApi {
    async fn connect(&self, address: &str) -> Result<ConnectionRecord, ClientError> {
        let url = self.endpoint(&["api", "wallet", "connect"])?;
        let response = self
            .http
            .post(url)
            .json(&serde_json::json!({ "address": address }))
            .send()
            .await?;

        Ok(Self::check(response).await?.json().await?)
    }

    async fn balance(&self, address: &str) -> Result<String, ClientError> {
        let url = self.endpoint(&["api", "wallet", "balance", address])?;
        let response = self.http.get(url).send().await?;

        let body: BalanceResponse = Self::check(response).await?.json().await?;
        Ok(body.balance)
    }
}
