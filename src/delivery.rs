//! Client for the external delivery service

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde_json::{Value, json};

use crate::error::{Error, Result};
use crate::models::DeliveryStatus;

/// Operations proxied to the delivery service
#[async_trait]
pub trait DeliveryService: Send + Sync {
    /// Mark a delivery as (not) received. The remote answer is returned as is.
    async fn update_status(&self, numero_entrega: i64, entrega_realizada: bool) -> Result<Value>;

    /// Look up the status of a delivery
    async fn get_status(&self, numero_entrega: i64) -> Result<DeliveryStatus>;
}

pub struct HttpDeliveryClient {
    client: Client,
    base_url: String,
}

impl HttpDeliveryClient {
    /// `timeout` of `None` leaves requests unbounded
    pub fn new(base_url: impl Into<String>, timeout: Option<Duration>) -> Result<Self> {
        let mut builder = Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder.build()?;

        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path)
    }
}

#[async_trait]
impl DeliveryService for HttpDeliveryClient {
    async fn update_status(&self, numero_entrega: i64, entrega_realizada: bool) -> Result<Value> {
        let response = self
            .client
            .put(self.url("atualizar_status_entrega"))
            .json(&json!({
                "numero_entrega": numero_entrega,
                "entrega_realizada": entrega_realizada,
            }))
            .send()
            .await?;

        let status = response.status();
        if status != StatusCode::OK {
            return Err(Error::Upstream {
                status: Some(status.as_u16()),
                message: format!("status update for delivery {} rejected", numero_entrega),
            });
        }

        let body = response.json::<Value>().await?;
        tracing::debug!(numero_entrega, %body, "delivery status updated");

        Ok(body)
    }

    async fn get_status(&self, numero_entrega: i64) -> Result<DeliveryStatus> {
        let response = self
            .client
            .post(self.url("buscar_entrega_numero"))
            .json(&json!({ "numero_entrega": numero_entrega }))
            .send()
            .await?;

        match response.status() {
            StatusCode::OK => Ok(response.json::<DeliveryStatus>().await?),
            StatusCode::NOT_FOUND => Err(Error::NotFound),
            status => Err(Error::Upstream {
                status: Some(status.as_u16()),
                message: format!("lookup of delivery {} failed", numero_entrega),
            }),
        }
    }
}
