#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode},
};
use serde_json::{Value, json};
use tower::ServiceExt;

use client_service::cpf::Cpf;
use client_service::db::ClientStore;
use client_service::delivery::DeliveryService;
use client_service::error::{Error, Result};
use client_service::models::{Client, ClientChanges, DeliveryStatus, NewClient};
use client_service::{AppState, create_router};

/// In-memory store with the same uniqueness rules as the `cliente` table
#[derive(Default)]
pub struct MemoryClientStore {
    rows: Mutex<Vec<Client>>,
    next_id: Mutex<i32>,
}

impl MemoryClientStore {
    pub fn len(&self) -> usize {
        self.rows.lock().unwrap().len()
    }

    pub fn snapshot(&self) -> Vec<Client> {
        self.rows.lock().unwrap().clone()
    }
}

#[async_trait]
impl ClientStore for MemoryClientStore {
    async fn create(&self, client: &NewClient) -> Result<Client> {
        let mut rows = self.rows.lock().unwrap();
        if rows
            .iter()
            .any(|r| r.email == client.email || r.cpf == client.cpf.as_str())
        {
            return Err(Error::Duplicate);
        }

        let mut next_id = self.next_id.lock().unwrap();
        *next_id += 1;
        let row = Client {
            id: *next_id,
            email: client.email.clone(),
            name: client.name.clone(),
            age: client.age,
            cpf: client.cpf.to_string(),
            created_at: chrono::Utc::now().naive_utc(),
        };
        rows.push(row.clone());
        Ok(row)
    }

    async fn list_all(&self) -> Result<Vec<Client>> {
        Ok(self.snapshot())
    }

    async fn find_by_cpf(&self, cpf: &Cpf) -> Result<Client> {
        self.rows
            .lock()
            .unwrap()
            .iter()
            .find(|r| r.cpf == cpf.as_str())
            .cloned()
            .ok_or(Error::NotFound)
    }

    async fn delete_by_cpf(&self, cpf: &Cpf) -> Result<u64> {
        let mut rows = self.rows.lock().unwrap();
        let before = rows.len();
        rows.retain(|r| r.cpf != cpf.as_str());
        let deleted = (before - rows.len()) as u64;
        if deleted == 0 {
            return Err(Error::NotFound);
        }
        Ok(deleted)
    }

    async fn update_by_cpf(&self, cpf: &Cpf, changes: &ClientChanges) -> Result<Client> {
        let mut rows = self.rows.lock().unwrap();
        if rows
            .iter()
            .any(|r| r.email == changes.email && r.cpf != cpf.as_str())
        {
            return Err(Error::Storage(anyhow::anyhow!("unique violation on email")));
        }

        let row = rows
            .iter_mut()
            .find(|r| r.cpf == cpf.as_str())
            .ok_or(Error::NotFound)?;
        row.email = changes.email.clone();
        row.name = changes.name.clone();
        row.age = changes.age;
        Ok(row.clone())
    }
}

/// Store whose every operation fails as if the database were gone
pub struct BrokenClientStore;

fn broken() -> Error {
    Error::Storage(anyhow::anyhow!("connection refused"))
}

#[async_trait]
impl ClientStore for BrokenClientStore {
    async fn create(&self, _client: &NewClient) -> Result<Client> {
        Err(broken())
    }

    async fn list_all(&self) -> Result<Vec<Client>> {
        Err(broken())
    }

    async fn find_by_cpf(&self, _cpf: &Cpf) -> Result<Client> {
        Err(broken())
    }

    async fn delete_by_cpf(&self, _cpf: &Cpf) -> Result<u64> {
        Err(broken())
    }

    async fn update_by_cpf(&self, _cpf: &Cpf, _changes: &ClientChanges) -> Result<Client> {
        Err(broken())
    }
}

/// Delivery service stand-in keyed by delivery number
#[derive(Default)]
pub struct FakeDelivery {
    pub deliveries: Mutex<HashMap<i64, bool>>,
    /// When set, every call fails with this remote status
    pub remote_status: Option<u16>,
    pub unreachable: bool,
}

impl FakeDelivery {
    pub fn with_delivery(numero_entrega: i64, entrega_realizada: bool) -> Self {
        let fake = Self::default();
        fake.deliveries
            .lock()
            .unwrap()
            .insert(numero_entrega, entrega_realizada);
        fake
    }

    fn failure(&self) -> Option<Error> {
        if self.unreachable {
            return Some(Error::Upstream {
                status: None,
                message: "connection refused".to_string(),
            });
        }
        self.remote_status.map(|status| Error::Upstream {
            status: Some(status),
            message: "remote failure".to_string(),
        })
    }
}

#[async_trait]
impl DeliveryService for FakeDelivery {
    async fn update_status(&self, numero_entrega: i64, entrega_realizada: bool) -> Result<Value> {
        if let Some(err) = self.failure() {
            return Err(err);
        }
        self.deliveries
            .lock()
            .unwrap()
            .insert(numero_entrega, entrega_realizada);
        Ok(json!({
            "message": "Entrega atualizada",
            "numero_entrega": numero_entrega.to_string(),
        }))
    }

    async fn get_status(&self, numero_entrega: i64) -> Result<DeliveryStatus> {
        if let Some(err) = self.failure() {
            return Err(err);
        }
        self.deliveries
            .lock()
            .unwrap()
            .get(&numero_entrega)
            .map(|&entrega_realizada| DeliveryStatus {
                numero_entrega,
                entrega_realizada,
            })
            .ok_or(Error::NotFound)
    }
}

pub fn app(clients: Arc<dyn ClientStore>, delivery: Arc<dyn DeliveryService>) -> Router {
    create_router(AppState::new(clients, delivery))
}

/// Send one request through the router and decode the JSON body, if any
pub async fn send(app: &Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or(Value::Null)
    };
    (status, body)
}

pub fn get(uri: &str) -> Request<Body> {
    Request::builder().method("GET").uri(uri).body(Body::empty()).unwrap()
}

pub fn delete(uri: &str) -> Request<Body> {
    Request::builder().method("DELETE").uri(uri).body(Body::empty()).unwrap()
}

pub fn put(uri: &str) -> Request<Body> {
    Request::builder().method("PUT").uri(uri).body(Body::empty()).unwrap()
}

pub fn post(uri: &str) -> Request<Body> {
    Request::builder().method("POST").uri(uri).body(Body::empty()).unwrap()
}

pub fn post_form(uri: &str, form: &str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/x-www-form-urlencoded")
        .body(Body::from(form.to_string()))
        .unwrap()
}
