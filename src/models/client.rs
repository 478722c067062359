use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::cpf::Cpf;

/// A row of the `cliente` table
#[derive(sqlx::FromRow, Debug, Clone, PartialEq)]
pub struct Client {
    #[sqlx(rename = "pk_cliente")]
    pub id: i32,
    pub email: String,
    #[sqlx(rename = "nome")]
    pub name: String,
    #[sqlx(rename = "idade")]
    pub age: i32,
    pub cpf: String,
    #[sqlx(rename = "data_insercao")]
    pub created_at: NaiveDateTime,
}

/// Fields supplied when registering a client
#[derive(Debug, Clone)]
pub struct NewClient {
    pub email: String,
    pub name: String,
    pub age: i32,
    pub cpf: Cpf,
}

/// Fields an update may overwrite. The CPF is the lookup key and never changes.
#[derive(Debug, Clone)]
pub struct ClientChanges {
    pub email: String,
    pub name: String,
    pub age: i32,
}

/// Wire representation of a client
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct ClientView {
    pub id: i32,
    #[schema(example = "abc@gmail.com")]
    pub email: String,
    #[schema(example = "Gabriela Santos")]
    pub nome: String,
    pub idade: i32,
    #[schema(example = "000.000.000-00")]
    pub cpf: String,
}

impl From<Client> for ClientView {
    fn from(client: Client) -> Self {
        Self {
            id: client.id,
            email: client.email,
            nome: client.name,
            idade: client.age,
            cpf: client.cpf,
        }
    }
}
