use async_trait::async_trait;
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;

use crate::config::Config;
use crate::cpf::Cpf;
use crate::error::{Error, Result};
use crate::models::{Client, ClientChanges, NewClient};

/// Persistence operations on clients.
///
/// Every lookup takes a [`Cpf`], so only canonical CPFs ever reach the store.
#[async_trait]
pub trait ClientStore: Send + Sync {
    /// Insert a client. Fails with [`Error::Duplicate`] when the email or the
    /// CPF is already taken.
    async fn create(&self, client: &NewClient) -> Result<Client>;

    async fn list_all(&self) -> Result<Vec<Client>>;

    async fn find_by_cpf(&self, cpf: &Cpf) -> Result<Client>;

    /// Delete the client holding `cpf`. Deleting nothing is [`Error::NotFound`].
    async fn delete_by_cpf(&self, cpf: &Cpf) -> Result<u64>;

    /// Overwrite email, name and age of the client holding `cpf`.
    async fn update_by_cpf(&self, cpf: &Cpf, changes: &ClientChanges) -> Result<Client>;
}

/// Database connection pool
#[derive(Clone)]
pub struct Database {
    pool: PgPool,
}

impl Database {
    /// Create a new Database instance with a connection pool
    pub async fn new(config: &Config) -> Result<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(config.database_max_connections)
            .connect(config.database_url())
            .await?;

        Ok(Self { pool })
    }

    pub fn from_pool(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Get a reference to the connection pool
    pub fn get_pool(&self) -> &PgPool {
        &self.pool
    }

    /// Apply the migrations embedded from `migrations/`
    pub async fn migrate(&self) -> Result<()> {
        sqlx::migrate!()
            .run(self.get_pool())
            .await
            .map_err(|e| Error::Storage(e.into()))?;

        Ok(())
    }
}

const CLIENT_COLUMNS: &str = "pk_cliente, email, nome, idade, cpf, data_insercao";

#[async_trait]
impl ClientStore for Database {
    async fn create(&self, client: &NewClient) -> Result<Client> {
        let inserted = sqlx::query_as::<_, Client>(&format!(
            r#"
            INSERT INTO cliente (email, nome, idade, cpf)
            VALUES ($1, $2, $3, $4)
            RETURNING {CLIENT_COLUMNS}
            "#
        ))
        .bind(&client.email)
        .bind(&client.name)
        .bind(client.age)
        .bind(client.cpf.as_str())
        .fetch_one(self.get_pool())
        .await;

        match inserted {
            Ok(row) => Ok(row),
            Err(err) if is_unique_violation(&err) => Err(Error::Duplicate),
            Err(err) => Err(Error::Storage(err.into())),
        }
    }

    async fn list_all(&self) -> Result<Vec<Client>> {
        let clients = sqlx::query_as::<_, Client>(&format!(
            "SELECT {CLIENT_COLUMNS} FROM cliente ORDER BY pk_cliente ASC"
        ))
        .fetch_all(self.get_pool())
        .await?;

        Ok(clients)
    }

    async fn find_by_cpf(&self, cpf: &Cpf) -> Result<Client> {
        let client = sqlx::query_as::<_, Client>(&format!(
            "SELECT {CLIENT_COLUMNS} FROM cliente WHERE cpf = $1"
        ))
        .bind(cpf.as_str())
        .fetch_optional(self.get_pool())
        .await?;

        client.ok_or(Error::NotFound)
    }

    async fn delete_by_cpf(&self, cpf: &Cpf) -> Result<u64> {
        let deleted = sqlx::query("DELETE FROM cliente WHERE cpf = $1")
            .bind(cpf.as_str())
            .execute(self.get_pool())
            .await?
            .rows_affected();

        if deleted == 0 {
            return Err(Error::NotFound);
        }

        Ok(deleted)
    }

    async fn update_by_cpf(&self, cpf: &Cpf, changes: &ClientChanges) -> Result<Client> {
        // Single statement so the lookup and the write see the same row.
        let updated = sqlx::query_as::<_, Client>(&format!(
            r#"
            UPDATE cliente
            SET email = $1, nome = $2, idade = $3
            WHERE cpf = $4
            RETURNING {CLIENT_COLUMNS}
            "#
        ))
        .bind(&changes.email)
        .bind(&changes.name)
        .bind(changes.age)
        .bind(cpf.as_str())
        .fetch_optional(self.get_pool())
        .await?;

        updated.ok_or(Error::NotFound)
    }
}

fn is_unique_violation(err: &sqlx::Error) -> bool {
    match err {
        sqlx::Error::Database(db_err) => db_err.is_unique_violation(),
        _ => false,
    }
}

/// Initialize the database connection pool
pub async fn init(config: &Config, run_migrations: bool) -> Result<Database> {
    let db = Database::new(config).await?;

    if run_migrations {
        db.migrate().await?;
        tracing::info!("database migrations applied");
    }

    Ok(db)
}
