use crate::db::traits::AuthStore;
use crate::types::{AppError, Result, Session, User};
use async_trait::async_trait;
use chrono::Utc;
use libsql::{Builder, Connection};

/// libsql-backed store for users and sessions.
///
/// All operations share one connection opened at construction. An
/// in-memory database is scoped to its connection, so the schema and
/// the data must live on the same one; a fresh `connect()` per
/// operation would see an empty database in memory mode.
pub struct LibsqlStore {
    conn: Connection,
}

impl LibsqlStore {
    /// Open (or create) a local SQLite database file.
    pub async fn new_local(path: &str) -> Result<Self> {
        let db = Builder::new_local(path)
            .build()
            .await
            .map_err(|e| AppError::Database(format!("Failed to open database: {}", e)))?;

        let conn = db
            .connect()
            .map_err(|e| AppError::Database(format!("Failed to get connection: {}", e)))?;

        let store = Self { conn };
        store.initialize_schema().await?;

        Ok(store)
    }

    /// Open an ephemeral in-memory database.
    pub async fn new_memory() -> Result<Self> {
        Self::new_local(":memory:").await
    }

    async fn initialize_schema(&self) -> Result<()> {
        let conn = &self.conn;

        conn.execute(
            "CREATE TABLE IF NOT EXISTS users (
                id TEXT PRIMARY KEY,
                login TEXT UNIQUE NOT NULL,
                password_hash TEXT NOT NULL,
                created_at INTEGER NOT NULL
            )",
            (),
        )
        .await
        .map_err(|e| AppError::Database(format!("Failed to create users table: {}", e)))?;

        conn.execute(
            "CREATE TABLE IF NOT EXISTS sessions (
                id TEXT PRIMARY KEY,
                user_id TEXT NOT NULL,
                refresh_token_hash TEXT NOT NULL,
                expires_at INTEGER NOT NULL,
                created_at INTEGER NOT NULL,
                FOREIGN KEY (user_id) REFERENCES users(id) ON DELETE CASCADE
            )",
            (),
        )
        .await
        .map_err(|e| AppError::Database(format!("Failed to create sessions table: {}", e)))?;

        Ok(())
    }

    fn row_to_user(row: libsql::Row) -> Result<User> {
        Ok(User {
            id: row.get(0).map_err(|e| AppError::Database(e.to_string()))?,
            login: row.get(1).map_err(|e| AppError::Database(e.to_string()))?,
            password_hash: row.get(2).map_err(|e| AppError::Database(e.to_string()))?,
            created_at: row.get(3).map_err(|e| AppError::Database(e.to_string()))?,
        })
    }
}

#[async_trait]
impl AuthStore for LibsqlStore {
    async fn create_user(&self, id: &str, login: &str, password_hash: &str) -> Result<()> {
        let conn = &self.conn;
        let now = Utc::now().timestamp();

        conn.execute(
            "INSERT INTO users (id, login, password_hash, created_at)
             VALUES (?, ?, ?, ?)",
            (id, login, password_hash, now),
        )
        .await
        .map_err(|e| AppError::Database(format!("Failed to create user: {}", e)))?;

        Ok(())
    }

    async fn find_user_by_login(&self, login: &str) -> Result<Option<User>> {
        let conn = &self.conn;

        let mut rows = conn
            .query(
                "SELECT id, login, password_hash, created_at
                 FROM users WHERE login = ?",
                [login],
            )
            .await
            .map_err(|e| AppError::Database(format!("Failed to query user: {}", e)))?;

        if let Some(row) = rows
            .next()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?
        {
            Ok(Some(Self::row_to_user(row)?))
        } else {
            Ok(None)
        }
    }

    async fn find_user_by_id(&self, id: &str) -> Result<Option<User>> {
        let conn = &self.conn;

        let mut rows = conn
            .query(
                "SELECT id, login, password_hash, created_at
                 FROM users WHERE id = ?",
                [id],
            )
            .await
            .map_err(|e| AppError::Database(format!("Failed to query user: {}", e)))?;

        if let Some(row) = rows
            .next()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?
        {
            Ok(Some(Self::row_to_user(row)?))
        } else {
            Ok(None)
        }
    }

    async fn create_session(
        &self,
        id: &str,
        user_id: &str,
        refresh_token_hash: &str,
        expires_at: i64,
    ) -> Result<()> {
        let conn = &self.conn;
        let now = Utc::now().timestamp();

        conn.execute(
            "INSERT INTO sessions (id, user_id, refresh_token_hash, expires_at, created_at)
             VALUES (?, ?, ?, ?, ?)",
            (id, user_id, refresh_token_hash, expires_at, now),
        )
        .await
        .map_err(|e| AppError::Database(format!("Failed to create session: {}", e)))?;

        Ok(())
    }

    async fn find_session(&self, id: &str) -> Result<Option<Session>> {
        let conn = &self.conn;

        let mut rows = conn
            .query(
                "SELECT id, user_id, refresh_token_hash, expires_at, created_at
                 FROM sessions WHERE id = ?",
                [id],
            )
            .await
            .map_err(|e| AppError::Database(format!("Failed to query session: {}", e)))?;

        if let Some(row) = rows
            .next()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?
        {
            Ok(Some(Session {
                id: row.get(0).map_err(|e| AppError::Database(e.to_string()))?,
                user_id: row.get(1).map_err(|e| AppError::Database(e.to_string()))?,
                refresh_token_hash: row.get(2).map_err(|e| AppError::Database(e.to_string()))?,
                expires_at: row.get(3).map_err(|e| AppError::Database(e.to_string()))?,
                created_at: row.get(4).map_err(|e| AppError::Database(e.to_string()))?,
            }))
        } else {
            Ok(None)
        }
    }

    async fn delete_session(&self, id: &str) -> Result<bool> {
        let conn = &self.conn;

        let affected = conn
            .execute("DELETE FROM sessions WHERE id = ?", [id])
            .await
            .map_err(|e| AppError::Database(format!("Failed to delete session: {}", e)))?;

        Ok(affected > 0)
    }
}
