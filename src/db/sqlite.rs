use crate::db::models::{AuthData, UserProfile};
use crate::db::schema::SQLITE_INIT;
use crate::error::RosterError;
use sqlx::sqlite::SqliteConnectOptions;
use sqlx::sqlite::SqlitePoolOptions;
use sqlx::{Pool, Sqlite};
use std::str::FromStr;
use std::sync::Arc;
use tokio::sync::Mutex;

pub type SqlitePool = Pool<Sqlite>;

/// Open the backing store as a single-connection pool. Every clone of a
/// source shares the one handle, which also keeps `sqlite::memory:` databases
/// coherent across calls; the handle closes when the last clone drops.
pub async fn connect(database_url: &str) -> Result<SqlitePool, RosterError> {
    let connect_opts = SqliteConnectOptions::from_str(database_url)?.create_if_missing(true);
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .idle_timeout(None)
        .max_lifetime(None)
        .connect_with(connect_opts)
        .await?;
    Ok(pool)
}

/// Initialize the schema by executing the bundled DDL.
pub async fn init_schema(pool: &SqlitePool) -> Result<(), RosterError> {
    // execute multiple statements safely (SQLite supports multi-commands but sqlx::query doesn't)
    for stmt in SQLITE_INIT.split(';') {
        let s = stmt.trim();
        if s.is_empty() {
            continue;
        }
        sqlx::query(s).execute(pool).await?;
    }
    Ok(())
}

fn expect_one_row(affected: u64) -> Result<(), RosterError> {
    if affected == 1 {
        Ok(())
    } else {
        Err(RosterError::RowCount { affected })
    }
}

/// Data access object for the `user_data` table.
///
/// Writes serialize on an instance-level lock held for the duration of the
/// statement; reads never take it.
#[derive(Clone)]
pub struct DataSource {
    pool: SqlitePool,
    write_lock: Arc<Mutex<()>>,
}

impl DataSource {
    pub fn new(pool: SqlitePool) -> Self {
        Self {
            pool,
            write_lock: Arc::new(Mutex::new(())),
        }
    }

    /// All ids currently in the table, store order.
    pub async fn get_ids(&self) -> Result<Vec<i64>, RosterError> {
        let rows: Vec<(i64,)> = sqlx::query_as("SELECT id FROM user_data")
            .fetch_all(&self.pool)
            .await?;
        Ok(rows.into_iter().map(|(id,)| id).collect())
    }

    /// Single record by id, with the id column left out. `None` when no row
    /// matches; that is not an error.
    pub async fn get_data(&self, id: i64) -> Result<Option<UserProfile>, RosterError> {
        let row = sqlx::query_as::<_, UserProfile>(
            "SELECT name, username, email FROM user_data WHERE id = ?",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row)
    }

    /// Insert a row and return its assigned id.
    pub async fn add_data(
        &self,
        name: &str,
        username: &str,
        email: &str,
    ) -> Result<i64, RosterError> {
        let _guard = self.write_lock.lock().await;
        let result = sqlx::query("INSERT INTO user_data (name, username, email) VALUES (?, ?, ?)")
            .bind(name)
            .bind(username)
            .bind(email)
            .execute(&self.pool)
            .await?;
        Ok(result.last_insert_rowid())
    }

    /// Update the row matching id. A write that does not land on exactly one
    /// row fails; "id not found" is not reported separately.
    pub async fn update_data(
        &self,
        id: i64,
        name: &str,
        username: &str,
        email: &str,
    ) -> Result<(), RosterError> {
        let _guard = self.write_lock.lock().await;
        let result =
            sqlx::query("UPDATE user_data SET name = ?, username = ?, email = ? WHERE id = ?")
                .bind(name)
                .bind(username)
                .bind(email)
                .bind(id)
                .execute(&self.pool)
                .await?;
        expect_one_row(result.rows_affected())
    }

    /// Delete the row matching id, with the same exactly-one-row rule as
    /// `update_data`.
    pub async fn delete_data(&self, id: i64) -> Result<(), RosterError> {
        let _guard = self.write_lock.lock().await;
        let result = sqlx::query("DELETE FROM user_data WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;
        expect_one_row(result.rows_affected())
    }
}

/// Data access object for the `user_credentials` table.
#[derive(Clone)]
pub struct CredentialsSource {
    pool: SqlitePool,
    write_lock: Arc<Mutex<()>>,
}

impl CredentialsSource {
    pub fn new(pool: SqlitePool) -> Self {
        Self {
            pool,
            write_lock: Arc::new(Mutex::new(())),
        }
    }

    /// Existence check via a single `SELECT EXISTS` query.
    pub async fn has_username(&self, username: &str) -> Result<bool, RosterError> {
        let (exists,): (i64,) =
            sqlx::query_as("SELECT EXISTS (SELECT 1 FROM user_credentials WHERE username = ?)")
                .bind(username)
                .fetch_one(&self.pool)
                .await?;
        Ok(exists != 0)
    }

    pub async fn get_usernames(&self) -> Result<Vec<String>, RosterError> {
        let rows: Vec<(String,)> = sqlx::query_as("SELECT username FROM user_credentials")
            .fetch_all(&self.pool)
            .await?;
        Ok(rows.into_iter().map(|(username,)| username).collect())
    }

    /// Hash and salt for a username, `None` when it was never registered.
    pub async fn get_authentication_data(
        &self,
        username: &str,
    ) -> Result<Option<AuthData>, RosterError> {
        let row = sqlx::query_as::<_, AuthData>(
            "SELECT password_hash, password_salt FROM user_credentials WHERE username = ?",
        )
        .bind(username)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row)
    }

    /// Insert a credential row and return its assigned id. The UNIQUE
    /// constraint on `username` rejects duplicates with a database error.
    pub async fn set_credentials(
        &self,
        username: &str,
        password_hash: &str,
        salt: &str,
    ) -> Result<i64, RosterError> {
        let _guard = self.write_lock.lock().await;
        let result = sqlx::query(
            "INSERT INTO user_credentials (username, password_hash, password_salt) VALUES (?, ?, ?)",
        )
        .bind(username)
        .bind(password_hash)
        .bind(salt)
        .execute(&self.pool)
        .await?;
        Ok(result.last_insert_rowid())
    }
}
