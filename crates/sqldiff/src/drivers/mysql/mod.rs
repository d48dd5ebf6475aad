//! MySQL/MariaDB row source.
//!
//! Connects through an SQLx pool and streams the ordered SELECT for each
//! side of a diff as a [`MysqlRowSource`].
//!
//! # Supported Versions
//!
//! - MySQL 5.7+, 8.0+
//! - MariaDB 10.2+
//!
//! # Connection String
//!
//! Takes the validated `user:password@tcp(host:port)/database` form, see
//! [`Dsn`].

mod reader;
mod temporal;

pub use reader::MysqlRowSource;

use std::time::Duration;

use sqlx::mysql::{MySqlConnectOptions, MySqlPool, MySqlPoolOptions, MySqlSslMode};
use tracing::info;

use crate::config::Dsn;
use crate::error::{DiffError, Result};

/// One connection per side.
const MAX_CONNECTIONS: u32 = 2;

/// Open a pool for `dsn` and make sure the server answers.
pub async fn connect(dsn: &Dsn, timeout: Duration) -> Result<MySqlPool> {
    let options = MySqlConnectOptions::new()
        .host(&dsn.host)
        .port(dsn.port)
        .database(&dsn.database)
        .username(&dsn.user)
        .password(&dsn.password)
        .ssl_mode(MySqlSslMode::Preferred);

    let pool = MySqlPoolOptions::new()
        .max_connections(MAX_CONNECTIONS)
        .acquire_timeout(timeout)
        .connect_with(options)
        .await
        .map_err(|e| DiffError::connection(e, format!("opening {}", dsn)))?;

    // Test connection
    sqlx::query("SELECT 1")
        .fetch_one(&pool)
        .await
        .map_err(|e| DiffError::connection(e, format!("testing {}", dsn)))?;

    info!("Connected to MySQL: {}:{}/{}", dsn.host, dsn.port, dsn.database);
    Ok(pool)
}

/// Quote a MySQL identifier.
pub fn quote_ident(name: &str) -> String {
    format!("`{}`", name.replace('`', "``"))
}

/// Ordered SELECT for one side.
///
/// `relation` is inserted verbatim so that it may carry a WHERE clause
/// (`hoges WHERE deleted = 0`); only the key column is quoted.
pub fn select_sql(relation: &str, columns: &str, key_column: &str) -> String {
    format!(
        "SELECT {} FROM {} ORDER BY {}",
        columns,
        relation,
        quote_ident(key_column)
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quote_ident() {
        assert_eq!(quote_ident("id"), "`id`");
        assert_eq!(quote_ident("odd`name"), "`odd``name`");
    }

    #[test]
    fn test_select_sql() {
        assert_eq!(
            select_sql("hoges", "*", "id"),
            "SELECT * FROM hoges ORDER BY `id`"
        );
        assert_eq!(
            select_sql("bak_hoges WHERE deleted = 0", "id, name", "order_no"),
            "SELECT id, name FROM bak_hoges WHERE deleted = 0 ORDER BY `order_no`"
        );
    }
}
