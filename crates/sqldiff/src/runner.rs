//! One diff invocation from connection to result.

use std::time::Duration;

use sqlx::mysql::MySqlPool;
use tracing::{debug, info};

use crate::config::{DiffOptions, Dsn};
use crate::core::RowSource;
use crate::diff::{DiffEngine, DiffResult, DiffSink};
use crate::drivers::mysql::{self, MysqlRowSource};
use crate::error::Result;

/// Compare two MySQL tables (or filtered relations) reachable through `dsn`.
///
/// Both sources and the pool are released on every exit path.
pub async fn diff_tables<S>(
    dsn: &Dsn,
    options: &DiffOptions,
    connect_timeout: Duration,
    sink: &mut S,
) -> Result<DiffResult>
where
    S: DiffSink + ?Sized,
{
    options.validate()?;
    info!("Comparing {} with {} on {}", options.left, options.right, dsn);

    let pool = mysql::connect(dsn, connect_timeout).await?;
    let result = diff_on_pool(&pool, options, sink).await;
    pool.close().await;
    result
}

async fn diff_on_pool<S>(pool: &MySqlPool, options: &DiffOptions, sink: &mut S) -> Result<DiffResult>
where
    S: DiffSink + ?Sized,
{
    let left_sql = mysql::select_sql(&options.left, &options.columns, &options.key_column);
    let right_sql = mysql::select_sql(&options.right, &options.columns, &options.key_column);
    debug!("left: {}", left_sql);
    debug!("right: {}", right_sql);

    let mut left = MysqlRowSource::open(pool, options.left.as_str(), &left_sql).await?;
    let mut right = match MysqlRowSource::open(pool, options.right.as_str(), &right_sql).await {
        Ok(source) => source,
        Err(e) => {
            left.close().await;
            return Err(e);
        }
    };

    let engine = DiffEngine::new(options.clone());
    compare_sources(&engine, &mut left, &mut right, sink).await
}

/// Run `engine` over two open sources, closing both afterwards whatever the
/// outcome.
pub async fn compare_sources<L, R, S>(
    engine: &DiffEngine,
    left: &mut L,
    right: &mut R,
    sink: &mut S,
) -> Result<DiffResult>
where
    L: RowSource + ?Sized,
    R: RowSource + ?Sized,
    S: DiffSink + ?Sized,
{
    let result = engine.run(left, right, sink).await;
    left.close().await;
    right.close().await;
    result
}
