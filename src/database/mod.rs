use diesel::{
    Connection, PgConnection, SqliteConnection,
    r2d2::{ConnectionManager, Pool, PooledConnection},
};
use diesel_migrations::{EmbeddedMigrations, MigrationHarness, embed_migrations};
use serde::Serialize;
use std::fs::File;
use std::path::Path;
use std::time::Duration;

use cyder_tools::log::{info, warn};

use crate::controller::BaseError;

pub mod article;
pub mod git_repo;
pub mod llm_benchmark;
pub mod llm_model;

pub enum DbType {
    Postgres,
    Sqlite,
}

#[derive(Clone)]
pub enum DbPool {
    Postgres(Pool<ConnectionManager<PgConnection>>),
    Sqlite(Pool<ConnectionManager<SqliteConnection>>),
}

pub enum DbConnection {
    Postgres(PooledConnection<ConnectionManager<PgConnection>>),
    Sqlite(PooledConnection<ConnectionManager<SqliteConnection>>),
}

fn parse_db_type(db_url: &str) -> DbType {
    if db_url.starts_with("postgres") {
        DbType::Postgres
    } else {
        DbType::Sqlite
    }
}

impl DbPool {
    /// Opens the pool for `db_url` and runs pending migrations.
    /// `timeout` bounds how long a request waits for a free connection.
    pub fn establish(db_url: &str, max_size: u32, timeout: Duration) -> DbResult<Self> {
        match parse_db_type(db_url) {
            DbType::Postgres => init_pg_pool(db_url, max_size, timeout).map(DbPool::Postgres),
            DbType::Sqlite => init_sqlite_pool(db_url, max_size, timeout).map(DbPool::Sqlite),
        }
    }

    /// Checks a connection out of the pool. A checkout that does not
    /// complete within the configured timeout fails the request.
    pub fn get(&self) -> DbResult<DbConnection> {
        match self {
            DbPool::Postgres(pool) => pool.get().map(DbConnection::Postgres),
            DbPool::Sqlite(pool) => pool.get().map(DbConnection::Sqlite),
        }
        .map_err(|e| {
            warn!("database connection checkout failed: {}", e);
            BaseError::StoreTimeout(Some(format!("database unavailable: {}", e)))
        })
    }
}

#[path = "../schema/sqlite.rs"]
pub mod _sqlite_schema;

#[path = "../schema/postgres.rs"]
pub mod _postgres_schema;

#[macro_export]
macro_rules! db_object {
    (
        $(
            $( #[$attr:meta] )*
            pub struct $name:ident {
                $( $( #[$field_attr:meta] )* $vis:vis $field:ident : $typ:ty ),+
                $(,)?
            }
        )+
    ) => {
        $(
            #[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
            #[serde(rename_all = "camelCase")]
            pub struct $name { $( $vis $field : $typ, )+ }
        )+

        pub mod _postgres_model {
            $( $crate::db_object! { @expand postgres |  $( #[$attr] )* | $name |  $( $( #[$field_attr] )* $field : $typ ),+ } )+
        }
        pub mod _sqlite_model {
            $( $crate::db_object! { @expand sqlite |  $( #[$attr] )* | $name |  $( $( #[$field_attr] )* $field : $typ ),+ } )+
        }
    };
    ( @expand $db_type:ident | $( #[$attr:meta] )* | $name:ident | $( $( #[$field_attr:meta] )* $vis:vis $field:ident : $typ:ty),+) => {
        paste::paste! {
            #[allow(unused_imports)] use super::*;
            #[allow(unused_imports)] use crate::database::[<_ $db_type _schema>]::*;
            #[allow(unused_imports)] use diesel::prelude::*;

            $( #[$attr] )*
            pub struct [<$name Db>] { $(
                $( #[$field_attr] )* $vis $field : $typ,
            )+ }

            impl [<$name Db>] {
                #[inline(always)]
                pub fn from_db(self) -> super::$name {
                    super::$name { $( $field: self.$field, )+ }
                }

                #[allow(dead_code)]
                #[inline(always)]
                pub fn to_db(x: &super::$name) -> Self {
                    Self {
                        $( $field: x.$field.clone(), )+
                    }
                }
            }
        }
    }
}

#[macro_export]
macro_rules! db_execute {
    ($conn:ident, $block:block) => {
        match $conn {
            $crate::database::DbConnection::Postgres($conn) => {
                #[allow(unused_imports)]
                use $crate::database::_postgres_schema::*;
                #[allow(unused_imports)]
                use _postgres_model::*;
                #[allow(unused_imports)]
                use diesel::prelude::*;

                $block
            }
            $crate::database::DbConnection::Sqlite($conn) => {
                #[allow(unused_imports)]
                use $crate::database::_sqlite_schema::*;
                #[allow(unused_imports)]
                use _sqlite_model::*;
                #[allow(unused_imports)]
                use diesel::prelude::*;

                $block
            }
        }
    };
}

const SQLITE_MIGRATIONS: EmbeddedMigrations = embed_migrations!("migrations/sqlite");
const POSTGRES_MIGRATIONS: EmbeddedMigrations = embed_migrations!("migrations/postgres");

fn migration_error(e: impl std::fmt::Display) -> BaseError {
    BaseError::DatabaseFatal(Some(format!("failed to run migrations: {}", e)))
}

fn pool_error(e: impl std::fmt::Display) -> BaseError {
    BaseError::DatabaseFatal(Some(format!("failed to create pool: {}", e)))
}

fn init_sqlite_pool(
    db_url: &str,
    max_size: u32,
    timeout: Duration,
) -> DbResult<Pool<ConnectionManager<SqliteConnection>>> {
    let in_memory = db_url == ":memory:";
    let db_path = Path::new(db_url);
    if !in_memory && !db_path.exists() {
        if let Some(parent_dir) = db_path.parent() {
            if !parent_dir.as_os_str().is_empty() && !parent_dir.exists() {
                std::fs::create_dir_all(parent_dir).map_err(|e| {
                    BaseError::DatabaseFatal(Some(format!(
                        "failed to create database directory: {}",
                        e
                    )))
                })?;
            }
        }
        File::create(db_path).map_err(|e| {
            BaseError::DatabaseFatal(Some(format!("failed to create database file: {}", e)))
        })?;
        info!("created sqlite database at {}", db_url);
    }

    let manager = ConnectionManager::<SqliteConnection>::new(db_url);
    // Every connection to ":memory:" is its own database, so keep exactly one.
    let max_size = if in_memory { 1 } else { max_size };
    let pool = Pool::builder()
        .test_on_check_out(true)
        .max_size(max_size)
        .connection_timeout(timeout)
        .build(manager)
        .map_err(pool_error)?;

    let mut connection = pool.get().map_err(pool_error)?;
    connection
        .run_pending_migrations(SQLITE_MIGRATIONS)
        .map_err(migration_error)?;

    Ok(pool)
}

fn init_pg_pool(
    db_url: &str,
    max_size: u32,
    timeout: Duration,
) -> DbResult<Pool<ConnectionManager<PgConnection>>> {
    let mut connection = PgConnection::establish(db_url).map_err(|e| {
        BaseError::DatabaseFatal(Some(format!("failed to establish migration connection: {}", e)))
    })?;
    connection
        .run_pending_migrations(POSTGRES_MIGRATIONS)
        .map_err(migration_error)?;

    let manager = ConnectionManager::<PgConnection>::new(db_url);
    Pool::builder()
        .max_size(max_size)
        .connection_timeout(timeout)
        .build(manager)
        .map_err(pool_error)
}

pub type DbResult<T> = Result<T, BaseError>;

pub const MAX_PAGE_SIZE: i64 = 100;

/// Zero-based page window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PageRequest {
    pub page: i64,
    pub size: i64,
}

impl PageRequest {
    pub fn new(page: Option<i64>, size: Option<i64>, default_size: i64) -> DbResult<Self> {
        let page = page.unwrap_or(0);
        let size = size.unwrap_or(default_size);
        if page < 0 {
            return Err(BaseError::ParamInvalid(Some(format!(
                "page must be zero or greater, got {}",
                page
            ))));
        }
        if size < 1 {
            return Err(BaseError::ParamInvalid(Some(format!(
                "size must be at least 1, got {}",
                size
            ))));
        }
        Ok(PageRequest {
            page,
            size: size.min(MAX_PAGE_SIZE),
        })
    }

    pub fn offset(&self) -> i64 {
        self.page.saturating_mul(self.size)
    }
}

/// Clamps a `limit` query parameter to `1..=MAX_PAGE_SIZE`.
pub fn clamp_limit(limit: Option<i64>, default_limit: i64) -> i64 {
    limit.unwrap_or(default_limit).clamp(1, MAX_PAGE_SIZE)
}

#[derive(Debug, Clone, PartialEq, Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageResult<T> {
    pub content: Vec<T>,
    pub total_elements: i64,
    pub total_pages: i64,
    pub current_page: i64,
    pub has_more: bool,
}

impl<T> PageResult<T> {
    pub fn new(content: Vec<T>, total_elements: i64, request: PageRequest) -> Self {
        let total_pages = if total_elements == 0 {
            0
        } else {
            (total_elements + request.size - 1) / request.size
        };
        PageResult {
            content,
            total_elements,
            total_pages,
            current_page: request.page,
            has_more: request.page.saturating_add(1) < total_pages,
        }
    }

    /// Cuts the requested window out of an already sorted sequence.
    pub fn from_sorted(items: Vec<T>, request: PageRequest) -> Self {
        let total_elements = items.len() as i64;
        let start = request.offset().min(total_elements) as usize;
        let content = items
            .into_iter()
            .skip(start)
            .take(request.size as usize)
            .collect();
        PageResult::new(content, total_elements, request)
    }

    pub fn map<U>(self, f: impl FnMut(T) -> U) -> PageResult<U> {
        PageResult {
            content: self.content.into_iter().map(f).collect(),
            total_elements: self.total_elements,
            total_pages: self.total_pages,
            current_page: self.current_page,
            has_more: self.has_more,
        }
    }
}


#[cfg(test)]
mod tests {
    use super::*;
    use test_support::memory_pool;

    #[test]
    fn test_page_request_validation() {
        assert_eq!(
            PageRequest::new(None, None, 20).unwrap(),
            PageRequest { page: 0, size: 20 }
        );
        assert_eq!(PageRequest::new(Some(1), Some(500), 20).unwrap().size, MAX_PAGE_SIZE);
        assert!(matches!(
            PageRequest::new(Some(-1), None, 20),
            Err(BaseError::ParamInvalid(_))
        ));
        assert!(matches!(
            PageRequest::new(None, Some(0), 20),
            Err(BaseError::ParamInvalid(_))
        ));
    }

    #[test]
    fn test_page_of_twenty_five_items() {
        let items: Vec<i32> = (0..25).collect();
        let request = PageRequest { page: 2, size: 10 };
        let page = PageResult::from_sorted(items, request);
        assert_eq!(page.content, vec![20, 21, 22, 23, 24]);
        assert_eq!(page.total_elements, 25);
        assert_eq!(page.total_pages, 3);
        assert!(!page.has_more);
    }

    #[test]
    fn test_pages_cover_every_element_once() {
        for total in [0usize, 1, 9, 10, 11, 37] {
            let items: Vec<usize> = (0..total).collect();
            let size = 10;
            let first = PageResult::from_sorted(items.clone(), PageRequest { page: 0, size });
            assert_eq!(first.total_pages, (total as i64 + size - 1) / size);

            let mut seen = Vec::new();
            for page in 0..first.total_pages {
                let result = PageResult::from_sorted(items.clone(), PageRequest { page, size });
                assert_eq!(result.has_more, page + 1 < first.total_pages);
                seen.extend(result.content);
            }
            assert_eq!(seen, items);
        }
    }

    #[test]
    fn test_page_past_the_end_is_empty() {
        let page = PageResult::from_sorted(vec![1, 2, 3], PageRequest { page: 5, size: 2 });
        assert!(page.content.is_empty());
        assert_eq!(page.total_pages, 2);
        assert_eq!(page.current_page, 5);
        assert!(!page.has_more);
    }

    #[test]
    fn test_largest_page_index_is_an_empty_last_window() {
        let request = PageRequest::new(Some(i64::MAX), Some(20), 20).unwrap();
        let page = PageResult::from_sorted(vec![1, 2, 3], request);
        assert!(page.content.is_empty());
        assert_eq!(page.total_pages, 1);
        assert_eq!(page.current_page, i64::MAX);
        assert!(!page.has_more);

        let page = PageResult::new(Vec::<i32>::new(), 0, request);
        assert!(!page.has_more);
    }

    #[test]
    fn test_clamp_limit() {
        assert_eq!(clamp_limit(None, 10), 10);
        assert_eq!(clamp_limit(Some(0), 10), 1);
        assert_eq!(clamp_limit(Some(1000), 10), MAX_PAGE_SIZE);
    }

    #[test]
    fn test_memory_pool_runs_migrations() {
        let pool = memory_pool();
        assert!(pool.get().is_ok());
    }

    #[test]
    fn test_checkout_timeout_is_store_timeout() {
        use axum::response::IntoResponse;

        let pool = DbPool::establish(":memory:", 1, Duration::from_millis(50)).unwrap();
        let _held = pool.get().unwrap();

        let err = pool.get().err().unwrap();
        assert!(matches!(err, BaseError::StoreTimeout(_)));
        let response = err.into_response();
        assert_eq!(response.status(), axum::http::StatusCode::SERVICE_UNAVAILABLE);
    }
}
