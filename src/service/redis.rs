use bb8::Pool;
use bb8_redis::{RedisConnectionManager, redis};
use cyder_tools::log::{error, info};

use crate::config::RedisConfig;

pub type RedisPool = Pool<RedisConnectionManager>;

/// Builds a pool for `config` and pings the server once.
/// Returns `None` when Redis cannot be reached so callers can fall back.
pub async fn connect(config: &RedisConfig) -> Option<RedisPool> {
    let manager = match RedisConnectionManager::new(config.url.as_str()) {
        Ok(manager) => manager,
        Err(e) => {
            error!("Failed to create redis manager: {}", e);
            return None;
        }
    };
    let pool = match Pool::builder()
        .max_size(config.pool_size.max(1) as u32)
        .build(manager)
        .await
    {
        Ok(pool) => pool,
        Err(e) => {
            error!("Failed to create redis pool: {}", e);
            return None;
        }
    };

    {
        let mut conn = match pool.get().await {
            Ok(conn) => conn,
            Err(e) => {
                error!("Failed to get redis connection from pool for test: {}", e);
                return None;
            }
        };
        if let Err(e) = redis::cmd("PING").query_async::<()>(&mut *conn).await {
            error!("Failed to ping redis: {}", e);
            return None;
        }
    }
    info!("Redis connection pool initialized at {}", config.url);
    Some(pool)
}
