use std::time::Duration;

use async_trait::async_trait;
use redis::{AsyncCommands, Client, aio::MultiplexedConnection};
use tokio::time::timeout;

use crate::{error::StoreError, store::KeyValueStore};

const STORE_TIMEOUT_SECS: u64 = 5;

#[derive(Clone)]
pub struct RedisStore {
    connection: MultiplexedConnection,
}

impl RedisStore {
    pub async fn connect(redis_url: &str) -> Result<Self, StoreError> {
        let client = Client::open(redis_url)?;

        let connection = bounded(client.get_multiplexed_async_connection()).await?;

        log::info!("Connected to Redis successfully");

        Ok(Self { connection })
    }
}

async fn bounded<T, F>(operation: F) -> Result<T, StoreError>
where
    F: Future<Output = Result<T, redis::RedisError>>,
{
    match timeout(Duration::from_secs(STORE_TIMEOUT_SECS), operation).await {
        Ok(result) => result.map_err(StoreError::from),
        Err(_) => Err(StoreError::Timeout(STORE_TIMEOUT_SECS)),
    }
}

#[async_trait]
impl KeyValueStore for RedisStore {
    async fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        let mut connection = self.connection.clone();
        bounded(connection.get::<_, Option<String>>(key)).await
    }

    async fn set_all(&self, entries: &[(String, String)]) -> Result<(), StoreError> {
        let mut connection = self.connection.clone();
        let mut pipe = redis::pipe();
        pipe.atomic();
        for (key, value) in entries {
            pipe.set(key, value).ignore();
        }
        bounded(pipe.query_async::<()>(&mut connection)).await
    }

    async fn delete_all(&self, keys: &[String]) -> Result<(), StoreError> {
        let mut connection = self.connection.clone();
        bounded(connection.del::<_, ()>(keys)).await
    }
}
