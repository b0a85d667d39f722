use std::time::Duration;

/// Every request holds at most one connection for one short transaction, so a small pool
/// covers the actix workers. Acquire waits fail fast rather than queueing behind a stuck database.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PoolConfig {
    pub max_connections: u32,
    pub min_connections: u32,
    pub acquire_timeout: Duration,
}

impl Default for PoolConfig {
    fn default() -> Self {
        Self {
            max_connections: 10,
            min_connections: 1,
            acquire_timeout: Duration::from_secs(3),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StorageConfig {
    Postgres {
        database_url: String,
        pool: PoolConfig,
    },
    Memory,
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub storage: StorageConfig,
    pub cors_origins: Vec<String>,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> anyhow::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let host = lookup("HOST").unwrap_or_else(|| "127.0.0.1".into());
        let port = lookup("PORT")
            .unwrap_or_else(|| "8080".into())
            .parse()
            .map_err(|e| anyhow::anyhow!("invalid PORT: {}", e))?;

        let storage = match lookup("STORAGE").as_deref().unwrap_or("postgres") {
            "postgres" => StorageConfig::Postgres {
                database_url: lookup("DATABASE_URL")
                    .ok_or_else(|| anyhow::anyhow!("DATABASE_URL must be set"))?,
                pool: pool_config(&lookup)?,
            },
            "memory" => StorageConfig::Memory,
            other => anyhow::bail!("unknown STORAGE backend: {}", other),
        };

        let cors_origins = lookup("CORS_ORIGINS")
            .unwrap_or_default()
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        Ok(Self {
            host,
            port,
            storage,
            cors_origins,
        })
    }
}

fn pool_config<F>(lookup: &F) -> anyhow::Result<PoolConfig>
where
    F: Fn(&str) -> Option<String>,
{
    let defaults = PoolConfig::default();

    let max_connections = match lookup("DATABASE_MAX_CONNECTIONS") {
        Some(raw) => raw
            .parse::<u32>()
            .ok()
            .filter(|n| *n >= 1)
            .ok_or_else(|| anyhow::anyhow!("invalid DATABASE_MAX_CONNECTIONS: {}", raw))?,
        None => defaults.max_connections,
    };
    let acquire_timeout = match lookup("DATABASE_ACQUIRE_TIMEOUT_SECS") {
        Some(raw) => raw
            .parse::<u64>()
            .map(Duration::from_secs)
            .map_err(|e| anyhow::anyhow!("invalid DATABASE_ACQUIRE_TIMEOUT_SECS: {}", e))?,
        None => defaults.acquire_timeout,
    };

    Ok(PoolConfig {
        max_connections,
        min_connections: defaults.min_connections.min(max_connections),
        acquire_timeout,
    })
}
