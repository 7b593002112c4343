use std::time::Duration;

use async_trait::async_trait;
use sqlx::mysql::{MySqlConnectOptions, MySqlPool, MySqlPoolOptions};
use tracing::debug;

use crate::error::Result;
use crate::record::HostRecord;

/// Upper bound on establishing the datastore connection.
pub const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

/// Datastore connection parameters, resolved from CLI flags and environment.
#[derive(Debug, Clone)]
pub struct DatastoreConfig {
    pub server: String,
    pub port: u16,
    pub database: String,
    pub user: String,
    pub password: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpsertOutcome {
    Inserted,
    Updated,
}

/// Storage capability behind the upsert gateway. One production
/// implementation (`MySqlStore`); tests exercise the gateway against an
/// in-memory fake.
#[async_trait]
pub trait InventoryStore {
    async fn exists(&self, identifier: &str) -> Result<bool>;
    async fn insert(&self, record: &HostRecord) -> Result<()>;
    async fn update(&self, record: &HostRecord) -> Result<()>;
}

/// One existence-check round trip, then exactly one write. The update path
/// overwrites every non-key field except the service tag, which is only
/// ever written at insert time.
pub async fn upsert(store: &dyn InventoryStore, record: &HostRecord) -> Result<UpsertOutcome> {
    if store.exists(&record.identifier).await? {
        store.update(record).await?;
        Ok(UpsertOutcome::Updated)
    } else {
        store.insert(record).await?;
        Ok(UpsertOutcome::Inserted)
    }
}

pub struct MySqlStore {
    pool: MySqlPool,
}

impl MySqlStore {
    pub async fn connect(config: &DatastoreConfig) -> Result<Self> {
        let mut options = MySqlConnectOptions::new()
            .host(&config.server)
            .port(config.port)
            .username(&config.user)
            .database(&config.database);
        if let Some(password) = &config.password {
            options = options.password(password);
        }

        let pool = MySqlPoolOptions::new()
            .max_connections(1)
            .acquire_timeout(CONNECT_TIMEOUT)
            .connect_with(options)
            .await?;

        debug!(server = %config.server, database = %config.database, "datastore connected");
        Ok(Self { pool })
    }
}

#[async_trait]
impl InventoryStore for MySqlStore {
    async fn exists(&self, identifier: &str) -> Result<bool> {
        let found: Option<String> =
            sqlx::query_scalar("SELECT identifier FROM sysinfo WHERE identifier = ?")
                .bind(identifier)
                .fetch_optional(&self.pool)
                .await?;
        Ok(found.is_some())
    }

    async fn insert(&self, record: &HostRecord) -> Result<()> {
        // identifier is the PRIMARY KEY; the conflict clause makes two
        // concurrent first runs converge on one row instead of erroring.
        // service_tag stays insert-only either way.
        sqlx::query(
            "INSERT INTO sysinfo \
             (identifier, hostname, username, service_tag, cpu_info, gpu_info, ram_info, hdd_info) \
             VALUES (?, ?, ?, ?, ?, ?, ?, ?) \
             ON DUPLICATE KEY UPDATE \
             hostname = VALUES(hostname), username = VALUES(username), \
             cpu_info = VALUES(cpu_info), gpu_info = VALUES(gpu_info), \
             ram_info = VALUES(ram_info), hdd_info = VALUES(hdd_info)",
        )
        .bind(&record.identifier)
        .bind(&record.hostname)
        .bind(&record.username)
        .bind(&record.service_tag)
        .bind(&record.cpu_info)
        .bind(&record.gpu_info)
        .bind(&record.ram_info)
        .bind(&record.hdd_info)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn update(&self, record: &HostRecord) -> Result<()> {
        sqlx::query(
            "UPDATE sysinfo SET \
             hostname = ?, username = ?, cpu_info = ?, gpu_info = ?, \
             ram_info = ?, hdd_info = ? \
             WHERE identifier = ?",
        )
        .bind(&record.hostname)
        .bind(&record.username)
        .bind(&record.cpu_info)
        .bind(&record.gpu_info)
        .bind(&record.ram_info)
        .bind(&record.hdd_info)
        .bind(&record.identifier)
        .execute(&self.pool)
        .await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AppError;
    use std::collections::HashMap;
    use std::sync::Mutex;

    #[derive(Debug, Clone, PartialEq)]
    struct StoredRow {
        hostname: Option<String>,
        username: Option<String>,
        service_tag: String,
        cpu_info: String,
        gpu_info: String,
        ram_info: String,
        hdd_info: String,
    }

    #[derive(Default)]
    struct MemoryStore {
        rows: Mutex<HashMap<String, StoredRow>>,
        fail_exists: bool,
    }

    impl MemoryStore {
        fn row(&self, identifier: &str) -> Option<StoredRow> {
            self.rows.lock().unwrap().get(identifier).cloned()
        }

        fn len(&self) -> usize {
            self.rows.lock().unwrap().len()
        }
    }

    #[async_trait]
    impl InventoryStore for MemoryStore {
        async fn exists(&self, identifier: &str) -> Result<bool> {
            if self.fail_exists {
                return Err(AppError::Datastore(sqlx::Error::PoolTimedOut));
            }
            Ok(self.rows.lock().unwrap().contains_key(identifier))
        }

        async fn insert(&self, record: &HostRecord) -> Result<()> {
            self.rows.lock().unwrap().insert(
                record.identifier.clone(),
                StoredRow {
                    hostname: record.hostname.clone(),
                    username: record.username.clone(),
                    service_tag: record.service_tag.clone(),
                    cpu_info: record.cpu_info.clone(),
                    gpu_info: record.gpu_info.clone(),
                    ram_info: record.ram_info.clone(),
                    hdd_info: record.hdd_info.clone(),
                },
            );
            Ok(())
        }

        async fn update(&self, record: &HostRecord) -> Result<()> {
            let mut rows = self.rows.lock().unwrap();
            if let Some(row) = rows.get_mut(&record.identifier) {
                row.hostname = record.hostname.clone();
                row.username = record.username.clone();
                row.cpu_info = record.cpu_info.clone();
                row.gpu_info = record.gpu_info.clone();
                row.ram_info = record.ram_info.clone();
                row.hdd_info = record.hdd_info.clone();
            }
            Ok(())
        }
    }

    fn record(hostname: &str, service_tag: &str) -> HostRecord {
        HostRecord {
            identifier: "aa:bb:cc:dd:ee:ff".into(),
            hostname: Some(hostname.into()),
            username: Some("alice".into()),
            service_tag: service_tag.into(),
            cpu_info: "Xeon (8 cores, 2400 MHz)".into(),
            gpu_info: "Matrox G200".into(),
            ram_info: "16.00 GB".into(),
            hdd_info: "/dev/sda1: 25.00 GB / 100.00 GB (75.00 GB free)".into(),
        }
    }

    #[tokio::test]
    async fn first_run_inserts_every_field() {
        let store = MemoryStore::default();

        let outcome = upsert(&store, &record("host-a", "SVC001")).await.unwrap();

        assert_eq!(outcome, UpsertOutcome::Inserted);
        assert_eq!(store.len(), 1);
        let row = store.row("aa:bb:cc:dd:ee:ff").unwrap();
        assert_eq!(row.hostname.as_deref(), Some("host-a"));
        assert_eq!(row.service_tag, "SVC001");
    }

    #[tokio::test]
    async fn second_run_updates_in_place_but_keeps_service_tag() {
        let store = MemoryStore::default();

        upsert(&store, &record("host-a", "SVC001")).await.unwrap();
        let outcome = upsert(&store, &record("host-b", "SVC999")).await.unwrap();

        assert_eq!(outcome, UpsertOutcome::Updated);
        assert_eq!(store.len(), 1);
        let row = store.row("aa:bb:cc:dd:ee:ff").unwrap();
        assert_eq!(row.hostname.as_deref(), Some("host-b"));
        assert_eq!(row.service_tag, "SVC001");
    }

    #[tokio::test]
    async fn datastore_failure_aborts_before_any_write() {
        let store = MemoryStore {
            fail_exists: true,
            ..Default::default()
        };

        let result = upsert(&store, &record("host-a", "SVC001")).await;

        assert!(matches!(result, Err(AppError::Datastore(_))));
        assert_eq!(store.len(), 0);
    }
}
