//! StorageEngine: owns the connection pool and implements `IKnowledgeStorage`.

use std::path::Path;

use tacit_core::config::StorageConfig;
use tacit_core::errors::TacitResult;
use tacit_core::knowledge::{KnowledgeUnit, StoredEmbedding, TrustState};
use tacit_core::traits::IKnowledgeStorage;
use tracing::info;

use crate::migrations;
use crate::pool::ConnectionPool;
use crate::queries::{unit_crud, unit_query, usage, vector_ops};

pub struct StorageEngine {
    pool: ConnectionPool,
}

impl StorageEngine {
    /// Open a file-backed store with a read pool.
    pub fn open(path: &Path, read_pool_size: usize) -> TacitResult<Self> {
        let engine = Self {
            pool: ConnectionPool::open(path, read_pool_size)?,
        };
        engine.initialize()?;
        info!(path = %path.display(), "storage opened");
        Ok(engine)
    }

    /// In-memory store; all reads go through the writer.
    pub fn open_in_memory() -> TacitResult<Self> {
        let engine = Self {
            pool: ConnectionPool::open_in_memory()?,
        };
        engine.initialize()?;
        Ok(engine)
    }

    pub fn from_config(config: &StorageConfig) -> TacitResult<Self> {
        if config.is_in_memory() {
            Self::open_in_memory()
        } else {
            Self::open(Path::new(&config.db_path), config.read_pool_size)
        }
    }

    fn initialize(&self) -> TacitResult<()> {
        self.pool.writer.with_conn(|conn| {
            migrations::run_migrations(conn)?;
            Ok(())
        })
    }

    pub fn schema_version(&self) -> TacitResult<u32> {
        self.with_reader(migrations::current_version)
    }

    fn with_reader<F, T>(&self, f: F) -> TacitResult<T>
    where
        F: FnOnce(&rusqlite::Connection) -> TacitResult<T>,
    {
        match &self.pool.readers {
            Some(readers) => readers.with_conn(f),
            None => self.pool.writer.with_conn(f),
        }
    }
}

impl IKnowledgeStorage for StorageEngine {
    fn create(&self, unit: &KnowledgeUnit) -> TacitResult<()> {
        self.pool
            .writer
            .with_conn(|conn| unit_crud::insert_unit(conn, unit))
    }

    fn get(&self, id: &str) -> TacitResult<Option<KnowledgeUnit>> {
        self.with_reader(|conn| unit_crud::get_unit(conn, id))
    }

    fn update(&self, unit: &KnowledgeUnit) -> TacitResult<u64> {
        self.pool
            .writer
            .with_conn(|conn| unit_crud::update_unit(conn, unit))
    }

    fn delete(&self, id: &str) -> TacitResult<()> {
        self.pool.writer.with_conn(|conn| unit_crud::delete_unit(conn, id))
    }

    fn list_by_domain(&self, domain: &str) -> TacitResult<Vec<KnowledgeUnit>> {
        self.with_reader(|conn| unit_query::list_by_domain(conn, domain))
    }

    fn list_by_trust_state(
        &self,
        domain: &str,
        state: TrustState,
    ) -> TacitResult<Vec<KnowledgeUnit>> {
        self.with_reader(|conn| unit_query::list_by_trust_state(conn, domain, state))
    }

    fn find_by_content_hash(
        &self,
        domain: &str,
        content_hash: &str,
    ) -> TacitResult<Option<KnowledgeUnit>> {
        self.with_reader(|conn| unit_query::find_by_content_hash(conn, domain, content_hash))
    }

    fn count_by_domain(&self, domain: &str) -> TacitResult<usize> {
        self.with_reader(|conn| unit_query::count_by_domain(conn, domain))
    }

    fn increment_usage(&self, id: &str) -> TacitResult<u64> {
        self.pool.writer.with_conn(|conn| usage::increment_usage(conn, id))
    }

    fn store_embedding(&self, embedding: &StoredEmbedding) -> TacitResult<()> {
        self.pool
            .writer
            .with_conn(|conn| vector_ops::store_embedding(conn, embedding))
    }

    fn get_embedding(&self, unit_id: &str) -> TacitResult<Option<StoredEmbedding>> {
        self.with_reader(|conn| vector_ops::get_embedding(conn, unit_id))
    }

    fn embeddings_for_domain(&self, domain: &str) -> TacitResult<Vec<StoredEmbedding>> {
        self.with_reader(|conn| vector_ops::embeddings_for_domain(conn, domain))
    }

    fn delete_embedding(&self, unit_id: &str) -> TacitResult<()> {
        self.pool
            .writer
            .with_conn(|conn| vector_ops::delete_embedding(conn, unit_id))
    }
}
