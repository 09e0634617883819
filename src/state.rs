use crate::{
    config::RuntimeConfiguration,
    data::{StudentStore, postgres_store::PostgresStudentStore},
    error::{MigrateSnafu, OpenDatabaseSnafu, StudentResult},
};
use snafu::ResultExt;
use sqlx::postgres::PgPoolOptions;
use std::{ops::Deref, sync::Arc};

#[derive(Clone, Debug)]
pub struct StudentState {
    store: Arc<dyn StudentStore>,
}

impl StudentState {
    pub async fn new(options: PgPoolOptions, config: &RuntimeConfiguration) -> StudentResult<Self> {
        let pool = options
            .connect(&config.db_config().get_db_path())
            .await
            .context(OpenDatabaseSnafu)?;

        sqlx::migrate!().run(&pool).await.context(MigrateSnafu)?;

        Ok(Self::from_store(Arc::new(PostgresStudentStore::new(pool))))
    }

    pub fn from_store(store: Arc<dyn StudentStore>) -> Self {
        Self { store }
    }

    pub async fn sensible_shutdown(&self) {
        self.store.close().await;
    }
}

impl Deref for StudentState {
    type Target = dyn StudentStore;

    fn deref(&self) -> &Self::Target {
        &*self.store
    }
}
