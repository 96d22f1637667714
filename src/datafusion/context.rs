use arrow::record_batch::RecordBatch;
use datafusion::dataframe::DataFrame;
use datafusion::execution::context::SessionContext;
use datafusion::prelude::*;
use std::path::Path;
use std::sync::Arc;
use tokio::runtime::Runtime;

use crate::storage::table::{Schema, Table};

use super::conversion::{convert_schema, record_batch_to_table};
use super::error::{DataFusionError, Result};

/// Tunables applied when the underlying engine session is built.
#[derive(Debug, Clone)]
pub struct SessionOptions {
    pub batch_size: usize,
    pub information_schema: bool,
    pub target_partitions: Option<usize>,
}

impl Default for SessionOptions {
    fn default() -> Self {
        Self {
            batch_size: 8192,
            information_schema: true,
            target_partitions: None,
        }
    }
}

impl SessionOptions {
    fn to_config(&self) -> SessionConfig {
        let config = SessionConfig::new()
            .with_information_schema(self.information_schema)
            .with_batch_size(self.batch_size);

        match self.target_partitions {
            Some(n) => config.with_target_partitions(n),
            None => config,
        }
    }
}

/// How a delimited file is read into a dataset.
#[derive(Debug, Clone)]
pub struct CsvOptions {
    pub delimiter: u8,
    pub has_header: bool,
    pub schema_infer_max_records: usize,
}

impl Default for CsvOptions {
    fn default() -> Self {
        Self {
            delimiter: b',',
            has_header: true,
            schema_infer_max_records: usize::MAX,
        }
    }
}

/// A blocking handle over a DataFusion session. Owned by the caller; loaders
/// only borrow it.
pub struct DataFusionContext {
    session: SessionContext,
    runtime: Arc<Runtime>,
}

impl DataFusionContext {
    pub fn new() -> Result<Self> {
        Self::with_options(SessionOptions::default())
    }

    pub fn with_options(options: SessionOptions) -> Result<Self> {
        let runtime = Arc::new(
            tokio::runtime::Builder::new_multi_thread()
                .enable_all()
                .build()?,
        );

        let session = SessionContext::new_with_config(options.to_config());
        log::debug!("created DataFusion session {}", session.session_id());

        Ok(Self { session, runtime })
    }

    /// Reads a delimited file into a lazily evaluated dataset. Column names
    /// and types come from the engine's header handling and inference.
    pub fn read_csv(&self, path: &Path, options: &CsvOptions) -> Result<DataFrame> {
        let path_str = path
            .to_str()
            .ok_or_else(|| DataFusionError::InvalidPath(path.to_string_lossy().to_string()))?;

        log::debug!("reading {}", path.display());
        let df = self.runtime.block_on(async {
            let read_options = CsvReadOptions::new()
                .has_header(options.has_header)
                .delimiter(options.delimiter)
                .schema_infer_max_records(options.schema_infer_max_records);
            self.session.read_csv(path_str, read_options).await
        })?;

        Ok(df)
    }

    /// Registers `df` under `name`, replacing whatever was registered there.
    pub fn create_or_replace_temp_view(&mut self, name: &str, df: DataFrame) -> Result<()> {
        if self.session.deregister_table(name)?.is_some() {
            log::info!("replacing existing view '{}'", name);
        }
        self.session.register_table(name, df.into_view())?;
        log::info!("registered view '{}'", name);
        Ok(())
    }

    pub fn execute_sql(&self, sql: &str) -> Result<Table> {
        record_batch_to_table("result", self.execute_sql_batches(sql)?)
    }

    /// Raw engine output. Always holds at least one batch, so an empty result
    /// still carries its schema.
    pub fn execute_sql_batches(&self, sql: &str) -> Result<Vec<RecordBatch>> {
        let df = self.runtime.block_on(self.session.sql(sql))?;
        self.collect_batches(df)
    }

    /// Full contents of a registered view.
    pub fn view(&self, name: &str) -> Result<Table> {
        if !self.table_exists(name) {
            return Err(DataFusionError::TableNotFound(name.to_string()));
        }
        let df = self.runtime.block_on(self.session.table(name))?;
        record_batch_to_table(name, self.collect_batches(df)?)
    }

    pub fn row_count(&self, name: &str) -> Result<usize> {
        if !self.table_exists(name) {
            return Err(DataFusionError::TableNotFound(name.to_string()));
        }
        let count = self.runtime.block_on(async {
            let df = self.session.table(name).await?;
            df.count().await
        })?;
        Ok(count)
    }

    /// Names in the session's default schema, sorted.
    pub fn list_tables(&self) -> Vec<String> {
        let state = self.session.state();
        let defaults = &state.config_options().catalog;

        let mut names = self
            .session
            .catalog(&defaults.default_catalog)
            .and_then(|catalog| catalog.schema(&defaults.default_schema))
            .map(|schema| schema.table_names())
            .unwrap_or_default();
        names.sort();
        names
    }

    pub fn table_count(&self) -> usize {
        self.list_tables().len()
    }

    pub fn table_exists(&self, name: &str) -> bool {
        self.session.table_exist(name).unwrap_or(false)
    }

    pub fn get_table_schema(&self, table_name: &str) -> Option<Schema> {
        self.runtime.block_on(async {
            let provider = self.session.table_provider(table_name).await.ok()?;
            convert_schema(&provider.schema()).ok()
        })
    }

    /// The engine session, for callers that need its async API directly.
    pub fn session(&self) -> &SessionContext {
        &self.session
    }

    fn collect_batches(&self, df: DataFrame) -> Result<Vec<RecordBatch>> {
        let (schema, batches) = self.runtime.block_on(async {
            let schema = df.schema().clone();
            let batches = df.collect().await?;
            Ok::<_, DataFusionError>((schema, batches))
        })?;

        if batches.is_empty() {
            let arrow_schema: arrow::datatypes::Schema = schema.into();
            return Ok(vec![RecordBatch::new_empty(Arc::new(arrow_schema))]);
        }
        Ok(batches)
    }
}
