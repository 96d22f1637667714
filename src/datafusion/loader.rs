use std::path::{Path, PathBuf};

use datafusion::dataframe::DataFrame;

use super::context::{CsvOptions, DataFusionContext};
use super::error::Result;

pub const MERCHANTS_CSV: &str = "data/merchants.csv";
pub const PRODUCTS_CSV: &str = "data/products.csv";
pub const MERCHANTS_VIEW: &str = "merchants";
pub const PRODUCTS_VIEW: &str = "products";

/// Source file and view name for each temp table, in registration order.
pub const TEMP_TABLES: [(&str, &str); 2] = [
    (MERCHANTS_CSV, MERCHANTS_VIEW),
    (PRODUCTS_CSV, PRODUCTS_VIEW),
];

/// The two engine operations the loader needs from a session.
pub trait TempViewSession {
    type Dataset;

    /// Reads a delimited file, naming columns from the header row and
    /// inferring their types.
    fn read_csv(&self, path: &Path, options: &CsvOptions) -> Result<Self::Dataset>;

    /// Registers `dataset` as `name`, replacing any existing entry.
    fn create_or_replace_temp_view(&mut self, name: &str, dataset: Self::Dataset) -> Result<()>;
}

impl TempViewSession for DataFusionContext {
    type Dataset = DataFrame;

    fn read_csv(&self, path: &Path, options: &CsvOptions) -> Result<DataFrame> {
        DataFusionContext::read_csv(self, path, options)
    }

    fn create_or_replace_temp_view(&mut self, name: &str, dataset: DataFrame) -> Result<()> {
        DataFusionContext::create_or_replace_temp_view(self, name, dataset)
    }
}

/// Registers `data/merchants.csv` as `merchants` and `data/products.csv` as
/// `products`, relative to the working directory.
///
/// Both files are read before either view is registered, so a missing or
/// malformed file leaves the catalog as it was. The first failure is returned
/// as raised by the session.
pub fn create_temp_tables<S: TempViewSession + ?Sized>(session: &mut S) -> Result<()> {
    TempTableLoader::new().load(session)?;
    Ok(())
}

/// Loads the fixed temp tables with adjustable read settings.
#[derive(Debug, Clone)]
pub struct TempTableLoader {
    base_dir: Option<PathBuf>,
    csv: CsvOptions,
}

impl Default for TempTableLoader {
    fn default() -> Self {
        Self::new()
    }
}

impl TempTableLoader {
    pub fn new() -> Self {
        Self {
            base_dir: None,
            csv: CsvOptions::default(),
        }
    }

    /// Resolves the relative source paths against `dir` instead of the
    /// working directory.
    pub fn with_base_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.base_dir = Some(dir.into());
        self
    }

    pub fn with_delimiter(mut self, delimiter: u8) -> Self {
        self.csv.delimiter = delimiter;
        self
    }

    pub fn with_schema_infer_max_records(mut self, max_records: usize) -> Self {
        self.csv.schema_infer_max_records = max_records;
        self
    }

    pub fn source_path(&self, relative: &str) -> PathBuf {
        match &self.base_dir {
            Some(dir) => dir.join(relative),
            None => PathBuf::from(relative),
        }
    }

    /// Reads every temp table, then registers them in order. A read failure
    /// leaves the catalog untouched; a registration failure keeps the views
    /// registered before it. Returns the registered view names.
    pub fn load<S: TempViewSession + ?Sized>(&self, session: &mut S) -> Result<Vec<String>> {
        let mut datasets = Vec::with_capacity(TEMP_TABLES.len());
        for (file, view) in TEMP_TABLES {
            let path = self.source_path(file);
            let dataset = session.read_csv(&path, &self.csv).map_err(|e| {
                log::warn!("failed to read {}: {}", path.display(), e);
                e
            })?;
            datasets.push((view, dataset));
        }

        let mut registered = Vec::with_capacity(datasets.len());
        for (view, dataset) in datasets {
            session.create_or_replace_temp_view(view, dataset)?;
            registered.push(view.to_string());
        }

        log::info!("temp tables ready: {}", registered.join(", "));
        Ok(registered)
    }
}
