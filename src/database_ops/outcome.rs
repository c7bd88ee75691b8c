//! Per-row import results and their tally.

use std::fmt;

use crate::catalog::details::DetailsError;

/// Why a single CSV row was not imported. The run continues after any of these.
#[derive(Debug, thiserror::Error)]
pub enum RowError {
    #[error("unreadable row: {0}")]
    Csv(#[from] csv::Error),
    #[error("row has no row_index")]
    MissingRowIndex,
    #[error("no details row with product_id {0}")]
    MissingDetails(u32),
    #[error("bad details row {product_id}: {source}")]
    BadDetails {
        product_id: u32,
        #[source]
        source: csv::Error,
    },
    #[error(transparent)]
    Details(#[from] DetailsError),
    #[error("database: {0}")]
    Database(#[from] sqlx::Error),
}

/// Result of one row. `K` is the key the database handed back.
#[derive(Debug)]
pub enum RowOutcome<K> {
    Imported { line: usize, label: String, key: K },
    Failed { line: usize, label: String, error: RowError },
}

impl<K> RowOutcome<K> {
    pub fn is_imported(&self) -> bool {
        matches!(self, RowOutcome::Imported { .. })
    }
}

/// Every row's outcome for one file, in file order.
#[derive(Debug)]
pub struct ImportSummary<K> {
    pub source: String,
    pub outcomes: Vec<RowOutcome<K>>,
}

impl<K> ImportSummary<K> {
    pub fn new(source: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            outcomes: Vec::new(),
        }
    }

    pub fn record(&mut self, outcome: RowOutcome<K>) {
        self.outcomes.push(outcome);
    }

    pub fn successful(&self) -> usize {
        self.outcomes.iter().filter(|o| o.is_imported()).count()
    }

    pub fn failed(&self) -> usize {
        self.outcomes.len() - self.successful()
    }

    pub fn failures(&self) -> impl Iterator<Item = (usize, &str, &RowError)> {
        self.outcomes.iter().filter_map(|o| match o {
            RowOutcome::Failed { line, label, error } => Some((*line, label.as_str(), error)),
            RowOutcome::Imported { .. } => None,
        })
    }
}

impl<K> fmt::Display for ImportSummary<K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}: {} successful, {} failed",
            self.source,
            self.successful(),
            self.failed()
        )
    }
}
