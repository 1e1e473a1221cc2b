//! # BookDash
//!
//! A dashboard for a book search deployment backed by a hosted
//! Elasticsearch-compatible engine.
//!
//! BookDash provides:
//! - **Query construction**: weighted multi-field match boosted by the average rating
//! - **Paginated search** over the engine's REST API
//! - **Result rendering** with `N/A` for fields a book does not carry
//! - **Script actions** for re-indexing the dataset and running evaluations
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use bookdash::{Config, HttpTransport, SearchRequest, Searcher};
//!
//! let config = Config::load(None)?;
//! let searcher = Searcher::new(HttpTransport::new(&config.engine.url), config.query_builder());
//!
//! let request = SearchRequest::new("dune", &config.engine.index, 20, 1)?;
//! let result = searcher.search(&request).await?;
//! println!("{}", bookdash::render::format_text(&bookdash::render(&result)));
//! ```

pub mod actions;
pub mod config;
pub mod error;
pub mod process;
pub mod query;
pub mod render;
pub mod search;

// Re-exports for convenience
pub use actions::{evaluate, reindex, Action, ActionReport};
pub use config::{default_config_path, Config};
pub use error::{Error, Result};
pub use process::{ProcessOutput, ProcessRunner, SystemRunner};
pub use query::{build_query, BoostMode, QueryBuilder, SearchRequest};
pub use render::{render, Rendering};
pub use search::{HttpTransport, ScoredDocument, SearchResult, SearchTransport, Searcher};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
