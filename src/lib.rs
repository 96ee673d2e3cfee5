//! wbi_connectivity
//!
//! Data layer for browsing World Bank connectivity indicators (internet users,
//! mobile subscriptions, fixed broadband). Pairs with the `wbic` CLI.
//!
//! ### Features
//! - Fetch the country catalog and per-country indicator history
//! - Observable stores with stale-response protection
//! - Local favorites with notes, persisted as flat JSON records
//! - Catalog search/region filters and chart-ready series
//! - Compare up to three countries on their latest values
//!
//! ### Example
//! ```no_run
//! use wbi_connectivity::{Client, CountriesStore, view};
//!
//! # async fn run() -> anyhow::Result<()> {
//! let store = CountriesStore::new(Client::with_base_url("https://api.worldbank.org/v2")?);
//! store.load_catalog().await?;
//! let catalog = store.catalog();
//! for c in view::filter_catalog(&catalog, "ger", "Europe") {
//!     println!("{} {}", c.id, c.name);
//! }
//! store.load_connectivity_stats("DEU").await?;
//! for (indicator, series) in store.series() {
//!     println!("{}: {:?}", indicator, view::latest_point(&series));
//! }
//! # Ok(())
//! # }
//! ```

pub mod api;
pub mod compare;
pub mod config;
pub mod error;
pub mod indicators;
pub mod models;
pub mod stats;
pub mod storage;
pub mod store;
pub mod view;

pub use api::{Client, ClientConfig, StatsSource};
pub use compare::{ComparisonBar, ComparisonSelection, MAX_COMPARED};
pub use config::Settings;
pub use error::ApiError;
pub use indicators::Indicator;
pub use models::{CodeName, Country, DataPoint, Favorite, FetchStatus, IndicatorSeries};
pub use store::{CountriesStore, FavoritesStore, LoadOutcome};
