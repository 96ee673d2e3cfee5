//! State containers consumed by the presentation layer.
//!
//! - [`CountriesStore`]: catalog and selected-country series, loaded asynchronously
//! - [`FavoritesStore`]: local favorites with notes, fully synchronous
//!
//! Both expose `get_state()` snapshots and `subscribe()` receivers. State only
//! changes through the stores' typed operations.

pub mod countries;
pub mod favorites;
pub mod sequence;
pub mod state;

pub use countries::{CountriesState, CountriesStore};
pub use favorites::{FavoritesState, FavoritesStore};
pub use sequence::{RequestTracker, Ticket};
pub use state::StateCell;

/// Whether an async load reached the state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadOutcome {
    Applied,
    /// A newer request for the same slot was issued; this response was dropped.
    Superseded,
}
