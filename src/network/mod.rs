//! Road-network access.
//!
//! - [`RoadNetwork`] — the oracle the optimizer consumes: shortest-path
//!   lengths and paths between location identifiers, plus the pool of all
//!   locations new orders are drawn from.
//! - [`GraphNetwork`] — an in-memory directed road graph implementing it.

mod graph;
mod oracle;

pub use graph::GraphNetwork;
pub use oracle::RoadNetwork;
