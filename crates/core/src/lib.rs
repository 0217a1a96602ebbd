mod filter;
mod hash_table;
mod lattice;
mod parallel;

pub use filter::filter_channels;
pub use hash_table::{HashVertexStore, VertexStore};
pub use lattice::{AxisNeighbors, Lattice};
