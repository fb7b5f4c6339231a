//! Gridflux provides finite-volume flux operators and neighbor lookups for
//! earth-surface models on discretized grids. A grid (raster, hexagonal, or
//! irregular) is described by its connectivity: which links meet at each
//! node, which faces bound each cell, and so on. The operators here consume
//! those tables through the `Grid` trait, computing the net flux and flux
//! divergence at cells or nodes from unit fluxes on faces or links, and
//! resolving neighboring elements across shared links or faces. A
//! landlab-style `RasterGrid` implements the trait.

pub mod divergence;
pub mod element;
pub mod error;
pub mod fields;
pub mod gradients;
pub mod grid;
pub mod neighbors;
pub mod raster;
pub mod table;

pub use element::{At, Connector};
pub use error::{Error, Result};
pub use grid::{Adjacency, Grid, BAD_INDEX};
pub use raster::RasterGrid;
pub use table::Table;
