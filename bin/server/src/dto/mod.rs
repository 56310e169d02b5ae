pub mod common;
pub mod reconcile;

pub use common::*;
pub use reconcile::*;
