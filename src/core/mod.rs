//! Board primitives.
//!
//! - [`coord`]: integer coordinates, line keys and common step sets.
//! - [`lines`]: the row / column / diagonal indices used for blocker lookups.
//! - [`type_lists`]: per-type slot lists with tombstones.
//! - [`position`]: the organizer that keeps all of the above in sync.
//! - [`cancel`]: cooperative cancellation.

pub mod cancel;
pub mod coord;
pub mod lines;
pub mod position;
pub mod type_lists;
