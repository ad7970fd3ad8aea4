//! Grid placement for report configurations.
//!
//! Every operation is pure: it takes a configuration by reference and returns
//! a new one (or an error), leaving the input untouched so callers can keep
//! it for undo. Every returned configuration has a refreshed `updated_at`,
//! except [`remove`] of a widget that does not exist.
//!
//! [`can_place`] answers whether a cell is legal; [`place`] performs an
//! unchecked write where the last writer wins the cell; [`try_place`]
//! combines the two.

mod engine;
mod error;
mod op;
mod ops;

pub use engine::{Target, can_place, list_valid_targets, place, try_place};
pub use error::{PlacementError, PlacementRejection, Result};
pub use op::PlacementOp;
pub use ops::{
    add_region, move_between_regions, remove, remove_region, reorder_widgets_within_region, swap,
};
