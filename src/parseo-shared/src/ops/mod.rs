//! Value-level operations
//!
//! Free functions implementing the arithmetic, comparison and boolean
//! semantics of the expression language over [`Value`](crate::Value).
//! Scalars follow ordinary numeric rules; columns (`Series`) are combined
//! element-wise, with scalars broadcast to the column length.

pub mod arithmetic_ops;
pub mod comparison_ops;
pub mod logical_ops;
pub mod utils;


// Re-export commonly used functions for convenience
pub use arithmetic_ops::{add_values, div_values, mul_values, neg_value, sub_values};
pub use comparison_ops::{
    eq_values, ge_values, gt_values, le_values, lt_values, ne_values, Comparison,
};
pub use logical_ops::{and_values, not_value, or_values, select_values};
pub use utils::{broadcast, compare_values, series_operands};
