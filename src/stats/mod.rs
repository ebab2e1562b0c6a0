mod quantile;

pub use quantile::{quantile, sorted_amounts, IqrBounds};
