// Core algorithm exports
pub mod distance;
pub mod money;
pub mod proximity;

pub use distance::{great_circle_distance, EARTH_RADIUS_M};
pub use money::{equal_share, Amount, AmountError};
pub use proximity::{filter_visible, filter_visible_at, is_visible_from, Location};
