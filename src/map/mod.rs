mod iter;
mod skip_map;

pub use iter::{Iter, Keys, Range, Values};
pub use skip_map::SkipMap;
