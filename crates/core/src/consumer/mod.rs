pub mod consumer_loop;
pub mod stats;

pub use consumer_loop::*;
pub use stats::*;
