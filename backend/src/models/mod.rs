pub mod schedule;
pub mod sheet;

pub use schedule::*;
pub use sheet::*;
