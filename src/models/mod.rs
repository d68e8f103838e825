pub mod report;
pub mod weather;

pub use report::*;
pub use weather::*;
