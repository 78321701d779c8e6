pub mod bot;
pub mod dependencies;
pub mod middleware;
pub mod platform;
pub mod report;
pub mod utils;

#[cfg(any(test, feature = "testing"))]
pub mod testing;
