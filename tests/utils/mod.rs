pub mod assertions;
pub mod fixtures;
pub mod setup;

// Re-export main utilities for use by test files
#[allow(unused_imports)]
pub use assertions::{eventually, settle};
#[allow(unused_imports)]
pub use fixtures::{attrs, game, user};
#[allow(unused_imports)]
pub use setup::{TestSetup, TestSetupBuilder};
