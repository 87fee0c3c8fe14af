pub mod browser;
pub mod logging;
