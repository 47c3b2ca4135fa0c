pub mod config;
pub mod extract;
pub mod fetch;
pub mod normalize;
pub mod report;
