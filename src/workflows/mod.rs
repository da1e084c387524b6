pub mod catalog;
pub mod classifier;
pub mod matcher;
pub mod walker;
