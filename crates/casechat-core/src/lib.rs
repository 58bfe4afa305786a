pub mod answer;
pub mod config;
pub mod document;
pub mod forms;
pub mod transport;
pub mod types;

pub use types::*;
