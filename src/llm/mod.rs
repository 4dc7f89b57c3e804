pub mod client;
pub mod consultancy;
pub mod prompts;
pub mod suggestions;
pub mod types;
pub mod utils;

pub use client::*;
pub use consultancy::*;
pub use suggestions::*;
pub use types::*;
