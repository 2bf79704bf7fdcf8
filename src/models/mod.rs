pub mod config;
pub mod family;
pub mod member;

pub use config::*;
pub use family::*;
pub use member::*;
