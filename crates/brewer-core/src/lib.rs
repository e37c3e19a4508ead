pub mod candidate;
pub mod card;
pub mod color;
pub mod config;
pub mod error;
pub mod io;
pub mod mirror;
pub mod paths;
pub mod rank;
pub mod rules;
pub mod score;
pub mod search;
pub mod slug;

pub use error::{BrewError, Result};
