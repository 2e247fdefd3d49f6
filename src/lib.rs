pub mod config;
pub mod database;
pub mod logging;
pub mod model;
pub mod store;
pub mod types;
pub mod validation;

mod util;

pub use model::{Author, Post};
pub use validation::ValidationError;

pub(crate) mod internal;
