mod entry;
mod fields;
pub mod health;
pub mod projects;
pub mod tasks;

pub use entry::{API_PREFIX, app, router};
