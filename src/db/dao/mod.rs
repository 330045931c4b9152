pub mod base;
pub mod base_traits;
mod context;
pub mod error;
pub mod project_dao;
pub mod task_dao;

pub use base::{DaoBase, PaginatedResponse};
pub use base_traits::{HasCreatedAtColumn, HasIdActiveModel, TimestampedActiveModel, stamp_new};
pub use context::DaoContext;
pub use error::{DaoLayerError, DaoResult};
pub use project_dao::{NewProject, ProjectDao, ProjectPatch};
pub use task_dao::{NewTask, TaskDao, TaskPatch};
