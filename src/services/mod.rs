pub mod context;
pub mod crud_service;
pub mod project_service;
pub mod task_service;

pub use context::ServiceContext;
