#[allow(unused_imports)]
pub mod prelude {
    pub use super::project::Entity as Project;
    pub use super::task::Entity as Task;
}

pub mod project;
pub mod task;
