//! Database repositories, one per table.

pub mod admins;
pub mod repository;
pub mod statuses;
pub mod task_templates;
pub mod tasks;
pub mod users;

pub use admins::Admins;
pub use repository::Repository;
pub use statuses::Statuses;
pub use task_templates::TaskTemplates;
pub use tasks::Tasks;
pub use users::Users;
