pub mod loader;
pub mod schema;

pub use loader::{load_from_path, load_from_str, ConfigError, PlanFormat};
pub use schema::{group_by_path, EditPlan, ValidationError, ValidationIssue};
