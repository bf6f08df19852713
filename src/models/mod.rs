mod auth_token;
mod project;
mod task;
mod user;

pub use auth_token::AuthToken;
pub use project::{Project, ProjectProgress};
pub use task::{InvalidStatus, ProjectTaskCount, Task, TaskStatus};
pub use user::{User, UserProfile};
