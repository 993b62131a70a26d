pub mod task;
pub mod user;

pub use task::{NewTask, Task, TaskDto, TaskInput};
pub use user::{NewUser, Role, User};
