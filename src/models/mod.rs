mod user;
mod forms;
mod review;
mod execution;

pub use user::User;
pub use forms::{AnalyzeForm, ApiKeyForm, ChatForm, LoginForm, RegisterForm, RunForm};
pub use review::{ErrorStatus, Extracted, ReviewReport};
pub use execution::ExecutionOutcome;
