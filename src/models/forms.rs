use serde::Deserialize;

use crate::llm::Workflow;
use crate::runner::Language;

#[derive(Debug, Deserialize)]
pub struct LoginForm {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct RegisterForm {
    pub username: String,
    pub password: String,
    pub confirm_password: String,
}

#[derive(Debug, Deserialize)]
pub struct ApiKeyForm {
    pub api_key: String,
}

#[derive(Debug, Deserialize)]
pub struct AnalyzeForm {
    pub code: String,
    pub language: Language,
    #[serde(default)]
    pub workflow: Workflow,
    #[serde(default)]
    pub custom_instructions: String,
}

#[derive(Debug, Deserialize)]
pub struct RunForm {
    pub code: String,
    pub language: Language,
}

#[derive(Debug, Deserialize)]
pub struct ChatForm {
    pub message: String,
}
