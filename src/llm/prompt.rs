use serde::Deserialize;
use std::fmt;

use crate::runner::Language;

/// Named review workflows. Each one is a fixed instruction block that
/// steers the model toward a particular kind of feedback.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
pub enum Workflow {
    #[default]
    #[serde(rename = "Quick Debug")]
    QuickDebug,
    #[serde(rename = "Deep Analysis")]
    DeepAnalysis,
    #[serde(rename = "Performance Optimization")]
    PerformanceOptimization,
    #[serde(rename = "Security Audit")]
    SecurityAudit,
    #[serde(rename = "Bug Hunt")]
    BugHunt,
    #[serde(rename = "Code Refactoring")]
    CodeRefactoring,
}

impl Workflow {
    pub fn instructions(&self) -> &'static str {
        match self {
            Workflow::QuickDebug => {
                "Analyze this code for common issues:\n\
                 1. Syntax errors\n\
                 2. Logic errors\n\
                 3. Runtime exceptions\n\
                 4. Performance bottlenecks\n\
                 5. Security vulnerabilities\n\n\
                 Provide specific fixes with line numbers."
            }
            Workflow::DeepAnalysis => {
                "Perform comprehensive code analysis:\n\
                 1. Code structure and architecture\n\
                 2. Design patterns usage\n\
                 3. Error handling mechanisms\n\
                 4. Memory management\n\
                 5. Scalability concerns\n\
                 6. Best practices violations\n\
                 7. Optimization opportunities\n\n\
                 Provide detailed recommendations."
            }
            Workflow::PerformanceOptimization => {
                "Focus on performance optimization:\n\
                 1. Identify slow operations\n\
                 2. Algorithm efficiency (Big O analysis)\n\
                 3. Memory usage optimization\n\
                 4. Database query optimization\n\
                 5. Caching opportunities\n\
                 6. Parallelization possibilities\n\n\
                 Suggest specific optimizations with code examples."
            }
            Workflow::SecurityAudit => {
                "Conduct security-focused review:\n\
                 1. Input validation vulnerabilities\n\
                 2. SQL injection risks\n\
                 3. XSS vulnerabilities\n\
                 4. Authentication/authorization issues\n\
                 5. Sensitive data exposure\n\
                 6. Dependency vulnerabilities\n\
                 7. OWASP Top 10 compliance\n\n\
                 Provide security fixes and best practices."
            }
            Workflow::BugHunt => {
                "Systematic bug detection:\n\
                 1. Logical errors and edge cases\n\
                 2. Null/undefined handling\n\
                 3. Type mismatches\n\
                 4. Resource leaks\n\
                 5. Race conditions\n\
                 6. Infinite loops\n\
                 7. Exception handling gaps\n\n\
                 List all potential bugs with severity levels."
            }
            Workflow::CodeRefactoring => {
                "Suggest refactoring improvements:\n\
                 1. Code duplication (DRY principle)\n\
                 2. Function/class decomposition\n\
                 3. Naming conventions\n\
                 4. Code readability\n\
                 5. Maintainability improvements\n\
                 6. SOLID principles application\n\n\
                 Provide refactored code examples."
            }
        }
    }
}

impl fmt::Display for Workflow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Workflow::QuickDebug => "Quick Debug",
            Workflow::DeepAnalysis => "Deep Analysis",
            Workflow::PerformanceOptimization => "Performance Optimization",
            Workflow::SecurityAudit => "Security Audit",
            Workflow::BugHunt => "Bug Hunt",
            Workflow::CodeRefactoring => "Code Refactoring",
        };
        f.write_str(name)
    }
}

/// System and user messages for one review call.
#[derive(Debug, Clone)]
pub struct ReviewPrompt {
    pub system: String,
    pub user: String,
}

/// Build the review message pair. The user message embeds the code in a
/// language-tagged fence and pins down the exact reply format the parser
/// looks for; workflow and custom instructions are appended after it.
pub fn build_review_prompt(
    code: &str,
    language: Language,
    workflow: Workflow,
    custom_instructions: &str,
) -> ReviewPrompt {
    let system = format!(
        "You are CodeRefine, an expert code reviewer and debugging assistant.\n\
         You specialize in {language} code analysis and optimization.\n\
         Analyze the submitted {language} code and provide a SHORT, CONCISE response with:\n\
         1. ERROR STATUS: \"NO ERRORS\" or \"ERRORS FOUND\"\n\
         2. If errors found, provide CORRECTED CODE\n\
         3. TIME COMPLEXITY (Big O)\n\
         4. SPACE COMPLEXITY (Big O)\n\
         5. Brief explanation (max 2 sentences)\n\n\
         Be direct and concise.",
        language = language,
    );

    let custom_block = if custom_instructions.trim().is_empty() {
        String::new()
    } else {
        format!("Additional instructions: {}\n\n", custom_instructions.trim())
    };

    let user = format!(
        "Analyze this {language} code:\n\n\
         ```{fence}\n\
         {code}\n\
         ```\n\n\
         Analysis type: {workflow}\n\n\
         {workflow_instructions}\n\n\
         {custom_block}\
         Provide response in this EXACT format:\n\n\
         **ERROR STATUS:** [NO ERRORS / ERRORS FOUND]\n\n\
         **ISSUES:** [List issues briefly, or \"None\"]\n\n\
         **CORRECTED CODE:**\n\
         ```{fence}\n\
         [corrected code or \"No corrections needed\"]\n\
         ```\n\n\
         **TIME COMPLEXITY:** O(?)\n\
         **SPACE COMPLEXITY:** O(?)\n\n\
         **EXPLANATION:** [1-2 sentences only]",
        language = language,
        fence = language.fence_tag(),
        code = code,
        workflow = workflow,
        workflow_instructions = workflow.instructions(),
        custom_block = custom_block,
    );

    ReviewPrompt { system, user }
}

/// Persona for the follow-up assistant tab.
pub fn chat_system_prompt() -> &'static str {
    "You are CodeRefine Assistant, a helpful AI that answers questions about \
     coding, debugging, and software development. Provide clear, practical \
     advice with code examples when helpful."
}
