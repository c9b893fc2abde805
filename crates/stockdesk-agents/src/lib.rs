pub mod calculators;
pub mod chat;
pub mod error;
pub mod llm;
pub mod pipeline;
pub mod prompts;
pub mod specialist;
pub mod test_support;
pub mod tools;

pub use chat::{is_exit_command, ChatAssistant};
pub use error::AgentError;
pub use llm::{AnthropicClient, LlmClient};
pub use pipeline::{BriefingPipeline, BriefingRun, PipelineState, PipelineStep};
pub use prompts::{date_label, today_label, SpecialistProfile, TaskSpec};
pub use specialist::{LlmSpecialist, Specialist};
pub use tools::{Tool, Toolbox};
