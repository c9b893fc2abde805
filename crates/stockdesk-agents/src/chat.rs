use std::sync::Arc;
use std::time::Instant;

use tracing::info;

use crate::error::AgentError;
use crate::prompts::{today_label, TaskSpec};
use crate::specialist::Specialist;

/// Words that end an interactive session.
pub const EXIT_WORDS: [&str; 3] = ["quit", "exit", "q"];

pub fn is_exit_command(input: &str) -> bool {
    let input = input.trim();
    EXIT_WORDS.iter().any(|w| input.eq_ignore_ascii_case(w))
}

/// Answers free-form questions about the stock database, one at a time.
///
/// Each question is an independent task; nothing carries over between calls.
pub struct ChatAssistant {
    specialist: Arc<dyn Specialist>,
}

impl ChatAssistant {
    pub fn new(specialist: Arc<dyn Specialist>) -> Self {
        Self { specialist }
    }

    pub async fn ask(&self, question: &str) -> Result<String, AgentError> {
        let start = Instant::now();
        let answer = self
            .specialist
            .invoke(&TaskSpec::chat(question.trim(), &today_label()))
            .await?;
        info!(
            agent = %self.specialist.name(),
            elapsed_ms = start.elapsed().as_millis() as u64,
            "Question answered"
        );
        Ok(answer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::ScriptedSpecialist;

    #[test]
    fn exit_words() {
        assert!(is_exit_command("quit"));
        assert!(is_exit_command("  Q "));
        assert!(is_exit_command("EXIT"));
        assert!(!is_exit_command("quitting"));
        assert!(!is_exit_command(""));
    }

    #[tokio::test]
    async fn question_is_wrapped_in_a_dated_task() {
        let specialist = Arc::new(ScriptedSpecialist::ok("Assistant", "USD/INR is 83.2"));
        let chat = ChatAssistant::new(specialist.clone());

        let answer = chat.ask("  What is USD/INR?  ").await.unwrap();
        assert_eq!(answer, "USD/INR is 83.2");

        let tasks = specialist.tasks().await;
        assert_eq!(tasks.len(), 1);
        assert!(tasks[0].description.starts_with("Today is "));
        assert!(tasks[0].description.ends_with("User Question: What is USD/INR?"));
    }

    #[tokio::test]
    async fn failures_are_returned() {
        let chat = ChatAssistant::new(Arc::new(ScriptedSpecialist::failing("Assistant")));
        assert!(chat.ask("anything").await.is_err());
    }
}
