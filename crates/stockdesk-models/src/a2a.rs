//! Wire shapes for the per-specialist HTTP adapter.

use serde::{Deserialize, Serialize};

/// Discovery document served at `/.well-known/agent.json`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AgentCard {
    pub name: String,
    pub description: String,
    pub url: String,
    pub version: String,
    pub capabilities: CardCapabilities,
    pub default_input_modes: Vec<String>,
    pub default_output_modes: Vec<String>,
    pub skills: Vec<Skill>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CardCapabilities {
    pub streaming: bool,
    pub push_notifications: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Skill {
    pub id: String,
    pub name: String,
}

impl Skill {
    /// Builds a skill from a capability id; the display name is the id title-cased
    /// with underscores turned into spaces (`usd_inr_outlook` -> `Usd Inr Outlook`).
    pub fn from_capability(id: &str) -> Self {
        let name = id
            .split('_')
            .filter(|w| !w.is_empty())
            .map(title_case)
            .collect::<Vec<_>>()
            .join(" ");
        Self {
            id: id.to_string(),
            name,
        }
    }
}

fn title_case(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first
            .to_uppercase()
            .chain(chars.flat_map(char::to_lowercase))
            .collect(),
        None => String::new(),
    }
}

/// Successful reply from `POST /a2a`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct A2aReply {
    pub message: ReplyMessage,
    pub metadata: ReplyMetadata,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReplyMessage {
    pub role: String,
    pub parts: Vec<TextPart>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TextPart {
    pub text: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReplyMetadata {
    pub agent_name: String,
    pub agent_role: String,
}

impl A2aReply {
    pub fn agent_text(text: impl Into<String>, agent_name: &str, agent_role: &str) -> Self {
        Self {
            message: ReplyMessage {
                role: "agent".to_string(),
                parts: vec![TextPart { text: text.into() }],
            },
            metadata: ReplyMetadata {
                agent_name: agent_name.to_string(),
                agent_role: agent_role.to_string(),
            },
        }
    }

    /// Concatenated text of all parts.
    pub fn text(&self) -> String {
        self.message.parts.iter().map(|p| p.text.as_str()).collect()
    }
}

/// Error body for `/a2a`. `agent_name` is only present on invocation failures.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct A2aErrorBody {
    pub error: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub agent_name: Option<String>,
}

/// Body of `GET /health`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthReport {
    pub status: String,
    pub agent: String,
    pub capabilities: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn skill_names_are_title_cased() {
        assert_eq!(Skill::from_capability("usd_inr_outlook").name, "Usd Inr Outlook");
        assert_eq!(Skill::from_capability("top_movers").name, "Top Movers");
    }

    #[test]
    fn card_uses_camel_case_keys() {
        let card = AgentCard {
            name: "Forex Analysis Agent".to_string(),
            description: "fx".to_string(),
            url: "http://localhost:5005".to_string(),
            version: "1.0.0".to_string(),
            capabilities: CardCapabilities::default(),
            default_input_modes: vec!["text".to_string()],
            default_output_modes: vec!["text".to_string()],
            skills: vec![Skill::from_capability("forex_rates")],
        };
        let json = serde_json::to_value(&card).unwrap();
        assert_eq!(json["capabilities"]["pushNotifications"], false);
        assert_eq!(json["defaultInputModes"][0], "text");
        assert_eq!(json["skills"][0]["name"], "Forex Rates");
    }

    #[test]
    fn reply_shape() {
        let reply = A2aReply::agent_text("EUR firm", "Forex Analysis Agent", "Forex Market Specialist");
        let json = serde_json::to_value(&reply).unwrap();
        assert_eq!(json["message"]["role"], "agent");
        assert_eq!(json["message"]["parts"][0]["text"], "EUR firm");
        assert_eq!(json["metadata"]["agent_role"], "Forex Market Specialist");
        assert_eq!(reply.text(), "EUR firm");
    }

    #[test]
    fn error_body_omits_missing_agent_name() {
        let body = A2aErrorBody {
            error: "No JSON body provided".to_string(),
            agent_name: None,
        };
        let json = serde_json::to_string(&body).unwrap();
        assert_eq!(json, r#"{"error":"No JSON body provided"}"#);
    }
}
