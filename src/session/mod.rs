use serde::{Deserialize, Serialize};

pub mod store;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::User => "user",
            Self::Assistant => "assistant",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    pub role: Role,
    pub content: String,
}

impl Message {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            content: content.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{Message, Role};

    #[test]
    fn roles_serialize_to_wire_names() {
        let user = serde_json::to_string(&Message::user("hi")).expect("user message serializes");
        assert!(user.contains("\"role\":\"user\""));

        let assistant =
            serde_json::to_string(&Message::assistant("hello")).expect("assistant serializes");
        assert!(assistant.contains("\"role\":\"assistant\""));
    }

    #[test]
    fn transcript_round_trips_through_json() {
        let transcript = vec![
            Message::user("what should I use at night?"),
            Message::assistant("**Start with a cleanser.**"),
        ];
        let data = serde_json::to_string(&transcript).expect("transcript serializes");
        let restored: Vec<Message> = serde_json::from_str(&data).expect("transcript parses back");
        assert_eq!(restored, transcript);
        assert_eq!(restored[0].role, Role::User);
    }
}
