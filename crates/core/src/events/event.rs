use std::collections::HashMap;

use serde::{Deserialize, Serialize};

pub const ATTEMPTED: &str = "attempted";
pub const SUCCESSFUL: &str = "successful";
pub const UNSUCCESSFUL: &str = "unsuccessful";

/// A single audit record as published on the audit topic.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AuditEvent {
    pub created: String,
    pub service: String,
    pub request_id: String,
    pub user: String,
    pub attempted_action: String,
    pub action_result: String,
    pub params: HashMap<String, String>,
}

impl AuditEvent {
    pub fn result(&self) -> ActionResult {
        ActionResult::classify(&self.action_result)
    }
}

/// Outcome classifier for an action. Anything that is not one of the three
/// known labels lands in `Other`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ActionResult {
    Attempted,
    Successful,
    Unsuccessful,
    Other,
}

impl ActionResult {
    pub fn classify(label: &str) -> Self {
        match label {
            ATTEMPTED => ActionResult::Attempted,
            SUCCESSFUL => ActionResult::Successful,
            UNSUCCESSFUL => ActionResult::Unsuccessful,
            _ => ActionResult::Other,
        }
    }

    pub fn is_recognized(&self) -> bool {
        !matches!(self, ActionResult::Other)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classify_is_exact_and_case_sensitive() {
        assert_eq!(ActionResult::classify("attempted"), ActionResult::Attempted);
        assert_eq!(ActionResult::classify("successful"), ActionResult::Successful);
        assert_eq!(
            ActionResult::classify("unsuccessful"),
            ActionResult::Unsuccessful
        );
        assert_eq!(ActionResult::classify("Successful"), ActionResult::Other);
        assert_eq!(ActionResult::classify(" successful"), ActionResult::Other);
        assert_eq!(ActionResult::classify(""), ActionResult::Other);
        assert!(!ActionResult::Other.is_recognized());
    }

    #[test]
    fn serde_defaults_fill_missing_fields() {
        let event: AuditEvent =
            serde_json::from_str(r#"{"attempted_action":"login","extra":"ignored"}"#)
                .expect("partial event should deserialize");

        assert_eq!(event.attempted_action, "login");
        assert_eq!(event.created, "");
        assert_eq!(event.request_id, "");
        assert!(event.params.is_empty());
        assert_eq!(event.result(), ActionResult::Other);
    }
}
