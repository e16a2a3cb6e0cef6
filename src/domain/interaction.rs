/// Which side of the conversation produced a turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Originator {
    User,
    Agent,
}

impl Originator {
    pub fn as_str(&self) -> &'static str {
        match self {
            Originator::User => "user",
            Originator::Agent => "agent",
        }
    }
}

/// One turn in a conversation. The last element of an interaction history
/// is always the current question.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InferenceInteraction {
    pub originator: Originator,
    pub text: String,
}

impl InferenceInteraction {
    pub fn new(originator: Originator, text: impl Into<String>) -> Self {
        Self {
            originator,
            text: text.into(),
        }
    }
}
