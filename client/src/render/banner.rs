use crate::view::{Element, Node};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageKind {
    Success,
    Error,
}

impl MessageKind {
    fn class(self) -> &'static str {
        match self {
            Self::Success => "form-message success",
            Self::Error => "form-message error",
        }
    }
}

/// Inline feedback next to a form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormMessage {
    pub kind: MessageKind,
    pub text: String,
}

impl FormMessage {
    pub fn success(text: impl Into<String>) -> Self {
        Self {
            kind: MessageKind::Success,
            text: text.into(),
        }
    }

    pub fn error(text: impl Into<String>) -> Self {
        Self {
            kind: MessageKind::Error,
            text: text.into(),
        }
    }
}

/// The `message` query parameter, verbatim, one paragraph per line.
pub fn message_banner(message: &str) -> Node {
    Element::new("div")
        .class("message-banner")
        .children(message.split('\n').map(|line| Element::new("p").text(line)))
        .into()
}

pub fn form_message(message: &FormMessage) -> Node {
    Element::new("p")
        .class(message.kind.class())
        .text(message.text.clone())
        .into()
}
