use crate::commands::CommandSender;

/// A chat line as delivered by the host, before default handling.
#[derive(Debug)]
pub struct ChatEvent {
    pub sender: CommandSender,
    pub message: String,
    cancelled: bool,
}

impl ChatEvent {
    pub fn new(sender: CommandSender, message: impl Into<String>) -> Self {
        Self {
            sender,
            message: message.into(),
            cancelled: false,
        }
    }

    /// Suppresses the default broadcast of this message.
    pub fn cancel(&mut self) {
        self.cancelled = true;
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerToken(u64);

/// Listeners on the chat stream. Each listener claims the messages starting with its prefix.
#[derive(Debug, Default)]
pub struct ChatEvents {
    next_token: u64,
    listeners: Vec<(ListenerToken, String)>,
}

impl ChatEvents {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe(&mut self, prefix: impl Into<String>) -> ListenerToken {
        let token = ListenerToken(self.next_token);
        self.next_token += 1;
        self.listeners.push((token, prefix.into()));
        token
    }

    /// Removes the listener. Returns false if it was already gone.
    pub fn unsubscribe(&mut self, token: ListenerToken) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|(t, _)| *t != token);
        before != self.listeners.len()
    }

    /// The first listener, in subscription order, whose prefix starts `message`.
    pub fn claim(&self, message: &str) -> Option<ListenerToken> {
        self.listeners
            .iter()
            .find(|(_, prefix)| message.starts_with(prefix.as_str()))
            .map(|(token, _)| *token)
    }

    pub fn listener_count(&self) -> usize {
        self.listeners.len()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Recipient {
    Player(String),
    Console,
    Everyone,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutgoingMessage {
    pub recipient: Recipient,
    pub text: String,
    pub is_error: bool,
}

impl OutgoingMessage {
    pub fn info(recipient: Recipient, text: impl Into<String>) -> Self {
        Self {
            recipient,
            text: text.into(),
            is_error: false,
        }
    }

    pub fn error(recipient: Recipient, text: impl Into<String>) -> Self {
        Self {
            recipient,
            text: text.into(),
            is_error: true,
        }
    }
}

#[test]
fn unsubscribe_is_idempotent() {
    let mut events = ChatEvents::new();
    let token = events.subscribe(".");
    assert_eq!(events.claim(".help"), Some(token));
    assert!(events.unsubscribe(token));
    assert!(!events.unsubscribe(token));
    assert_eq!(events.claim(".help"), None);
    assert_eq!(events.listener_count(), 0);
}
