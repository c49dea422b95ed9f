//! Test data builders for creating test messages

use pipes_rs::plumbing::{Message, MessageRef, Priority};

/// Builder for data messages used across the integration tests
pub struct MessageBuilder {
    header: Option<i32>,
    body: Option<String>,
    priority: Priority,
}

impl MessageBuilder {
    pub fn new() -> Self {
        Self {
            header: None,
            body: None,
            priority: Priority::default(),
        }
    }

    pub fn header(mut self, header: i32) -> Self {
        self.header = Some(header);
        self
    }

    pub fn body(mut self, body: &str) -> Self {
        self.body = Some(body.to_string());
        self
    }

    pub fn priority(mut self, priority: Priority) -> Self {
        self.priority = priority;
        self
    }

    pub fn build(self) -> Message {
        let mut message = Message::normal().with_priority(self.priority);
        if let Some(header) = self.header {
            message.set_header(header);
        }
        if let Some(body) = self.body {
            message.set_body(body);
        }
        message
    }

    pub fn build_ref(self) -> MessageRef {
        self.build().into_ref()
    }
}

impl Default for MessageBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Simple prioritised message with an integer header.
pub fn prioritised(header: i32, priority: Priority) -> MessageRef {
    MessageBuilder::new()
        .header(header)
        .priority(priority)
        .build_ref()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_message_builder() {
        let message = MessageBuilder::new()
            .header(7)
            .body("hello")
            .priority(Priority::HIGH)
            .build();

        assert!(message.is_normal());
        assert_eq!(message.header::<i32>(), Some(&7));
        assert_eq!(message.body::<String>().map(String::as_str), Some("hello"));
        assert_eq!(message.priority(), Priority::HIGH);
    }
}
