//! TeeMerge: fan-in from several inputs to one output.

use crate::plumbing::fitting::{FittingRef, OutputSlot, PipeFitting};
use crate::plumbing::message::MessageRef;
use std::rc::Rc;

/// Joins several input fittings onto a single output.
///
/// Each input is connected to the merge itself, so whatever is written to
/// an input arrives at the merge's output straight away, in call order.
/// There is no buffering or arbitration between inputs.
#[derive(Default)]
pub struct TeeMerge {
    output: OutputSlot,
}

impl TeeMerge {
    /// Create a merge and connect both inputs to it.
    ///
    /// An input that already has an output keeps it; use `connect_input` to
    /// find out whether an attach succeeded.
    pub fn new(input1: &FittingRef, input2: &FittingRef) -> Rc<Self> {
        let merge = Rc::new(Self::default());
        merge.connect_input(input1);
        merge.connect_input(input2);
        merge
    }

    /// Attach another input. Returns the input's `connect` result.
    pub fn connect_input(self: &Rc<Self>, input: &FittingRef) -> bool {
        let connected = input.connect(self.clone());
        if !connected {
            tracing::debug!("TeeMerge could not attach input: input already has an output");
        }
        connected
    }
}

impl PipeFitting for TeeMerge {
    fn connect(&self, output: FittingRef) -> bool {
        let connected = self.output.connect(output);
        if !connected {
            tracing::debug!("TeeMerge refused connect: output already attached");
        }
        connected
    }

    fn disconnect(&self) -> Option<FittingRef> {
        self.output.disconnect()
    }

    fn write(&self, message: MessageRef) -> bool {
        self.output.write(message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::plumbing::fittings::Pipe;
    use crate::plumbing::message::{Message, MessageKind, Priority};
    use crate::plumbing::test_util::Collector;

    fn pipe() -> FittingRef {
        Rc::new(Pipe::new())
    }

    #[test]
    fn test_connecting_io_pipes() {
        let output1 = Pipe::new();
        let (pipe1, pipe2, pipe3, pipe4) = (pipe(), pipe(), pipe(), pipe());
        let merge = TeeMerge::new(&pipe1, &pipe2);

        assert!(merge.connect_input(&pipe3));
        assert!(merge.connect_input(&pipe4));
        assert!(output1.connect(merge.clone()));
    }

    #[test]
    fn test_receive_messages_from_two_pipes() {
        let collector = Collector::new();
        let (pipe1, pipe2) = (pipe(), pipe());
        let merge = TeeMerge::new(&pipe1, &pipe2);
        assert!(merge.connect(collector.listener()));

        let pipe1_message = Message::normal()
            .with_header(1)
            .with_body("Pipe 1 Message")
            .with_priority(Priority::LOW)
            .into_ref();
        let pipe2_message = Message::normal()
            .with_header(2)
            .with_body("Pipe 2 Message")
            .with_priority(Priority::HIGH)
            .into_ref();

        assert!(pipe1.write(pipe1_message.clone()));
        assert!(pipe2.write(pipe2_message.clone()));

        let received = collector.received();
        assert_eq!(received.len(), 2);

        assert!(Rc::ptr_eq(&received[0], &pipe1_message));
        let message1 = received[0].borrow();
        assert!(matches!(message1.kind(), MessageKind::Normal));
        assert_eq!(message1.header::<i32>(), Some(&1));
        assert_eq!(message1.body::<&str>(), Some(&"Pipe 1 Message"));
        assert_eq!(message1.priority(), Priority::LOW);

        assert!(Rc::ptr_eq(&received[1], &pipe2_message));
        let message2 = received[1].borrow();
        assert_eq!(message2.header::<i32>(), Some(&2));
        assert_eq!(message2.body::<&str>(), Some(&"Pipe 2 Message"));
        assert_eq!(message2.priority(), Priority::HIGH);
    }

    #[test]
    fn test_receive_messages_from_four_pipes() {
        let collector = Collector::new();
        let pipes: Vec<FittingRef> = (0..4).map(|_| pipe()).collect();
        let merge = TeeMerge::new(&pipes[0], &pipes[1]);
        assert!(merge.connect_input(&pipes[2]));
        assert!(merge.connect_input(&pipes[3]));
        assert!(merge.connect(collector.listener()));

        let messages: Vec<_> = (1..=4)
            .map(|i| Message::normal().with_header(i).into_ref())
            .collect();
        for (pipe, message) in pipes.iter().zip(&messages) {
            assert!(pipe.write(message.clone()));
        }

        let received = collector.received();
        assert_eq!(received.len(), 4);
        for (i, (got, sent)) in received.iter().zip(&messages).enumerate() {
            assert!(Rc::ptr_eq(got, sent));
            assert_eq!(got.borrow().header::<i32>(), Some(&(i as i32 + 1)));
        }
    }

    #[test]
    fn test_connected_input_is_not_stolen() {
        let taken = pipe();
        assert!(taken.connect(pipe()));
        let merge = TeeMerge::new(&pipe(), &pipe());
        assert!(!merge.connect_input(&taken));
    }

    #[test]
    fn test_single_output_slot() {
        let merge = TeeMerge::new(&pipe(), &pipe());
        assert!(merge.connect(pipe()));
        assert!(!merge.connect(pipe()));
        assert!(merge.disconnect().is_some());
        assert!(merge.disconnect().is_none());
    }

    #[test]
    fn test_write_without_output_fails() {
        let input = pipe();
        let _merge = TeeMerge::new(&input, &pipe());
        assert!(!input.write(Message::normal().into_ref()));
    }
}
