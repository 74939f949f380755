//! Output side of the engine.

use touchslot_event_model::InputEvent;

/// Receives the canonical events produced by the engine, in order.
///
/// Emitting cannot fail; buffering and delivery are the sink's concern.
pub trait EventSink {
    fn emit(&mut self, event: InputEvent);
}

impl EventSink for Vec<InputEvent> {
    fn emit(&mut self, event: InputEvent) {
        self.push(event);
    }
}

impl<S: EventSink + ?Sized> EventSink for &mut S {
    fn emit(&mut self, event: InputEvent) {
        (**self).emit(event);
    }
}

/// Discards everything.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullSink;

impl EventSink for NullSink {
    fn emit(&mut self, _event: InputEvent) {}
}
