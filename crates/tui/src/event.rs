//! Key handling outcome shared by the keymap layers.

/// Whether a keymap layer handled a key.
///
/// Layers are tried in order (run control, navigation, scrolling); the first
/// one returning `Consumed` stops the chain.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventStatus {
    Consumed,
    NotConsumed,
}

impl EventStatus {
    pub fn is_consumed(self) -> bool {
        self == EventStatus::Consumed
    }
}
