//! The [`ViewModel`] trait for the MVVM architecture.

use crate::app::Message;

/// Trait for `ViewModel` modules: translate a view [`Message`] into model
/// operations, optionally emitting a follow-up message.
pub trait ViewModel {
    fn update(&mut self, message: Message) -> Option<Message>;
}
