//! The [`View`] trait for the MVVM architecture.

use iced::{Element, Subscription};

use crate::app::Message;

/// Trait for screens: react to a [`Message`], draw the current state, and
/// declare the event sources the screen wants while it is shown.
pub trait View {
    fn update(&mut self, message: Message) -> Option<Message>;

    fn view(&self) -> Element<'_, Message>;

    fn subscription(&self) -> Subscription<Message> {
        Subscription::none()
    }
}
