use iced::keyboard::Key;
use iced::time::Instant;
use iced::{Element, Subscription};

use crate::{view::View, views::game_screen::GameScreen};

/// Top-level application state. A single screen: the game itself.
pub struct State {
    screen: GameScreen,
}

/// Every event the application reacts to.
#[derive(Clone, Debug)]
pub enum Message {
    /// A key went down somewhere in the window.
    Key(Key),
    /// The fixed-interval timer fired.
    Tick(Instant),
    /// The Start control. Ignored while a session is already running.
    Start,
    /// The Restart control. Always begins a fresh session.
    Restart,
}

impl State {
    #[must_use]
    pub fn new() -> Self {
        Self {
            screen: GameScreen::new(),
        }
    }

    pub fn update(state: &mut State, message: Message) {
        // screens only ever emit a single follow-up message
        if let Some(next) = state.screen.update(message) {
            let _ = state.screen.update(next);
        }
    }

    #[must_use]
    pub fn view(state: &State) -> Element<'_, Message> {
        state.screen.view()
    }

    #[must_use]
    pub fn subscription(state: &State) -> Subscription<Message> {
        state.screen.subscription()
    }
}

impl Default for State {
    fn default() -> Self {
        Self::new()
    }
}
