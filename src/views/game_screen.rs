use std::collections::HashSet;
use std::time::Duration;

use iced::{
    keyboard, time,
    widget::{button, column, container, row, text, Column, Row},
    Border, Color, Element, Length, Subscription,
};

use crate::{
    app::Message,
    models::game::{Cell, Direction, RunState},
    view::View,
    view_model::ViewModel,
    view_models::game_view_model::GameViewModel,
};

/// Pixel size of one grid cell.
const CELL_SIZE: u16 = 20;

/// Draws the current game snapshot and declares the timer and keyboard
/// subscriptions. Reads state only; every change goes through a
/// [`Message`].
#[derive(Debug)]
pub struct GameScreen {
    view_model: GameViewModel,
}

impl GameScreen {
    #[must_use]
    pub fn new() -> Self {
        Self {
            view_model: GameViewModel::new(),
        }
    }
}

impl Default for GameScreen {
    fn default() -> Self {
        Self::new()
    }
}

/// Glyph standing in for the original's direction-dependent head eyes.
fn head_glyph(direction: Direction) -> &'static str {
    match direction {
        Direction::Up => "▲",
        Direction::Down => "▼",
        Direction::Left => "◀",
        Direction::Right => "▶",
    }
}

impl View for GameScreen {
    fn update(&mut self, message: Message) -> Option<Message> {
        self.view_model.update(message)
    }

    fn view(&self) -> Element<'_, Message> {
        let game = self.view_model.get_game();

        let make_cell = |content: &'static str, color: Color| {
            container(text(content).size(12).color(Color::BLACK)) // sized to preserve the cell
                .width(CELL_SIZE)
                .height(CELL_SIZE)
                .style(move |_: &_| container::Style {
                    border: Border {
                        color: Color::from_rgba(0.0, 0.0, 0.0, 0.1),
                        width: 1.0,
                        ..Border::default()
                    },
                    background: Some(color.into()),
                    ..container::Style::default()
                })
        };

        let head = game.get_snake().front().copied();
        let body: HashSet<Cell> = game.get_snake().iter().skip(1).copied().collect();
        let mut grid_view = Column::new();
        for y in 0..game.get_grid_height() {
            let mut grid_row = Row::new();
            for x in 0..game.get_grid_width() {
                let cell = (x, y);
                let rectangle = if head == Some(cell) {
                    make_cell(head_glyph(game.get_direction()), Color::from_rgb(0.0, 0.6, 0.0))
                } else if body.contains(&cell) {
                    make_cell(" ", Color::from_rgba(0.0, 0.8, 0.0, 0.8))
                } else if cell == game.get_food() {
                    make_cell(" ", Color::from_rgb(1.0, 0.3, 0.1))
                } else {
                    make_cell(" ", Color::from_rgb(0.13, 0.13, 0.13))
                };
                grid_row = grid_row.push(rectangle);
            }
            grid_view = grid_view.push(grid_row);
        }

        let start_button = button(text("Start"))
            .on_press(Message::Start)
            .width(80)
            .height(40);
        let restart_button = button(text("Restart"))
            .on_press(Message::Restart)
            .width(80)
            .height(40);
        let score_text = text(format!("Score: {}", game.get_score()));
        let best_text = text(format!("Best: {}", game.get_best_score()));

        let board = container(
            column![
                row![start_button, restart_button, score_text, best_text].spacing(10),
                grid_view,
            ]
            .spacing(10),
        )
        .width(Length::Fill)
        .height(Length::Fill)
        .align_x(iced::alignment::Horizontal::Center)
        .align_y(iced::alignment::Vertical::Center);

        if game.get_run_state() == RunState::Over {
            return column![
                board,
                text(format!(
                    "GAME OVER. Final score: {}. Press Restart or Space to play again",
                    game.get_score()
                )),
            ]
            .align_x(iced::alignment::Horizontal::Center)
            .into();
        }
        board.into()
    }

    fn subscription(&self) -> Subscription<Message> {
        let keyboard = keyboard::on_key_press(|key, _| Some(Message::Key(key)));
        if !self.view_model.is_running() {
            // no tick source outside a running session
            return keyboard;
        }
        let timer = time::every(Duration::from_millis(
            self.view_model.get_time_between_frames(),
        ))
        .map(Message::Tick);
        Subscription::batch(vec![timer, keyboard])
    }
}
