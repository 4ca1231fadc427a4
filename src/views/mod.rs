pub mod game_screen;
