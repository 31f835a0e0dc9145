pub mod app;
pub mod controls_panel;
pub mod game_board;
pub mod game_over_overlay;
pub mod leaderboard_modal;
pub mod stats_panel;
pub mod top_bar;
