pub mod equation_banner;
pub mod history_panel;
pub mod keypad_panel;
pub mod settings_menu;
pub mod term_board;
