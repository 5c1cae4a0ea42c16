pub mod drag;
pub mod history;
pub mod input;
pub mod keypad;
pub mod practice;
pub mod round;
