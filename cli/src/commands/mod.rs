pub mod config;
pub mod down;
pub mod status;
pub mod up;
pub mod wait;
