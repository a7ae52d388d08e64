pub mod config;
pub mod field;
pub mod game;
pub mod input;
pub mod piece;
pub mod shapes;
