pub mod food;
pub mod hello;
pub mod restaurants;
