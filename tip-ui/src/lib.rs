pub mod app;
pub mod config;
pub mod dice;
pub mod gallery;
pub mod lemonade;
pub mod logging;
pub mod utils;
