pub mod config;
pub mod controller;
pub mod device;
pub mod logging;
