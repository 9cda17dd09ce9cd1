pub mod check;
pub mod init_config;
pub mod presets;
pub mod provision;
pub mod render;
