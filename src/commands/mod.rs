pub mod digest;
pub mod init_config;
pub mod stage;
pub mod trace;
