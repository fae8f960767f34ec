pub mod import;
pub mod init;
pub mod score;
pub mod stats;
pub mod transition;
pub mod validate;
