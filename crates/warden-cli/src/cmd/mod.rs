pub mod cache;
pub mod hook;
pub mod init;
pub mod plan;
pub mod reindex;
pub mod render;
pub mod resolve;
pub mod status;
pub mod toggle;
