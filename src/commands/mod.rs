pub mod connect;
pub mod delete;
pub mod events;
pub mod init;
pub mod new;
pub mod sync;
