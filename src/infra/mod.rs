pub mod omdb;
pub mod remote;
#[cfg(feature = "sftp")]
pub mod sftp;
