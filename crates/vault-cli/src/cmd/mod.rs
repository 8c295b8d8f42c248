pub mod dashboard;
pub mod init;
pub mod rollup;
pub mod standup;
pub mod status;
pub mod sync;
