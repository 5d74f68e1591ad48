pub mod device;
pub mod status;
pub mod user;
