pub mod jwt;
pub mod permissions;
pub mod session;
