pub mod commands;
pub mod model;
pub mod otp;
pub mod phone;
pub mod session;
