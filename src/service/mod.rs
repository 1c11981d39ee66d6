pub mod app_state;
pub mod cache;
pub mod ranking;
pub mod redis;
