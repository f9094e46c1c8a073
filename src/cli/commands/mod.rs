pub mod auth;
pub mod course;
pub mod job;
pub mod room;
pub mod template;
