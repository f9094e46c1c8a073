// Remote API surface: the intercepting client plus one thin module per
// resource. Resource calls are passthroughs - one HTTP call, decoded
// payload out, no retry or caching.

pub mod auth;
pub mod client;
pub mod course;
pub mod email_template;
pub mod job;
pub mod room;
pub mod user;
