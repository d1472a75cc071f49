//! Core domain logic: identifier generation, rate limiting and the
//! asynchronous access-tracking pipeline.

pub mod access_event;
pub mod access_worker;
pub mod generator;
pub mod rate_limiter;
