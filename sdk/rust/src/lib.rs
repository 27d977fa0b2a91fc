//! Rust client for the task service.

pub mod client;

pub use client::{ClientError, NewTask, Task, TasksClient};
