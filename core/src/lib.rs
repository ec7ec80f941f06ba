//! Thin blocking client for a task-lists REST API.
//!
//! # Overview
//! `TasksApi::create` turns a `ClientConfig` into a client exposing five
//! operations: list task lists, list the tasks of a list, update a task,
//! create a list and create a task. Each call is one request; the response
//! envelope is handed back as-is so callers decide what a 401 or a timeout
//! means for them.
//!
//! # Design
//! - `TasksApi` is immutable after construction and safe to share across
//!   threads; it holds only its config and a `ureq::Agent`.
//! - Each operation has a pure `build_*` counterpart so the exact request
//!   can be inspected without a network.
//! - `EnvConfig` resolves `API_URL` / `API_KEY`; the client itself never
//!   reads the environment.

pub mod client;
pub mod config;
pub mod error;
pub mod http;
pub mod types;

pub use client::TasksApi;
pub use config::{ClientConfig, EnvConfig, DEFAULT_BASE_URL, DEFAULT_TIMEOUT};
pub use error::ApiError;
pub use http::{ApiResponse, HttpMethod, HttpRequest, Problem};
pub use types::{NewTask, NewTaskList, Task, TaskList, TaskLists, TaskPatch, TaskStatus, Tasks};
