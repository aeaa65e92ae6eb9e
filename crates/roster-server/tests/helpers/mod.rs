//! Test helpers for roster-server.

#![allow(dead_code, unused_imports)]

pub mod app;
pub mod client;
pub mod doubles;

pub use app::{TestApp, new_student, spawn_app, spawn_app_with, spawn_app_with_cache};
pub use client::{TestClient, TestResponse};
pub use doubles::{CountingRepository, FailingStore};
