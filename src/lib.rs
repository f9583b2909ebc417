//! # Planboard Backend
//!
//! Kanban board backend with a derived project timeline.
//!
//! This crate stores boards, lists, and cards, and derives a Gantt-style
//! timeline view from two anchor dates on each card (launch date and
//! construction start date). The backend exposes a REST API via Axum,
//! including a Server-Sent Events change feed for live board updates.
//!
//! ## Features
//!
//! - **Board storage**: Boards, ordered lists, and positioned cards
//! - **Timeline derivation**: Per-card phase intervals computed from anchors
//! - **Month axis**: Padded month buckets spanning all derived intervals
//! - **Change feed**: Checksum-deduplicated board events over SSE
//! - **Tracker sync**: Best-effort mirroring to an external tracker API
//!
//! ## Architecture
//!
//! The crate is organized into several logical modules:
//!
//! - [`api`]: Data Transfer Objects (DTOs) for API responses
//! - [`models`]: Domain types for boards, lists, cards, and anchors
//! - [`timeline`]: Pure derivation pipeline (intervals, axis, layout)
//! - [`db`]: Database operations, repository pattern, and persistence layer
//! - [`services`]: High-level business logic and the change feed
//! - [`http`]: Axum-based HTTP server and request handlers

// Allow large error types - RepositoryError contains rich context for debugging
#![allow(clippy::result_large_err)]

pub mod api;

pub mod db;
pub mod models;
pub mod timeline;

pub mod services;

#[cfg(feature = "http-server")]
pub mod http;

#[cfg(feature = "tracker-sync")]
pub mod sync;
