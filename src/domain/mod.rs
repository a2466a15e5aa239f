//! Domain layer containing business entities and logic.
//!
//! This module implements the core domain logic following Clean Architecture principles.
//! It defines entities and repository interfaces independent of infrastructure
//! concerns.
//!
//! # Architecture
//!
//! - [`entities`] - Core business data structures
//! - [`repositories`] - Data access trait definitions
//!
//! # Design Principles
//!
//! - Domain layer has no dependencies on infrastructure or presentation layers
//! - Repository traits define contracts implemented by infrastructure layer
//! - Business logic is encapsulated in services (see [`crate::application::services`])
//!
//! # Scan Processing Flow
//!
//! 1. HTTP handler receives `GET /go/{code}`
//! 2. [`crate::application::services::RedirectService`] classifies the device
//! 3. [`repositories::ShortLinkRepository::record_visit`] commits counters and the scan log
//! 4. The handler redirects to the destination read in that transaction

pub mod entities;
pub mod repositories;
