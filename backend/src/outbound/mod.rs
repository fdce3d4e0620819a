//! Outbound adapters implementing domain ports for external infrastructure.
//!
//! - **persistence**: PostgreSQL-backed repositories using Diesel ORM
//! - **memory**: in-process repositories for database-less runs and tests
//! - **events**: creation event publishers (Kafka REST proxy, log only)
//!
//! Adapters translate between domain types and infrastructure
//! representations. They contain no business logic.

pub mod events;
pub mod memory;
pub mod persistence;
