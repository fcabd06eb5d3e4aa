//! # LinkForge Architecture
//!
//! LinkForge creates NTFS directory junctions and keeps a history of every link it made,
//! so that later runs can tell which of those links are still healthy. The crate is a
//! **UI-agnostic library** with a thin CLI client on top; nothing below the CLI knows
//! about terminals, colours or exit codes.
//!
//! ## Layers
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │  CLI Layer (main.rs, args.rs)                               │
//! │  - Parses arguments, renders output, installs logging       │
//! │  - The ONLY place that knows about stdout/stderr/exit codes │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  API Layer (api.rs)                                         │
//! │  - `LinkForgeApi`: the session object for one process run   │
//! │  - Owns history, link creator, probe and capability flag    │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Command Layer (commands/*.rs)                              │
//! │  - Request validation, delegation, listing                  │
//! │  - Returns `CmdResult` values, never prints                 │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Storage + Validity (store/, validity.rs)                   │
//! │  - Append-only `HistoryStore` over a `StorageBackend`       │
//! │  - Read-only classifier over an `FsProbe`                   │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Collaborators at the edges
//!
//! Three things talk to the operating system and are kept behind small seams so the
//! core stays testable:
//!
//! - [`validity::FsProbe`]: existence / link-type / directory predicates.
//! - [`creator::LinkCreator`]: actually makes the junction (a mount point on Windows,
//!   a directory symlink elsewhere).
//! - [`store::backend::StorageBackend`]: where the history JSON lives.
//!
//! ## Module Overview
//!
//! - [`api`]: The session facade, entry point for all operations
//! - [`commands`]: Business logic for each command
//! - [`store`]: History persistence
//! - [`validity`]: Junction health classifier
//! - [`request`]: Shape validation of a link-creation request
//! - [`creator`]: Link-creation delegate and failure hints
//! - [`model`]: `JunctionRecord` and display entries
//! - [`config`]: Configuration management
//! - [`paths`]: Per-user data directory resolution
//! - [`clipboard`] / [`explorer`]: Desktop helpers used by the CLI
//! - [`elevation`]: Administrator detection
//! - [`error`]: Error types

pub mod api;
pub mod clipboard;
pub mod commands;
pub mod config;
pub mod creator;
pub mod elevation;
pub mod error;
pub mod explorer;
pub mod model;
pub mod paths;
pub mod request;
pub mod store;
pub mod validity;
