//! # Orbital Architecture
//!
//! Orbital is a **UI-agnostic tab and bookmark organizer**. Saved links live
//! in named collections, collections live in spaces, and currently open browser
//! tabs can be pulled in. The command-line client is one front end over the
//! library; a browser extension or a desktop shell would drive the same API.
//!
//! ## Layers
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │  CLI Layer (cli/, wired by main.rs)                         │
//! │  - Parses arguments, formats output, handles terminal I/O   │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  API Layer (api.rs)                                         │
//! │  - Owns library, session, drag engine and open-tab pool     │
//! │  - Keeps session state in step with mutations               │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Command Layer (commands/*.rs, drag.rs)                     │
//! │  - Pure business logic over the library                    │
//! │  - Reordering, cascades, search, import/export              │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Domain Store (library.rs) over Storage (store/)            │
//! │  - Ordered sequences, written through on every change       │
//! │  - FsBackend (production), MemBackend (testing)             │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Ordering
//!
//! There is no `order` field anywhere. Collections of all spaces share one
//! global sequence and links of all collections share another; the position
//! in that sequence is the order. Views such as "collections of this space"
//! are filters over the global sequence, so a reorder is always a splice of
//! the global vector.
//!
//! ## No I/O Assumptions in Core
//!
//! From `api.rs` inward, code takes plain arguments and returns plain Rust
//! types. It never prints, never exits the process, and reads the clock only
//! where a timestamp is stored. Highlight expiry takes the current time as an
//! argument.
//!
//! ## Testing Strategy
//!
//! - **Commands and drag engine**: unit tests against `MemBackend`.
//! - **Store**: `FsBackend` tests in a temp directory.
//! - **API**: session bookkeeping (active space, expansion, highlight).
//! - **CLI**: end-to-end runs of the binary in `tests/`.

pub mod api;
pub mod commands;
pub mod config;
pub mod drag;
pub mod error;
pub mod library;
pub mod model;
pub mod session;
pub mod store;
pub mod tabs;
