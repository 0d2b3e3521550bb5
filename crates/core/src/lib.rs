//! Core library for appgen
//!
//! This crate implements the **Functional Core** of the appgen application,
//! following the Functional Core - Imperative Shell architectural pattern.
//!
//! # Architecture Overview
//!
//! - **`appgen_core`** (this crate): Pure transformation functions with zero I/O
//! - **`appgen`**: The relay server, the generation orchestrator and every
//!   network, filesystem and terminal interaction (the Imperative Shell)
//!
//! Nothing in here opens a socket or touches the disk. The orchestrator and the
//! relay call into these functions with data they already fetched, so every
//! decision (what to forward, which code block wins, how state moves) can be
//! tested with plain fixture strings.
//!
//! # Module Organization
//!
//! - [`chat`]: Chat-completion wire types (messages, multimodal content parts, requests)
//! - [`envelope`]: Splitting a relay payload into the secret key and the forwarded body
//! - [`error`]: Typed failures of a generation run
//! - [`export`]: Page export options, background compositing and data-URL encoding
//! - [`extract`]: Response content lookup, SSE de-streaming and HTML block extraction
//! - [`prompt`]: The fixed instructions and payload assembly
//! - [`state`]: Application state and its pure transitions
//!
//! # Example Usage
//!
//! ```rust,ignore
//! use appgen_core::extract::extract_html_block;
//!
//! let reply = "Draft:\n```html\n<p>a</p>\n```\nFixed:\n```html\n<p>b</p>\n```";
//! assert_eq!(extract_html_block(reply).as_deref(), Some("<p>b</p>"));
//! ```

pub mod chat;
pub mod envelope;
pub mod error;
pub mod export;
pub mod extract;
pub mod prompt;
pub mod state;
