//! # eventset
//!
//! Scientific event data spread over many binary container files, addressed
//! as one logical, randomly indexable training dataset:
//! - Index map built once at construction (logical index → file, offset)
//! - Per-file selection windows from two fractions
//! - File handles opened lazily, exactly once, and cached
//! - Native named-array container format with checksummed directory
//!
//! ## Architecture Overview
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                 Training loop (caller)                       │
//! │                 len() / get(i) / iter()                      │
//! └─────────────────────┬───────────────────────────────────────┘
//!                       │
//! ┌─────────────────────▼───────────────────────────────────────┐
//! │                    EventDataset                              │
//! │       IndexMap (immutable) + per-file handle slots           │
//! └─────────────────────┬───────────────────────────────────────┘
//!                       │
//!          ┌────────────┴────────────┐
//!          │                         │
//!          ▼                         ▼
//!   ┌─────────────┐          ┌─────────────────┐
//!   │  Discovery  │          │    Backend      │
//!   │ (read_dir)  │          │ (ContainerRead) │
//!   └─────────────┘          └────────┬────────┘
//!                                     │
//!                                     ▼
//!                            ┌─────────────────┐
//!                            │ Container files │
//!                            └─────────────────┘
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod config;

pub mod container;
pub mod discovery;
pub mod backend;
pub mod dataset;

// =============================================================================
// Public API Re-exports
// =============================================================================

pub use error::{DatasetError, Result};
pub use config::{DatasetConfig, SelectionWindow};
pub use dataset::{Dataset, EventDataset, Sample, SourceFile};

// =============================================================================
// Version Info
// =============================================================================

/// Current version of eventset
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
