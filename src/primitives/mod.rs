//! Layer 1: Primitives
//!
//! Core building blocks and types.
//!
//! This layer provides the primitive abstractions, data structures, and
//! utility functions used throughout the crate. It has zero internal
//! dependencies within the crate.
//!
//! # Module Organization
//!
//! - **errors**: Shared error types (DemarrayError)
//! - **notices**: Machine-readable informational diagnostics
//! - **layout**: Row-major stride arithmetic for dense buffers
//!
//! # Architecture
//!
//! ```text
//! Layer 5: API
//!   ↓
//! Layer 4: Engines (align, collapse, bind, subset)
//!   ↓
//! Layer 3: Array (tagged buffer + metadata, interop)
//!   ↓
//! Layer 2: Model (scale, labels, dimension, metadata, infer)
//!   ↓
//! Layer 1: Primitives ← You are here
//! ```

/// Shared error types.
///
/// Provides:
/// - Unified `DemarrayError` enum
/// - Specific error variants naming the offending dimension(s)
pub mod errors;

/// Informational notices.
///
/// Provides:
/// - Structured `Notice` values for recoverable-by-design situations
/// - The `Operand` discriminator for binary operations
pub mod notices;

/// Row-major layout arithmetic.
///
/// Provides:
/// - Stride computation and flat/multi-index conversion
/// - Per-dimension gather (index selection)
/// - Axis permutation
pub mod layout;
