//! Conversion routines, one submodule per transformation family.
//!
//! Each routine is a single-purpose function from input bytes (plus
//! routine-specific options) to output bytes; none performs I/O or holds
//! state, so every routine is independently testable without a rendering
//! or encoding environment. Capability-heavy routines take their backend
//! as a [`crate::codec`] trait object.
//!
//! ## Data Flow
//!
//! ```text
//! bytes ──▶ decode ──▶ transform ──▶ encode ──▶ bytes
//!           (codec)    (routine)     (codec)
//! ```
//!
//! The router ([`crate::convert`]) picks the routine from the descriptor's
//! [`crate::catalog::Routine`] tag; routines never inspect labels.

pub mod digest;
pub mod html;
pub mod jsonfmt;
pub mod markdown;
pub mod raster;
pub mod tabular;
pub mod text;
