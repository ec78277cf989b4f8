//! Initializer trait definition
//!
//! A driver holds its initial-condition strategy behind this trait and calls
//! [`Initializer::initialize`] once before time evolution begins.

/// Produces `t = 0` data for a set of fields borrowed at construction
pub trait Initializer {
    /// Populate every field the initializer was constructed with
    ///
    /// Frequency buffers are filled first, then real buffers are computed by
    /// inverse transform. Calling again re-randomizes and overwrites.
    fn initialize(&mut self);

    /// Whether `initialize` has completed at least once
    fn is_initialized(&self) -> bool;
}
