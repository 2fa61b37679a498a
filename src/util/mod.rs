//! Utility modules for Percolator.

pub mod numeric;
