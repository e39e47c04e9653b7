//! Cooperative task scheduling
//!
//! Polling loops run several jobs at fixed cadences from a single thread of
//! control. Each job is gated by a [`RefreshTimer`].

pub mod refresh;

pub use refresh::RefreshTimer;
