//! Sampling buffer for read-access signals.

pub mod ring;

#[cfg(test)]
mod ring_test;

pub use ring::{RingBuffer, RingConsumer};
