//! Behavioural scenarios for the clone-based snapshot lifecycle.

mod snapshot;
