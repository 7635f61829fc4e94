//! End-to-end tests: real publisher, real subscriber runtimes, in-memory broker
//!
//! - `harness.rs`   - spawns subscriber runtimes and collects their events
//! - `scenarios.rs` - submission scenarios from HTTP body to dispatched action
//! - `fanout.rs`    - broadcast fan-out and per-subscriber isolation

mod fanout;
