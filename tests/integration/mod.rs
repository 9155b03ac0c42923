//! Integration test suite: drives the `lzforge` binary end to end.
//!
//! ```bash
//! cargo test --test integration
//! ```

mod cli;
