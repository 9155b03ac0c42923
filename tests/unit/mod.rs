//! Unit test suite for lzforge.
//!
//! ```bash
//! cargo test --test unit
//! ```
//!
//! Organized by concern:
//! - **cascade_tests**: state store mutations, rename propagation, and
//!   referential healing
//! - **compile_tests**: end-to-end compilation of documents into file sets
//! - **validation_tests**: save predicates and the invalid-forms walker

mod cascade_tests;
mod compile_tests;
mod validation_tests;
