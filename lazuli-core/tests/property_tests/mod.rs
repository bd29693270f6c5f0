//! Property-based tests for lazuli-core
//!
//! Term interning, fresh names and literal encoding.

mod ast_properties;
mod literal_properties;
