//! Property-based tests for the promo planner
//!
//! This module contains property-based tests using the proptest framework.
//! Property tests verify invariants that should hold for all inputs, rather
//! than testing specific cases.
//!
//! ## Running Property Tests
//!
//! ```sh
//! cargo test property --release
//! ```
//!
//! ## Test Modules
//!
//! - `plan_props`: Tests for plan grid operations
//!   - Every chain keeps at least one row under any add/remove sequence
//!   - A cell edit touches exactly one (row, month) field
//!   - Unknown rows are never created by edits
//!
//! - `library_props`: Tests for library deduplication
//!   - Keys shorter than two characters are always rejected
//!   - Inserting the same candidate twice is idempotent
//!   - Case and surrounding whitespace do not defeat deduplication
//!
//! By default, proptest runs 256 cases per property. This can be configured
//! via the `PROPTEST_CASES` environment variable.

mod library_props;
mod plan_props;
