//! Property-based tests for the promotion library
//!
//! Tests invariants:
//! - Normalized pkg shorter than two characters is always rejected
//! - Inserting the same candidate twice adds exactly one entry
//! - Case and surrounding whitespace of pkg do not defeat deduplication

use proptest::prelude::*;

use crate::core::collaborators::SequentialIds;
use crate::core::promo::{Library, LibraryCandidate, Rejected};

fn candidate(pkg: &str, srp: &str) -> LibraryCandidate {
    LibraryCandidate {
        name: "Template".to_string(),
        pkg: pkg.to_string(),
        cost: "1.00".to_string(),
        srp: srp.to_string(),
    }
}

proptest! {
    /// Short keys never make it into the library
    #[test]
    fn prop_short_pkg_rejected(pkg in "[ ]{0,3}[a-zA-Z0-9]?[ ]{0,3}", srp in "[0-9./]{0,6}") {
        let ids = SequentialIds::new("lib");
        let mut library = Library::default();

        prop_assert_eq!(library.add(candidate(&pkg, &srp), &ids), Err(Rejected::KeyTooShort));
        prop_assert!(library.is_empty());
    }

    /// A second identical insert is rejected as a duplicate
    #[test]
    fn prop_insert_is_idempotent(pkg in "[a-zA-Z0-9]{2,20}", srp in "[0-9./]{0,6}") {
        let ids = SequentialIds::new("lib");
        let mut library = Library::default();

        prop_assert!(library.add(candidate(&pkg, &srp), &ids).is_ok());
        let snapshot = library.clone();
        prop_assert_eq!(library.add(candidate(&pkg, &srp), &ids), Err(Rejected::Duplicate));
        prop_assert_eq!(library, snapshot);
    }

    /// Dedup is case-insensitive on pkg and ignores padding on both key parts
    #[test]
    fn prop_dedup_normalizes_key(
        pkg in "[a-z0-9]{2,20}",
        srp in "[0-9./]{1,6}",
        pad_left in "[ ]{0,3}",
        pad_right in "[ ]{0,3}",
    ) {
        let ids = SequentialIds::new("lib");
        let mut library = Library::default();
        prop_assert!(library.add(candidate(&pkg, &srp), &ids).is_ok());

        let variant = format!("{pad_left}{}{pad_right}", pkg.to_uppercase());
        let padded_srp = format!("{pad_left}{srp}{pad_right}");
        prop_assert_eq!(
            library.add(candidate(&variant, &padded_srp), &ids),
            Err(Rejected::Duplicate)
        );
        prop_assert_eq!(library.len(), 1);
    }

    /// A different srp makes an otherwise identical pkg a new entry
    #[test]
    fn prop_distinct_srp_is_new_entry(pkg in "[a-z]{2,12}", a in "[0-9]{1,3}", b in "[0-9]{1,3}") {
        prop_assume!(a != b);
        let ids = SequentialIds::new("lib");
        let mut library = Library::default();

        prop_assert!(library.add(candidate(&pkg, &a), &ids).is_ok());
        prop_assert!(library.add(candidate(&pkg, &b), &ids).is_ok());
        prop_assert_eq!(library.len(), 2);
    }
}
