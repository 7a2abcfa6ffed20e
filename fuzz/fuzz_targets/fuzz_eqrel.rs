//! Fuzz an equivalence relation with arbitrary pair inserts.
//!
//! Goal: after every insert the stored pairs are reflexive over their elements,
//! symmetric and transitive.

#![no_main]

use std::collections::BTreeSet;
use std::sync::Arc;

use libfuzzer_sys::fuzz_target;
use relstore_core::{OrderCatalog, Relation};

fuzz_target!(|data: &[u8]| {
    let mut rel = Relation::equivalence(Arc::new(OrderCatalog::empty(2)));

    for pair in data.chunks_exact(2).take(64) {
        rel.insert(&[i32::from(pair[0] % 24), i32::from(pair[1] % 24)]);
    }

    let stored: BTreeSet<(i32, i32)> = rel.iter().map(|t| (t[0], t[1])).collect();
    for &(a, b) in &stored {
        assert!(stored.contains(&(a, a)));
        assert!(stored.contains(&(b, a)));
        for &(_, c) in stored.range((b, i32::MIN)..=(b, i32::MAX)) {
            assert!(stored.contains(&(a, c)));
        }
    }
});
