//! Fuzz a plain relation with arbitrary insert/purge sequences.
//!
//! Goal: every index stays in step with the arena, and duplicates are never stored.

#![no_main]

use std::collections::BTreeSet;
use std::sync::Arc;

use libfuzzer_sys::fuzz_target;
use relstore_core::{OrderCatalog, Relation, RelationOptions, SearchSignature};

fuzz_target!(|data: &[u8]| {
    let Some((&header, body)) = data.split_first() else {
        return;
    };
    let arity = usize::from(header % 4) + 1;
    let searches = (1u64..(1 << arity)).filter(|bits| header & (1 << (bits % 8)) != 0);
    let catalog = OrderCatalog::from_signatures(arity, searches.map(SearchSignature::new)).unwrap();
    let options = RelationOptions {
        block_size: usize::from(header >> 4) + 1,
        ..RelationOptions::default()
    };
    let mut rel = Relation::with_options(arity, Arc::new(catalog), options);
    let mut model = BTreeSet::new();

    for chunk in body.chunks_exact(arity) {
        if chunk[0] == 0xff {
            rel.purge();
            model.clear();
            continue;
        }
        let tuple: Vec<i32> = chunk.iter().map(|&b| i32::from(b % 16)).collect();
        assert_eq!(rel.insert(&tuple), model.insert(tuple.clone()));
    }

    assert_eq!(rel.len(), model.len());
    for idx in rel.indices() {
        assert_eq!(idx.len(), model.len());
    }
    let stored: BTreeSet<Vec<i32>> = rel.iter().map(<[i32]>::to_vec).collect();
    assert_eq!(stored, model);
});
