use std::collections::BTreeSet;

use proptest::prelude::*;
use relstore_index::{Index, LexOrder, OrderCatalog, SearchSignature};

// --- Generators ---

fn arb_arity() -> impl Strategy<Value = usize> {
    1usize..=5
}

fn arb_signatures(arity: usize) -> impl Strategy<Value = Vec<SearchSignature>> {
    let total = SearchSignature::total(arity).bits();
    proptest::collection::vec((0..=total).prop_map(SearchSignature::new), 0..8)
}

fn arb_tuples(arity: usize) -> impl Strategy<Value = Vec<Vec<i32>>> {
    proptest::collection::vec(proptest::collection::vec(-3i32..=3, arity..=arity), 0..40)
}

// --- Property tests ---

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    #[test]
    fn catalog_orders_are_permutations(
        (arity, searches) in arb_arity().prop_flat_map(|a| (Just(a), arb_signatures(a)))
    ) {
        let catalog = OrderCatalog::from_signatures(arity, searches.clone()).unwrap();
        for order in catalog.all_orders() {
            prop_assert!(order.is_permutation_of(arity), "{} for arity {}", order, arity);
        }
    }

    #[test]
    fn catalog_serves_every_signature(
        (arity, searches) in arb_arity().prop_flat_map(|a| (Just(a), arb_signatures(a)))
    ) {
        let catalog = OrderCatalog::from_signatures(arity, searches.clone()).unwrap();
        let total = SearchSignature::total(arity);
        for sig in searches.iter().copied().chain([total, SearchSignature::EMPTY]) {
            let pos = catalog.lex_order_number(sig);
            prop_assert!(pos.is_some(), "no order for {}", sig);
            prop_assert!(catalog.all_orders()[pos.unwrap()].serves(sig));
        }
    }

    #[test]
    fn catalog_never_exceeds_signature_count(
        (arity, searches) in arb_arity().prop_flat_map(|a| (Just(a), arb_signatures(a)))
    ) {
        let catalog = OrderCatalog::from_signatures(arity, searches.clone()).unwrap();
        let distinct: BTreeSet<_> = searches
            .iter()
            .copied()
            .filter(|s| !s.is_empty())
            .chain([SearchSignature::total(arity)])
            .collect();
        prop_assert!(catalog.len() >= 1);
        prop_assert!(catalog.len() <= distinct.len());
    }

    #[test]
    fn range_matches_linear_filter(
        (arity, tuples, bound) in arb_arity().prop_flat_map(|a| {
            (Just(a), arb_tuples(a), 0..=SearchSignature::total(a).bits())
        })
    ) {
        let signature = SearchSignature::new(bound);
        let catalog = OrderCatalog::from_signatures(arity, [signature]).unwrap();
        let order = catalog.all_orders()[catalog.lex_order_number(signature).unwrap()].clone();

        let mut index: Index<usize> = Index::new(order);
        let mut stored = Vec::new();
        for tuple in &tuples {
            if index.insert(tuple, stored.len()) {
                stored.push(tuple.clone());
            }
        }

        let Some(pattern) = tuples.first() else {
            return Ok(());
        };
        let hits: BTreeSet<usize> = index.range(pattern, signature).collect();
        let expected: BTreeSet<usize> = stored
            .iter()
            .enumerate()
            .filter(|(_, t)| signature.bound_columns().all(|c| t[c] == pattern[c]))
            .map(|(i, _)| i)
            .collect();
        prop_assert_eq!(hits, expected);
    }

    #[test]
    fn index_rejects_duplicates(
        (arity, tuples) in arb_arity().prop_flat_map(|a| (Just(a), arb_tuples(a)))
    ) {
        let mut index: Index<()> = Index::new(LexOrder::identity(arity));
        for tuple in &tuples {
            index.insert(tuple, ());
        }
        let distinct: BTreeSet<_> = tuples.iter().collect();
        prop_assert_eq!(index.len(), distinct.len());
        for tuple in &tuples {
            prop_assert!(index.exists(tuple));
        }
    }
}

#[test]
fn catalog_serializes_to_json() {
    let catalog = OrderCatalog::from_signatures(2, [SearchSignature::from_columns([1])]).unwrap();
    let json = serde_json::to_string(&catalog).unwrap();
    let back: OrderCatalog = serde_json::from_str(&json).unwrap();
    assert_eq!(back, catalog);
}
