//! Laws of the annotation store, checked against a list model
use faultline_core::{Annotations, Key, Lookup};
use proptest::prelude::*;

struct Alpha;
impl Key for Alpha {
    type Value = u32;
}

struct Beta;
impl Key for Beta {
    type Value = u32;
}

#[derive(Debug, Clone)]
enum Op {
    AddAlpha(u32),
    AddBeta(u32),
    ClearAlpha,
}

fn arb_op() -> impl Strategy<Value = Op> {
    prop_oneof![
        4 => any::<u32>().prop_map(Op::AddAlpha),
        2 => any::<u32>().prop_map(Op::AddBeta),
        1 => Just(Op::ClearAlpha),
    ]
}

fn arb_ops() -> impl Strategy<Value = Vec<Op>> {
    prop::collection::vec(arb_op(), 0..16)
}

fn apply(store: Annotations, ops: &[Op]) -> Annotations {
    ops.iter().fold(store, |store, op| match op {
        Op::AddAlpha(v) => store.add::<Alpha>(*v),
        Op::AddBeta(v) => store.add::<Beta>(*v),
        Op::ClearAlpha => store.remove_all::<Alpha>(),
    })
}

/// Expected `get_all::<Alpha>` for a sequence of ops
fn model_alpha(ops: &[Op]) -> Vec<u32> {
    let mut live = Vec::new();
    for op in ops {
        match op {
            Op::AddAlpha(v) => live.push(*v),
            Op::ClearAlpha => live.clear(),
            Op::AddBeta(_) => {}
        }
    }
    live.reverse();
    live
}

fn alpha(store: &Annotations) -> Vec<u32> {
    store.get_all::<Alpha>().copied().collect()
}

fn beta(store: &Annotations) -> Vec<u32> {
    store.get_all::<Beta>().copied().collect()
}

#[test]
fn test_shadowing_law() {
    let store = Annotations::new().add::<Alpha>(1).add::<Alpha>(2);
    assert_eq!(store.get::<Alpha>(), Some(&2));
    assert_eq!(alpha(&store), vec![2, 1]);
}

#[test]
fn test_tombstone_law() {
    let store = Annotations::new().add::<Alpha>(1).remove_all::<Alpha>();
    assert!(alpha(&store).is_empty());
    let store = store.add::<Alpha>(2);
    assert_eq!(alpha(&store), vec![2]);
}

#[test]
fn test_merge_order_law() {
    let merged = Annotations::merge([
        Annotations::new().add::<Alpha>(1),
        Annotations::new().add::<Alpha>(2),
    ]);
    let sequential = Annotations::new().add::<Alpha>(1).add::<Alpha>(2);
    assert_eq!(alpha(&merged), vec![2, 1]);
    assert_eq!(alpha(&merged), alpha(&sequential));
}

proptest! {
    #[test]
    fn prop_get_all_matches_model(ops in arb_ops()) {
        let store = apply(Annotations::new(), &ops);
        let expected = model_alpha(&ops);
        prop_assert_eq!(alpha(&store), expected.clone());
        prop_assert_eq!(store.get::<Alpha>().copied(), expected.first().copied());
        prop_assert_eq!(store.has::<Alpha>(), !expected.is_empty());
        prop_assert_eq!(store.get_or::<Alpha>(u32::MAX), expected.first().copied().unwrap_or(u32::MAX));
    }

    #[test]
    fn prop_merge_is_sequential_application(a in arb_ops(), b in arb_ops()) {
        let merged = Annotations::merge([
            apply(Annotations::new(), &a),
            apply(Annotations::new(), &b),
        ]);
        let sequential = apply(apply(Annotations::new(), &a), &b);
        prop_assert_eq!(alpha(&merged), alpha(&sequential));
        prop_assert_eq!(beta(&merged), beta(&sequential));
    }

    #[test]
    fn prop_merge_is_associative(a in arb_ops(), b in arb_ops(), c in arb_ops()) {
        let [sa, sb, sc] = [&a, &b, &c].map(|ops| apply(Annotations::new(), ops));
        let left = Annotations::merge([Annotations::merge([sa.clone(), sb.clone()]), sc.clone()]);
        let right = Annotations::merge([sa, Annotations::merge([sb, sc])]);
        prop_assert_eq!(alpha(&left), alpha(&right));
        prop_assert_eq!(beta(&left), beta(&right));
        prop_assert_eq!(left.len(), right.len());
    }

    #[test]
    fn prop_lookup_prefers_own_store(own in arb_ops(), inherited in arb_ops()) {
        let own = apply(Annotations::new(), &own);
        let inherited = apply(Annotations::new(), &inherited);
        let lookup = Lookup::layered(&own, &inherited);

        let mut expected = alpha(&own);
        expected.extend(alpha(&inherited));
        let seen: Vec<u32> = lookup.get_all::<Alpha>().copied().collect();
        prop_assert_eq!(lookup.get::<Alpha>().copied(), expected.first().copied());
        prop_assert_eq!(seen, expected);
    }
}
