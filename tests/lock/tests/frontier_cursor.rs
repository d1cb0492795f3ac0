//! Frontier cursor lock tests.
//!
//! Drives [`OrderedFrontier`] with random interleavings of insert, remove,
//! and cursor moves, and checks every step against a full rescan:
//! 1. `qualifying_len` equals the number of keys with `fHat <= threshold`.
//! 2. `qualifying()` lists exactly those keys in ascending order.
//! 3. A cursor move reports exactly the keys whose side of the boundary
//!    changed, in ascending order.
//! 4. `min()` is the smallest key.

use ees_search::frontier::{CursorDirection, OrderedFrontier};
use ees_search::node::{CostEstimates, FHatKey, NodeArena, NodeId, OrdCost};
use ees_search::policy::TieBreakV1;
use proptest::prelude::*;

#[derive(Debug, Clone)]
enum Op {
    Insert(u8),
    Remove(usize),
    Move(u8),
}

fn op() -> impl Strategy<Value = Op> {
    prop_oneof![
        3 => (0u8..24).prop_map(Op::Insert),
        2 => (0usize..64).prop_map(Op::Remove),
        2 => (0u8..24).prop_map(Op::Move),
    ]
}

fn qualifying_keys(live: &[FHatKey], threshold: Option<f64>) -> Vec<FHatKey> {
    let Some(t) = threshold else {
        return Vec::new();
    };
    let bound = OrdCost::new(t);
    let mut keys: Vec<FHatKey> = live.iter().copied().filter(|k| k.f_hat <= bound).collect();
    keys.sort();
    keys
}

proptest! {
    #[test]
    fn cursor_matches_rescan(ops in prop::collection::vec(op(), 1..120)) {
        let mut arena: NodeArena<usize> = NodeArena::new();
        let mut frontier = OrderedFrontier::new();
        let mut live: Vec<FHatKey> = Vec::new();
        let mut threshold: Option<f64> = None;

        for op in ops {
            match op {
                Op::Insert(f_hat) => {
                    let n = arena.len();
                    let id = arena.alloc(
                        n,
                        None,
                        CostEstimates::corrected(0.0, f64::from(f_hat), 0.0, 0.0, 0.0, 0.0),
                    );
                    let key = FHatKey::of(&arena[id], TieBreakV1::PreferShallow);
                    prop_assert!(frontier.insert(key));
                    live.push(key);
                }
                Op::Remove(pick) => {
                    if live.is_empty() {
                        prop_assert!(frontier.remove(NodeId::MAX).is_none());
                        continue;
                    }
                    let key = live.swap_remove(pick % live.len());
                    prop_assert_eq!(frontier.remove(key.id), Some(key));
                }
                Op::Move(t) => {
                    let t = f64::from(t);
                    let before = qualifying_keys(&live, threshold);
                    let after = qualifying_keys(&live, Some(t));
                    let moved = frontier.move_cursor(t);

                    let mut entered: Vec<NodeId> =
                        after.iter().filter(|k| !before.contains(k)).map(|k| k.id).collect();
                    let mut left: Vec<NodeId> =
                        before.iter().filter(|k| !after.contains(k)).map(|k| k.id).collect();
                    match moved.direction {
                        CursorDirection::Advanced => {
                            prop_assert!(left.is_empty());
                            prop_assert_eq!(&moved.crossed, &entered);
                        }
                        CursorDirection::Retreated => {
                            prop_assert!(entered.is_empty());
                            prop_assert_eq!(&moved.crossed, &left);
                        }
                        CursorDirection::Unchanged => {
                            entered.append(&mut left);
                            prop_assert!(entered.is_empty());
                            prop_assert!(moved.crossed.is_empty());
                        }
                    }
                    threshold = Some(t);
                }
            }

            let expected = qualifying_keys(&live, threshold);
            prop_assert_eq!(frontier.qualifying_len(), expected.len());
            let listed: Vec<NodeId> = frontier.qualifying().collect();
            let expected_ids: Vec<NodeId> = expected.iter().map(|k| k.id).collect();
            prop_assert_eq!(listed, expected_ids);
            prop_assert_eq!(frontier.min(), live.iter().min().copied());
            prop_assert_eq!(frontier.len(), live.len());
        }
    }
}
