// State-machine tests driving HashMap against the standard library map
// through long randomized operation sequences.

use std::collections::BTreeMap;
use std::collections::HashMap as StdHashMap;
use std::hash::BuildHasher;
use std::hash::Hasher;

use proptest::prelude::*;
use proptest::test_runner::TestCaseError;

use crate::HashMap;

#[derive(Clone, Debug)]
enum Op {
    Insert(String, i32),
    Remove(String),
    Get(String),
    Contains(String),
    Mutate(String, i32),
    Entry(String, i32),
    Iterate,
    Reserve(usize),
    ShrinkToFit,
    Retain,
}

fn arb_ops() -> impl Strategy<Value = Vec<Op>> {
    proptest::collection::vec(
        prop_oneof![
            ("[a-z]{0,6}", any::<i32>()).prop_map(|(k, v)| Op::Insert(k, v)),
            "[a-z]{0,6}".prop_map(Op::Remove),
            "[a-z]{0,6}".prop_map(Op::Get),
            "[a-z]{0,6}".prop_map(Op::Contains),
            ("[a-z]{0,6}", any::<i32>()).prop_map(|(k, d)| Op::Mutate(k, d)),
            ("[a-z]{0,6}", any::<i32>()).prop_map(|(k, d)| Op::Entry(k, d)),
            Just(Op::Iterate),
            (0usize..64).prop_map(Op::Reserve),
            Just(Op::ShrinkToFit),
            Just(Op::Retain),
        ],
        1..200,
    )
}

fn run_against_model<S>(
    ops: Vec<Op>,
    sut: &mut HashMap<String, i32, S>,
) -> Result<(), TestCaseError>
where
    S: BuildHasher,
{
    let mut model: StdHashMap<String, i32> = StdHashMap::new();

    for op in ops {
        match op {
            Op::Insert(k, v) => {
                let old = sut.insert(k.clone(), v);
                prop_assert_eq!(old, model.insert(k, v));
            }
            Op::Remove(k) => {
                prop_assert_eq!(sut.remove(&k), model.remove(&k));
            }
            Op::Get(k) => {
                prop_assert_eq!(sut.get(&k), model.get(&k));
            }
            Op::Contains(k) => {
                prop_assert_eq!(sut.contains_key(&k), model.contains_key(&k));
            }
            Op::Mutate(k, d) => match (sut.get_mut(&k), model.get_mut(&k)) {
                (Some(value), Some(mv)) => {
                    *value = value.saturating_add(d);
                    *mv = mv.saturating_add(d);
                }
                (None, None) => {}
                _ => prop_assert!(false, "presence diverged for key {:?}", k),
            },
            Op::Entry(k, d) => {
                let value = sut.entry(k.clone()).or_insert(0);
                *value = value.saturating_add(d);
                let mv = model.entry(k).or_insert(0);
                *mv = mv.saturating_add(d);
                prop_assert_eq!(*value, *mv);
            }
            Op::Iterate => {
                let got: BTreeMap<String, i32> =
                    sut.iter().map(|(k, v)| (k.clone(), *v)).collect();
                let want: BTreeMap<String, i32> =
                    model.iter().map(|(k, v)| (k.clone(), *v)).collect();
                prop_assert_eq!(got, want);
            }
            Op::Reserve(additional) => {
                sut.reserve(additional);
                prop_assert!(sut.capacity() >= sut.len() + additional);
            }
            Op::ShrinkToFit => {
                sut.shrink_to_fit();
            }
            Op::Retain => {
                sut.retain(|_, v| *v % 2 == 0);
                model.retain(|_, v| *v % 2 == 0);
            }
        }

        prop_assert_eq!(sut.len(), model.len());
        prop_assert_eq!(sut.is_empty(), model.is_empty());
        prop_assert!(sut.capacity() >= sut.len());
    }

    let got: BTreeMap<String, i32> = sut.iter().map(|(k, v)| (k.clone(), *v)).collect();
    let want: BTreeMap<String, i32> = model.iter().map(|(k, v)| (k.clone(), *v)).collect();
    prop_assert_eq!(got, want);
    Ok(())
}

proptest! {
    #[test]
    fn matches_std_hash_map(ops in arb_ops()) {
        let mut sut: HashMap<String, i32> = HashMap::new();
        run_against_model(ops, &mut sut)?;
    }
}

// Collision variant: a constant hasher lands every key in the same home
// bucket, so displacement and backward shifts run on every operation.
#[derive(Clone, Default)]
struct ConstBuildHasher;

struct ConstHasher;

impl BuildHasher for ConstBuildHasher {
    type Hasher = ConstHasher;

    fn build_hasher(&self) -> Self::Hasher {
        ConstHasher
    }
}

impl Hasher for ConstHasher {
    fn write(&mut self, _bytes: &[u8]) {}

    fn finish(&self) -> u64 {
        0
    }
}

proptest! {
    #[test]
    fn matches_std_hash_map_with_full_collisions(ops in arb_ops()) {
        let mut sut: HashMap<String, i32, ConstBuildHasher> =
            HashMap::with_hasher(ConstBuildHasher);
        run_against_model(ops, &mut sut)?;
    }
}
