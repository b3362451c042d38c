#[path = "../common/mod.rs"]
mod common;

use resumable_sort::{Flow, Inserter};

use common::Script;

fn script(undo_at: &[u8]) -> Script<i8> {
    Script::undoing(undo_at.iter().map(|&call| usize::from(call)))
}

/// Inserts every value without interruption, checking the inserter after each one.
fn sort_straight(values: &[i8], oracle: &mut Script<i8>) -> Vec<i8> {
    let mut inserter = Inserter::new();
    for value in values {
        assert_eq!(inserter.insert(*value, oracle), Flow::Settled);
        assert_eq!(inserter.check(), Ok(()));
    }
    assert_eq!(inserter.history().len(), values.len());
    assert!(inserter.pending().is_empty());
    inserter.into_sorted()
}

quickcheck::quickcheck! {
    fn undo_anywhere_still_sorts(values: Vec<i8>, undo_at: Vec<u8>) -> bool {
        let mut oracle = script(&undo_at);

        let mut expected = values.clone();
        expected.sort();

        sort_straight(&values, &mut oracle) == expected
    }
}

quickcheck::quickcheck! {
    fn saving_midway_changes_nothing(values: Vec<i8>, undo_at: Vec<u8>, exit_at: u8) -> bool {
        common::init_logging();
        let mut straight = script(&undo_at);
        let expected = sort_straight(&values, &mut straight);

        let mut oracle = script(&undo_at).exiting_at(usize::from(exit_at));
        let mut inserter = Inserter::new();
        let mut rest = values.iter();
        for value in rest.by_ref() {
            if inserter.insert(*value, &mut oracle) == Flow::Exit {
                break;
            }
        }

        let saved = serde_json::to_string(&inserter).unwrap();
        let mut inserter: Inserter<i8> = serde_json::from_str(&saved).unwrap();
        assert_eq!(inserter.check(), Ok(()));
        assert_eq!(inserter.resume(&mut oracle), Flow::Settled);
        for value in rest {
            assert_eq!(inserter.insert(*value, &mut oracle), Flow::Settled);
        }

        oracle.calls == straight.calls && inserter.into_sorted() == expected
    }
}

quickcheck::quickcheck! {
    fn every_insertion_asks_at_most_the_height(values: Vec<i8>) -> bool {
        let mut inserter = Inserter::new();
        let mut oracle = Script::honest();

        values.iter().enumerate().all(|(i, value)| {
            let before = oracle.calls.len();
            let _ = inserter.insert(*value, &mut oracle);
            // ceil(lg(n + 1)) for the n values now stored
            let n = i + 1;
            oracle.calls.len() - before <= (usize::BITS - n.leading_zeros()) as usize
        })
    }
}
