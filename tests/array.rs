mod common;

use algotrace::array::ArrayEvent;
use algotrace::{DynamicArray, EngineConfig, EngineError, Terminal};
use common::assert_well_formed;
use test_case::test_case;

fn five() -> DynamicArray {
    [10, 20, 30, 40, 50].into_iter().collect()
}

#[test_case(0, 5 ; "front shifts everything")]
#[test_case(2, 3 ; "middle")]
#[test_case(4, 1 ; "before last")]
#[test_case(5, 0 ; "append shifts nothing")]
fn insert_moves_len_minus_index(index: usize, moves: usize) {
    let mut array = five();
    let trace = array.insert_traced(index, 99).expect("index in range");

    assert_well_formed(&trace);
    assert_eq!(trace.count("move"), moves);
    assert_eq!(trace.count("prepare"), usize::from(moves > 0));
    assert_eq!(array.get(index), Ok(99));
    assert_eq!(array.len(), 6);
}

#[test_case(0, 4 ; "front")]
#[test_case(3, 1 ; "middle")]
#[test_case(4, 0 ; "last")]
fn delete_moves_len_minus_index_minus_one(index: usize, moves: usize) {
    let mut array = five();
    let expected = array.get(index).expect("index in range");
    let trace = array.delete_traced(index).expect("index in range");

    assert_well_formed(&trace);
    assert_eq!(trace.count("move"), moves);
    assert_eq!(trace.first().tag(), "mark");
    assert_eq!(
        trace.last().event(),
        &ArrayEvent::Complete {
            index,
            value: expected,
            len: 4
        }
    );
}

#[test]
fn insert_moves_run_from_the_back() {
    let mut array = five();
    let trace = array.insert_traced(3, 35).unwrap();

    let moves: Vec<(usize, usize)> = trace
        .iter()
        .filter_map(|step| match step.event() {
            ArrayEvent::Move { from, to, .. } => Some((*from, *to)),
            _ => None,
        })
        .collect();
    assert_eq!(moves, vec![(4, 5), (3, 4)]);
    assert_eq!(array.to_vec(), vec![10, 20, 30, 35, 40, 50]);
}

#[test]
fn out_of_range_is_rejected_without_a_trace() {
    let mut array = five();
    assert_eq!(
        array.insert_traced(6, 1).err(),
        Some(EngineError::OutOfRange { index: 6, len: 5 })
    );
    assert_eq!(
        array.delete_traced(5).err(),
        Some(EngineError::OutOfRange { index: 5, len: 5 })
    );
    assert_eq!(array.to_vec(), vec![10, 20, 30, 40, 50]);

    let mut empty = DynamicArray::new();
    assert!(empty.delete_traced(0).is_err());
}

#[test]
fn first_insert_into_empty_array() {
    let mut array = DynamicArray::new();
    let trace = array.insert_traced(0, 7).unwrap();
    assert_eq!(trace.tags(), vec!["check", "insert", "complete"]);
    assert_eq!(trace.outcome(), Terminal::Complete);
    assert_eq!(trace[1].description(), "insert first element 7");
}

#[test]
fn full_array_doubles_before_shifting() {
    let config = EngineConfig::default().with_initial_capacity(2);
    let mut array = DynamicArray::with_config(&config);
    array.push(1);
    array.push(2);
    assert_eq!(array.capacity(), 2);

    let trace = array.insert_traced(0, 0).unwrap();
    assert_eq!(
        trace.first().event(),
        &ArrayEvent::Check {
            len: 2,
            capacity: 2
        }
    );
    assert_eq!(array.capacity(), 4);
    assert_eq!(array.to_vec(), vec![0, 1, 2]);
}

#[test]
fn snapshots_are_independent_of_later_mutation() {
    let mut array = five();
    let trace = array.delete_traced(0).unwrap();
    let first = trace.first().snapshot().cloned();

    array.insert(0, 1000).unwrap();
    assert_eq!(first, Some(vec![10, 20, 30, 40, 50]));
    assert_eq!(trace.last().snapshot(), Some(&vec![20, 30, 40, 50]));
}
