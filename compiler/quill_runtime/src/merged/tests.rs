#![allow(clippy::unwrap_used, reason = "Tests can panic")]

use super::*;
use crate::{BoxedVariables, StrongBox};
use pretty_assertions::assert_eq;
use proptest::prelude::*;

fn cells(values: &[i64]) -> Vec<StrongBox> {
    values
        .iter()
        .map(|&v| StrongBox::new(Value::Int(v)))
        .collect()
}

fn view(cells: &[StrongBox]) -> VariablesRef {
    VariablesRef::new(BoxedVariables::new(cells.to_vec()))
}

#[test]
fn test_slot_encoding() {
    assert_eq!(Slot::decode(0), Slot::First(0));
    assert_eq!(Slot::decode(3), Slot::First(3));
    assert_eq!(Slot::decode(-1), Slot::Second(0));
    assert_eq!(Slot::decode(-3), Slot::Second(2));
    assert_eq!(Slot::decode(i32::MIN), Slot::Second(i32::MAX as usize));
    assert_eq!(Slot::Second(0).encode(), -1);
    assert_eq!(Slot::First(4).encode(), 4);
}

#[test]
fn test_merged_reads_in_map_order() {
    // first = [a, b], second = [c, d, e]
    let first = cells(&[1, 2]);
    let second = cells(&[3, 4, 5]);
    let merged = merge_runtime_variables(
        view(&first),
        view(&second),
        Rc::from(vec![0, -1, 1, -2, -3]),
    )
    .unwrap();

    assert_eq!(merged.indexes(), &[0, -1, 1, -2, -3]);
    assert_eq!(merged.count(), 5);
    let read: Vec<Value> = (0..5).map(|i| merged.get(i).unwrap()).collect();
    assert_eq!(
        read,
        vec![
            Value::Int(1),
            Value::Int(3),
            Value::Int(2),
            Value::Int(4),
            Value::Int(5)
        ]
    );
}

#[test]
fn test_merged_write_goes_to_underlying_cell() {
    let first = cells(&[1, 2]);
    let second = cells(&[3, 4, 5]);
    let merged = merge_runtime_variables(
        view(&first),
        view(&second),
        Rc::from(vec![0, -1, 1, -2, -3]),
    )
    .unwrap();

    merged.set(2, Value::Int(20)).unwrap();
    assert_eq!(first[1].get(), Value::Int(20));

    merged.set(4, Value::Int(50)).unwrap();
    assert_eq!(second[2].get(), Value::Int(50));

    // Writes made outside the view are visible through it.
    second[0].set(Value::Int(30));
    assert_eq!(merged.get(1), Ok(Value::Int(30)));
}

#[test]
fn test_merged_out_of_bounds_position() {
    let merged = merge_runtime_variables(
        view(&cells(&[1])),
        view(&cells(&[2])),
        Rc::from(vec![-1, 0]),
    )
    .unwrap();
    assert_eq!(
        merged.get(2),
        Err(RuntimeError::IndexOutOfBounds { index: 2, count: 2 })
    );
}

#[test]
fn test_merge_rejects_length_mismatch() {
    let err = merge_runtime_variables(
        view(&cells(&[1, 2])),
        view(&cells(&[3])),
        Rc::from(vec![0, -1]),
    )
    .unwrap_err();
    assert_eq!(
        err,
        MergeError::LengthMismatch {
            len: 2,
            first: 2,
            second: 1
        }
    );
}

#[test]
fn test_merge_rejects_out_of_range_entry() {
    let err = merge_runtime_variables(
        view(&cells(&[1])),
        view(&cells(&[2])),
        Rc::from(vec![0, -2]),
    )
    .unwrap_err();
    assert_eq!(
        err,
        MergeError::IndexOutOfRange {
            position: 1,
            encoded: -2,
            side: MergeSide::Second,
            slot: 1,
            count: 1,
        }
    );
    assert!(err.to_string().contains("second view"));
}

#[test]
fn test_unchecked_defers_to_underlying_view() {
    let merged =
        MergedVariables::new_unchecked(view(&cells(&[1])), view(&[]), Rc::from(vec![0, 5]));
    assert_eq!(merged.get(0), Ok(Value::Int(1)));
    assert_eq!(
        merged.get(1),
        Err(RuntimeError::IndexOutOfBounds { index: 5, count: 1 })
    );
}

/// Interleave `first_len` first-view slots with `second_len` second-view
/// slots according to `picks`, preserving relative order within each view.
fn interleave(first_len: usize, second_len: usize, picks: &[bool]) -> Vec<i32> {
    let (mut f, mut s) = (0, 0);
    let mut map = Vec::with_capacity(first_len + second_len);
    for &take_first in picks {
        if (take_first && f < first_len) || s == second_len {
            map.push(Slot::First(f).encode());
            f += 1;
        } else {
            map.push(Slot::Second(s).encode());
            s += 1;
        }
    }
    map
}

proptest! {
    #[test]
    fn prop_merged_positions_address_original_cells(
        first_len in 0usize..6,
        second_len in 0usize..6,
        picks in prop::collection::vec(any::<bool>(), 12),
    ) {
        let first: Vec<StrongBox> = (0..first_len).map(|_| StrongBox::default()).collect();
        let second: Vec<StrongBox> = (0..second_len).map(|_| StrongBox::default()).collect();
        let map = interleave(first_len, second_len, &picks[..first_len + second_len]);
        let merged = merge_runtime_variables(view(&first), view(&second), Rc::from(map.clone()))
            .unwrap();

        prop_assert_eq!(merged.count(), first_len + second_len);
        for (position, &encoded) in map.iter().enumerate() {
            let expected = match Slot::decode(encoded) {
                Slot::First(i) => &first[i],
                Slot::Second(i) => &second[i],
            };
            let marker = Value::Int(i64::try_from(position).unwrap() + 100);
            merged.set(position, marker.clone()).unwrap();
            prop_assert_eq!(expected.get(), marker.clone());
            prop_assert_eq!(merged.get(position).unwrap(), marker);
        }
    }
}
