//! In-place sorting of a set of resident blocks.
//!
//! This is the trivial sort primitive run creation leans on: all tuples of
//! the resident frames are ordered globally and written back into the same
//! frames, preserving each frame's occupancy. The interesting part of the
//! external sort — staying inside the frame budget — lives in
//! [`crate::sort`]; this helper only ever touches blocks that are already
//! resident.

use std::cmp::Ordering;

use crate::storage::{Block, Tuple};

/// Sort the tuples of `blocks` globally with `compare`, in place.
///
/// After the call, iterating the blocks in slice order yields all tuples in
/// non-descending `compare` order, and every block holds exactly as many
/// tuples as before. The sort is stable.
pub fn sort_blocks<F>(blocks: &mut [Block], compare: F)
where
    F: Fn(&Tuple, &Tuple) -> Ordering,
{
    let mut tuples: Vec<Tuple> = Vec::new();
    let mut occupancies = Vec::with_capacity(blocks.len());
    for block in blocks.iter_mut() {
        let drained = block.take_tuples();
        occupancies.push(drained.len());
        tuples.extend(drained);
    }

    tuples.sort_by(|a, b| compare(a, b));

    let mut rest = tuples;
    for (block, occupancy) in blocks.iter_mut().zip(occupancies) {
        let tail = rest.split_off(occupancy);
        block.set_tuples(rest);
        rest = tail;
    }
    debug_assert!(rest.is_empty());
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::{BlockManager, Value};

    fn tuple(i: i64) -> Tuple {
        Tuple::new(vec![Value::Int(i)])
    }

    #[test]
    fn test_sorts_across_blocks_preserving_occupancy() {
        let store = BlockManager::new(3, 2);
        let mut blocks = Vec::new();
        for chunk in [[5i64, 1], [4, 2], [3, 0]] {
            let mut block = store.allocate().unwrap();
            for i in chunk {
                block.push(tuple(i));
            }
            blocks.push(block);
        }

        sort_blocks(&mut blocks, |a, b| a.value(0).cmp(b.value(0)));

        let flattened: Vec<_> = blocks.iter().flat_map(|b| b.tuples().to_vec()).collect();
        assert_eq!(flattened, (0..6).map(tuple).collect::<Vec<_>>());
        assert!(blocks.iter().all(|b| b.len() == 2));

        for block in blocks {
            store.release(block, false);
        }
    }

    #[test]
    fn test_handles_partial_last_block() {
        let store = BlockManager::new(2, 3);
        let mut a = store.allocate().unwrap();
        a.push(tuple(9));
        a.push(tuple(7));
        a.push(tuple(8));
        let mut b = store.allocate().unwrap();
        b.push(tuple(6));

        let mut blocks = vec![a, b];
        sort_blocks(&mut blocks, |x, y| x.value(0).cmp(y.value(0)));

        assert_eq!(blocks[0].len(), 3);
        assert_eq!(blocks[1].len(), 1);
        assert_eq!(blocks[0].tuples()[0], tuple(6));
        assert_eq!(blocks[1].tuples()[0], tuple(9));

        for block in blocks {
            store.release(block, false);
        }
    }
}
