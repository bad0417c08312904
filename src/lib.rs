#![deny(unused_imports)]
#![deny(missing_docs)]
#![cfg_attr(all(feature = "bench", test), feature(test))]

//! A comparator-ordered binary heap implementation for Rust.
//!
//! Unlike `std::collections::BinaryHeap` the ordering of elements is not
//! given by an `Ord` impl on the element type but by a three-way comparator
//! that is supplied once upon construction and fixed for the heap's lifetime.
//! A comparator returning `Ordering::Less` for `(a, b)` places `a` closer to
//! the head, so an ascending comparator yields a min-heap and a reversed
//! comparator yields a max-heap.
//!
//! This implementation stores elements densely within a `Vec` that is
//! interpreted as a complete binary tree via index arithmetic.
//!
//! The heap is a multiset: elements for which the comparator reports
//! `Ordering::Equal` are kept individually and counted by multiplicity.

extern crate itertools;
extern crate unreachable;

#[cfg(all(feature = "bench", test))]
extern crate rand;
#[cfg(all(feature = "bench", test))]
extern crate test;

use itertools::Itertools;

use std::cmp::Ordering;
use std::fmt;
use std::mem;
use std::slice;
use std::vec;

/// Restores the heap property for the element at `idx` by walking it upward.
fn sift_up<T, C>(storage: &mut [T], cmp: &C, mut idx: usize)
where
    C: Fn(&T, &T) -> Ordering,
{
    while idx > 0 {
        let parent = (idx - 1) / 2;
        if cmp(&storage[idx], &storage[parent]) == Ordering::Less {
            storage.swap(idx, parent);
            idx = parent;
        } else {
            return;
        }
    }
}

/// Restores the heap property for the element at `idx` by walking it downward.
///
/// When both children compare equal the left child is preferred, which keeps
/// removal order deterministic for comparator-equal elements.
fn sift_down<T, C>(storage: &mut [T], cmp: &C, mut idx: usize)
where
    C: Fn(&T, &T) -> Ordering,
{
    let len = storage.len();
    loop {
        let left = 2 * idx + 1;
        if left >= len {
            return;
        }
        let right = left + 1;
        let mut child = left;
        if right < len && cmp(&storage[right], &storage[left]) == Ordering::Less {
            child = right;
        }
        if cmp(&storage[child], &storage[idx]) == Ordering::Less {
            storage.swap(idx, child);
            idx = child;
        } else {
            return;
        }
    }
}

/// Establishes the heap property over arbitrary contents in `O(n)`
/// via bottom-up sift-down.
fn heapify<T, C>(storage: &mut [T], cmp: &C)
where
    C: Fn(&T, &T) -> Ordering,
{
    for idx in (0..storage.len() / 2).rev() {
        sift_down(storage, cmp, idx);
    }
}

/// Drains a heap-ordered buffer into a comparator-sorted `Vec`.
fn drain_ordered<T, C>(mut storage: Vec<T>, cmp: &C) -> Vec<T>
where
    C: Fn(&T, &T) -> Ordering,
{
    let mut drained = Vec::with_capacity(storage.len());
    while let Some(last) = storage.pop() {
        if storage.is_empty() {
            drained.push(last);
        } else {
            drained.push(mem::replace(&mut storage[0], last));
            sift_down(&mut storage, cmp, 0);
        }
    }
    drained
}

fn natural_order<T>(lhs: &T, rhs: &T) -> Ordering
where
    T: Ord,
{
    lhs.cmp(rhs)
}

/// Type alias for `BinaryHeap` ordered by the natural `Ord` of its elements.
pub type NaturalHeap<T> = BinaryHeap<T, fn(&T, &T) -> Ordering>;

/// A binary heap ordered by a user-supplied comparator.
///
/// The comparator must implement a total order over the element type.
/// Supplying a comparator that is not a total order, or mutating a stored
/// element in a way that changes its ordering, is a contract violation:
/// the heap stays memory safe but the removal order becomes unspecified.
///
/// `peek` and `pop` operate on the head, the extremal element of the heap.
/// Repeatedly calling `pop` until the heap is empty yields the elements in
/// comparator-sorted order; every other way of observing the contents
/// (`as_slice`, `iter`, `apply`, `into_vec`) exposes the internal array
/// order, which is NOT sorted.
#[derive(Clone)]
pub struct BinaryHeap<T, C>
where
    C: Fn(&T, &T) -> Ordering,
{
    /// The elements, interpreted as a complete binary tree: the parent of
    /// index `i` lives at `(i - 1) / 2` and its children at `2i + 1` and
    /// `2i + 2`. The element at index 0 is the head.
    storage: Vec<T>,
    /// The comparator supplied at construction. Never reassigned.
    cmp: C,
}

impl<T, C> BinaryHeap<T, C>
where
    C: Fn(&T, &T) -> Ordering,
{
    /// Creates a new empty `BinaryHeap` ordered by the given comparator.
    #[inline]
    pub fn new(cmp: C) -> Self {
        BinaryHeap {
            storage: Vec::new(),
            cmp: cmp,
        }
    }

    /// Creates a new empty `BinaryHeap` with room for at least `capacity`
    /// elements before reallocating.
    #[inline]
    pub fn with_capacity(capacity: usize, cmp: C) -> Self {
        BinaryHeap {
            storage: Vec::with_capacity(capacity),
            cmp: cmp,
        }
    }

    /// Builds a `BinaryHeap` holding the given elements.
    ///
    /// Runs in `O(n)` via a single bottom-up heapify pass instead of
    /// repeated insertion.
    pub fn from_vec(elems: Vec<T>, cmp: C) -> Self {
        let mut heap = BinaryHeap {
            storage: elems,
            cmp: cmp,
        };
        heapify(&mut heap.storage, &heap.cmp);
        heap
    }

    /// Builds a `BinaryHeap` holding clones of the given elements.
    pub fn from_slice(elems: &[T], cmp: C) -> Self
    where
        T: Clone,
    {
        Self::from_vec(elems.to_vec(), cmp)
    }

    /// Returns the number of elements stored in this `BinaryHeap`.
    #[inline]
    pub fn len(&self) -> usize {
        self.storage.len()
    }

    /// Returns true if this `BinaryHeap` is empty.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.storage.is_empty()
    }

    /// Returns a reference to the head element if not empty.
    #[inline]
    pub fn peek(&self) -> Option<&T> {
        self.storage.first()
    }

    /// Returns a reference to the head element without checking for
    /// emptiness. So use it very carefully!
    #[inline]
    pub unsafe fn peek_unchecked(&self) -> &T {
        self.storage.get_unchecked(0)
    }

    /// Pushes the given element onto the `BinaryHeap`.
    ///
    /// The element is appended at the bottom and sifted upward until the
    /// heap property holds again, in `O(log n)` worst case.
    pub fn push(&mut self, elem: T) {
        self.storage.push(elem);
        let idx = self.storage.len() - 1;
        sift_up(&mut self.storage, &self.cmp, idx);
    }

    /// Removes the head element from this `BinaryHeap` and returns it,
    /// or `None` if the heap is empty.
    #[inline]
    pub fn pop(&mut self) -> Option<T> {
        match self.is_empty() {
            true => None,
            _ => unsafe { Some(self.pop_unchecked()) },
        }
    }

    /// Removes the head element from this `BinaryHeap` without checking
    /// for emptiness and returns it.
    ///
    /// So use this method carefully!
    pub unsafe fn pop_unchecked(&mut self) -> T {
        match self.storage.pop() {
            None => ::unreachable::unreachable(),
            Some(last) => {
                if self.storage.is_empty() {
                    last
                } else {
                    let head = mem::replace(&mut self.storage[0], last);
                    sift_down(&mut self.storage, &self.cmp, 0);
                    head
                }
            }
        }
    }

    /// Removes all elements from this `BinaryHeap`.
    ///
    /// The comparator is retained, so the emptied heap remains usable.
    #[inline]
    pub fn clear(&mut self) {
        self.storage.clear();
    }

    /// Returns the number of stored elements that compare equal to the
    /// given element under this heap's comparator.
    ///
    /// This is a full `O(n)` scan: comparator-equal elements need not be
    /// adjacent in the internal array, so the heap order cannot speed
    /// this up. Do not use it as an index.
    pub fn count_of(&self, elem: &T) -> usize {
        self.storage
            .iter()
            .filter(|stored| (self.cmp)(stored, elem) == Ordering::Equal)
            .count()
    }

    /// Returns the elements as a slice in internal array order.
    ///
    /// The order is NOT sorted; it is only guaranteed that the first
    /// element, if any, is the head. Use `drain_min` for sorted order.
    #[inline]
    pub fn as_slice(&self) -> &[T] {
        &self.storage
    }

    /// Consumes the `BinaryHeap` and returns its elements in internal
    /// array order.
    ///
    /// Together with `from_vec` this forms the serialization seam: store
    /// the returned sequence, then rebuild with `from_vec` and a
    /// re-supplied comparator, which re-heapifies on load.
    #[inline]
    pub fn into_vec(self) -> Vec<T> {
        self.storage
    }

    /// Iterate over the elements in this `BinaryHeap` by reference in
    /// internal array order.
    #[inline]
    pub fn iter<'a>(&'a self) -> Iter<'a, T> {
        Iter {
            iter: self.storage.iter(),
        }
    }

    /// Invokes the given closure once per element, in internal array order.
    ///
    /// The shared borrow of the heap prevents the closure from mutating it
    /// for the duration of the traversal.
    #[inline]
    pub fn apply<F>(&self, mut f: F)
    where
        F: FnMut(&T),
    {
        self.storage.iter().foreach(|elem| f(elem));
    }

    /// Iterate over the elements in comparator-sorted order. Drains the heap.
    #[inline]
    pub fn drain_min(self) -> DrainMin<T, C> {
        DrainMin { heap: self }
    }
}

impl<T> BinaryHeap<T, fn(&T, &T) -> Ordering>
where
    T: Ord,
{
    /// Creates a new empty `BinaryHeap` ordered by the natural order of `T`.
    ///
    /// Equivalent to `BinaryHeap::new` with an ascending comparator.
    #[inline]
    pub fn natural() -> Self {
        BinaryHeap::new(natural_order::<T> as fn(&T, &T) -> Ordering)
    }
}

/// Two heaps are equal if draining both yields comparator-equal sequences.
///
/// This is multiset equality under the comparator: two heaps holding the
/// same elements can differ in internal array layout depending on the
/// order of insertion, so comparing the raw arrays would be wrong. The
/// comparison drains cloned buffers; neither operand is mutated.
impl<T, C> PartialEq for BinaryHeap<T, C>
where
    T: Clone,
    C: Fn(&T, &T) -> Ordering,
{
    fn eq(&self, other: &Self) -> bool {
        if self.len() != other.len() {
            return false;
        }
        let lhs = drain_ordered(self.storage.clone(), &self.cmp);
        let rhs = drain_ordered(other.storage.clone(), &other.cmp);
        lhs.iter()
            .zip(rhs.iter())
            .all(|(a, b)| (self.cmp)(a, b) == Ordering::Equal)
    }
}

impl<T, C> Extend<T> for BinaryHeap<T, C>
where
    C: Fn(&T, &T) -> Ordering,
{
    /// Pushes all elements of the iterator onto the heap.
    ///
    /// When the heap is currently empty this takes the bulk-build fast
    /// path: all elements are appended first and heapified in a single
    /// `O(n)` pass. Otherwise each element is inserted with a sifted
    /// `push`.
    fn extend<I>(&mut self, iter: I)
    where
        I: IntoIterator<Item = T>,
    {
        if self.is_empty() {
            self.storage.extend(iter);
            heapify(&mut self.storage, &self.cmp);
        } else {
            for elem in iter {
                self.push(elem);
            }
        }
    }
}

impl<T, C> fmt::Debug for BinaryHeap<T, C>
where
    T: fmt::Debug,
    C: Fn(&T, &T) -> Ordering,
{
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("BinaryHeap")
            .field("storage", &self.storage)
            .finish()
    }
}

/// Iterator over references to elements of a `BinaryHeap` in internal
/// array order.
pub struct Iter<'a, T: 'a> {
    iter: slice::Iter<'a, T>,
}

impl<'a, T> Iterator for Iter<'a, T> {
    type Item = &'a T;

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        self.iter.next()
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        self.iter.size_hint()
    }
}

/// Iterator over the elements of a consumed `BinaryHeap` in internal
/// array order.
pub struct IntoIter<T> {
    iter: vec::IntoIter<T>,
}

impl<T> Iterator for IntoIter<T> {
    type Item = T;

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        self.iter.next()
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        self.iter.size_hint()
    }
}

impl<'a, T, C> IntoIterator for &'a BinaryHeap<T, C>
where
    C: Fn(&T, &T) -> Ordering,
{
    type Item = &'a T;
    type IntoIter = Iter<'a, T>;

    #[inline]
    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<T, C> IntoIterator for BinaryHeap<T, C>
where
    C: Fn(&T, &T) -> Ordering,
{
    type Item = T;
    type IntoIter = IntoIter<T>;

    #[inline]
    fn into_iter(self) -> Self::IntoIter {
        IntoIter {
            iter: self.storage.into_iter(),
        }
    }
}

/// Iterator over elements of a `BinaryHeap` in comparator-sorted order.
/// Drains the heap.
pub struct DrainMin<T, C>
where
    C: Fn(&T, &T) -> Ordering,
{
    heap: BinaryHeap<T, C>,
}

impl<T, C> Iterator for DrainMin<T, C>
where
    C: Fn(&T, &T) -> Ordering,
{
    type Item = T;

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        self.heap.pop()
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        let len = self.heap.len();
        (len, Some(len))
    }
}


#[cfg(all(feature = "bench", test))]
mod bench {
    use super::*;
    use std::cmp::Ordering;
    use test::{black_box, Bencher};

    fn ascending(lhs: &i64, rhs: &i64) -> Ordering {
        lhs.cmp(rhs)
    }

    fn setup_sample() -> Vec<i64> {
        use rand::{sample, thread_rng};
        let n = 100_000;
        let mut rng = thread_rng();
        sample(&mut rng, 1..n, n as usize)
    }

    fn setup_sample_bigpod() -> Vec<BigPod> {
        setup_sample()
            .into_iter()
            .map(|val| val.into())
            .collect::<Vec<BigPod>>()
    }

    #[derive(Debug, Clone)]
    struct BigPod {
        elems0: [i64; 32],
        elems1: [i64; 32],
        elems2: [i64; 32],
        elems3: [i64; 32],
    }

    impl From<i64> for BigPod {
        fn from(val: i64) -> BigPod {
            let mut bp = BigPod {
                elems0: [0; 32],
                elems1: [1; 32],
                elems2: [2; 32],
                elems3: [3; 32],
            };
            bp.elems0[0] = val;
            bp
        }
    }

    fn bigpod_ascending(lhs: &BigPod, rhs: &BigPod) -> Ordering {
        lhs.elems0[0].cmp(&rhs.elems0[0])
    }

    #[bench]
    fn binary_heap_push(bencher: &mut Bencher) {
        let sample = setup_sample();
        bencher.iter(|| {
            let mut heap = BinaryHeap::new(ascending);
            for &elem in sample.iter() {
                black_box(heap.push(elem));
            }
        });
    }

    #[bench]
    fn binary_heap_push_bigpod(bencher: &mut Bencher) {
        let sample = setup_sample_bigpod();
        bencher.iter(|| {
            let mut heap = BinaryHeap::new(bigpod_ascending);
            for bigpod in sample.iter() {
                black_box(heap.push(bigpod.clone()));
            }
        });
    }

    #[bench]
    fn binary_heap_from_vec(bencher: &mut Bencher) {
        let sample = setup_sample();
        bencher.iter(|| {
            black_box(BinaryHeap::from_vec(sample.clone(), ascending));
        });
    }

    #[bench]
    fn binary_heap_pop(bencher: &mut Bencher) {
        let heap = BinaryHeap::from_vec(setup_sample(), ascending);
        bencher.iter(|| {
            let mut heap = heap.clone();
            while let Some(_) = black_box(heap.pop()) {}
        });
    }

    #[bench]
    fn binary_heap_pop_bigpod(bencher: &mut Bencher) {
        let heap = BinaryHeap::from_vec(setup_sample_bigpod(), bigpod_ascending);
        bencher.iter(|| {
            let mut heap = heap.clone();
            while let Some(_) = black_box(heap.pop()) {}
        });
    }

    #[bench]
    fn binary_heap_clone(bencher: &mut Bencher) {
        let heap = BinaryHeap::from_vec(setup_sample(), ascending);
        bencher.iter(|| {
            black_box(&heap.clone());
        });
    }
}
