//! Lock-free ring of completed DMA receive buffers.
//!
//! The DMA-complete interrupt copies each finished buffer into the ring with
//! [`complete()`](DmaRing::complete); the capture side drains it with
//! [`pop_with()`](DmaRing::pop_with). Driver errors are posted with
//! [`report_fault()`](DmaRing::report_fault) and picked up by the next capture.
//!
//! # Safety Contract
//!
//! - Only ONE context may call `complete()` (the DMA interrupt, the "producer").
//! - Only ONE context may call `pop_with()` / `discard_all()` (the "consumer").
//! - `report_fault()` and the counters may be used from either side.

use core::cell::UnsafeCell;
use core::mem::MaybeUninit;
use core::sync::atomic::{AtomicI32, AtomicU32, AtomicUsize, Ordering};

/// Driver status meaning "no fault pending".
const NO_FAULT: i32 = 0;

/// Single-producer single-consumer ring of `COUNT` buffers of `LEN` raw slots.
///
/// The usable capacity is `COUNT - 1` (one slot distinguishes full from
/// empty). When the ring is full, newly completed buffers are dropped and
/// counted as overruns.
pub struct DmaRing<const LEN: usize, const COUNT: usize> {
    slots: [UnsafeCell<[i32; LEN]>; COUNT],
    /// Write position (only modified by the producer).
    head: AtomicUsize,
    /// Read position (only modified by the consumer).
    tail: AtomicUsize,
    /// Buffers dropped because the ring was full.
    overruns: AtomicU32,
    /// Last driver status reported, `NO_FAULT` when clear.
    fault: AtomicI32,
}

// SAFETY: the SPSC contract means each slot is written only by the producer
// while it is outside [tail, head) and read only by the consumer while inside
// it; the acquire/release pairs on head and tail order those accesses.
unsafe impl<const LEN: usize, const COUNT: usize> Sync for DmaRing<LEN, COUNT> {}

impl<const LEN: usize, const COUNT: usize> DmaRing<LEN, COUNT> {
    /// Create an empty ring, suitable for a `static`.
    pub const fn new() -> Self {
        assert!(COUNT >= 2, "DMA ring needs at least 2 buffers (1 usable)");

        DmaRing {
            // SAFETY: all-zero bytes are a valid `[i32; LEN]`, and UnsafeCell is
            // a transparent wrapper.
            slots: unsafe { MaybeUninit::<[UnsafeCell<[i32; LEN]>; COUNT]>::zeroed().assume_init() },
            head: AtomicUsize::new(0),
            tail: AtomicUsize::new(0),
            overruns: AtomicU32::new(0),
            fault: AtomicI32::new(NO_FAULT),
        }
    }

    /// Slots per buffer.
    pub const fn buffer_len(&self) -> usize {
        LEN
    }

    /// Buffers the ring can hold at once.
    pub const fn capacity(&self) -> usize {
        COUNT - 1
    }

    /// Enqueue a buffer just completed by DMA (producer side).
    ///
    /// Returns `false` and counts an overrun if the ring is full.
    pub fn complete(&self, dma_buffer: &[i32; LEN]) -> bool {
        let head = self.head.load(Ordering::Relaxed);
        let next_head = (head + 1) % COUNT;

        if next_head == self.tail.load(Ordering::Acquire) {
            self.overruns.fetch_add(1, Ordering::Relaxed);
            return false;
        }

        // SAFETY: sole producer, and `next_head != tail` means the consumer is
        // not reading this slot.
        unsafe {
            *self.slots[head].get() = *dma_buffer;
        }

        self.head.store(next_head, Ordering::Release);
        true
    }

    /// Post a driver error status (any non-zero value).
    ///
    /// The next capture fails with this status. A zero status is ignored.
    pub fn report_fault(&self, status: i32) {
        if status != NO_FAULT {
            self.fault.store(status, Ordering::Release);
        }
    }

    /// Take the pending driver fault, if any, clearing it.
    pub fn take_fault(&self) -> Option<i32> {
        match self.fault.swap(NO_FAULT, Ordering::AcqRel) {
            NO_FAULT => None,
            status => Some(status),
        }
    }

    /// Take the count of dropped buffers since the last call, clearing it.
    pub fn take_overruns(&self) -> u32 {
        self.overruns.swap(0, Ordering::AcqRel)
    }

    /// Run `f` on the oldest buffer and release it (consumer side).
    ///
    /// Returns `None` if the ring is empty.
    pub fn pop_with<R>(&self, f: impl FnOnce(&[i32; LEN]) -> R) -> Option<R> {
        let tail = self.tail.load(Ordering::Relaxed);

        if tail == self.head.load(Ordering::Acquire) {
            return None;
        }

        // SAFETY: sole consumer, and `tail != head` means the producer has
        // finished writing this slot and will not touch it until tail advances.
        let result = f(unsafe { &*self.slots[tail].get() });

        self.tail.store((tail + 1) % COUNT, Ordering::Release);
        Some(result)
    }

    /// Drop every pending buffer (consumer side). Returns how many were dropped.
    pub fn discard_all(&self) -> usize {
        let head = self.head.load(Ordering::Acquire);
        let tail = self.tail.load(Ordering::Relaxed);
        self.tail.store(head, Ordering::Release);
        (head + COUNT - tail) % COUNT
    }

    pub fn is_empty(&self) -> bool {
        self.tail.load(Ordering::Acquire) == self.head.load(Ordering::Acquire)
    }

    pub fn is_full(&self) -> bool {
        let head = self.head.load(Ordering::Acquire);
        let tail = self.tail.load(Ordering::Acquire);
        (head + 1) % COUNT == tail
    }

    /// Number of buffers waiting to be read.
    pub fn len(&self) -> usize {
        let head = self.head.load(Ordering::Acquire);
        let tail = self.tail.load(Ordering::Acquire);
        (head + COUNT - tail) % COUNT
    }
}

impl<const LEN: usize, const COUNT: usize> Default for DmaRing<LEN, COUNT> {
    fn default() -> Self {
        Self::new()
    }
}
