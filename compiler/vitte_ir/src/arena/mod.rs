//! Bump arena with checkpoint/rewind.
//!
//! The arena hands out [`ArenaSlice`] handles (block index, offset, length)
//! instead of raw pointers. Bytes are reached through [`Arena::get`] and
//! [`Arena::get_mut`]. Alignment is applied to offsets relative to the start
//! of the block.
//!
//! # Stale handles
//!
//! The arena keeps an epoch that advances on every release (rewind, reset,
//! dispose). Handles and marks record the epoch they were taken in, blocks
//! record the epoch they were created in, and each block logs the epochs at
//! which it was truncated. A handle is live only if its block is not newer
//! than the handle and no later truncation cut below its end, so memory that
//! was released and handed out again is never readable through an old handle.
//!
//! # Growth
//!
//! Allocation bumps within the head block. When the request does not fit, a
//! new head block of `max(default_block_size, size + align)` bytes is added,
//! so one oversized request never shrinks the size of later blocks.
//!
//! # Exhaustion
//!
//! Every allocating call returns `Result`. Exhaustion (a failed reservation or
//! the configured `max_bytes` ceiling) is reported as
//! [`ArenaError::OutOfMemory`] and leaves the arena unchanged.

use std::mem;

/// Default size of a fresh block.
pub const DEFAULT_BLOCK_SIZE: usize = 64 * 1024;

/// Arena allocation failure.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ArenaError {
    /// A new block could not be reserved.
    #[error("arena out of memory: requested {requested} bytes with {reserved} bytes already reserved")]
    OutOfMemory { requested: usize, reserved: usize },
    /// `size + align` does not fit in `usize`.
    #[error("arena request of {size} bytes aligned to {align} overflows")]
    SizeOverflow { size: usize, align: usize },
    /// The mark refers to memory the arena no longer holds.
    #[error("stale arena mark (block {block}, used {used})")]
    StaleMark { block: usize, used: usize },
}

/// Arena tuning knobs.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct ArenaConfig {
    /// Minimum capacity of every new block.
    pub default_block_size: usize,
    /// Hard ceiling on reserved bytes across all blocks. `None` means no limit.
    pub max_bytes: Option<usize>,
}

impl Default for ArenaConfig {
    fn default() -> Self {
        ArenaConfig {
            default_block_size: DEFAULT_BLOCK_SIZE,
            max_bytes: None,
        }
    }
}

impl ArenaConfig {
    /// Default config with a different block size.
    #[must_use]
    pub fn with_block_size(default_block_size: usize) -> Self {
        ArenaConfig {
            default_block_size,
            ..ArenaConfig::default()
        }
    }

    /// Set the hard ceiling on reserved bytes.
    #[must_use]
    pub fn max_bytes(mut self, limit: usize) -> Self {
        self.max_bytes = Some(limit);
        self
    }
}

/// Handle to a run of bytes inside an [`Arena`].
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct ArenaSlice {
    block: usize,
    offset: usize,
    len: usize,
    epoch: u64,
}

impl ArenaSlice {
    /// Index of the owning block.
    #[inline]
    pub const fn block(&self) -> usize {
        self.block
    }

    /// Byte offset from the start of the block.
    #[inline]
    pub const fn offset(&self) -> usize {
        self.offset
    }

    /// Length in bytes.
    #[inline]
    pub const fn len(&self) -> usize {
        self.len
    }

    #[inline]
    pub const fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Offset one past the last byte.
    #[inline]
    pub const fn end(&self) -> usize {
        self.offset + self.len
    }
}

/// Checkpoint of the arena cursor.
///
/// `Mark::EMPTY` (the mark of an arena with no blocks) rewinds to nothing.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Mark {
    block: Option<usize>,
    used: usize,
    epoch: u64,
}

impl Mark {
    /// Mark that releases the whole arena when rewound to.
    pub const EMPTY: Mark = Mark {
        block: None,
        used: 0,
        epoch: 0,
    };

    #[inline]
    pub const fn is_empty(&self) -> bool {
        self.block.is_none()
    }
}

/// Truncation of a block to `used` in `epoch`.
#[derive(Copy, Clone, Debug)]
struct Cut {
    epoch: u64,
    used: usize,
}

struct Block {
    data: Box<[u8]>,
    used: usize,
    born: u64,
    /// Increasing in both `epoch` and `used`. A later cut at or below an
    /// earlier one supersedes it.
    cuts: Vec<Cut>,
}

impl Block {
    fn try_new(capacity: usize, born: u64) -> Option<Block> {
        let mut data = Vec::new();
        data.try_reserve_exact(capacity).ok()?;
        data.resize(capacity, 0);
        Some(Block {
            data: data.into_boxed_slice(),
            used: 0,
            born,
            cuts: Vec::new(),
        })
    }

    #[inline]
    fn capacity(&self) -> usize {
        self.data.len()
    }

    fn truncate(&mut self, used: usize, epoch: u64) {
        while self.cuts.last().is_some_and(|cut| cut.used >= used) {
            self.cuts.pop();
        }
        self.cuts.push(Cut { epoch, used });
        self.used = used;
    }

    /// Whether bytes up to `end`, handed out in `epoch`, are still live.
    fn holds(&self, end: usize, epoch: u64) -> bool {
        if epoch < self.born || end > self.used {
            return false;
        }
        let later = self.cuts.partition_point(|cut| cut.epoch <= epoch);
        !matches!(self.cuts.get(later), Some(cut) if end > cut.used)
    }
}

/// Bump allocator owning every byte it hands out.
pub struct Arena {
    blocks: Vec<Block>,
    config: ArenaConfig,
    reserved: usize,
    epoch: u64,
}

impl Default for Arena {
    fn default() -> Self {
        Self::new()
    }
}

impl Arena {
    /// Create an empty arena with the default configuration.
    pub fn new() -> Self {
        Self::with_config(ArenaConfig::default())
    }

    /// Create an empty arena. No memory is reserved until the first allocation.
    pub fn with_config(config: ArenaConfig) -> Self {
        Arena {
            blocks: Vec::new(),
            config,
            reserved: 0,
            epoch: 0,
        }
    }

    pub fn config(&self) -> ArenaConfig {
        self.config
    }

    /// Number of live blocks.
    pub fn block_count(&self) -> usize {
        self.blocks.len()
    }

    /// Bytes reserved across all blocks.
    pub fn reserved_bytes(&self) -> usize {
        self.reserved
    }

    /// Bytes handed out (including alignment padding) across all blocks.
    pub fn allocated_bytes(&self) -> usize {
        self.blocks.iter().map(|b| b.used).sum()
    }

    /// Allocate `size` bytes aligned to `align`.
    ///
    /// `align` must be a power of two; anything else is coerced to pointer
    /// alignment. Returned bytes are not cleared: after a rewind they may hold
    /// earlier contents. Use [`Arena::allocate_zeroed`] when that matters.
    pub fn allocate(&mut self, size: usize, align: usize) -> Result<ArenaSlice, ArenaError> {
        let align = if align.is_power_of_two() {
            align
        } else {
            mem::size_of::<usize>()
        };

        let head = self.blocks.len().checked_sub(1);
        if let Some(index) = head {
            let block = &mut self.blocks[index];
            if let Some(offset) = align_up(block.used, align) {
                if offset
                    .checked_add(size)
                    .is_some_and(|end| end <= block.capacity())
                {
                    block.used = offset + size;
                    return Ok(ArenaSlice {
                        block: index,
                        offset,
                        len: size,
                        epoch: self.epoch,
                    });
                }
            }
        }

        let capacity = size
            .checked_add(align)
            .ok_or(ArenaError::SizeOverflow { size, align })?
            .max(self.config.default_block_size);
        self.grow(capacity)?;

        let index = self.blocks.len() - 1;
        self.blocks[index].used = size;
        Ok(ArenaSlice {
            block: index,
            offset: 0,
            len: size,
            epoch: self.epoch,
        })
    }

    /// Allocate `size` bytes aligned to `align`, all set to zero.
    pub fn allocate_zeroed(&mut self, size: usize, align: usize) -> Result<ArenaSlice, ArenaError> {
        let slice = self.allocate(size, align)?;
        if let Some(bytes) = self.get_mut(slice) {
            bytes.fill(0);
        }
        Ok(slice)
    }

    /// Copy `bytes` into the arena.
    pub fn alloc_bytes(&mut self, bytes: &[u8]) -> Result<ArenaSlice, ArenaError> {
        let slice = self.allocate(bytes.len(), 1)?;
        if let Some(dst) = self.get_mut(slice) {
            dst.copy_from_slice(bytes);
        }
        Ok(slice)
    }

    /// Read the bytes behind a handle, or `None` if the memory it referred to
    /// has been released, even if that memory was handed out again since.
    pub fn get(&self, slice: ArenaSlice) -> Option<&[u8]> {
        let block = self.blocks.get(slice.block)?;
        if !block.holds(slice.end(), slice.epoch) {
            return None;
        }
        block.data.get(slice.offset..slice.end())
    }

    /// Mutable access to the bytes behind a handle.
    pub fn get_mut(&mut self, slice: ArenaSlice) -> Option<&mut [u8]> {
        let block = self.blocks.get_mut(slice.block)?;
        if !block.holds(slice.end(), slice.epoch) {
            return None;
        }
        block.data.get_mut(slice.offset..slice.end())
    }

    /// Capture the current cursor.
    pub fn mark(&self) -> Mark {
        match self.blocks.last() {
            Some(block) => Mark {
                block: Some(self.blocks.len() - 1),
                used: block.used,
                epoch: self.epoch,
            },
            None => Mark::EMPTY,
        }
    }

    /// Release everything allocated after `mark` was taken.
    ///
    /// Blocks added after the mark's block are dropped and the mark's block is
    /// truncated to its captured cursor. Rewinding to [`Mark::EMPTY`] releases
    /// the whole arena. A mark whose position was released since it was
    /// taken is rejected, even if the arena has grown past it again.
    pub fn rewind(&mut self, mark: Mark) -> Result<(), ArenaError> {
        let Some(index) = mark.block else {
            self.dispose();
            return Ok(());
        };

        let stale = ArenaError::StaleMark {
            block: index,
            used: mark.used,
        };
        let Some(block) = self.blocks.get(index) else {
            return Err(stale);
        };
        if !block.holds(mark.used, mark.epoch) {
            return Err(stale);
        }
        if index + 1 == self.blocks.len() && mark.used == block.used {
            return Ok(());
        }

        self.epoch += 1;
        for released in self.blocks.drain(index + 1..) {
            self.reserved -= released.capacity();
        }
        let epoch = self.epoch;
        if let Some(block) = self.blocks.get_mut(index) {
            block.truncate(mark.used, epoch);
        }
        tracing::trace!(block = index, used = mark.used, epoch, "arena rewind");
        Ok(())
    }

    /// Keep the first block (emptied) and drop the rest.
    pub fn reset(&mut self) {
        self.epoch += 1;
        if self.blocks.len() > 1 {
            for released in self.blocks.drain(1..) {
                self.reserved -= released.capacity();
            }
        }
        let epoch = self.epoch;
        if let Some(first) = self.blocks.first_mut() {
            first.truncate(0, epoch);
        }
    }

    /// Release every block.
    pub fn dispose(&mut self) {
        self.epoch += 1;
        self.blocks.clear();
        self.reserved = 0;
    }

    fn grow(&mut self, capacity: usize) -> Result<(), ArenaError> {
        let out_of_memory = ArenaError::OutOfMemory {
            requested: capacity,
            reserved: self.reserved,
        };
        let total = self
            .reserved
            .checked_add(capacity)
            .ok_or_else(|| out_of_memory.clone())?;
        if self.config.max_bytes.is_some_and(|limit| total > limit) {
            return Err(out_of_memory);
        }
        if self.blocks.try_reserve(1).is_err() {
            return Err(out_of_memory);
        }
        let block = Block::try_new(capacity, self.epoch).ok_or(out_of_memory)?;

        tracing::trace!(
            block = self.blocks.len(),
            capacity,
            reserved = total,
            "arena grow"
        );
        self.blocks.push(block);
        self.reserved = total;
        Ok(())
    }
}

/// Round `offset` up to a multiple of `align` (a power of two).
#[inline]
fn align_up(offset: usize, align: usize) -> Option<usize> {
    let mask = align - 1;
    offset.checked_add(mask).map(|v| v & !mask)
}

#[cfg(test)]
#[expect(clippy::unwrap_used, reason = "Tests use unwrap for brevity")]
mod tests;
