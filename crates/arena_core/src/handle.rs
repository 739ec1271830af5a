//! Generational handles for roster entries
//!
//! A handle packs a 24-bit slot index with an 8-bit generation so a handle to
//! a removed enemy never aliases the enemy that later reuses its slot.

use crate::error::{CoreError, Result};
use std::fmt;
use std::hash::{Hash, Hasher};
use std::marker::PhantomData;

/// A type-safe handle to a value of type T
pub struct Handle<T> {
    /// Lower 24 bits: index, Upper 8 bits: generation
    bits: u32,
    _marker: PhantomData<fn() -> T>,
}

/// Marker for enemy handles
#[derive(Debug)]
pub enum EnemyTag {}

/// Stable identifier of an enemy in the roster
pub type EnemyId = Handle<EnemyTag>;

impl<T> Handle<T> {
    /// Maximum index value (24 bits)
    pub const MAX_INDEX: u32 = (1 << 24) - 1;

    /// Create a handle from index and generation
    #[inline]
    pub const fn new(index: u32, generation: u8) -> Self {
        Self {
            bits: (generation as u32) << 24 | (index & Self::MAX_INDEX),
            _marker: PhantomData,
        }
    }

    /// Slot index
    #[inline]
    pub const fn index(&self) -> u32 {
        self.bits & Self::MAX_INDEX
    }

    /// Generation of the slot when this handle was issued
    #[inline]
    pub const fn generation(&self) -> u8 {
        (self.bits >> 24) as u8
    }

    /// Raw bits, e.g. for physics user data
    #[inline]
    pub const fn to_bits(&self) -> u32 {
        self.bits
    }

    #[inline]
    pub const fn from_bits(bits: u32) -> Self {
        Self {
            bits,
            _marker: PhantomData,
        }
    }
}

// Manual trait implementations to avoid T bounds
impl<T> Clone for Handle<T> {
    #[inline]
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for Handle<T> {}

impl<T> PartialEq for Handle<T> {
    #[inline]
    fn eq(&self, other: &Self) -> bool {
        self.bits == other.bits
    }
}

impl<T> Eq for Handle<T> {}

impl<T> Hash for Handle<T> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.bits.hash(state);
    }
}

impl<T> fmt::Debug for Handle<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}v{}", self.index(), self.generation())
    }
}

impl<T> fmt::Display for Handle<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}v{}", self.index(), self.generation())
    }
}

/// Allocates handles with generation tracking and slot reuse
pub struct HandleAllocator<T> {
    generations: Vec<u8>,
    free_list: Vec<u32>,
    _marker: PhantomData<fn() -> T>,
}

impl<T> HandleAllocator<T> {
    pub fn new() -> Self {
        Self::with_capacity(64)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            generations: Vec::with_capacity(capacity),
            free_list: Vec::new(),
            _marker: PhantomData,
        }
    }

    /// Allocate a handle, reusing a freed slot when one is available
    pub fn allocate(&mut self) -> Result<Handle<T>> {
        if let Some(index) = self.free_list.pop() {
            let gen = self.generations[index as usize];
            return Ok(Handle::new(index, gen));
        }

        let index = self.generations.len() as u32;
        if index > Handle::<T>::MAX_INDEX {
            return Err(CoreError::HandlesExhausted);
        }
        self.generations.push(0);
        Ok(Handle::new(index, 0))
    }

    /// Free a handle. Returns false for stale or unknown handles.
    pub fn free(&mut self, handle: Handle<T>) -> bool {
        let index = handle.index() as usize;
        let Some(gen) = self.generations.get_mut(index) else {
            return false;
        };
        if *gen != handle.generation() {
            return false;
        }

        *gen = gen.wrapping_add(1);
        self.free_list.push(handle.index());
        true
    }

    pub fn is_valid(&self, handle: Handle<T>) -> bool {
        self.generations
            .get(handle.index() as usize)
            .is_some_and(|gen| *gen == handle.generation())
            && !self.free_list.contains(&handle.index())
    }

    /// Number of live handles
    pub fn len(&self) -> usize {
        self.generations.len() - self.free_list.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Forget every handle. Generations survive so old handles stay stale.
    pub fn clear(&mut self) {
        self.free_list.clear();
        for (index, gen) in self.generations.iter_mut().enumerate() {
            *gen = gen.wrapping_add(1);
            self.free_list.push(index as u32);
        }
    }
}

impl<T> Default for HandleAllocator<T> {
    fn default() -> Self {
        Self::new()
    }
}
