// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Bounded stack of active try frames.
//!
//! Each active try region owns exactly one slot. The cursor never leaves
//! `[0, capacity]`: pushing onto a full stack and popping an empty one are
//! saturating no-ops reported through `None`, not errors.

/// Default number of nested try regions per thread.
pub const DEFAULT_FRAME_DEPTH: usize = 64;

/// Identifies one saved frame: its slot index and a serial number that is
/// unique for the lifetime of the stack.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FrameId {
    pub depth: usize,
    pub serial: u64,
}

#[derive(Debug, Clone, Copy, Default)]
struct FrameState {
    serial: u64,
    label: Option<&'static str>,
}

/// Fixed-capacity LIFO of saved frames.
#[derive(Debug, Clone)]
pub struct FrameStack {
    states: Box<[FrameState]>,
    cursor: usize,
    next_serial: u64,
}

impl FrameStack {
    /// Creates a stack able to hold `capacity` nested frames.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            states: vec![FrameState::default(); capacity].into_boxed_slice(),
            cursor: 0,
            next_serial: 1,
        }
    }

    /// Saves a new frame. Returns `None` (and leaves the stack untouched)
    /// when the stack is full.
    pub fn push(&mut self, label: Option<&'static str>) -> Option<FrameId> {
        if self.is_end() {
            return None;
        }
        let serial = self.next_serial;
        self.next_serial += 1;
        self.states[self.cursor] = FrameState { serial, label };
        let id = FrameId {
            depth: self.cursor,
            serial,
        };
        self.cursor += 1;
        Some(id)
    }

    /// Removes the most recent frame. Returns `None` at the base.
    pub fn pop(&mut self) -> Option<FrameId> {
        if self.is_begin() {
            return None;
        }
        self.cursor -= 1;
        let state = std::mem::take(&mut self.states[self.cursor]);
        Some(FrameId {
            depth: self.cursor,
            serial: state.serial,
        })
    }

    /// The most recent frame, if any.
    pub fn peek(&self) -> Option<FrameId> {
        let depth = self.cursor.checked_sub(1)?;
        Some(FrameId {
            depth,
            serial: self.states[depth].serial,
        })
    }

    /// Label of the most recent frame.
    pub fn peek_label(&self) -> Option<&'static str> {
        let depth = self.cursor.checked_sub(1)?;
        self.states[depth].label
    }

    /// Number of active frames (the cursor position).
    pub fn depth(&self) -> usize {
        self.cursor
    }

    pub fn capacity(&self) -> usize {
        self.states.len()
    }

    /// `true` when no frame is active.
    pub fn is_begin(&self) -> bool {
        self.cursor == 0
    }

    /// `true` when every slot is taken.
    pub fn is_end(&self) -> bool {
        self.cursor == self.states.len()
    }

    /// Drops every active frame.
    pub fn reset(&mut self) {
        while self.pop().is_some() {}
    }
}

impl Default for FrameStack {
    fn default() -> Self {
        Self::with_capacity(DEFAULT_FRAME_DEPTH)
    }
}
