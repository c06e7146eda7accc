// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Try/throw/catch over `Result`.
//!
//! An [`ErrorScope`] pairs the error slot with the frame stack. A try region
//! pushes one frame, runs the guarded code and pops the frame on *every*
//! exit, so push/pop stays balanced by construction. Throwing records the
//! error in the slot and hands it back to the caller, who propagates it
//! with `?` to the nearest enclosing try region:
//!
//! ```text
//! try_scope ──push──► guarded code ──Ok──► finalize (pop) ──► Ok(value)
//!                          │
//!                          └─throw─► record error ──► pop ──► Err(error)
//! ```
//!
//! A throw with no active frame is "uncaught": the error is still recorded
//! and returned to the immediate caller, and a warning is logged.
//!
//! Every thread owns one scope, reachable through [`with_current`] and the
//! free functions of this module. It is created lazily on first use and
//! dropped with the thread.

use crate::frame::{FrameId, FrameStack, DEFAULT_FRAME_DEPTH};
use crate::{ErrorCode, ErrorValue, Result, RuntimeError};
use std::cell::RefCell;

/// Error slot plus frame stack: the complete unwind context of one thread.
#[derive(Debug, Clone, Default)]
pub struct ErrorScope {
    error: ErrorValue,
    frames: FrameStack,
}

impl ErrorScope {
    /// Creates a scope whose frame stack holds `depth` nested try regions.
    pub fn new(depth: usize) -> Self {
        Self {
            error: ErrorValue::new(),
            frames: FrameStack::with_capacity(depth),
        }
    }

    pub fn error(&self) -> &ErrorValue {
        &self.error
    }

    pub fn error_mut(&mut self) -> &mut ErrorValue {
        &mut self.error
    }

    pub fn frames(&self) -> &FrameStack {
        &self.frames
    }

    /// `true` while at least one try region is active.
    pub fn is_catching(&self) -> bool {
        !self.frames.is_begin()
    }

    /// Runs `body` inside a new try region.
    ///
    /// On failure the error is recorded in the slot before it is returned.
    pub fn try_scope<T>(&mut self, body: impl FnOnce(&mut Self) -> Result<T>) -> Result<T> {
        self.try_scope_labeled(None, body)
    }

    /// [`try_scope`](Self::try_scope) with a label kept on the frame for
    /// diagnostics.
    pub fn try_scope_labeled<T>(
        &mut self,
        label: Option<&'static str>,
        body: impl FnOnce(&mut Self) -> Result<T>,
    ) -> Result<T> {
        let frame = self.enter(label);
        let result = body(self);
        if let Err(error) = &result {
            self.error.set_error(error);
            tracing::trace!(code = %error.code(), "try region resumed with error");
        }
        self.finalize(frame);
        result
    }

    /// Opens a try region manually. Pair with [`finalize`](Self::finalize)
    /// or [`try_return`](Self::try_return) on every exit path.
    ///
    /// Returns `None` when the frame stack is full; finalizing `None` is a
    /// no-op, so a saturated stack never pops an outer frame.
    pub fn enter(&mut self, label: Option<&'static str>) -> Option<FrameId> {
        let frame = self.frames.push(label);
        if frame.is_none() {
            tracing::warn!(
                capacity = self.frames.capacity(),
                "frame stack full; try region is not tracked"
            );
        }
        frame
    }

    /// Closes the try region opened by `frame`.
    ///
    /// Regions must close in LIFO order. Closing an outer frame while inner
    /// ones are still open also discards the inner frames.
    pub fn finalize(&mut self, frame: Option<FrameId>) {
        let Some(frame) = frame else {
            return;
        };
        match self.frames.peek() {
            Some(top) if top == frame => {
                self.frames.pop();
            }
            Some(top) if top.depth > frame.depth => {
                tracing::warn!(
                    expected = frame.depth,
                    found = top.depth,
                    "try regions finalized out of order"
                );
                while let Some(popped) = self.frames.pop() {
                    if popped == frame {
                        break;
                    }
                }
            }
            _ => {
                tracing::warn!(depth = frame.depth, "finalize of an inactive frame ignored");
            }
        }
    }

    /// Finalizes `frame` and returns `value`: the early exit of a manual
    /// try region.
    pub fn try_return<T>(&mut self, frame: Option<FrameId>, value: T) -> T {
        self.finalize(frame);
        value
    }

    /// Records a new error and returns it for propagation.
    pub fn throw(&mut self, code: ErrorCode, description: Option<&'static str>) -> RuntimeError {
        let error = match description {
            Some(desc) => RuntimeError::with_description(code, desc),
            None => RuntimeError::new(code),
        };
        self.raise(error)
    }

    /// Records an existing error and returns it for propagation.
    pub fn raise(&mut self, error: RuntimeError) -> RuntimeError {
        self.error.set_error(&error);
        if !self.is_catching() {
            tracing::warn!(code = %error.code(), "uncaught runtime error: {error}");
        }
        error
    }

    /// Re-signals an error from inside a handler.
    pub fn rethrow(&mut self, error: RuntimeError) -> RuntimeError {
        self.raise(error)
    }

    /// Converts a result into a sentinel at an API boundary, recording the
    /// error on failure.
    pub fn catch<T>(&mut self, result: Result<T>) -> Option<T> {
        match result {
            Ok(value) => Some(value),
            Err(error) => {
                self.error.set_error(&error);
                None
            }
        }
    }
}

thread_local! {
    static CURRENT: RefCell<ErrorScope> = RefCell::new(ErrorScope::new(DEFAULT_FRAME_DEPTH));
}

/// Runs `f` with the calling thread's scope.
///
/// # Panics
/// Panics if called re-entrantly from inside `f`. Use [`try_current`] to run
/// code that itself touches the thread scope inside a try region.
pub fn with_current<R>(f: impl FnOnce(&mut ErrorScope) -> R) -> R {
    CURRENT.with(|scope| f(&mut scope.borrow_mut()))
}

/// Runs `body` in a try region of the calling thread's scope.
///
/// Unlike [`ErrorScope::try_scope`] the scope is not borrowed while `body`
/// runs, so `body` may throw through the free functions of this module.
pub fn try_current<T>(body: impl FnOnce() -> Result<T>) -> Result<T> {
    let frame = with_current(|scope| scope.enter(None));
    let result = body();
    with_current(|scope| {
        if let Err(error) = &result {
            scope.error_mut().set_error(error);
        }
        scope.finalize(frame);
    });
    result
}

/// Records a new error in the calling thread's slot and returns it.
pub fn throw(code: ErrorCode, description: Option<&'static str>) -> RuntimeError {
    with_current(|scope| scope.throw(code, description))
}

/// Records `error` in the calling thread's slot and returns it.
pub fn raise(error: RuntimeError) -> RuntimeError {
    with_current(|scope| scope.raise(error))
}

/// Records `error` in the calling thread's slot without logging.
pub fn record(error: &RuntimeError) {
    with_current(|scope| scope.error_mut().set_error(error));
}

/// Converts a result into an `Option`, recording the error on failure.
pub fn catch<T>(result: Result<T>) -> Option<T> {
    with_current(|scope| scope.catch(result))
}

/// Snapshot of the calling thread's error slot.
pub fn current_error() -> ErrorValue {
    with_current(|scope| *scope.error())
}

/// Returns the calling thread's error code and clears the slot.
pub fn get_code_and_clear() -> ErrorCode {
    with_current(|scope| scope.error_mut().get_code_and_clear())
}

pub fn clear_error() {
    with_current(|scope| scope.error_mut().clear());
}

/// Number of active try regions on the calling thread.
pub fn current_depth() -> usize {
    with_current(|scope| scope.frames().depth())
}

/// Replaces the calling thread's scope with a fresh one of `depth` frames,
/// returning the previous scope.
pub fn reset_current(depth: usize) -> ErrorScope {
    with_current(|scope| std::mem::replace(scope, ErrorScope::new(depth)))
}

/// Reinstalls a scope previously returned by [`reset_current`].
pub fn restore_current(previous: ErrorScope) {
    with_current(|scope| *scope = previous);
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fails(scope: &mut ErrorScope) -> Result<u32> {
        Err(scope.throw(ErrorCode::OutOfRange, Some("index 7")))
    }

    #[test]
    fn test_try_success_balances_frames() {
        let mut scope = ErrorScope::new(8);
        let v = scope.try_scope(|s| {
            assert_eq!(s.frames().depth(), 1);
            Ok(5)
        });
        assert_eq!(v, Ok(5));
        assert_eq!(scope.frames().depth(), 0);
        assert!(scope.error().is_none());
    }

    #[test]
    fn test_throw_resumes_enclosing_try_once() {
        let mut scope = ErrorScope::new(8);
        let mut resumed = 0;
        let result = scope.try_scope(|s| {
            let r = fails(s)?;
            Ok(r + 1)
        });
        if result.is_err() {
            resumed += 1;
        }
        assert_eq!(resumed, 1);
        assert_eq!(scope.frames().depth(), 0);
        assert_eq!(scope.error_mut().get_code_and_clear(), ErrorCode::OutOfRange);
    }

    #[test]
    fn test_nested_try_rethrow() {
        let mut scope = ErrorScope::new(8);
        let outer = scope.try_scope(|s| {
            let inner = s.try_scope(|s| fails(s));
            assert_eq!(s.frames().depth(), 1);
            match inner {
                Ok(v) => Ok(v),
                Err(e) => Err(s.rethrow(e)),
            }
        });
        assert_eq!(outer.unwrap_err().code(), ErrorCode::OutOfRange);
        assert!(scope.frames().is_begin());
    }

    #[test]
    fn test_uncaught_throw_records_and_returns() {
        let mut scope = ErrorScope::new(8);
        assert!(!scope.is_catching());
        let result = fails(&mut scope);
        let sentinel = scope.catch(result);
        assert_eq!(sentinel, None);
        assert_eq!(scope.error().code(), ErrorCode::OutOfRange);
        assert_eq!(scope.error().description(), Some("index 7"));
    }

    #[test]
    fn test_manual_enter_try_return() {
        let mut scope = ErrorScope::new(4);
        let frame = scope.enter(Some("manual"));
        assert_eq!(scope.frames().peek_label(), Some("manual"));
        let v = scope.try_return(frame, 42);
        assert_eq!(v, 42);
        assert!(scope.frames().is_begin());
    }

    #[test]
    fn test_saturated_stack_does_not_pop_outer_frame() {
        let mut scope = ErrorScope::new(1);
        let outer = scope.enter(None);
        let r = scope.try_scope(|s| {
            assert_eq!(s.frames().depth(), 1);
            Ok(())
        });
        assert!(r.is_ok());
        assert_eq!(scope.frames().depth(), 1);
        scope.finalize(outer);
        assert!(scope.frames().is_begin());
    }

    #[test]
    fn test_out_of_order_finalize_discards_inner() {
        let mut scope = ErrorScope::new(4);
        let outer = scope.enter(None);
        let _inner = scope.enter(None);
        scope.finalize(outer);
        assert!(scope.frames().is_begin());
    }

    #[test]
    fn test_thread_local_try_current() {
        clear_error();
        let before = current_depth();
        let r: Result<()> = try_current(|| {
            assert_eq!(current_depth(), before + 1);
            Err(throw(ErrorCode::NullPointer, None))
        });
        assert!(r.is_err());
        assert_eq!(current_depth(), before);
        assert_eq!(get_code_and_clear(), ErrorCode::NullPointer);
        assert!(current_error().is_none());
    }

    #[test]
    fn test_thread_local_is_per_thread() {
        record(&RuntimeError::new(ErrorCode::DivisionByZero));
        let other = std::thread::spawn(current_error).join().unwrap();
        assert!(other.is_none());
        assert_eq!(get_code_and_clear(), ErrorCode::DivisionByZero);
    }

    #[test]
    fn test_reset_and_restore_current() {
        record(&RuntimeError::new(ErrorCode::OutOfRange));
        let previous = reset_current(3);
        assert!(current_error().is_none());
        assert_eq!(with_current(|s| s.frames().capacity()), 3);
        restore_current(previous);
        assert_eq!(get_code_and_clear(), ErrorCode::OutOfRange);
    }
}
