// Copyright 2025 the Figdraw Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use core::ops::{Deref, DerefMut};

use figdraw_imaging::Canvas2d;

/// Balances `save` with `restore`.
///
/// Every [`push`](Self::push) saves the surface state; dropping the scope
/// restores all remaining saves, including on early return through `?`.
pub(crate) struct SaveScope<'c, C: Canvas2d + ?Sized> {
    canvas: &'c mut C,
    depth: usize,
}

impl<'c, C: Canvas2d + ?Sized> SaveScope<'c, C> {
    /// A scope holding one save.
    pub(crate) fn open(canvas: &'c mut C) -> Self {
        let mut scope = Self::empty(canvas);
        scope.push();
        scope
    }

    /// A scope holding no saves yet.
    pub(crate) fn empty(canvas: &'c mut C) -> Self {
        Self { canvas, depth: 0 }
    }

    pub(crate) fn push(&mut self) {
        self.canvas.save();
        self.depth += 1;
    }

    /// Restore the most recent save of this scope.
    pub(crate) fn pop(&mut self) {
        if self.depth > 0 {
            self.canvas.restore();
            self.depth -= 1;
        }
    }
}

impl<C: Canvas2d + ?Sized> Deref for SaveScope<'_, C> {
    type Target = C;

    fn deref(&self) -> &C {
        self.canvas
    }
}

impl<C: Canvas2d + ?Sized> DerefMut for SaveScope<'_, C> {
    fn deref_mut(&mut self) -> &mut C {
        self.canvas
    }
}

impl<C: Canvas2d + ?Sized> Drop for SaveScope<'_, C> {
    fn drop(&mut self) {
        for _ in 0..self.depth {
            self.canvas.restore();
        }
    }
}
