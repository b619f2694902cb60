// Copyright 2025 the Figdraw Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Browser timers as a [`TaskQueue`].

use core::cell::RefCell;
use core::fmt;
use std::rc::Rc;

use figdraw_canvas::{Task, TaskHandle, TaskQueue};
use hashbrown::HashMap;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;
use web_sys::Window;

/// Delivers a task back to its canvas.
pub type Dispatch = Rc<dyn Fn(Task)>;

struct Scheduled {
    id: i32,
    interval: Option<Closure<dyn FnMut()>>,
}

/// A [`TaskQueue`] over `setTimeout` and `setInterval`.
///
/// Each task is passed to the [`Dispatch`] callback when its timer fires.
pub struct WebTaskQueue {
    window: Window,
    dispatch: Dispatch,
    next_handle: u64,
    active: Rc<RefCell<HashMap<TaskHandle, Scheduled>>>,
}

impl fmt::Debug for WebTaskQueue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WebTaskQueue")
            .field("next_handle", &self.next_handle)
            .field("active", &self.active.borrow().len())
            .finish_non_exhaustive()
    }
}

#[allow(
    clippy::cast_possible_truncation,
    reason = "delays are clamped to i32::MAX first"
)]
fn js_delay(ms: u32) -> i32 {
    ms.min(i32::MAX as u32) as i32
}

impl WebTaskQueue {
    /// Schedule on `window`, delivering tasks to `dispatch`.
    pub fn new(window: Window, dispatch: Dispatch) -> Self {
        Self {
            window,
            dispatch,
            next_handle: 0,
            active: Rc::new(RefCell::new(HashMap::new())),
        }
    }

    fn handle(&mut self) -> TaskHandle {
        let handle = TaskHandle(self.next_handle);
        self.next_handle += 1;
        handle
    }
}

impl TaskQueue for WebTaskQueue {
    fn set_timeout(&mut self, task: Task, delay_ms: u32) -> TaskHandle {
        let handle = self.handle();
        let dispatch = self.dispatch.clone();
        let active = Rc::downgrade(&self.active);
        let callback = Closure::once_into_js(move || {
            if let Some(active) = active.upgrade() {
                active.borrow_mut().remove(&handle);
            }
            dispatch(task);
        });
        match self
            .window
            .set_timeout_with_callback_and_timeout_and_arguments_0(
                callback.unchecked_ref(),
                js_delay(delay_ms),
            ) {
            Ok(id) => {
                self.active
                    .borrow_mut()
                    .insert(handle, Scheduled { id, interval: None });
            }
            Err(err) => log::warn!("setTimeout failed for {task:?}: {err:?}"),
        }
        handle
    }

    fn set_interval(&mut self, task: Task, interval_ms: u32) -> TaskHandle {
        let handle = self.handle();
        let dispatch = self.dispatch.clone();
        let callback = Closure::<dyn FnMut()>::new(move || dispatch(task));
        match self
            .window
            .set_interval_with_callback_and_timeout_and_arguments_0(
                callback.as_ref().unchecked_ref(),
                js_delay(interval_ms.max(1)),
            ) {
            Ok(id) => {
                self.active.borrow_mut().insert(
                    handle,
                    Scheduled {
                        id,
                        interval: Some(callback),
                    },
                );
            }
            Err(err) => log::warn!("setInterval failed for {task:?}: {err:?}"),
        }
        handle
    }

    fn clear(&mut self, handle: TaskHandle) {
        let Some(scheduled) = self.active.borrow_mut().remove(&handle) else {
            return;
        };
        match scheduled.interval {
            None => self.window.clear_timeout_with_handle(scheduled.id),
            Some(callback) => {
                self.window.clear_interval_with_handle(scheduled.id);
                // The interval may be clearing itself from inside its own
                // tick; release the callback on a later turn.
                let release = Closure::once_into_js(move || drop(callback));
                let _ = self
                    .window
                    .set_timeout_with_callback_and_timeout_and_arguments_0(
                        release.unchecked_ref(),
                        0,
                    );
            }
        }
    }
}

impl Drop for WebTaskQueue {
    fn drop(&mut self) {
        for (_, scheduled) in self.active.borrow_mut().drain() {
            match scheduled.interval {
                None => self.window.clear_timeout_with_handle(scheduled.id),
                Some(callback) => {
                    self.window.clear_interval_with_handle(scheduled.id);
                    callback.forget();
                }
            }
        }
    }
}
