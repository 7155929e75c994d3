//! Message loop driver.

use std::fmt;
use std::sync::{Arc, Mutex, PoisonError};

use tracing::{debug, info};

use crate::error::{Error, Result};

/// Outcome of pumping one message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Pumped {
    /// A message was translated and dispatched to its window.
    Dispatched,
    /// The thread received its quit message with this exit code.
    Quit(i32),
}

/// Blocking source of window messages for the current thread.
pub trait MessagePump {
    /// Waits for the next message and dispatches it.
    fn pump(&mut self) -> Result<Pumped>;

    /// Wakes the pump from another thread so it notices a stop request.
    /// `None` when the pump polls and needs no waking.
    fn waker(&self) -> Option<Waker> {
        None
    }

    /// Drops the wake-up the [`Waker`] queued, once the loop has stopped
    /// without pumping it.
    fn discard_wake(&mut self) {}
}

impl<P: MessagePump + ?Sized> MessagePump for Box<P> {
    fn pump(&mut self) -> Result<Pumped> {
        (**self).pump()
    }

    fn waker(&self) -> Option<Waker> {
        (**self).waker()
    }

    fn discard_wake(&mut self) {
        (**self).discard_wake()
    }
}

/// Cross-thread wake-up hook, called with the requested exit code.
pub type Waker = Arc<dyn Fn(i32) + Send + Sync>;

/// Thread-safe handle that asks an [`EventLoop`] to stop.
#[derive(Clone, Default)]
pub struct StopSignal {
    code: Arc<Mutex<Option<i32>>>,
    waker: Option<Waker>,
}

impl StopSignal {
    pub fn new() -> Self {
        Self::default()
    }

    fn with_waker(waker: Option<Waker>) -> Self {
        Self {
            code: Arc::default(),
            waker,
        }
    }

    /// Requests a stop with `code`. Later requests keep the first code.
    pub fn quit(&self, code: i32) {
        {
            let mut slot = self.code.lock().unwrap_or_else(PoisonError::into_inner);
            if slot.is_some() {
                return;
            }
            *slot = Some(code);
        }
        debug!(code, "stop requested");
        if let Some(waker) = &self.waker {
            waker(code);
        }
    }

    pub fn requested(&self) -> Option<i32> {
        *self.code.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl fmt::Debug for StopSignal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StopSignal")
            .field("requested", &self.requested())
            .field("has_waker", &self.waker.is_some())
            .finish()
    }
}

/// Runs a [`MessagePump`] until a quit message arrives or the
/// [`StopSignal`] fires.
pub struct EventLoop<P: MessagePump> {
    pump: P,
    stop: StopSignal,
}

impl<P: MessagePump> EventLoop<P> {
    pub fn new(pump: P) -> Self {
        let stop = StopSignal::with_waker(pump.waker());
        Self { pump, stop }
    }

    /// Handle for stopping the loop, usable from any thread or callback.
    pub fn stop_signal(&self) -> StopSignal {
        self.stop.clone()
    }

    /// Pumps messages and returns the exit code.
    pub fn run(&mut self) -> Result<i32> {
        info!("event loop started");
        loop {
            if let Some(code) = self.stop.requested() {
                if self.stop.waker.is_some() {
                    self.pump.discard_wake();
                }
                info!(code, "event loop stopped");
                return Ok(code);
            }
            match self.pump.pump() {
                Ok(Pumped::Dispatched) => {}
                Ok(Pumped::Quit(code)) => {
                    info!(code, "quit message received");
                    return Ok(self.stop.requested().unwrap_or(code));
                }
                Err(err) => return Err(pump_error(err)),
            }
        }
    }
}

fn pump_error(err: Error) -> Error {
    match err {
        Error::MessageLoopFailed => err,
        other => {
            debug!(%other, "pump failed");
            Error::MessageLoopFailed
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::VecDeque;
    use std::sync::atomic::{AtomicI32, Ordering};

    use super::*;

    struct ScriptedPump {
        script: VecDeque<Result<Pumped>>,
        pumped: usize,
        on_pump: Option<Box<dyn FnMut(usize)>>,
        wake: Option<Arc<Mutex<Option<i32>>>>,
    }

    impl ScriptedPump {
        fn new(script: impl IntoIterator<Item = Result<Pumped>>) -> Self {
            Self {
                script: script.into_iter().collect(),
                pumped: 0,
                on_pump: None,
                wake: None,
            }
        }

        /// Queues a quit message when woken, like a thread message queue.
        fn with_wake_queue(mut self) -> Self {
            self.wake = Some(Arc::default());
            self
        }

        fn queued_wake(&self) -> Option<i32> {
            let wake = self.wake.as_ref()?;
            *wake.lock().unwrap()
        }
    }

    impl MessagePump for ScriptedPump {
        fn pump(&mut self) -> Result<Pumped> {
            self.pumped += 1;
            if let Some(code) = self.wake.as_ref().and_then(|w| w.lock().unwrap().take()) {
                return Ok(Pumped::Quit(code));
            }
            if let Some(hook) = self.on_pump.as_mut() {
                hook(self.pumped);
            }
            self.script.pop_front().unwrap_or(Ok(Pumped::Dispatched))
        }

        fn waker(&self) -> Option<Waker> {
            let wake = self.wake.clone()?;
            Some(Arc::new(move |code| *wake.lock().unwrap() = Some(code)))
        }

        fn discard_wake(&mut self) {
            if let Some(wake) = &self.wake {
                wake.lock().unwrap().take();
            }
        }
    }

    #[test]
    fn returns_quit_code() {
        let mut event_loop = EventLoop::new(ScriptedPump::new([
            Ok(Pumped::Dispatched),
            Ok(Pumped::Dispatched),
            Ok(Pumped::Quit(7)),
        ]));
        assert_eq!(event_loop.run(), Ok(7));
        assert_eq!(event_loop.pump.pumped, 3);
    }

    #[test]
    fn stop_signal_ends_loop_before_next_pump() {
        let mut pump = ScriptedPump::new([]);
        let stop = StopSignal::new();
        let stop_from_pump = stop.clone();
        pump.on_pump = Some(Box::new(move |n| {
            if n == 2 {
                stop_from_pump.quit(3);
            }
        }));
        let mut event_loop = EventLoop { pump, stop };
        assert_eq!(event_loop.run(), Ok(3));
        assert_eq!(event_loop.pump.pumped, 2);
    }

    #[test]
    fn stop_from_callback_leaves_no_quit_queued() {
        let mut event_loop = EventLoop::new(ScriptedPump::new([]).with_wake_queue());
        let stop = event_loop.stop_signal();
        event_loop.pump.on_pump = Some(Box::new(move |n| {
            if n == 2 {
                stop.quit(4);
            }
        }));

        assert_eq!(event_loop.run(), Ok(4));
        assert_eq!(event_loop.pump.pumped, 2);
        assert_eq!(event_loop.pump.queued_wake(), None);
    }

    #[test]
    fn first_stop_code_wins_and_waker_runs_once() {
        let woken = Arc::new(AtomicI32::new(0));
        let seen = woken.clone();
        let waker: Waker = Arc::new(move |code| {
            seen.fetch_add(code, Ordering::SeqCst);
        });
        let stop = StopSignal::with_waker(Some(waker));
        stop.quit(5);
        stop.quit(9);
        assert_eq!(stop.requested(), Some(5));
        assert_eq!(woken.load(Ordering::SeqCst), 5);
    }

    #[test]
    fn stop_signal_crosses_threads() {
        let stop = StopSignal::new();
        let remote = stop.clone();
        std::thread::spawn(move || remote.quit(1)).join().unwrap();
        assert_eq!(stop.requested(), Some(1));
    }

    #[test]
    fn pump_errors_become_message_loop_failed() {
        let mut event_loop =
            EventLoop::new(ScriptedPump::new([Err(Error::InvalidWindowHandle)]));
        assert_eq!(event_loop.run(), Err(Error::MessageLoopFailed));
    }

    #[test]
    fn boxed_pump_delegates() {
        let pump: Box<dyn MessagePump> = Box::new(ScriptedPump::new([Ok(Pumped::Quit(0))]));
        let mut event_loop = EventLoop::new(pump);
        assert_eq!(event_loop.run(), Ok(0));
    }
}
