use super::command::Command;
use super::timer::TimerEntry;

#[cfg(unix)]
use crate::sync::signal::{SignalShared, take_pending};

use std::collections::BinaryHeap;
#[cfg(unix)]
use std::sync::Arc;
use std::sync::atomic::Ordering;
use std::sync::mpsc::{Receiver, RecvTimeoutError, Sender, SendError, channel};
use std::thread;
use std::time::{Duration, Instant};

/// How often the reactor looks at the pending-signal mask while at
/// least one signal watch is registered.
const SIGNAL_TICK: Duration = Duration::from_millis(10);

/// Longest the reactor sleeps with nothing scheduled. A new command
/// interrupts the sleep immediately; this only bounds idle wake-ups.
const IDLE_WAIT: Duration = Duration::from_secs(60);

/// Cloneable handle used to send commands to the reactor thread.
#[derive(Clone)]
pub(crate) struct ReactorHandle {
    sender: Sender<Command>,
}

impl ReactorHandle {
    /// Sends a command to the reactor.
    ///
    /// Fails only if the reactor thread has already exited.
    pub(crate) fn send(&self, command: Command) -> Result<(), SendError<Command>> {
        self.sender.send(command)
    }
}

/// The reactor thread.
///
/// The reactor owns everything time- and signal-related: a min-heap of
/// timer entries and the list of one-shot signal watches. It sleeps on
/// its command channel until the next deadline, fires due timers, and
/// delivers pending process signals to their watchers.
pub(crate) struct Reactor {
    /// Command channel from the rest of the runtime.
    receiver: Receiver<Command>,

    /// Registered timers, earliest deadline first.
    timers: BinaryHeap<TimerEntry>,

    /// One-shot signal watches awaiting delivery.
    #[cfg(unix)]
    signals: Vec<SignalWatch>,
}

#[cfg(unix)]
struct SignalWatch {
    mask: u64,
    shared: Arc<SignalShared>,
}

impl Reactor {
    /// Starts the reactor thread, returning a handle to it along with
    /// the thread's join handle.
    pub(crate) fn start() -> (ReactorHandle, thread::JoinHandle<()>) {
        let (sender, receiver) = channel();

        let mut reactor = Reactor {
            receiver,
            timers: BinaryHeap::new(),
            #[cfg(unix)]
            signals: Vec::new(),
        };

        let thread = thread::Builder::new()
            .name("recess-reactor".to_string())
            .spawn(move || reactor.run())
            .expect("failed to start the reactor thread");

        (ReactorHandle { sender }, thread)
    }

    /// Runs the reactor event loop until shutdown.
    fn run(&mut self) {
        log::trace!("reactor running");

        loop {
            self.fire_due_timers();

            #[cfg(unix)]
            self.deliver_signals();

            match self.receiver.recv_timeout(self.next_wait()) {
                Ok(Command::Shutdown) => break,
                Ok(command) => {
                    self.handle(command);

                    // Drain whatever else queued up while we slept.
                    loop {
                        match self.receiver.try_recv() {
                            Ok(Command::Shutdown) => {
                                log::trace!("reactor exiting");
                                return;
                            }
                            Ok(command) => self.handle(command),
                            Err(_) => break,
                        }
                    }
                }
                Err(RecvTimeoutError::Timeout) => {}
                Err(RecvTimeoutError::Disconnected) => break,
            }
        }

        log::trace!("reactor exiting");
    }

    fn handle(&mut self, command: Command) {
        match command {
            Command::SetTimer {
                deadline,
                waker,
                cancelled,
            } => {
                self.timers.push(TimerEntry {
                    deadline,
                    waker,
                    cancelled,
                });
            }
            #[cfg(unix)]
            Command::WatchSignal { mask, shared } => {
                self.signals.push(SignalWatch { mask, shared });
            }
            Command::Shutdown => unreachable!("handled by the event loop"),
        }
    }

    /// How long the reactor may sleep before something needs attention.
    fn next_wait(&self) -> Duration {
        let until_timer = self
            .timers
            .peek()
            .map(|timer| timer.deadline.saturating_duration_since(Instant::now()));

        #[cfg(unix)]
        if !self.signals.is_empty() {
            return until_timer.map_or(SIGNAL_TICK, |wait| wait.min(SIGNAL_TICK));
        }

        until_timer.unwrap_or(IDLE_WAIT)
    }

    /// Pops and fires every timer whose deadline has passed.
    ///
    /// Cancelled entries are discarded without waking anyone.
    fn fire_due_timers(&mut self) {
        let now = Instant::now();

        while let Some(timer) = self.timers.peek() {
            if timer.deadline > now {
                break;
            }

            let timer = self.timers.pop().unwrap();

            if timer.cancelled.load(Ordering::Acquire) {
                continue;
            }

            timer.waker.wake();
        }
    }

    /// Delivers pending process signals to matching watches.
    ///
    /// Each watch fires at most once and is dropped after delivery.
    #[cfg(unix)]
    fn deliver_signals(&mut self) {
        let pending = take_pending();

        if pending == 0 {
            return;
        }

        self.signals.retain(|watch| {
            if watch.mask & pending != 0 {
                watch.shared.fire();
                false
            } else {
                true
            }
        });
    }
}
