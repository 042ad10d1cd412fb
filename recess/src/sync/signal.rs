use crate::reactor::command::Command;
use crate::runtime::context::CURRENT_REACTOR;

use std::future::Future;
use std::io;
use std::pin::Pin;
use std::sync::{Arc, Mutex};
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::task::{Context, Poll, Waker};

/// Signals raised since the reactor last looked. One bit per signal,
/// indexed by [`Signal::bit`]. Written from the signal handler, so
/// only async-signal-safe atomic operations touch it.
static PENDING: AtomicU64 = AtomicU64::new(0);

extern "C" fn on_signal(signo: libc::c_int) {
    for signal in Signal::ALL {
        if signal.raw() == signo {
            PENDING.fetch_or(signal.bit(), Ordering::Relaxed);
            return;
        }
    }
}

/// Atomically takes and clears the pending-signal mask.
pub(crate) fn take_pending() -> u64 {
    PENDING.swap(0, Ordering::AcqRel)
}

/// Process signals a [`SignalEvent`] can watch for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Signal {
    Interrupt,
    Terminate,
    Hangup,
    User1,
    User2,
}

impl Signal {
    const ALL: [Signal; 5] = [
        Signal::Interrupt,
        Signal::Terminate,
        Signal::Hangup,
        Signal::User1,
        Signal::User2,
    ];

    fn raw(self) -> libc::c_int {
        match self {
            Signal::Interrupt => libc::SIGINT,
            Signal::Terminate => libc::SIGTERM,
            Signal::Hangup => libc::SIGHUP,
            Signal::User1 => libc::SIGUSR1,
            Signal::User2 => libc::SIGUSR2,
        }
    }

    fn bit(self) -> u64 {
        1 << match self {
            Signal::Interrupt => 0,
            Signal::Terminate => 1,
            Signal::Hangup => 2,
            Signal::User1 => 3,
            Signal::User2 => 4,
        }
    }
}

/// Delivery state shared between a [`SignalEvent`] and the reactor.
pub(crate) struct SignalShared {
    fired: AtomicBool,
    waiters: Mutex<Vec<Waker>>,
}

impl SignalShared {
    fn new() -> Self {
        SignalShared {
            fired: AtomicBool::new(false),
            waiters: Mutex::new(Vec::new()),
        }
    }

    /// Marks the watch fired and wakes every waiter. Called by the
    /// reactor when a matching signal arrives.
    pub(crate) fn fire(&self) {
        if self.fired.swap(true, Ordering::AcqRel) {
            return;
        }

        let mut waiters = self.waiters.lock().unwrap();
        for waker in waiters.drain(..) {
            waker.wake();
        }
    }

    fn is_fired(&self) -> bool {
        self.fired.load(Ordering::Acquire)
    }
}

/// A one-shot event set by the arrival of a process signal.
///
/// Creating the event installs a handler for each requested signal and
/// registers a watch with the reactor. The first matching signal fires
/// the event; like [`Event`](super::Event) there is no reset.
pub struct SignalEvent {
    shared: Arc<SignalShared>,
}

impl SignalEvent {
    /// Watches for any of `signals`.
    ///
    /// Must be called from within a runtime so the watch can be handed
    /// to the reactor.
    pub fn new(signals: &[Signal]) -> io::Result<Self> {
        let mut mask = 0u64;

        for &signal in signals {
            install_handler(signal)?;
            mask |= signal.bit();
        }

        let shared = Arc::new(SignalShared::new());

        CURRENT_REACTOR.with(|cell| {
            let binding = cell.borrow();
            let reactor = binding
                .as_ref()
                .expect("SignalEvent created outside of runtime");

            reactor
                .send(Command::WatchSignal {
                    mask,
                    shared: shared.clone(),
                })
                .map_err(|_| io::Error::other("reactor is shut down"))
        })?;

        Ok(SignalEvent { shared })
    }

    pub fn is_set(&self) -> bool {
        self.shared.is_fired()
    }

    /// Waits until one of the watched signals arrives.
    pub fn wait(&self) -> SignalWait<'_> {
        SignalWait { event: self }
    }
}

fn install_handler(signal: Signal) -> io::Result<()> {
    // SAFETY: sigaction is initialized field by field before use, and
    // the handler only performs async-signal-safe atomic stores.
    unsafe {
        let mut action: libc::sigaction = std::mem::zeroed();
        action.sa_sigaction = on_signal as usize;
        action.sa_flags = libc::SA_RESTART;
        libc::sigemptyset(&mut action.sa_mask);

        if libc::sigaction(signal.raw(), &action, std::ptr::null_mut()) != 0 {
            return Err(io::Error::last_os_error());
        }
    }

    Ok(())
}

/// Future returned by [`SignalEvent::wait`].
pub struct SignalWait<'a> {
    event: &'a SignalEvent,
}

impl Future for SignalWait<'_> {
    type Output = ();

    fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        let shared = &self.event.shared;

        if shared.is_fired() {
            return Poll::Ready(());
        }

        shared.waiters.lock().unwrap().push(cx.waker().clone());

        if shared.is_fired() {
            return Poll::Ready(());
        }

        Poll::Pending
    }
}
