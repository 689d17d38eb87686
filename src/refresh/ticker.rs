use std::{
    io,
    ops::ControlFlow,
    sync::{
        atomic::{AtomicBool, Ordering},
        mpsc::{self, RecvTimeoutError},
        Arc,
    },
    thread::{self, JoinHandle},
    time::Duration,
};

/// A worker that runs a callback once per period until told to stop.
///
/// The callback can stop the ticker itself by returning
/// [`ControlFlow::Break`]. Otherwise it runs until [`Ticker::cancel`] is called
/// or the ticker is dropped.
#[derive(Debug)]
pub struct Ticker {
    stop: Option<mpsc::Sender<()>>,
    handle: Option<JoinHandle<()>>,
    finished: Arc<AtomicBool>,
}

impl Ticker {
    /// Starts calling `tick` every `period`.
    ///
    /// The first call happens one period after spawning.
    ///
    /// # Errors
    ///
    /// Returns an error if the worker thread could not be started.
    pub fn spawn<F>(name: &str, period: Duration, mut tick: F) -> io::Result<Self>
    where
        F: FnMut() -> ControlFlow<()> + Send + 'static,
    {
        let (stop, stopped) = mpsc::channel::<()>();
        let finished = Arc::new(AtomicBool::new(false));
        let done = Arc::clone(&finished);

        let handle = thread::Builder::new()
            .name(name.to_string())
            .spawn(move || {
                loop {
                    match stopped.recv_timeout(period) {
                        Err(RecvTimeoutError::Timeout) => {
                            if tick().is_break() {
                                tracing::trace!("Ticker finished");
                                break;
                            }
                        }
                        Ok(()) | Err(RecvTimeoutError::Disconnected) => {
                            tracing::trace!("Ticker cancelled");
                            break;
                        }
                    }
                }
                done.store(true, Ordering::Release);
            })?;

        Ok(Self {
            stop: Some(stop),
            handle: Some(handle),
            finished,
        })
    }

    /// Whether the callback will run again.
    #[must_use]
    pub fn is_running(&self) -> bool {
        self.handle.is_some() && !self.finished.load(Ordering::Acquire)
    }

    /// Stops the ticker and waits for an in-progress callback to return.
    ///
    /// Once this returns the callback will not run again. Cancelling an
    /// already cancelled or finished ticker does nothing.
    pub fn cancel(&mut self) {
        drop(self.stop.take());
        let Some(handle) = self.handle.take() else {
            return;
        };
        // Called from inside the callback: the worker exits on its own.
        if handle.thread().id() == thread::current().id() {
            return;
        }
        if handle.join().is_err() {
            tracing::warn!("Ticker callback panicked");
        }
    }
}

impl Drop for Ticker {
    fn drop(&mut self) {
        self.cancel();
    }
}
