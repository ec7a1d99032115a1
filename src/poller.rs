use std::future::Future;
use std::time::Duration;

use tokio::sync::watch;
use tokio::task::{JoinError, JoinHandle};
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;

use crate::{Error, NowPlaying, Shared};

/// Anything that can produce a now playing snapshot on demand
pub trait NowPlayingSource {
    fn now_playing(&self) -> impl Future<Output = Result<NowPlaying, Error>> + Send;
}

impl<T: NowPlayingSource + Send + Sync> NowPlayingSource for Shared<T> {
    fn now_playing(&self) -> impl Future<Output = Result<NowPlaying, Error>> + Send {
        (**self).now_playing()
    }
}

/// Latest published poll result, `None` until the first tick has finished
pub type Published = Option<Result<NowPlaying, Error>>;

/// Background task that polls a [`NowPlayingSource`] on a fixed period.
///
/// Ticks are serialized: a fetch is only started once the previous result has been
/// published. Ticks that fall due while a fetch is running collapse into a single one
/// that fires as soon as it finishes. Results are published through a watch channel,
/// so observers always see the most recent one.
///
/// Dropping the poller cancels the task, including any fetch still in flight.
#[derive(Debug)]
pub struct Poller {
    cancel: CancellationToken,
    receiver: watch::Receiver<Published>,
    handle: Option<JoinHandle<()>>,
}

impl Poller {
    /// Spawn the polling task on the current tokio runtime. The first tick fires
    /// immediately.
    ///
    /// Panics if `interval` is zero.
    pub fn start<S>(source: S, interval: Duration) -> Self
    where
        S: NowPlayingSource + Send + Sync + 'static,
    {
        let (sender, receiver) = watch::channel(None);
        let cancel = CancellationToken::new();
        let token = cancel.clone();

        let handle = tokio::spawn(async move {
            let mut tick = tokio::time::interval(interval);
            tick.set_missed_tick_behavior(MissedTickBehavior::Skip);

            loop {
                tokio::select! {
                    biased;
                    _ = token.cancelled() => break,
                    _ = tick.tick() => {}
                }

                let result = tokio::select! {
                    biased;
                    _ = token.cancelled() => break,
                    result = source.now_playing() => result,
                };

                match &result {
                    Ok(now_playing) => log::debug!(
                        "Now playing {} by {} ({}ms/{}ms)",
                        now_playing.title,
                        now_playing.artist,
                        now_playing.time_played,
                        now_playing.time_total
                    ),
                    Err(err) => log::debug!("Poll tick failed: {err}"),
                }
                sender.send_replace(Some(result));
            }
            log::debug!("Poller stopped");
        });

        Self {
            cancel,
            receiver,
            handle: Some(handle),
        }
    }

    /// New observer of the published results
    pub fn subscribe(&self) -> watch::Receiver<Published> {
        self.receiver.clone()
    }

    pub fn latest(&self) -> Published {
        self.receiver.borrow().clone()
    }

    pub fn is_running(&self) -> bool {
        self.handle
            .as_ref()
            .is_some_and(|handle| !handle.is_finished())
    }

    /// Cancel the polling task and wait for it to wind down.
    ///
    /// Returns the task's [`JoinError`] if it panicked before it could be stopped.
    pub async fn stop(mut self) -> Result<(), JoinError> {
        self.cancel.cancel();
        match self.handle.take() {
            Some(handle) => handle.await,
            None => Ok(()),
        }
    }
}

impl Drop for Poller {
    fn drop(&mut self) {
        self.cancel.cancel();
    }
}
