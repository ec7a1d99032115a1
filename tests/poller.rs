use std::future::Future;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use nowify::{Error, FetchError, NowPlaying, NowPlayingSource, Poller};
use tokio::time::Instant;

fn snapshot(time_played: u64) -> NowPlaying {
    NowPlaying {
        album_image_url: "https://i.scdn.co/image/640".to_string(),
        artist: "Frank Ocean".to_string(),
        is_playing: true,
        song_url: "https://open.spotify.com/track/7eqoqGkKwgOaWNNHx90uEZ".to_string(),
        title: "Nights".to_string(),
        time_played,
        time_total: 215_000,
        artist_url: "https://open.spotify.com/artist/2h93pZq0e7k5yf4dywlkpM".to_string(),
    }
}

/// Source that takes `delay` to answer and records when each fetch ran
struct SlowSource {
    delay: Duration,
    calls: Mutex<Vec<(Instant, Instant)>>,
    in_flight: AtomicUsize,
    max_in_flight: AtomicUsize,
}

impl SlowSource {
    fn new(delay: Duration) -> Arc<Self> {
        Arc::new(Self {
            delay,
            calls: Mutex::new(Vec::new()),
            in_flight: AtomicUsize::new(0),
            max_in_flight: AtomicUsize::new(0),
        })
    }

    fn calls(&self) -> Vec<(Instant, Instant)> {
        self.calls.lock().unwrap().clone()
    }
}

impl NowPlayingSource for SlowSource {
    fn now_playing(&self) -> impl Future<Output = Result<NowPlaying, Error>> + Send {
        async move {
            let start = Instant::now();
            let current = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
            self.max_in_flight.fetch_max(current, Ordering::SeqCst);

            tokio::time::sleep(self.delay).await;

            self.in_flight.fetch_sub(1, Ordering::SeqCst);
            let mut calls = self.calls.lock().unwrap();
            calls.push((start, Instant::now()));
            Ok(snapshot(calls.len() as u64 * 1000))
        }
    }
}

/// Source that answers from a fixed script, repeating the last entry
struct ScriptedSource {
    script: Vec<Result<NowPlaying, Error>>,
    calls: AtomicUsize,
}

impl NowPlayingSource for ScriptedSource {
    fn now_playing(&self) -> impl Future<Output = Result<NowPlaying, Error>> + Send {
        let call = self.calls.fetch_add(1, Ordering::SeqCst);
        let result = self.script[call.min(self.script.len() - 1)].clone();
        async move { result }
    }
}

/// Source whose first fetch panics
struct PanickingSource;

impl NowPlayingSource for PanickingSource {
    fn now_playing(&self) -> impl Future<Output = Result<NowPlaying, Error>> + Send {
        async { Ok::<_, Error>(None::<NowPlaying>.expect("fetch blew up")) }
    }
}

#[tokio::test(start_paused = true)]
async fn fetches_are_spaced_by_the_interval() {
    let source = SlowSource::new(Duration::from_millis(10));
    let poller = Poller::start(source.clone(), Duration::from_millis(1000));

    tokio::time::sleep(Duration::from_millis(4500)).await;
    poller.stop().await.unwrap();

    let calls = source.calls();
    assert_eq!(calls.len(), 5, "ticks at 0s, 1s, 2s, 3s and 4s");
    for pair in calls.windows(2) {
        let gap = pair[1].0 - pair[0].0;
        assert!(gap >= Duration::from_millis(1000), "gap was {gap:?}");
    }
}

#[tokio::test(start_paused = true)]
async fn ticks_never_overlap_when_fetch_outlasts_period() {
    // A plain repeating timer would start new fetches at 1s and 2s while the first
    // one is still running, and results could be published out of order.
    let source = SlowSource::new(Duration::from_millis(1500));
    let poller = Poller::start(source.clone(), Duration::from_millis(1000));

    tokio::time::sleep(Duration::from_millis(10_000)).await;
    poller.stop().await.unwrap();

    assert_eq!(source.max_in_flight.load(Ordering::SeqCst), 1);

    let calls = source.calls();
    assert!(calls.len() >= 4, "only {} fetches", calls.len());
    for pair in calls.windows(2) {
        let (_, previous_end) = pair[0];
        let (next_start, _) = pair[1];
        assert!(next_start >= previous_end);
    }
}

#[tokio::test(start_paused = true)]
async fn publishes_every_result_to_subscribers() {
    let source = ScriptedSource {
        script: vec![
            Ok(snapshot(3000)),
            Err(Error::Fetch(FetchError::NotPlaying)),
            Ok(snapshot(5000)),
        ],
        calls: AtomicUsize::new(0),
    };
    let poller = Poller::start(source, Duration::from_millis(1000));
    let mut updates = poller.subscribe();
    assert!(poller.latest().is_none());

    updates.changed().await.unwrap();
    assert_eq!(updates.borrow_and_update().clone(), Some(Ok(snapshot(3000))));

    updates.changed().await.unwrap();
    assert_eq!(
        updates.borrow_and_update().clone(),
        Some(Err(Error::Fetch(FetchError::NotPlaying)))
    );

    updates.changed().await.unwrap();
    assert_eq!(updates.borrow_and_update().clone(), Some(Ok(snapshot(5000))));
    assert_eq!(poller.latest(), Some(Ok(snapshot(5000))));

    poller.stop().await.unwrap();
}

#[tokio::test(start_paused = true)]
async fn failures_do_not_stop_polling() {
    let source = Arc::new(ScriptedSource {
        script: vec![Err(Error::Fetch(FetchError::UnableToFetch))],
        calls: AtomicUsize::new(0),
    });
    let poller = Poller::start(source.clone(), Duration::from_millis(1000));

    tokio::time::sleep(Duration::from_millis(3500)).await;
    assert!(poller.is_running());
    assert_eq!(
        poller.latest(),
        Some(Err(Error::Fetch(FetchError::UnableToFetch)))
    );
    poller.stop().await.unwrap();

    assert_eq!(source.calls.load(Ordering::SeqCst), 4);
}

#[tokio::test(start_paused = true)]
async fn stop_ends_polling() {
    let source = SlowSource::new(Duration::from_millis(10));
    let poller = Poller::start(source.clone(), Duration::from_millis(1000));

    tokio::time::sleep(Duration::from_millis(2500)).await;
    poller.stop().await.unwrap();
    let fetched = source.calls().len();

    tokio::time::sleep(Duration::from_millis(5000)).await;
    assert_eq!(source.calls().len(), fetched);
}

#[tokio::test(start_paused = true)]
async fn stop_cancels_fetch_in_flight() {
    let source = SlowSource::new(Duration::from_secs(3600));
    let poller = Poller::start(source.clone(), Duration::from_millis(1000));

    tokio::time::sleep(Duration::from_millis(100)).await;
    assert_eq!(source.in_flight.load(Ordering::SeqCst), 1);

    tokio::time::timeout(Duration::from_secs(1), poller.stop())
        .await
        .expect("stop should not wait for the hung fetch")
        .unwrap();
    assert!(source.calls().is_empty());
}

#[tokio::test(start_paused = true)]
async fn dropping_the_poller_cancels_it() {
    let source = SlowSource::new(Duration::from_millis(10));
    let poller = Poller::start(source.clone(), Duration::from_millis(1000));

    tokio::time::sleep(Duration::from_millis(1500)).await;
    drop(poller);
    let fetched = source.calls().len();

    tokio::time::sleep(Duration::from_millis(5000)).await;
    assert_eq!(source.calls().len(), fetched);
}

#[tokio::test(start_paused = true)]
async fn panicked_task_is_reported() {
    let poller = Poller::start(PanickingSource, Duration::from_millis(1000));
    let mut updates = poller.subscribe();

    assert!(updates.changed().await.is_err(), "sender should be gone");
    assert!(poller.latest().is_none());

    let err = poller.stop().await.unwrap_err();
    assert!(err.is_panic());
}
