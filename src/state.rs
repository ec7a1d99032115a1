use std::fmt::{Display, Formatter};

use crate::{Error, NowPlaying};

#[derive(Debug, Clone, Default, PartialEq)]
pub enum Status {
    /// No poll tick has completed yet
    #[default]
    Waiting,
    Playing,
    Paused,
    NotPlaying,
    Failed(Error),
}

/// What a display should show: the last good snapshot and how the latest tick went.
///
/// Failed ticks never clear `last`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PlayerState {
    pub last: Option<NowPlaying>,
    pub status: Status,
}

impl PlayerState {
    pub fn update(&mut self, result: &Result<NowPlaying, Error>) {
        match result {
            Ok(now_playing) => {
                self.status = if now_playing.is_playing {
                    Status::Playing
                } else {
                    Status::Paused
                };
                self.last = Some(now_playing.clone());
            }
            Err(err) if err.is_not_playing() => self.status = Status::NotPlaying,
            Err(err) => self.status = Status::Failed(err.clone()),
        }
    }
}

fn timestamp(ms: u64) -> String {
    let seconds = ms / 1000;
    format!("{}:{:02}", seconds / 60, seconds % 60)
}

impl Display for PlayerState {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let track = self.last.as_ref().map(|np| {
            format!(
                "{} - {} [{}/{}]",
                np.title,
                np.artist,
                timestamp(np.time_played),
                timestamp(np.time_total)
            )
        });

        match (&self.status, track) {
            (Status::Waiting, _) => write!(f, "Waiting for playback..."),
            (Status::Playing, Some(track)) => write!(f, "▶ {track}"),
            (Status::Paused, Some(track)) => write!(f, "⏸ {track}"),
            (Status::NotPlaying, Some(track)) => write!(f, "Currently Not Playing (last: {track})"),
            (Status::NotPlaying, None) => write!(f, "Currently Not Playing"),
            (Status::Failed(err), Some(track)) => write!(f, "{err} (last: {track})"),
            (Status::Failed(err), None) => write!(f, "{err}"),
            (_, None) => write!(f, "Waiting for playback..."),
        }
    }
}
