//! Async event loop driving a [`ViewerSession`] from user commands and a
//! playback timer.
//!
//! Commands and ticks are handled one at a time on the caller's task, so a
//! tick never starts before the previous frame has been presented.

use futures::{Stream, StreamExt};
use tokio::time::{self, Duration, Interval, MissedTickBehavior};
use tracing::debug;

use crate::enums::Orientation;
use crate::session::{ViewerError, ViewerSession};
use crate::slice_image::SliceImage;

#[derive(Debug)]
pub enum Command {
    /// Outcome of acquiring a new volume buffer.
    Load(Result<Vec<u8>, ViewerError>),
    SetOrientation(Orientation),
    SetSlice(isize),
    Step(isize),
    Play,
    Pause,
    SetInterval(u64),
    Close,
}

impl ViewerSession {
    /// Apply one user command. `Close` tears the session down.
    pub fn apply(&mut self, command: Command) {
        match command {
            Command::Load(acquired) => {
                // Failure is kept on the session and shown by the placeholder.
                let _ = self.load(acquired);
            }
            Command::SetOrientation(orientation) => self.set_orientation(orientation),
            Command::SetSlice(index) => self.set_slice(index),
            Command::Step(delta) => self.step(delta),
            Command::Play => self.play(),
            Command::Pause => self.pause(),
            Command::SetInterval(interval_ms) => self.set_interval_ms(interval_ms),
            Command::Close => self.close(),
        }
    }
}

enum Event {
    Command(Option<Command>),
    Tick,
}

/// Run until the command stream ends or yields [`Command::Close`].
///
/// `present` receives the current image once at start, after every command
/// and after every playback tick. The session is closed on return, so no
/// tick can fire afterwards.
pub async fn run<S, F>(session: &mut ViewerSession, mut commands: S, mut present: F)
where
    S: Stream<Item = Command> + Unpin,
    F: FnMut(&SliceImage),
{
    let mut ticker: Option<Interval> = None;
    present(&session.render());

    loop {
        sync_ticker(&mut ticker, session);

        let event = tokio::select! {
            command = commands.next() => Event::Command(command),
            () = next_tick(&mut ticker) => Event::Tick,
        };

        match event {
            Event::Command(None | Some(Command::Close)) => break,
            Event::Command(Some(command)) => {
                session.apply(command);
                present(&session.render());
            }
            Event::Tick => {
                if session.tick() {
                    present(&session.render());
                }
            }
        }
    }

    session.close();
    debug!("player stopped");
}

/// Keep the timer in step with the session's play state and period.
fn sync_ticker(ticker: &mut Option<Interval>, session: &ViewerSession) {
    if !session.is_playing() {
        *ticker = None;
        return;
    }
    let period = Duration::from_millis(session.playback_state().interval_ms);
    if ticker.as_ref().is_some_and(|t| t.period() == period) {
        return;
    }
    let mut interval = time::interval_at(time::Instant::now() + period, period);
    interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
    *ticker = Some(interval);
}

async fn next_tick(ticker: &mut Option<Interval>) {
    match ticker {
        Some(interval) => {
            interval.tick().await;
        }
        None => std::future::pending::<()>().await,
    }
}
