//! Exclusive playback with a one-shot completion signal.
//!
//! A controller owns at most one live [`Voice`]. `play` always stops the previous voice (and
//! detaches it from the device) before attaching the new one, so two sessions are never audible
//! together. Each session's [`Completion`] resolves exactly once, with [`SessionEnd::Completed`]
//! when the buffer runs out or [`SessionEnd::Stopped`] when it is silenced early.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{Duration, Instant};

use crossbeam::channel::{Receiver, RecvTimeoutError, Sender, TryRecvError, bounded};
use parking_lot::{Condvar, Mutex};

use crate::audio::buffer::AudioBuffer;
use crate::audio::output::{DeviceFormat, OutputDevice};
use crate::foundation::error::MediaResult;

/// How a session ended.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SessionEnd {
    /// Every sample was rendered.
    Completed,
    /// Silenced by `stop` or by a newer `play`.
    Stopped,
}

/// Controller transport state.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum PlaybackState {
    #[default]
    Idle,
    Playing,
}

/// One playing buffer, shared between the controller and the device.
pub struct Voice {
    id: u64,
    buffer: AudioBuffer,
    /// Fractional source frame position.
    cursor: Mutex<f64>,
    silenced: AtomicBool,
    finished: AtomicBool,
    done_tx: Mutex<Option<Sender<SessionEnd>>>,
}

impl std::fmt::Debug for Voice {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Voice")
            .field("id", &self.id)
            .field("frames", &self.buffer.frames())
            .field("finished", &self.is_finished())
            .finish_non_exhaustive()
    }
}

impl Voice {
    fn new(id: u64, buffer: AudioBuffer, done_tx: Sender<SessionEnd>) -> Self {
        Self {
            id,
            buffer,
            cursor: Mutex::new(0.0),
            silenced: AtomicBool::new(false),
            finished: AtomicBool::new(false),
            done_tx: Mutex::new(Some(done_tx)),
        }
    }

    pub fn id(&self) -> u64 {
        self.id
    }

    pub fn is_finished(&self) -> bool {
        self.finished.load(Ordering::Acquire)
    }

    /// Render interleaved frames for `format` into `out`, linearly resampling as needed.
    ///
    /// Frames past the end of the buffer, or after the voice was silenced, are zero. Returns the
    /// number of frames that carried audio.
    pub fn render(&self, out: &mut [f32], format: DeviceFormat) -> usize {
        let channels = usize::from(format.channels.max(1));
        if self.silenced.load(Ordering::Acquire) || self.is_finished() || format.sample_rate == 0
        {
            out.fill(0.0);
            return 0;
        }

        let step = f64::from(self.buffer.sample_rate()) / f64::from(format.sample_rate);
        let total = self.buffer.frames() as f64;
        let mut pos = self.cursor.lock();
        let mut produced = 0usize;
        for frame in out.chunks_exact_mut(channels) {
            if *pos >= total {
                frame.fill(0.0);
                continue;
            }
            for (ch, s) in frame.iter_mut().enumerate() {
                *s = self.buffer.sample_lerp(ch, *pos);
            }
            *pos += step;
            produced += 1;
        }
        let tail = out.len() - (out.len() / channels) * channels;
        if tail > 0 {
            let len = out.len();
            out[len - tail..].fill(0.0);
        }

        if *pos >= total {
            drop(pos);
            self.finish(SessionEnd::Completed);
        }
        produced
    }

    /// Silence immediately; resolves the completion as stopped unless it already completed.
    pub(crate) fn silence(&self) {
        self.silenced.store(true, Ordering::Release);
        self.finish(SessionEnd::Stopped);
    }

    fn finish(&self, end: SessionEnd) {
        self.finished.store(true, Ordering::Release);
        if let Some(tx) = self.done_tx.lock().take() {
            let _ = tx.try_send(end);
        }
    }
}

/// One-shot end-of-session signal.
///
/// At most one caller blocks on the channel at a time, and never while holding the slot lock, so
/// `try_get` stays non-blocking while another thread waits.
#[derive(Debug)]
pub struct Completion {
    rx: Receiver<SessionEnd>,
    slot: Mutex<Slot>,
    settled: Condvar,
}

#[derive(Debug, Default)]
struct Slot {
    end: Option<SessionEnd>,
    receiving: bool,
}

impl Completion {
    fn new(rx: Receiver<SessionEnd>) -> Self {
        Self {
            rx,
            slot: Mutex::new(Slot::default()),
            settled: Condvar::new(),
        }
    }

    /// Non-blocking check.
    pub fn try_get(&self) -> Option<SessionEnd> {
        let mut slot = self.slot.lock();
        if slot.end.is_none() {
            slot.end = match self.rx.try_recv() {
                Ok(end) => Some(end),
                // the blocked receiver may hold the value and has not stored it yet
                Err(TryRecvError::Disconnected) if slot.receiving => None,
                Err(TryRecvError::Disconnected) => Some(SessionEnd::Stopped),
                Err(TryRecvError::Empty) => None,
            };
        }
        slot.end
    }

    /// Block up to `timeout`.
    pub fn wait_timeout(&self, timeout: Duration) -> Option<SessionEnd> {
        let Some(deadline) = Instant::now().checked_add(timeout) else {
            return Some(self.wait());
        };
        if let Some(end) = self.claim_receiver(Some(deadline)) {
            return end;
        }
        let received = match self.rx.recv_deadline(deadline) {
            Ok(end) => Some(end),
            Err(RecvTimeoutError::Disconnected) => Some(SessionEnd::Stopped),
            Err(RecvTimeoutError::Timeout) => None,
        };
        self.settle(received)
    }

    /// Block until the session ends.
    pub fn wait(&self) -> SessionEnd {
        if let Some(end) = self.claim_receiver(None) {
            // without a deadline the claim only gives up once the session has ended
            return end.unwrap_or(SessionEnd::Stopped);
        }
        // A dropped sender means the voice went away without finishing.
        let received = self.rx.recv().unwrap_or(SessionEnd::Stopped);
        self.settle(Some(received)).unwrap_or(received)
    }

    /// Become the blocking receiver, or return early with the outcome so far.
    ///
    /// `Some(..)` means the caller must not receive: the session already ended, or the deadline
    /// passed while another thread was receiving.
    fn claim_receiver(&self, deadline: Option<Instant>) -> Option<Option<SessionEnd>> {
        let mut slot = self.slot.lock();
        loop {
            if slot.end.is_some() {
                return Some(slot.end);
            }
            if !slot.receiving {
                slot.receiving = true;
                return None;
            }
            match deadline {
                Some(d) => {
                    if self.settled.wait_until(&mut slot, d).timed_out() {
                        return Some(slot.end);
                    }
                }
                None => self.settled.wait(&mut slot),
            }
        }
    }

    /// Record what the blocking receiver got; the first recorded outcome wins.
    fn settle(&self, received: Option<SessionEnd>) -> Option<SessionEnd> {
        let mut slot = self.slot.lock();
        slot.receiving = false;
        if let Some(end) = received {
            slot.end.get_or_insert(end);
        }
        self.settled.notify_all();
        slot.end
    }
}

/// Handle returned by [`PlaybackController::play`].
#[derive(Debug)]
pub struct PlaybackSession {
    pub id: u64,
    pub completion: Completion,
}

/// Play/stop transport over an [`OutputDevice`].
#[derive(Debug)]
pub struct PlaybackController<D: OutputDevice> {
    device: D,
    current: Option<Arc<Voice>>,
    next_id: u64,
}

impl<D: OutputDevice> PlaybackController<D> {
    pub fn new(device: D) -> Self {
        Self {
            device,
            current: None,
            next_id: 1,
        }
    }

    pub fn device(&self) -> &D {
        &self.device
    }

    pub fn device_mut(&mut self) -> &mut D {
        &mut self.device
    }

    /// Start playing `buffer` from its first sample, stopping any current session first.
    #[tracing::instrument(skip(self, buffer), fields(frames = buffer.frames(), sample_rate = buffer.sample_rate()))]
    pub fn play(&mut self, buffer: &AudioBuffer) -> MediaResult<PlaybackSession> {
        self.stop();

        let id = self.next_id;
        self.next_id += 1;
        let (tx, rx) = bounded(1);
        let voice = Arc::new(Voice::new(id, buffer.clone(), tx));
        if let Err(e) = self.device.attach(Arc::clone(&voice)) {
            voice.silence();
            return Err(e);
        }
        self.current = Some(voice);
        tracing::debug!(session = id, "playback started");

        Ok(PlaybackSession {
            id,
            completion: Completion::new(rx),
        })
    }

    /// Silence the current session, if any. Calling this while idle does nothing.
    pub fn stop(&mut self) {
        if let Some(voice) = self.current.take() {
            voice.silence();
            self.device.detach();
            tracing::debug!(session = voice.id(), "playback stopped");
        }
    }

    pub fn state(&self) -> PlaybackState {
        match &self.current {
            Some(v) if !v.is_finished() => PlaybackState::Playing,
            _ => PlaybackState::Idle,
        }
    }

    pub fn is_playing(&self) -> bool {
        self.state() == PlaybackState::Playing
    }

    /// Id of the session that is currently audible.
    pub fn current_session(&self) -> Option<u64> {
        self.current
            .as_ref()
            .filter(|v| !v.is_finished())
            .map(|v| v.id())
    }
}

impl<D: OutputDevice> Drop for PlaybackController<D> {
    fn drop(&mut self) {
        self.stop();
    }
}

#[cfg(test)]
#[path = "../../tests/unit/audio/playback.rs"]
mod tests;
