use std::time::Instant;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TickOutcome {
    /// Not started yet; ticks before the first keystroke do nothing.
    Idle,
    Running,
    /// The deadline was reached by this call.
    Expired,
    /// Already complete; nothing changes.
    Complete,
}

/// Wall-clock countdown with one-second resolution.
///
/// Elapsed time is always `now - started_at`, never a count of ticks, so a
/// throttled or delayed tick source still reads the right time.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SessionClock {
    duration_secs: u64,
    started_at: Option<Instant>,
    elapsed_secs: u64,
    remaining_secs: u64,
    active: bool,
    complete: bool,
}

impl SessionClock {
    pub fn new(duration_secs: u64) -> Self {
        Self {
            duration_secs,
            started_at: None,
            elapsed_secs: 0,
            remaining_secs: duration_secs,
            active: false,
            complete: false,
        }
    }

    /// Returns true if this call started the clock.
    pub fn start(&mut self, now: Instant) -> bool {
        if self.active || self.complete {
            return false;
        }
        self.started_at = Some(now);
        self.active = true;
        true
    }

    pub fn tick(&mut self, now: Instant) -> TickOutcome {
        if self.complete {
            return TickOutcome::Complete;
        }
        if !self.active {
            return TickOutcome::Idle;
        }
        self.sample(now);
        if self.remaining_secs == 0 {
            self.active = false;
            self.complete = true;
            TickOutcome::Expired
        } else {
            TickOutcome::Running
        }
    }

    /// Manual stop. Freezes the readings at `now`; irreversible until `reset`.
    pub fn stop(&mut self, now: Instant) {
        if self.complete {
            return;
        }
        if self.active {
            self.sample(now);
        }
        self.active = false;
        self.complete = true;
    }

    pub fn reset(&mut self, duration_secs: u64) {
        *self = Self::new(duration_secs);
    }

    fn sample(&mut self, now: Instant) {
        let Some(start) = self.started_at else {
            return;
        };
        let elapsed = now.saturating_duration_since(start).as_secs();
        self.elapsed_secs = elapsed.min(self.duration_secs);
        self.remaining_secs = self.duration_secs.saturating_sub(elapsed);
    }

    pub fn duration_secs(&self) -> u64 {
        self.duration_secs
    }

    pub fn elapsed_secs(&self) -> u64 {
        self.elapsed_secs
    }

    pub fn remaining_secs(&self) -> u64 {
        self.remaining_secs
    }

    pub fn started_at(&self) -> Option<Instant> {
        self.started_at
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn is_complete(&self) -> bool {
        self.complete
    }
}
