//! Virtual-time timer wheel for delayed and repeating callbacks.
//!
//! The session owns one [`Scheduler`] and drains it with [`Scheduler::pop_due`]
//! after advancing its clock. Handlers run one firing at a time, so a handler
//! that cancels timers (death, stage clear) prevents every later firing in the
//! same frame.

/// Handle of a scheduled timer.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TimerId(u32);

/// What a timer does when it fires.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display, strum::AsRefStr)]
#[strum(serialize_all = "snake_case")]
pub enum TimerKind {
    /// Regular obstacle spawn; repeating, interval follows difficulty.
    Spawn,
    /// One point of MP; repeating.
    MpRegen,
    /// End of the boss warning; places the boss.
    BossWarningEnd,
    /// Start of a boss attack; repeating while the boss is stationary.
    BossAttack,
    /// End of the telegraph; fires the beam.
    BossTelegraphEnd,
    /// Beam reaches the player.
    BossBeamImpact,
    /// Delay between a boss defeat and the stage-clear or victory result.
    VictoryReveal,
    /// Delay between death and the game-over result.
    GameOverReveal,
}

impl TimerKind {
    /// Timers owned by the boss encounter.
    pub const fn is_boss(self) -> bool {
        matches!(
            self,
            Self::BossWarningEnd | Self::BossAttack | Self::BossTelegraphEnd | Self::BossBeamImpact
        )
    }
}

/// A timer that came due.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Firing {
    /// Handle the timer was scheduled under.
    pub id: TimerId,
    /// What to do.
    pub kind: TimerKind,
    /// Virtual time the timer was due at, never later than the drain time.
    pub due_at: u64,
}

#[derive(Clone, Debug)]
struct Timer {
    id: TimerId,
    kind: TimerKind,
    due_at: u64,
    interval: Option<u64>,
    /// Remaining delay while paused.
    paused: Option<u64>,
}

/// Timers keyed by [`TimerId`], ordered by due time and then by creation.
#[derive(Clone, Debug, Default)]
pub struct Scheduler {
    timers: Vec<Timer>,
    next_id: u32,
}

impl Scheduler {
    /// Empty scheduler.
    pub fn new() -> Self {
        Self::default()
    }

    /// Fires once, `delay_ms` after `now`.
    pub fn schedule_once(&mut self, kind: TimerKind, now: u64, delay_ms: u64) -> TimerId {
        self.insert(kind, now + delay_ms, None)
    }

    /// Fires every `interval_ms`, first at `now + interval_ms`.
    pub fn schedule_repeating(&mut self, kind: TimerKind, now: u64, interval_ms: u64) -> TimerId {
        let interval_ms = interval_ms.max(1);
        self.insert(kind, now + interval_ms, Some(interval_ms))
    }

    fn insert(&mut self, kind: TimerKind, due_at: u64, interval: Option<u64>) -> TimerId {
        let id = TimerId(self.next_id);
        self.next_id += 1;
        self.timers.push(Timer {
            id,
            kind,
            due_at,
            interval,
            paused: None,
        });
        id
    }

    /// Cancels every timer whose kind matches the predicate.
    pub fn cancel_where(&mut self, mut predicate: impl FnMut(TimerKind) -> bool) {
        self.timers.retain(|timer| !predicate(timer.kind));
    }

    /// Drops every timer, paused ones included.
    pub fn cancel_all(&mut self) {
        self.timers.clear();
    }

    /// Stops the countdown until the timer is cancelled.
    pub fn pause(&mut self, id: TimerId, now: u64) {
        if let Some(timer) = self.timer_mut(id)
            && timer.paused.is_none()
        {
            timer.paused = Some(timer.due_at.saturating_sub(now));
        }
    }

    /// Changes a repeating timer's interval and restarts its countdown.
    pub fn reset_interval(&mut self, id: TimerId, now: u64, interval_ms: u64) {
        if let Some(timer) = self.timer_mut(id) {
            let interval_ms = interval_ms.max(1);
            timer.interval = Some(interval_ms);
            match timer.paused {
                Some(_) => timer.paused = Some(interval_ms),
                None => timer.due_at = now + interval_ms,
            }
        }
    }

    /// Number of timers, paused ones included.
    pub fn len(&self) -> usize {
        self.timers.len()
    }

    /// True when no timer is scheduled.
    pub fn is_empty(&self) -> bool {
        self.timers.is_empty()
    }

    /// Removes and returns the earliest running timer due at or before `now`.
    ///
    /// Repeating timers are re-armed one interval after their due time, so a
    /// long frame yields every missed repetition in order.
    pub fn pop_due(&mut self, now: u64) -> Option<Firing> {
        let index = self
            .timers
            .iter()
            .enumerate()
            .filter(|(_, timer)| timer.paused.is_none() && timer.due_at <= now)
            .min_by_key(|(_, timer)| (timer.due_at, timer.id))
            .map(|(index, _)| index)?;

        let timer = &mut self.timers[index];
        let firing = Firing {
            id: timer.id,
            kind: timer.kind,
            due_at: timer.due_at,
        };
        match timer.interval {
            Some(interval) => timer.due_at += interval,
            None => {
                self.timers.swap_remove(index);
            }
        }
        Some(firing)
    }

    fn timer_mut(&mut self, id: TimerId) -> Option<&mut Timer> {
        self.timers.iter_mut().find(|timer| timer.id == id)
    }
}
