//! Cooperative choreography
//!
//! Sequences that wait on sounds, zones or switches are queued as steps and
//! advanced once per [`Pack::process`] call, so the zones keep animating
//! while the pack waits. The state machine body is skipped while a script
//! is running.

use core::ops::BitOr;

use embassy_time::{Duration, Instant};
use heapless::Deque;

#[cfg(feature = "esp32-log")]
use esp_println::println;

use super::Pack;
use crate::io::{PackIo, SoundWait, VoiceSink};

pub const SCRIPT_CAPACITY: usize = 24;

const VENT_BLINK_ON: Duration = Duration::from_millis(50);
const VENT_BLINK_PERIOD: Duration = Duration::from_millis(50 + 120);

/// Set of zones a step waits on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ZoneSet(u8);

impl ZoneSet {
    pub const NONE: Self = Self(0);
    pub const POWERCELL: Self = Self(0x01);
    pub const CYCLOTRON: Self = Self(0x02);
    pub const FUTURE: Self = Self(0x04);

    pub const fn contains(self, other: Self) -> bool {
        self.0 & other.0 == other.0 && other.0 != 0
    }
}

impl BitOr for ZoneSet {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        Self(self.0 | rhs.0)
    }
}

/// Immediate pack mutation run from a script
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Task {
    /// Gauge scroll plus nominal ring pattern
    Nominal,
    PowercellScroll,
    CyclotronNominal,
    RefreshColors,
    /// Fade the ring back in after a major mode change
    MajorFadeIn,
    /// Start the vent drain and exhaust patterns
    FullVent,
    /// Restore nominal patterns after a vent
    FinishVent,
    FinishPowerdown,
    SignalWand(bool),
    EnterIdle,
    Hum,
    ResetHeat,
    ClearSongToggle,
    /// Ease the ring to the current mode color
    RingColorShift,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Step {
    /// Start a sound, replacing whatever plays
    Sound(u8),
    Run(Task),
    /// Wait until the zones are idle and, optionally, the voice is silent
    Settle {
        zones: ZoneSet,
        sound: bool,
        limit: Option<Duration>,
        abort: SoundWait,
    },
    /// Fixed pause
    Hold(Duration),
    /// Pause that ends early once the fire switch is released
    FireHold(Duration),
    /// Wait for the fire switch to be released
    FireRelease,
    /// Wait for the vent switch to be released
    VentRelease,
    /// Blink the vent light until the vent switch is off and the voice ends
    VentBlink,
}

impl Step {
    /// Wait for the current sound to end
    pub const fn sound_end(abort: SoundWait) -> Self {
        Self::Settle {
            zones: ZoneSet::NONE,
            sound: true,
            limit: None,
            abort,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub(super) struct Script {
    steps: Deque<Step, SCRIPT_CAPACITY>,
    started: Option<Instant>,
}

impl Script {
    pub(super) const fn new() -> Self {
        Self {
            steps: Deque::new(),
            started: None,
        }
    }

    /// Append a step, handing it back if the script is full
    pub(super) fn push(&mut self, step: Step) -> Result<(), Step> {
        self.steps.push_back(step)
    }

    pub(super) fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    fn front(&self) -> Option<Step> {
        self.steps.front().copied()
    }

    /// Time the front step has been running
    fn elapsed(&mut self, now: Instant) -> Duration {
        let started = *self.started.get_or_insert(now);
        now.checked_duration_since(started)
            .unwrap_or(Duration::from_millis(0))
    }

    fn complete(&mut self) {
        self.steps.pop_front();
        self.started = None;
    }
}

impl Pack {
    pub(super) fn queue(&mut self, step: Step) {
        if self.script.push(step).is_err() {
            #[cfg(feature = "esp32-log")]
            println!("[Pack.queue] script full, dropped {:?}", step);
        }
    }

    pub(super) fn queue_sound_end(&mut self, abort: SoundWait) {
        self.queue(Step::sound_end(abort));
    }

    /// Run script steps until one has to wait
    pub(super) fn advance_script<I, V>(&mut self, now: Instant, io: &mut I, voice: &mut V)
    where
        I: PackIo,
        V: VoiceSink,
    {
        while let Some(step) = self.script.front() {
            let elapsed = self.script.elapsed(now);
            let done = match step {
                Step::Sound(index) => {
                    self.start_sound(voice, index);
                    true
                }
                Step::Run(task) => {
                    self.run_task(task, now, io, voice);
                    true
                }
                Step::Settle {
                    zones,
                    sound,
                    limit,
                    abort,
                } => {
                    let settled = self.zones_idle(zones) && !(sound && voice.is_playing());
                    settled || abort.aborted(io) || limit.is_some_and(|limit| elapsed >= limit)
                }
                Step::Hold(duration) => elapsed >= duration,
                Step::FireHold(duration) => elapsed >= duration || !io.fire(),
                Step::FireRelease => !io.fire(),
                Step::VentRelease => !io.vent(),
                Step::VentBlink => {
                    let phase = elapsed.as_millis() % VENT_BLINK_PERIOD.as_millis();
                    let lit = phase < VENT_BLINK_ON.as_millis();
                    io.set_vent_light(lit);
                    let finished =
                        elapsed >= VENT_BLINK_PERIOD && !lit && !io.vent() && !voice.is_playing();
                    if finished {
                        io.set_vent_light(false);
                    }
                    finished
                }
            };
            if !done {
                break;
            }
            self.script.complete();
        }
    }

    fn zones_idle(&self, zones: ZoneSet) -> bool {
        !(zones.contains(ZoneSet::POWERCELL) && self.powercell.is_running()
            || zones.contains(ZoneSet::CYCLOTRON) && self.cyclotron.is_running()
            || zones.contains(ZoneSet::FUTURE) && self.future.is_running())
    }
}
