//! Startup, power-down, vent and mode change choreographies

use embassy_time::{Duration, Instant};

#[cfg(feature = "esp32-log")]
use esp_println::println;

use super::script::{Step, Task, ZoneSet};
use super::{Pack, PackCue, PackState, ring_speed_target};
use crate::action::Action;
use crate::animation::PatternId;
use crate::color::BLACK;
use crate::config::{
    AUTOVENT_CYCLE_MS, COOLDOWN_SLOWDOWN, COOLDOWN_SPEEDUP, CyclotronShutdown, DeviceVariant,
    FIRE_START_HOLD, FireCue, MODE_CHANGE_TIMEOUT, MajorChange, PowercellShutdown,
    RING_SPIN_UP, RING_SPIN_UP_START, TICK_INTERVAL, sound,
};
use crate::io::{Dial, PackIo, SoundWait, VoiceSink};
use crate::transition::Easing;

const STARTUP_SWEEP_MS: u16 = 4800;
const MAJOR_DRAIN_MS: u16 = 300;
const MAJOR_FADE_IN_MS: u16 = 1000;
const VENT_DRAIN_MS: u16 = 3600;
const VENT_STROBE_MS: u16 = 150;
const VENT_SHIFT_MS: u16 = 600;
const RING_COLOR_SHIFT: Duration = Duration::from_millis(1000);
/// Fire speed-up of ring-style packs relative to the dial target
const RING_FIRE_BOOST: f32 = 1.25;

impl Pack {
    /// Full power-up sequence of the variant
    pub(super) fn begin_startup<I: PackIo>(&mut self, io: &I, now: Instant) {
        self.refresh_colors();
        self.set_brightness(u8::MAX, Duration::from_millis(0), now);
        self.ring_speed_jump(1.0, now);
        let variant = self.config.variant;
        if variant.is_ring_style() {
            self.ring_speed_jump(RING_SPIN_UP_START, now);
            self.ring_speed_go(ring_speed_target(io.dial(Dial::Speed)), RING_SPIN_UP, now);
        }

        self.queue(Step::Sound(variant.startup_sound()));
        match variant {
            DeviceVariant::SnapRed => {
                self.play_powercell_scroll(io, now);
                self.play_cyclotron_nominal(now);
                self.queue_sound_end(SoundWait::INTERRUPTIBLE);
            }
            DeviceVariant::FadeRed | DeviceVariant::TvgFade => {
                self.play_powercell(PatternId::Waterfall, STARTUP_SWEEP_MS, now);
                self.play_cyclotron(PatternId::FadeIn, STARTUP_SWEEP_MS, now);
                self.queue(Step::Settle {
                    zones: ZoneSet::POWERCELL | ZoneSet::CYCLOTRON,
                    sound: true,
                    limit: None,
                    abort: SoundWait::INTERRUPTIBLE,
                });
                self.queue(Step::Run(Task::Nominal));
            }
            DeviceVariant::Afterlife | DeviceVariant::AfterlifeTvg => {
                self.play_powercell(PatternId::Waterfall, STARTUP_SWEEP_MS, now);
                self.play_cyclotron_nominal(now);
                self.queue(Step::Settle {
                    zones: ZoneSet::POWERCELL,
                    sound: false,
                    limit: None,
                    abort: SoundWait::INTERRUPTIBLE,
                });
                self.queue(Step::Run(Task::PowercellScroll));
                self.queue_sound_end(SoundWait::INTERRUPTIBLE);
            }
        }
    }

    /// Short cue when moving between standby and idle
    pub(super) fn short_powerup(&mut self, higher: bool) {
        let index = self.config.variant.short_powerup_sound(higher);
        self.queue(Step::Sound(index));
        self.queue_sound_end(SoundWait::INTERRUPTIBLE);
    }

    /// Standby sound used when idle drops to a standby state
    pub(super) fn standby_sound(&mut self) {
        self.queue(Step::Sound(sound::STANDBY));
        self.queue_sound_end(SoundWait::UNTIL_END);
    }

    /// Power-down sequence from the variant table
    pub(super) fn begin_powerdown(&mut self, now: Instant) {
        let sequence = self.config.variant.powerdown();
        let ring_style = self.config.variant.is_ring_style();
        let cyclotron_duration = Duration::from_millis(u64::from(sequence.cyclotron_ms));
        if ring_style {
            self.ring_speed_go(0.0, cyclotron_duration, now);
        }
        self.queue(Step::Sound(sequence.sound));

        match sequence.powercell {
            PowercellShutdown::InstantOff => {
                self.powercell.stop();
                self.powercell.clear();
            }
            PowercellShutdown::Drain => {
                self.play_powercell(PatternId::Drain, sequence.powercell_ms, now);
            }
        }

        if ring_style {
            let actions = [
                Action::change_color(BLACK, cyclotron_duration, Easing::QuadraticOut),
                Action::wait(cyclotron_duration),
                Action::callback(PackCue::StopCyclotron),
            ];
            self.enqueue_cyclotron(actions, now);
        } else {
            match sequence.cyclotron {
                CyclotronShutdown::InstantOff => {
                    self.cyclotron.stop();
                    self.cyclotron.clear();
                }
                CyclotronShutdown::FadeOut => {
                    self.play_cyclotron(PatternId::FadeOut, sequence.cyclotron_ms, now);
                }
            }
        }

        self.queue(Step::Settle {
            zones: ZoneSet::POWERCELL | ZoneSet::CYCLOTRON,
            sound: true,
            limit: None,
            abort: SoundWait::UNTIL_END,
        });
        self.queue(Step::Run(Task::FinishPowerdown));
    }

    /// Fire sound of the current mode, with the hold that follows a start cue
    pub(super) fn queue_fire_cue(&mut self, cue: FireCue) {
        let variant = self.config.variant;
        let mode = self.context.mode;
        let Some(index) = variant.fire_sounds(mode).get(cue) else {
            return;
        };
        self.queue(Step::Sound(index));
        if cue == FireCue::Start {
            self.queue(Step::FireHold(FIRE_START_HOLD));
            if variant.waits_for_fire_start(mode) {
                self.queue_sound_end(SoundWait::UNTIL_END);
            }
        }
    }

    /// Ring-style packs spin up while firing, reaching the boost at autovent
    pub(super) fn begin_fire_spin_up<I: PackIo>(&mut self, io: &I, now: Instant) {
        let target = ring_speed_target(io.dial(Dial::Speed)) * RING_FIRE_BOOST;
        let duration =
            Duration::from_millis(u64::from(self.heat.margin()) * TICK_INTERVAL.as_millis());
        self.ring_speed_go(target, duration, now);
    }

    /// Slow the ring down and bring it back to speed, then return to idle
    pub(super) fn begin_cooldown<I: PackIo>(&mut self, io: &I, now: Instant) {
        let target = ring_speed_target(io.dial(Dial::Speed));
        let actions = [
            Action::callback(PackCue::RingSpeed {
                multiplier: target / 2.0,
                duration: COOLDOWN_SLOWDOWN,
            }),
            Action::wait(COOLDOWN_SLOWDOWN),
            Action::callback(PackCue::RingSpeed {
                multiplier: target,
                duration: COOLDOWN_SPEEDUP,
            }),
            Action::wait(COOLDOWN_SPEEDUP),
            Action::callback(PackCue::CooldownDone),
        ];
        self.enqueue_cyclotron(actions, now);
    }

    /// Drain and fade out, swap colors, then bring the zones back
    pub(super) fn begin_major_mode_change(&mut self, change: MajorChange, now: Instant) {
        let ring_style = self.config.variant.is_ring_style();
        self.queue(Step::Sound(change.first_sound));
        self.play_powercell(PatternId::Drain, MAJOR_DRAIN_MS, now);
        let mut zones = ZoneSet::POWERCELL;
        if !ring_style {
            self.play_cyclotron(PatternId::FadeOut, MAJOR_DRAIN_MS, now);
            zones = zones | ZoneSet::CYCLOTRON;
        }
        self.queue(Step::Settle {
            zones,
            sound: true,
            limit: Some(MODE_CHANGE_TIMEOUT),
            abort: SoundWait::UNTIL_END,
        });
        self.queue(Step::Run(Task::RefreshColors));
        self.queue(Step::Run(Task::PowercellScroll));
        self.queue(Step::Settle {
            zones: ZoneSet::NONE,
            sound: true,
            limit: Some(MODE_CHANGE_TIMEOUT),
            abort: SoundWait::UNTIL_END,
        });

        if change.second_sound != 0 {
            self.queue(Step::Sound(change.second_sound));
            if !ring_style {
                self.queue(Step::Run(Task::MajorFadeIn));
                self.queue(Step::Settle {
                    zones: ZoneSet::CYCLOTRON,
                    sound: true,
                    limit: Some(MODE_CHANGE_TIMEOUT),
                    abort: SoundWait::UNTIL_END,
                });
            }
        }
        if !ring_style {
            self.queue(Step::Run(Task::CyclotronNominal));
        }
    }

    /// Vent sound, drain and exhaust, blinking the vent light until done
    pub(super) fn queue_full_vent(&mut self) {
        self.queue(Step::Sound(sound::VENT));
        self.queue(Step::Run(Task::FullVent));
        self.queue(Step::VentBlink);
        self.queue(Step::Run(Task::FinishVent));
    }

    /// Forced vent once the barrel reaches the autovent threshold
    pub(super) fn begin_autovent(&mut self, now: Instant) {
        let variant = self.config.variant;
        self.play_powercell(PatternId::Strobe, AUTOVENT_CYCLE_MS, now);
        if !variant.is_ring_style() {
            self.play_cyclotron(PatternId::Strobe, AUTOVENT_CYCLE_MS, now);
        }

        let align = variant.sleep_align(self.context.mode);
        if variant.supports_mode_cycling() {
            self.queue(Step::Hold(align));
        }
        self.queue(Step::Run(Task::SignalWand(true)));
        self.queue_sound_end(SoundWait::UNTIL_END);
        self.queue(Step::Sound(sound::AUTOVENT));
        self.queue_sound_end(SoundWait::UNTIL_END);
        if !variant.supports_mode_cycling() {
            self.queue(Step::Hold(align));
        }
        self.queue_full_vent();
        self.queue(Step::Run(Task::SignalWand(false)));
        self.queue(Step::Run(Task::EnterIdle));
        self.queue(Step::Run(Task::Hum));
        self.queue(Step::FireRelease);
        self.queue(Step::Run(Task::ClearSongToggle));
    }

    fn enqueue_cyclotron<const N: usize>(&mut self, actions: [Action<PackCue>; N], now: Instant) {
        for action in actions {
            if self.cyclotron.enqueue(action, now).is_err() {
                #[cfg(feature = "esp32-log")]
                println!("[Pack.enqueue_cyclotron] ring queue full");
            }
        }
    }

    pub(super) fn run_task<I, V>(&mut self, task: Task, now: Instant, io: &mut I, voice: &mut V)
    where
        I: PackIo,
        V: VoiceSink,
    {
        match task {
            Task::Nominal => {
                self.play_powercell_scroll(io, now);
                self.play_cyclotron_nominal(now);
            }
            Task::PowercellScroll => self.play_powercell_scroll(io, now),
            Task::CyclotronNominal => self.play_cyclotron_nominal(now),
            Task::RefreshColors => self.refresh_colors(),
            Task::MajorFadeIn => self.play_cyclotron(PatternId::FadeIn, MAJOR_FADE_IN_MS, now),
            Task::FullVent => {
                self.heat.reset();
                let ring_style = self.config.variant.is_ring_style();
                let (exhaust, config) = if ring_style {
                    let config = self.future_config(VENT_SHIFT_MS).with_clockwise(false);
                    (PatternId::ShiftRotate, config)
                } else {
                    (PatternId::Strobe, self.future_config(VENT_STROBE_MS))
                };
                self.future.play(exhaust.to_slot(), config, now);
                self.play_powercell(PatternId::Drain, VENT_DRAIN_MS, now);
                if !ring_style {
                    self.play_cyclotron(PatternId::FadeOut, VENT_DRAIN_MS, now);
                }
            }
            Task::FinishVent => {
                self.future.stop();
                self.future.clear();
                self.play_powercell_scroll(io, now);
                // the spinning ring keeps turning through a vent
                if !self.config.variant.is_ring_style() {
                    self.play_cyclotron_nominal(now);
                }
            }
            Task::FinishPowerdown => {
                if self.config.variant.is_ring_style() {
                    self.ring_speed_jump(0.0, now);
                }
                self.set_brightness(u8::MAX, Duration::from_millis(0), now);
            }
            Task::SignalWand(busy) => io.signal_wand(busy),
            Task::EnterIdle => self.set_state(PackState::Idle),
            Task::Hum => self.hum(voice),
            Task::ResetHeat => self.heat.reset(),
            Task::ClearSongToggle => io.clear_song_toggle(),
            Task::RingColorShift => {
                if self.config.variant == DeviceVariant::AfterlifeTvg {
                    let color = self.colors.cyclotron;
                    let shift = Action::change_color(color, RING_COLOR_SHIFT, Easing::Linear);
                    self.enqueue_cyclotron([shift], now);
                }
            }
        }
    }
}
