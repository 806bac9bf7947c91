use embassy_time::Instant;

use super::script::{Step, Task};
use super::{Pack, PackState};
use crate::config::{DeviceVariant, FireCue, sound};
use crate::io::{PackIo, SoundWait, VoiceSink};

impl Pack {
    /// One pass of the current state's body
    pub(super) fn run_state<I, V>(&mut self, now: Instant, io: &mut I, voice: &mut V)
    where
        I: PackIo,
        V: VoiceSink,
    {
        match self.context.state {
            PackState::Off => self.state_off(now, io),
            PackState::Feedback => self.state_feedback(now, io),
            PackState::PackStandby => self.state_pack_standby(now, io, voice),
            PackState::WandStandby => self.state_wand_standby(now, io, voice),
            PackState::Idle => self.state_idle(now, io, voice),
            PackState::FireCooldown => {
                self.hum(voice);
                self.adj_monitor(io, now);
            }
            PackState::Fire => self.state_fire(now, io, voice),
            PackState::SlimeFire => self.state_slime_fire(now, io, voice),
            PackState::Overheat => self.state_overheat(now, io, voice),
            PackState::OverheatBeep => self.state_overheat_beep(now, io),
            PackState::Autovent => self.begin_autovent(now),
        }
    }

    fn state_off<I: PackIo>(&mut self, now: Instant, io: &mut I) {
        let song_playing = self.monitors.song_playing();
        if !song_playing && !self.powercell.is_running() && !self.cyclotron.is_running() {
            self.powercell.clear();
            self.cyclotron.clear();
            self.future.clear();
        }
        self.ring_monitor(io, now);
        let home = self.home_mode();
        if self.context.mode != home {
            self.set_mode(home);
        }
        io.signal_wand(false);
        self.heat.reset();
        self.egg.clear();

        // the ring monitor may have opened the size preview
        if self.context.state == PackState::Off && !song_playing {
            if io.power_switch() {
                self.set_state(PackState::Idle);
                self.begin_startup(io, now);
            } else if io.pack_power_request() {
                io.clear_pack_power_request();
                self.set_state(PackState::PackStandby);
                self.begin_startup(io, now);
            } else if io.wand_standby() {
                self.set_state(PackState::WandStandby);
                self.begin_startup(io, now);
            }
        }
        io.clear_fire_tap();
    }

    fn state_feedback<I: PackIo>(&mut self, now: Instant, io: &I) {
        if self.feedback.needs_start {
            self.start_feedback(now);
        }
        self.ring_monitor(io, now);
        if self.feedback.deadline.is_some_and(|deadline| now >= deadline) {
            self.feedback.deadline = None;
            self.cyclotron.stop();
            self.cyclotron.clear();
            self.set_state(PackState::Off);
        } else if !self.cyclotron.is_running() {
            self.feedback.deadline = None;
            self.cyclotron.clear();
            self.set_state(PackState::Off);
        }
    }

    fn state_pack_standby<I, V>(&mut self, now: Instant, io: &mut I, voice: &mut V)
    where
        I: PackIo,
        V: VoiceSink,
    {
        self.egg.clear();
        let song_playing = self.monitors.song_playing();
        if !song_playing && io.power_switch() {
            self.set_state(PackState::Idle);
            self.short_powerup(false);
        } else if !song_playing && io.wand_standby() {
            self.set_state(PackState::WandStandby);
            self.short_powerup(false);
        } else if !song_playing && !io.pack_power_switch() {
            self.set_state(PackState::Off);
            self.begin_powerdown(now);
        } else {
            self.hum(voice);
            self.adj_monitor(io, now);
        }
        io.clear_fire_tap();
    }

    fn state_wand_standby<I, V>(&mut self, now: Instant, io: &mut I, voice: &mut V)
    where
        I: PackIo,
        V: VoiceSink,
    {
        self.egg.clear();
        let song_playing = self.monitors.song_playing();
        if !song_playing && io.power_switch() {
            self.set_state(PackState::Idle);
            self.short_powerup(true);
        } else if !song_playing && !io.wand_standby() {
            if io.pack_power_request() {
                io.clear_pack_power_request();
                self.set_state(PackState::PackStandby);
                self.standby_sound();
            } else {
                self.set_state(PackState::Off);
                self.begin_powerdown(now);
            }
        } else {
            self.hum(voice);
            self.adj_monitor(io, now);
        }
        io.clear_fire_tap();
    }

    fn state_idle<I, V>(&mut self, now: Instant, io: &mut I, voice: &mut V)
    where
        I: PackIo,
        V: VoiceSink,
    {
        let song_playing = self.monitors.song_playing();
        if !song_playing && !io.power_switch() {
            if io.pack_power_request() {
                io.clear_pack_power_request();
                self.set_state(PackState::PackStandby);
                self.standby_sound();
            } else if io.wand_standby() {
                self.set_state(PackState::WandStandby);
                self.standby_sound();
            } else {
                self.set_state(PackState::Off);
                self.begin_powerdown(now);
            }
        } else if !song_playing && io.fire() {
            let variant = self.config.variant;
            let slime = self.context.mode.is_slime()
                && matches!(variant, DeviceVariant::TvgFade | DeviceVariant::AfterlifeTvg);
            let next = if slime {
                PackState::SlimeFire
            } else {
                PackState::Fire
            };
            self.set_state(next);
            self.egg.fire();
            self.queue_fire_cue(FireCue::Start);
            if variant.is_ring_style() && next == PackState::Fire {
                self.begin_fire_spin_up(io, now);
            }
        } else {
            self.hum(voice);
            self.egg_monitor();
            self.adj_monitor(io, now);
            self.mode_monitor(io, now);
            self.vent_monitor(io);
        }
    }

    fn state_fire<I, V>(&mut self, now: Instant, io: &mut I, voice: &V)
    where
        I: PackIo,
        V: VoiceSink,
    {
        if !io.fire() {
            if self.config.variant.is_ring_style() {
                self.set_state(PackState::FireCooldown);
                self.begin_cooldown(io, now);
            } else {
                self.set_state(PackState::Idle);
            }
            self.queue_fire_cue(FireCue::End);
            self.future.stop();
            io.clear_fire_tap();
        } else if self.heat.is_beeping() {
            if self.config.features.overheat {
                self.set_state(PackState::Overheat);
                self.queue_fire_cue(FireCue::BeepFire);
            } else {
                self.heat.reset();
            }
        } else if !voice.is_playing() {
            self.queue_fire_cue(FireCue::Start);
        }
        self.adj_monitor(io, now);
    }

    fn state_slime_fire<I, V>(&mut self, now: Instant, io: &mut I, voice: &V)
    where
        I: PackIo,
        V: VoiceSink,
    {
        if !io.fire() {
            self.set_state(PackState::Idle);
            self.queue_fire_cue(FireCue::End);
            self.future.stop();
            io.clear_fire_tap();
            self.queue(Step::FireRelease);
        } else if self.heat.needs_autovent() {
            self.set_state(PackState::Idle);
            self.queue_fire_cue(FireCue::BeepEnd);
            self.queue_sound_end(SoundWait::UNTIL_END);
            self.queue(Step::Run(Task::Hum));
            self.queue(Step::Run(Task::ResetHeat));
            self.queue(Step::FireRelease);
            self.queue(Step::Run(Task::ClearSongToggle));
        } else if !voice.is_playing() {
            self.queue_fire_cue(FireCue::Start);
        }
        self.adj_monitor(io, now);
    }

    fn state_overheat<I, V>(&mut self, now: Instant, io: &mut I, voice: &V)
    where
        I: PackIo,
        V: VoiceSink,
    {
        if io.fire() {
            if self.heat.needs_autovent() {
                self.set_state(PackState::Autovent);
                self.queue_fire_cue(FireCue::BeepEnd);
            } else if !voice.is_playing() {
                self.queue_fire_cue(FireCue::BeepFire);
            }
        } else {
            self.set_state(PackState::OverheatBeep);
            self.queue_fire_cue(FireCue::BeepEnd);
            self.queue_sound_end(SoundWait::UNTIL_END);
            io.clear_fire_tap();
        }
        self.adj_monitor(io, now);
    }

    fn state_overheat_beep<I: PackIo>(&mut self, now: Instant, io: &mut I) {
        if !self.heat.is_beeping() {
            self.set_state(PackState::Idle);
        } else if io.fire() {
            self.set_state(PackState::Overheat);
            self.queue_fire_cue(FireCue::Start);
            self.queue_fire_cue(FireCue::BeepFire);
            io.clear_fire_tap();
        } else {
            self.queue(Step::Sound(sound::OVERHEAT_BEEP));
            self.queue_sound_end(SoundWait::UNTIL_END);
        }
        self.adj_monitor(io, now);
    }
}
