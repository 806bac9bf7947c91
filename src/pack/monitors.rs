//! Background monitors polled from the state bodies

use embassy_time::{Duration, Instant};

#[cfg(feature = "esp32-log")]
use esp_println::println;

use super::script::{Step, Task};
use super::{Pack, PackState, gauge_cycle_ms};
use crate::animation::{AnimationConfig, FEEDBACK_DURATION, PatternId};
use crate::config::{
    RING_CLASSIC_SPEED_MS, SLIME_QUOTE_BASE_SOUND, SLIME_QUOTE_COUNT, SONG_BASE_SOUND,
    SONG_COUNT, SONG_DEBOUNCE, sound,
};
use crate::io::{Dial, PackIo, SoundWait, VoiceSink};
use crate::transition::Easing;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SongState {
    Idle,
    Debounce { since: Instant },
    Playing,
    Stopping,
}

/// State the monitors carry between polls
#[derive(Debug, Clone)]
pub(super) struct Monitors {
    song_state: SongState,
    song: u8,
    song_playing: bool,
    last_gauge_speed: Option<u16>,
    last_ring_speed: Option<u16>,
    slime_quote: u8,
}

impl Monitors {
    pub(super) const fn new() -> Self {
        Self {
            song_state: SongState::Idle,
            song: SONG_COUNT - 1,
            song_playing: false,
            last_gauge_speed: None,
            last_ring_speed: None,
            slime_quote: 0,
        }
    }

    pub(super) const fn song_playing(&self) -> bool {
        self.song_playing
    }

    /// Another sound took over the voice
    pub(super) fn song_interrupted(&mut self) {
        self.song_playing = false;
    }
}

impl Pack {
    /// Song switch: debounce, start the next song, stop on the next toggle
    pub(super) fn song_monitor<I, V>(&mut self, now: Instant, io: &mut I, voice: &mut V)
    where
        I: PackIo,
        V: VoiceSink,
    {
        if self.monitors.song_state == SongState::Playing && !voice.is_playing() {
            self.monitors.song_playing = false;
            self.monitors.song_state = SongState::Idle;
        }

        match self.monitors.song_state {
            SongState::Idle => {
                if io.song_toggle() && io.song_switch() {
                    io.clear_song_toggle();
                    self.monitors.song_state = SongState::Debounce { since: now };
                }
            }
            SongState::Debounce { since } => {
                let waited = now
                    .checked_duration_since(since)
                    .unwrap_or(Duration::from_millis(0));
                if waited > SONG_DEBOUNCE {
                    self.monitors.song = (self.monitors.song + 1) % SONG_COUNT;
                    let index = SONG_BASE_SOUND + self.monitors.song;
                    self.start_sound(voice, index);
                    self.monitors.song_playing = true;
                    io.clear_song_toggle();
                    self.monitors.song_state = SongState::Playing;

                    #[cfg(feature = "esp32-log")]
                    println!("[Pack.song_monitor] playing song {}", index);
                }
            }
            SongState::Playing => {
                if io.song_toggle() {
                    io.clear_song_toggle();
                    self.monitors.song_state = SongState::Stopping;
                }
            }
            SongState::Stopping => {
                voice.stop();
                self.monitors.song_playing = false;
                io.clear_song_toggle();
                self.monitors.song_state = SongState::Idle;
            }
        }
    }

    /// Play the easter egg call or reply when due
    pub(super) fn egg_monitor(&mut self) {
        let enabled = self.config.features.easter_egg;
        let song_playing = self.monitors.song_playing;
        if let Some(egg) = self.egg.poll(enabled, song_playing) {
            self.queue(Step::Sound(egg.index()));
            self.queue_sound_end(SoundWait::UNTIL_END);
        }
    }

    /// Retune the gauge, and the classic ring, when their speed changes
    pub(super) fn adj_monitor<I: PackIo>(&mut self, io: &I, now: Instant) {
        let heat = self.config.features.overheat.then_some(&self.heat);
        let gauge_speed = gauge_cycle_ms(io.dial(Dial::Speed), heat);
        if self.monitors.last_gauge_speed != Some(gauge_speed) {
            if let Some(animation) = self.powercell.current_animation_mut() {
                animation.set_speed(gauge_speed, Duration::from_millis(0), Easing::Linear, now);
            }
            self.monitors.last_gauge_speed = Some(gauge_speed);
        }

        if self.config.variant.is_ring_style() {
            return;
        }
        if self.monitors.last_ring_speed != Some(RING_CLASSIC_SPEED_MS) {
            if let Some(animation) = self.cyclotron.current_animation_mut() {
                animation.set_speed(
                    RING_CLASSIC_SPEED_MS,
                    Duration::from_millis(0),
                    Easing::Linear,
                    now,
                );
            }
            self.monitors.last_ring_speed = Some(RING_CLASSIC_SPEED_MS);
        }
    }

    /// Fire taps cycle the mode on variants that support it
    pub(super) fn mode_monitor<I: PackIo>(&mut self, io: &mut I, now: Instant) {
        if self.monitors.song_playing || !io.fire_tap() {
            return;
        }
        if self.config.cycles_modes() {
            let previous = self.context.mode;
            let next = previous.next();

            #[cfg(feature = "esp32-log")]
            println!("[Pack.mode_monitor] {:?} -> {:?}", previous, next);

            match previous.major_change() {
                Some(change) => {
                    self.context.mode = next;
                    self.begin_major_mode_change(change, now);
                }
                None => {
                    self.set_mode(next);
                    self.queue(Step::Sound(sound::CHIME));
                    self.queue_sound_end(SoundWait::UNTIL_END);
                }
            }
            self.queue(Step::Run(Task::ResetHeat));
            self.queue(Step::Run(Task::RingColorShift));
        }
        io.clear_fire_tap();
    }

    /// Vent switch with power on: slime quotes or a full vent
    pub(super) fn vent_monitor<I: PackIo>(&mut self, io: &I) {
        if !(io.vent() && io.power_switch()) {
            return;
        }
        if self.context.mode.is_slime() {
            let quote = SLIME_QUOTE_BASE_SOUND + self.monitors.slime_quote;
            self.monitors.slime_quote = (self.monitors.slime_quote + 1) % SLIME_QUOTE_COUNT;
            self.queue(Step::Sound(quote));
            self.queue_sound_end(SoundWait::UNTIL_END);
            self.queue(Step::VentRelease);
        } else {
            self.queue_full_vent();
        }
    }

    /// Follow the ring size dial
    ///
    /// The first reading only sets the size. Later changes blank the ring and
    /// show the size preview while the pack is off.
    pub(super) fn ring_monitor<I: PackIo>(&mut self, io: &I, now: Instant) {
        let first_reading = self.ring.size().is_none();
        match self.ring.update(io.dial(Dial::Ring)) {
            Some(size) => {
                #[cfg(feature = "esp32-log")]
                println!("[Pack.ring_monitor] ring size {}", size.count());

                self.cyclotron.set_active_leds(size.count());
                if matches!(self.context.state, PackState::Off | PackState::Feedback) {
                    self.feedback_request(now);
                }
            }
            None if first_reading => {
                if let Some(size) = self.ring.size() {
                    self.cyclotron.set_active_leds(size.count());
                }
            }
            None => {}
        }
    }

    /// Show or extend the ring size preview
    fn feedback_request(&mut self, now: Instant) {
        self.feedback.deadline = Some(now + FEEDBACK_DURATION);
        if self.context.state != PackState::Feedback {
            self.set_state(PackState::Feedback);
            self.feedback.needs_start = true;
            return;
        }
        let config = AnimationConfig::default().with_leds(self.cyclotron.active_leds());
        match self
            .cyclotron
            .current_animation_mut()
            .and_then(|animation| animation.as_feedback_mut())
        {
            Some(preview) => preview.update_config(config, FEEDBACK_DURATION, now),
            None => self.feedback.needs_start = true,
        }
    }

    pub(super) fn start_feedback(&mut self, now: Instant) {
        self.feedback.needs_start = false;
        self.cyclotron
            .play(PatternId::FeedbackRainbow.to_slot(), AnimationConfig::default(), now);
    }
}
