//! Idle easter egg
//!
//! While the pack idles, a random delay later it plays a call sound and
//! opens a short window. Firing inside the window plays the matching reply.
//!
//! The primary countdown doubles as the phase marker: values above
//! [`PRIMARY_DUE`] count down, the low values are sentinels.

use fastrand::Rng;

#[cfg(feature = "esp32-log")]
use esp_println::println;

/// Timer is idle and will be re-armed on the next poll
pub const PRIMARY_IDLE: u32 = 0;
/// User fired during the window, reply is due
pub const PRIMARY_REPLY: u32 = 1;
/// Call sound played, waiting for the user
pub const PRIMARY_AWAITING: u32 = 2;
/// Countdown finished, call sound is due
pub const PRIMARY_DUE: u32 = 3;

/// Timer ticks per second
pub const TICKS_PER_SECOND: u32 = 240;

const MIN_DELAY_SECONDS: u32 = 30;
const MAX_DELAY_SECONDS: u32 = 120;
const RESPONSE_SECONDS: u32 = 3;

/// Call and reply sound pairs
pub const SOUND_PAIRS: [(u8, u8); 16] = [
    (63, 81),
    (64, 80),
    (65, 78),
    (66, 79),
    (67, 80),
    (68, 82),
    (69, 84),
    (70, 83),
    (71, 85),
    (72, 87),
    (73, 86),
    (74, 88),
    (75, 82),
    (76, 81),
    (76, 89),
    (77, 85),
];

/// Sound the egg asks the pack to play
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EggSound {
    Call(u8),
    Reply(u8),
}

impl EggSound {
    pub const fn index(self) -> u8 {
        match self {
            Self::Call(index) | Self::Reply(index) => index,
        }
    }
}

#[derive(Debug, Clone)]
pub struct EasterEggTimer {
    primary: u32,
    response: u32,
    pair: usize,
    rng: Rng,
}

impl EasterEggTimer {
    pub fn new(seed: u64) -> Self {
        Self {
            primary: PRIMARY_IDLE,
            response: 0,
            pair: 0,
            rng: Rng::with_seed(seed),
        }
    }

    /// Advance one tick
    pub fn on_tick(&mut self) {
        if self.primary > PRIMARY_DUE {
            self.response = 0;
            self.primary -= 1;
        } else if self.primary == PRIMARY_AWAITING && self.response == 0 {
            self.primary = PRIMARY_IDLE;
        } else if self.response > 0 {
            self.response -= 1;
        }
    }

    /// Poll from the idle loop
    ///
    /// Arms the countdown when idle and returns the sound to play when one
    /// is due. A playing song parks the timer.
    pub fn poll(&mut self, enabled: bool, song_playing: bool) -> Option<EggSound> {
        if !enabled {
            self.clear();
            return None;
        }
        if song_playing {
            self.primary = PRIMARY_IDLE;
            return None;
        }
        match self.primary {
            PRIMARY_IDLE => {
                self.arm();
                None
            }
            PRIMARY_DUE => {
                self.response = RESPONSE_SECONDS * TICKS_PER_SECOND;
                self.primary = PRIMARY_AWAITING;
                Some(EggSound::Call(SOUND_PAIRS[self.pair].0))
            }
            PRIMARY_AWAITING if self.response == 0 => {
                self.primary = PRIMARY_IDLE;
                None
            }
            PRIMARY_REPLY => {
                self.primary = PRIMARY_IDLE;
                Some(EggSound::Reply(SOUND_PAIRS[self.pair].1))
            }
            _ => None,
        }
    }

    /// The user fired; answers an open window
    pub fn fire(&mut self) {
        if self.primary == PRIMARY_AWAITING {
            self.primary = PRIMARY_REPLY;
        }
    }

    pub fn clear(&mut self) {
        self.primary = PRIMARY_IDLE;
        self.response = 0;
    }

    pub const fn primary(&self) -> u32 {
        self.primary
    }

    pub const fn response(&self) -> u32 {
        self.response
    }

    fn arm(&mut self) {
        let seconds = self.rng.u32(MIN_DELAY_SECONDS..MAX_DELAY_SECONDS);
        self.primary = seconds * TICKS_PER_SECOND;

        let mut pair = self.rng.usize(..SOUND_PAIRS.len());
        if pair == self.pair {
            pair = (pair + 1 + self.rng.usize(..SOUND_PAIRS.len() - 1)) % SOUND_PAIRS.len();
        }
        self.pair = pair;

        #[cfg(feature = "esp32-log")]
        println!(
            "[EasterEggTimer.arm] next call in {}s, pair {}",
            seconds, self.pair
        );
    }
}
