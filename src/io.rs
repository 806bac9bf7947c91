//! Collaborator interfaces consumed by the pack
//!
//! Switch sampling, dial conversion and the voice module transport live
//! outside this crate. The pack only sees clean levels and edges through
//! [`PackIo`] and drives sounds through [`VoiceSink`].

use core::cell::Cell;

use critical_section::Mutex;

/// Analog dial inputs
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dial {
    /// Gauge cycle time
    Speed,
    /// Ring size selection
    Ring,
}

/// Debounced switch levels, edges and the two wand-facing outputs
pub trait PackIo {
    /// Main power switch
    fn power_switch(&self) -> bool;

    /// Pack-only power switch level
    fn pack_power_switch(&self) -> bool;

    /// Latched pack-only power-up request
    fn pack_power_request(&self) -> bool;

    fn clear_pack_power_request(&mut self);

    fn fire(&self) -> bool;

    /// Latched fire tap edge
    fn fire_tap(&self) -> bool;

    fn clear_fire_tap(&mut self);

    fn vent(&self) -> bool;

    /// Wand requests standby power while the main switch is off
    fn wand_standby(&self) -> bool {
        !self.power_switch() && self.vent()
    }

    fn song_switch(&self) -> bool;

    /// Latched song switch edge
    fn song_toggle(&self) -> bool;

    fn clear_song_toggle(&mut self);

    /// Dial reading in 0..=4095
    fn dial(&self, dial: Dial) -> u16;

    fn set_vent_light(&mut self, on: bool);

    /// Tell the wand the pack is busy venting
    fn signal_wand(&mut self, busy: bool);
}

/// Voice/effects track
pub trait VoiceSink {
    /// Start playing sound `index`, replacing whatever plays
    fn start(&mut self, index: u8);

    fn is_playing(&self) -> bool;

    fn stop(&mut self);
}

/// Early exit conditions of a sound wait
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SoundWait {
    pub abort_on_fire: bool,
    pub abort_on_power_loss: bool,
}

impl SoundWait {
    /// Wait for the sound to end, whatever the user does
    pub const UNTIL_END: Self = Self {
        abort_on_fire: false,
        abort_on_power_loss: false,
    };

    /// Stop waiting when the user fires or powers the pack down
    pub const INTERRUPTIBLE: Self = Self {
        abort_on_fire: true,
        abort_on_power_loss: true,
    };

    /// Whether the current inputs end the wait early
    pub fn aborted<I: PackIo + ?Sized>(&self, io: &I) -> bool {
        if self.abort_on_fire && io.fire() {
            return true;
        }
        self.abort_on_power_loss && has_lost_power(io)
    }
}

/// No power source is asking for the pack to stay on
pub fn has_lost_power<I: PackIo + ?Sized>(io: &I) -> bool {
    !io.power_switch() && !io.pack_power_switch() && !io.wand_standby()
}

/// Edge latch shared between a debouncer interrupt and the control loop
///
/// Each bit is one latched edge. The interrupt side raises bits, the
/// [`PackIo`] implementation reads and clears them.
pub struct SwitchLatch {
    bits: Mutex<Cell<u8>>,
}

impl SwitchLatch {
    pub const FIRE_TAP: u8 = 0x01;
    pub const SONG_TOGGLE: u8 = 0x02;
    pub const PACK_POWER_REQUEST: u8 = 0x04;

    pub const fn new() -> Self {
        Self {
            bits: Mutex::new(Cell::new(0)),
        }
    }

    pub fn raise(&self, mask: u8) {
        critical_section::with(|cs| {
            let bits = self.bits.borrow(cs);
            bits.set(bits.get() | mask);
        });
    }

    pub fn is_raised(&self, mask: u8) -> bool {
        critical_section::with(|cs| self.bits.borrow(cs).get() & mask != 0)
    }

    pub fn clear(&self, mask: u8) {
        critical_section::with(|cs| {
            let bits = self.bits.borrow(cs);
            bits.set(bits.get() & !mask);
        });
    }

    /// Read and clear in one critical section
    pub fn take(&self, mask: u8) -> bool {
        critical_section::with(|cs| {
            let bits = self.bits.borrow(cs);
            let raised = bits.get() & mask != 0;
            bits.set(bits.get() & !mask);
            raised
        })
    }
}

impl Default for SwitchLatch {
    fn default() -> Self {
        Self::new()
    }
}
