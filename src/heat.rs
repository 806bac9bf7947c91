//! Simulated barrel heat
//!
//! A saturating counter bumped once per tick while firing and cooled by the
//! variant's cool factor otherwise.

/// Per-variant heat thresholds
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HeatSettings {
    /// Heat at which the overheat warning starts
    pub start_beep: u16,
    /// Heat at which the pack vents on its own
    pub start_autovent: u16,
    /// Heat shed per tick while not firing
    pub cool_factor: u16,
}

#[derive(Debug, Clone)]
pub struct HeatModel {
    settings: HeatSettings,
    value: u16,
}

impl HeatModel {
    pub const fn new(settings: HeatSettings) -> Self {
        Self { settings, value: 0 }
    }

    /// Advance one tick
    pub fn on_tick(&mut self, firing: bool) {
        self.value = if firing {
            self.value.saturating_add(1)
        } else {
            self.value.saturating_sub(self.settings.cool_factor)
        };
    }

    pub fn reset(&mut self) {
        self.value = 0;
    }

    pub const fn value(&self) -> u16 {
        self.value
    }

    pub const fn settings(&self) -> HeatSettings {
        self.settings
    }

    pub const fn is_beeping(&self) -> bool {
        self.value >= self.settings.start_beep
    }

    pub const fn needs_autovent(&self) -> bool {
        self.value >= self.settings.start_autovent
    }

    /// Ticks of firing left before the autovent threshold
    pub const fn margin(&self) -> u16 {
        self.settings.start_autovent.saturating_sub(self.value)
    }
}
