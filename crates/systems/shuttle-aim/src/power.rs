use serde::{Deserialize, Serialize};

use shuttle_core::math::clamp01;

/// Charge rate used when `seconds_to_full` is effectively zero.
const INSTANT_CHARGE_RATE: f32 = 1000.0;

/// Hold-to-charge tuning.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChargeConfig {
    /// Seconds for one sweep from 0 to 1.
    pub seconds_to_full: f32,
    /// Sweep back down after reaching 1 instead of holding there.
    pub ping_pong: bool,
    /// Resume from the previous value on the next charge.
    pub keep_last_value: bool,
}

impl Default for ChargeConfig {
    fn default() -> Self {
        Self {
            seconds_to_full: 0.8,
            ping_pong: true,
            keep_last_value: false,
        }
    }
}

impl ChargeConfig {
    /// Fraction gained per second.
    pub fn rate(&self) -> f32 {
        if self.seconds_to_full > 1e-5 {
            1.0 / self.seconds_to_full
        } else {
            INSTANT_CHARGE_RATE
        }
    }
}

/// Power meter advanced by elapsed time while a charge is held.
#[derive(Debug, Clone)]
pub struct PowerMeter {
    config: ChargeConfig,
    value: f32,
    rising: bool,
    charging: bool,
}

impl PowerMeter {
    pub fn new(config: ChargeConfig) -> Self {
        Self {
            config,
            value: 0.0,
            rising: true,
            charging: false,
        }
    }

    pub fn value(&self) -> f32 {
        self.value
    }

    pub fn is_charging(&self) -> bool {
        self.charging
    }

    pub fn begin_charge(&mut self) {
        self.charging = true;
        if !self.config.keep_last_value {
            self.value = 0.0;
            self.rising = true;
        }
    }

    /// Advance the held charge by `dt` seconds and return the current value.
    /// Does nothing while idle.
    pub fn advance(&mut self, dt: f32) -> f32 {
        if !self.charging || dt <= 0.0 {
            return self.value;
        }
        let direction = if self.rising { 1.0 } else { -1.0 };
        self.value += self.config.rate() * dt * direction;

        if self.config.ping_pong {
            if self.value >= 1.0 {
                self.value = 1.0;
                self.rising = false;
            } else if self.value <= 0.0 {
                self.value = 0.0;
                self.rising = true;
            }
        } else {
            self.value = clamp01(self.value);
        }
        self.value
    }

    /// End the charge, returning the released value. `None` when no charge
    /// was in progress.
    pub fn release(&mut self) -> Option<f32> {
        if !self.charging {
            return None;
        }
        self.charging = false;
        tracing::debug!(power = self.value, "Charge released");
        Some(self.value)
    }
}
