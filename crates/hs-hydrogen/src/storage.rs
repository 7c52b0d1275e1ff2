//! Two-stage hydrogen storage: low-pressure buffer, batch compressor and
//! high-pressure tank.

use crate::error::{HydrogenError, HydrogenResult};
use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageParams {
    pub low_pressure_capacity_kg: f64,
    /// Compressor mass flow while running [kg/h]
    pub compression_rate_kg_per_h: f64,
    /// Buffer fill ratio above which a compression batch starts
    pub arm_fraction: f64,
    /// Initial high-pressure content as a share of its capacity
    pub initial_high_pressure_fraction: f64,
}

impl Default for StorageParams {
    fn default() -> Self {
        Self {
            low_pressure_capacity_kg: 10.0,
            compression_rate_kg_per_h: 60.0,
            arm_fraction: 0.9,
            initial_high_pressure_fraction: 0.1,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CompressorState {
    Idle,
    Running { remaining: u32 },
}

/// Outcome of one compressor step.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Transfer {
    pub moved_kg: f64,
    /// High-pressure tank could not take the full batch increment
    pub blocked: bool,
}

#[derive(Clone, Debug, PartialEq)]
pub struct TankBank {
    low_pressure_capacity_kg: f64,
    high_pressure_capacity_kg: f64,
    low_pressure_kg: f64,
    high_pressure_kg: f64,
    arm_fraction: f64,
    transfer_per_step_kg: f64,
    duration_steps: u32,
    compressor: CompressorState,
}

impl TankBank {
    pub fn new(
        params: &StorageParams,
        high_pressure_capacity_kg: f64,
        timestep_per_hour: u32,
    ) -> HydrogenResult<Self> {
        if !(params.low_pressure_capacity_kg > 0.0) {
            return Err(HydrogenError::InvalidArg {
                what: "low-pressure capacity must be positive",
            });
        }
        if !(params.compression_rate_kg_per_h > 0.0) {
            return Err(HydrogenError::InvalidArg {
                what: "compression rate must be positive",
            });
        }
        if !(params.arm_fraction > 0.0 && params.arm_fraction < 1.0) {
            return Err(HydrogenError::InvalidArg {
                what: "arm fraction must lie in (0, 1)",
            });
        }
        if !(0.0..=1.0).contains(&params.initial_high_pressure_fraction) {
            return Err(HydrogenError::InvalidArg {
                what: "initial high-pressure fraction must lie in [0, 1]",
            });
        }
        if !(high_pressure_capacity_kg.is_finite() && high_pressure_capacity_kg >= 0.0) {
            return Err(HydrogenError::InvalidArg {
                what: "high-pressure capacity must be finite and non-negative",
            });
        }
        if timestep_per_hour == 0 {
            return Err(HydrogenError::InvalidArg {
                what: "timestep_per_hour must be positive",
            });
        }

        let transfer_per_step_kg = params.compression_rate_kg_per_h / timestep_per_hour as f64;
        let duration_steps = (params.low_pressure_capacity_kg / transfer_per_step_kg).ceil() as u32;

        Ok(Self {
            low_pressure_capacity_kg: params.low_pressure_capacity_kg,
            high_pressure_capacity_kg,
            low_pressure_kg: 0.0,
            high_pressure_kg: params.initial_high_pressure_fraction * high_pressure_capacity_kg,
            arm_fraction: params.arm_fraction,
            transfer_per_step_kg,
            duration_steps: duration_steps.max(1),
            compressor: CompressorState::Idle,
        })
    }

    pub fn low_pressure_kg(&self) -> f64 {
        self.low_pressure_kg
    }

    pub fn high_pressure_kg(&self) -> f64 {
        self.high_pressure_kg
    }

    pub fn low_pressure_capacity_kg(&self) -> f64 {
        self.low_pressure_capacity_kg
    }

    pub fn high_pressure_capacity_kg(&self) -> f64 {
        self.high_pressure_capacity_kg
    }

    pub fn total_kg(&self) -> f64 {
        self.low_pressure_kg + self.high_pressure_kg
    }

    pub fn low_pressure_headroom_kg(&self) -> f64 {
        (self.low_pressure_capacity_kg - self.low_pressure_kg).max(0.0)
    }

    pub fn transfer_per_step_kg(&self) -> f64 {
        self.transfer_per_step_kg
    }

    /// Steps of one compression batch.
    pub fn duration_steps(&self) -> u32 {
        self.duration_steps
    }

    pub fn compressor(&self) -> CompressorState {
        self.compressor
    }

    pub fn compressor_running(&self) -> bool {
        matches!(self.compressor, CompressorState::Running { .. })
    }

    /// Advance a running batch by one step. Idle compressors move nothing.
    pub fn compress_step(&mut self) -> Transfer {
        let CompressorState::Running { remaining } = self.compressor else {
            return Transfer::default();
        };

        let wanted = self.transfer_per_step_kg.min(self.low_pressure_kg);
        let headroom = (self.high_pressure_capacity_kg - self.high_pressure_kg).max(0.0);
        let (moved, blocked) = if wanted > headroom {
            (headroom, true)
        } else {
            (wanted, false)
        };

        self.low_pressure_kg = (self.low_pressure_kg - moved).max(0.0);
        self.high_pressure_kg = (self.high_pressure_kg + moved).min(self.high_pressure_capacity_kg);
        self.compressor = match remaining.saturating_sub(1) {
            0 => CompressorState::Idle,
            left => CompressorState::Running { remaining: left },
        };

        Transfer {
            moved_kg: moved,
            blocked,
        }
    }

    /// Put produced hydrogen into the buffer; returns the mass accepted.
    pub fn store(&mut self, hydrogen_kg: f64) -> f64 {
        let accepted = hydrogen_kg.clamp(0.0, self.low_pressure_headroom_kg());
        self.low_pressure_kg = (self.low_pressure_kg + accepted).min(self.low_pressure_capacity_kg);
        accepted
    }

    /// Draw hydrogen, buffer first; returns the mass delivered.
    pub fn withdraw(&mut self, hydrogen_kg: f64) -> f64 {
        let wanted = hydrogen_kg.clamp(0.0, self.total_kg());
        if self.low_pressure_kg > wanted {
            self.low_pressure_kg -= wanted;
        } else {
            let rest = wanted - self.low_pressure_kg;
            self.high_pressure_kg = (self.high_pressure_kg - rest).max(0.0);
            self.low_pressure_kg = 0.0;
        }
        wanted
    }

    /// Start a batch when idle and the buffer is above the arm fraction.
    pub fn arm_if_full(&mut self) -> bool {
        if self.compressor == CompressorState::Idle
            && self.low_pressure_kg / self.low_pressure_capacity_kg > self.arm_fraction
        {
            self.compressor = CompressorState::Running {
                remaining: self.duration_steps,
            };
            true
        } else {
            false
        }
    }
}
