//! Greedy per-step power routing across battery and hydrogen path.
//!
//! Order within a step: compressor load, battery, compressor advance,
//! electrolyzer, fuel cell, tank bookkeeping. The same loop serves the
//! full-fidelity year (degrading battery, electro-thermal units) and the
//! reduced years (constant-efficiency battery, fixed factors).

use crate::results::StepRecord;
use crate::timeseries::TimeSeries;
use hs_battery::StorageModel;
use hs_core::{Tolerances, nearly_equal};
use hs_hydrogen::{HydrogenConverter, TankBank};

/// Power window of one conversion unit.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct UnitRating {
    pub nominal_kw: f64,
    /// Power below which the unit stays off
    pub min_kw: f64,
}

/// Sum and count of the conversion factor over active steps.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct ActiveFactor {
    pub sum: f64,
    pub steps: usize,
}

impl ActiveFactor {
    fn push(&mut self, factor: f64) {
        self.sum += factor;
        self.steps += 1;
    }

    /// Mean over active steps, if the unit ever ran [kg/kWh].
    pub fn mean(&self) -> Option<f64> {
        (self.steps > 0).then(|| self.sum / self.steps as f64)
    }
}

/// Running sums of one dispatch run. Powers are summed per step [kW].
#[derive(Clone, Debug, Default, PartialEq)]
pub struct DispatchTotals {
    pub steps: usize,
    pub renewable_kw: f64,
    pub load_kw: f64,
    pub excess_renewable_kw: f64,
    pub deficit_renewable_kw: f64,
    pub excess_after_battery_kw: f64,
    pub deficit_after_battery_kw: f64,
    pub to_hydrogen_kw: f64,
    pub compressor_kw: f64,
    pub fuel_cell_kw: f64,
    pub excess_kw: f64,
    pub deficit_kw: f64,
    pub hydrogen_produced_kg: f64,
    pub hydrogen_compressed_kg: f64,
    pub hydrogen_consumed_kg: f64,
    pub compressor_batches: u32,
    pub electrolyzer_factor: ActiveFactor,
    pub fuel_cell_factor: ActiveFactor,
}

/// Electrolyzer, fuel cell, tanks and compressor.
#[derive(Clone, Debug)]
pub struct HydrogenSystem<E, F> {
    pub electrolyzer: E,
    pub fuel_cell: F,
    pub tanks: TankBank,
    electrolyzer_rating: UnitRating,
    fuel_cell_rating: UnitRating,
    /// Draw while a compression batch runs [kW]
    compressor_kw: f64,
}

impl<E: HydrogenConverter, F: HydrogenConverter> HydrogenSystem<E, F> {
    pub fn new(
        electrolyzer: E,
        electrolyzer_rating: UnitRating,
        fuel_cell: F,
        fuel_cell_rating: UnitRating,
        tanks: TankBank,
        compressor_kw: f64,
    ) -> Self {
        Self {
            electrolyzer,
            fuel_cell,
            tanks,
            electrolyzer_rating,
            fuel_cell_rating,
            compressor_kw,
        }
    }

    pub fn compressor_kw(&self) -> f64 {
        self.compressor_kw
    }

    pub fn electrolyzer_rating(&self) -> UnitRating {
        self.electrolyzer_rating
    }

    pub fn fuel_cell_rating(&self) -> UnitRating {
        self.fuel_cell_rating
    }
}

pub struct Dispatcher<B, E, F> {
    pub battery: B,
    pub hydrogen: Option<HydrogenSystem<E, F>>,
    timestep_per_hour: f64,
    pv_factor: f64,
    totals: DispatchTotals,
}

impl<B, E, F> Dispatcher<B, E, F>
where
    B: StorageModel,
    E: HydrogenConverter,
    F: HydrogenConverter,
{
    pub fn new(
        battery: B,
        hydrogen: Option<HydrogenSystem<E, F>>,
        timestep_per_hour: u32,
        pv_factor: f64,
    ) -> Self {
        Self {
            battery,
            hydrogen,
            timestep_per_hour: timestep_per_hour as f64,
            pv_factor,
            totals: DispatchTotals::default(),
        }
    }

    pub fn totals(&self) -> &DispatchTotals {
        &self.totals
    }

    /// Run every step of the series; the trace is kept when asked for.
    pub fn run(&mut self, series: &TimeSeries, record_trace: bool) -> Vec<StepRecord> {
        let mut trace = Vec::with_capacity(if record_trace { series.len() } else { 0 });
        for i in 0..series.len() {
            let record = self.step(
                i,
                series.wind_kw[i],
                series.pv_kw[i],
                series.load_kw[i],
                series.ambient_c[i],
            );
            if record_trace {
                trace.push(record);
            }
        }
        trace
    }

    pub fn step(&mut self, i: usize, wind_kw: f64, pv_kw: f64, load_kw: f64, ambient_c: f64) -> StepRecord {
        let tph = self.timestep_per_hour;
        let renewable_kw = wind_kw + pv_kw * self.pv_factor;

        let compressor_armed = self
            .hydrogen
            .as_ref()
            .is_some_and(|h| h.tanks.compressor_running());
        let compressor_request = match &self.hydrogen {
            Some(h) if compressor_armed => h.compressor_kw,
            _ => 0.0,
        };
        let requested_kw = load_kw + compressor_request;

        let after_battery_kw = self.battery.dispatch(renewable_kw, requested_kw, i);
        let request_met = after_battery_kw > requested_kw
            || nearly_equal(after_battery_kw, requested_kw, Tolerances::default());

        let mut record = StepRecord {
            step: i,
            renewable_kw,
            load_kw,
            requested_kw,
            after_battery_kw,
            soc: self.battery.soc(),
            soh: self.battery.soh(),
            ..StepRecord::default()
        };

        let mut compressor_kw = 0.0;
        let mut blocked = false;
        if let Some(h) = self.hydrogen.as_mut() {
            if compressor_armed && request_met {
                let transfer = h.tanks.compress_step();
                compressor_kw = h.compressor_kw;
                blocked = transfer.blocked;
                record.compressed_kg = transfer.moved_kg;
                if !h.tanks.compressor_running() {
                    self.totals.compressor_batches += 1;
                }
            }
        }

        // An armed compressor stays part of the request even when it cannot
        // advance, so a shortfall goes to the fuel cell.
        let net_kw = after_battery_kw - requested_kw;
        let excess_battery_kw = net_kw.max(0.0);
        let deficit_battery_kw = (-net_kw).max(0.0);

        let mut electrolyzer_kw = 0.0;
        let mut fuel_cell_kw = 0.0;
        if let Some(h) = self.hydrogen.as_mut() {
            let factor = h.electrolyzer.conversion_factor();
            let mut produced = 0.0;
            if excess_battery_kw > h.electrolyzer_rating.min_kw && factor > 0.0 {
                let mut power = excess_battery_kw.min(h.electrolyzer_rating.nominal_kw);
                produced = power * factor / tph;
                let headroom = h.tanks.low_pressure_headroom_kg();
                if produced > headroom {
                    produced = headroom;
                    power = produced / factor * tph;
                }
                if blocked {
                    produced = 0.0;
                    power = 0.0;
                }
                produced = h.tanks.store(produced);
                electrolyzer_kw = power;
                if produced > 0.0 {
                    self.totals.electrolyzer_factor.push(factor);
                }
            }
            h.electrolyzer.finish_step(produced, ambient_c);

            let factor = h.fuel_cell.conversion_factor();
            let mut consumed = 0.0;
            if deficit_battery_kw > h.fuel_cell_rating.min_kw && factor > 0.0 {
                let mut power = deficit_battery_kw.min(h.fuel_cell_rating.nominal_kw);
                consumed = power * factor / tph;
                let stored = h.tanks.total_kg();
                if consumed > stored {
                    consumed = stored;
                    power = consumed / factor * tph;
                }
                fuel_cell_kw = power;
                if consumed > 0.0 {
                    self.totals.fuel_cell_factor.push(factor);
                }
            }

            if h.tanks.arm_if_full() {
                tracing::trace!(step = i, "compressor armed");
            }
            consumed = h.tanks.withdraw(consumed);
            h.fuel_cell.finish_step(consumed, ambient_c);

            record.hydrogen_produced_kg = produced;
            record.hydrogen_consumed_kg = consumed;
            record.low_pressure_kg = h.tanks.low_pressure_kg();
            record.high_pressure_kg = h.tanks.high_pressure_kg();
        }

        record.compressor_kw = compressor_kw;
        record.electrolyzer_kw = electrolyzer_kw;
        record.fuel_cell_kw = fuel_cell_kw;
        record.excess_kw = excess_battery_kw - electrolyzer_kw;
        record.deficit_kw = deficit_battery_kw - fuel_cell_kw;

        let t = &mut self.totals;
        t.steps += 1;
        t.renewable_kw += renewable_kw;
        t.load_kw += load_kw;
        let mismatch = renewable_kw - load_kw;
        if mismatch > 0.0 {
            t.excess_renewable_kw += mismatch;
        } else {
            t.deficit_renewable_kw -= mismatch;
        }
        t.excess_after_battery_kw += excess_battery_kw;
        t.deficit_after_battery_kw += deficit_battery_kw;
        t.compressor_kw += compressor_kw;
        t.to_hydrogen_kw += electrolyzer_kw;
        t.fuel_cell_kw += fuel_cell_kw;
        t.excess_kw += record.excess_kw;
        t.deficit_kw += record.deficit_kw;
        t.hydrogen_produced_kg += record.hydrogen_produced_kg;
        t.hydrogen_compressed_kg += record.compressed_kg;
        t.hydrogen_consumed_kg += record.hydrogen_consumed_kg;

        record
    }
}
