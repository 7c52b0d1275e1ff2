// hs-core/src/units.rs

use uom::si::f64::{
    Energy as UomEnergy, Power as UomPower, Pressure as UomPressure, Ratio as UomRatio,
    ThermodynamicTemperature as UomThermodynamicTemperature, Time as UomTime,
};

// Public canonical unit types (SI, f64)
pub type Energy = UomEnergy;
pub type Power = UomPower;
pub type Pressure = UomPressure;
pub type Ratio = UomRatio;
pub type Temperature = UomThermodynamicTemperature;
pub type Time = UomTime;

#[inline]
pub fn kw(v: f64) -> Power {
    use uom::si::power::kilowatt;
    Power::new::<kilowatt>(v)
}

#[inline]
pub fn bar(v: f64) -> Pressure {
    use uom::si::pressure::bar;
    Pressure::new::<bar>(v)
}

#[inline]
pub fn degc(v: f64) -> Temperature {
    use uom::si::thermodynamic_temperature::degree_celsius;
    Temperature::new::<degree_celsius>(v)
}

#[inline]
pub fn hours(v: f64) -> Time {
    use uom::si::time::hour;
    Time::new::<hour>(v)
}

/// Energy in MWh.
#[inline]
pub fn to_mwh(e: Energy) -> f64 {
    use uom::si::energy::megawatt_hour;
    e.get::<megawatt_hour>()
}

/// Energy of a constant power held over a time span.
#[inline]
pub fn energy_over(p: Power, dt: Time) -> Energy {
    p * dt
}

pub mod constants {
    /// Universal gas constant [J/(mol K)]
    pub const R_UNIVERSAL: f64 = 8.314;

    /// Hydrogen molar mass used by the compressor sizing correlation [kg/mol]
    pub const H2_MOLAR_MASS: f64 = 0.00216;

    /// Thermoneutral voltage of water splitting [V]
    pub const THERMONEUTRAL_VOLTAGE: f64 = 1.48;

    pub const SECONDS_PER_HOUR: f64 = 3600.0;

    pub const J_PER_KWH: f64 = 3.6e6;

    #[inline]
    pub fn h2_specific_gas_constant() -> f64 {
        R_UNIVERSAL / H2_MOLAR_MASS
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn constructors_smoke() {
        let _p = kw(9.45);
        let _b = bar(350.0);
        let _t = degc(25.0);
        let _h = hours(1.0);
    }

    #[test]
    fn power_times_time_in_mwh() {
        let e = energy_over(kw(600.0), hours(1.0 / 60.0));
        assert!((to_mwh(e) - 0.01).abs() < 1e-12);
    }

    #[test]
    fn celsius_to_kelvin() {
        use uom::si::thermodynamic_temperature::kelvin;
        assert!((degc(25.0).get::<kelvin>() - 298.15).abs() < 1e-9);
    }
}
