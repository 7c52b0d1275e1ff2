//! Constant sets for the two electro-thermal units.

/// Which side of the hydrogen balance the unit sits on.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum UnitRole {
    /// Consumes power, produces hydrogen; wear raises the cell voltage.
    Producer,
    /// Consumes hydrogen, produces power; wear lowers the cell voltage.
    Consumer,
}

impl UnitRole {
    /// Sign applied to the wear and cold-operation voltage shifts.
    pub fn voltage_sign(self) -> f64 {
        match self {
            UnitRole::Producer => 1.0,
            UnitRole::Consumer => -1.0,
        }
    }
}

/// How the hydrogen flow of each polarization point is derived.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum HydrogenCurve {
    /// Linear from zero at the lowest current to the design flow at the highest,
    /// scaled by installed units over design units.
    Rated { design_flow_kg_per_h: f64 },
    /// Ideal electrical power of each point times a nominal factor.
    IdealPower { factor_kg_per_kwh: f64 },
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum LengthScaling {
    CubeRoot,
    Linear,
}

/// Geometry and heat transfer data of the lumped thermal model.
///
/// The unit is an equivalent cylinder of length `length_m` and radius
/// `radius_m` inside a steel shell, an air gap and an insulated container.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ThermalParams {
    pub length_m: f64,
    pub radius_m: f64,
    pub length_scaling: LengthScaling,
    pub scale_radius: bool,
    pub shell_thickness_m: f64,
    pub container_radius_m: f64,
    pub insulation_thickness_m: f64,
    /// Convection between the working medium and the shell [W/m²K]
    pub h_internal: Option<f64>,
    /// Convection across the air gap [W/m²K]
    pub h_gap: f64,
    /// Convection from the container to ambient [W/m²K]
    pub h_external: f64,
    /// Shell conduction [W/mK]
    pub k_shell: f64,
    /// Insulation conduction [W/mK]
    pub k_insulation: f64,
    /// Thermal mass per unit of cylinder volume [kg/m³]
    pub fill_density_kg_m3: f64,
    /// [J/kgK]
    pub specific_heat: f64,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct UnitParams {
    pub name: &'static str,
    pub role: UnitRole,
    /// Nominal electrical power of one installed unit [kW]
    pub power_per_unit_kw: f64,
    /// Below this share of nominal power the unit stays off
    pub min_power_fraction: f64,
    /// Unit count of the reference module the geometry and flows refer to
    pub design_units: f64,
    /// Cells in one installed unit (1 for single-cell units)
    pub cells_per_unit: f64,
    /// Polarization curve currents, ascending
    pub current: &'static [f64],
    /// Voltage of one unit at each current, fresh and at nominal temperature [V]
    pub ideal_voltage: &'static [f64],
    /// Factor from table current to amperes
    pub current_to_amps: f64,
    /// Factor from volt x table current to kW
    pub kw_per_volt_current: f64,
    pub hydrogen: HydrogenCurve,
    pub nominal_temperature_c: f64,
    /// Voltage shift per working hour [V/h]
    pub voltage_drift_per_hour: f64,
    /// Voltage shift per kelvin below nominal temperature [V/K]
    pub voltage_per_kelvin: f64,
    /// Rated-point voltage that marks end of life [V]
    pub end_of_life_voltage: f64,
    /// Factor reported before the unit has ever run [kg/kWh]
    pub initial_factor_kg_per_kwh: f64,
    pub thermal: ThermalParams,
}

impl UnitParams {
    /// Voltage of the rated (highest current) point without the temperature term.
    pub fn rated_voltage_after(&self, working_hours: f64) -> f64 {
        let ideal = self.ideal_voltage[self.ideal_voltage.len() - 1];
        ideal + self.role.voltage_sign() * self.voltage_drift_per_hour * working_hours
    }

    pub fn end_of_life_reached(&self, working_hours: f64) -> bool {
        let v = self.rated_voltage_after(working_hours);
        match self.role {
            UnitRole::Producer => v > self.end_of_life_voltage,
            UnitRole::Consumer => v < self.end_of_life_voltage,
        }
    }
}

/// Alkaline electrolyzer, one unit = one cell of 0.5 m².
pub const ELECTROLYZER: UnitParams = UnitParams {
    name: "electrolyzer",
    role: UnitRole::Producer,
    power_per_unit_kw: 9.45,
    min_power_fraction: 0.2,
    design_units: 106.0,
    cells_per_unit: 1.0,
    // 2 and 10 kA/m² over a 0.5 m² cell [kA]
    current: &[1.0, 5.0],
    ideal_voltage: &[1.64, 1.9],
    current_to_amps: 1000.0,
    kw_per_volt_current: 1.0,
    hydrogen: HydrogenCurve::Rated {
        design_flow_kg_per_h: 18.0,
    },
    nominal_temperature_c: 71.0,
    voltage_drift_per_hour: 3e-6,
    voltage_per_kelvin: 5e-3,
    end_of_life_voltage: 2.3,
    initial_factor_kg_per_kwh: 0.018,
    thermal: ThermalParams {
        length_m: 3.0,
        radius_m: 0.3,
        length_scaling: LengthScaling::CubeRoot,
        scale_radius: true,
        shell_thickness_m: 0.004,
        container_radius_m: 1.0,
        insulation_thickness_m: 0.2,
        h_internal: Some(100.0),
        h_gap: 10.0,
        h_external: 20.0,
        k_shell: 52.0,
        k_insulation: 0.05,
        // half-filled with water
        fill_density_kg_m3: 500.0,
        specific_heat: 4190.0,
    },
};

/// PEM fuel cell, one unit = one 96-cell stack.
pub const FUEL_CELL: UnitParams = UnitParams {
    name: "fuel_cell",
    role: UnitRole::Consumer,
    power_per_unit_kw: 13.57,
    min_power_fraction: 0.01,
    design_units: 96.0,
    cells_per_unit: 96.0,
    current: &[0.0, 40.0, 80.0, 120.0, 160.0, 200.0, 230.0, 250.0],
    ideal_voltage: &[94.0, 78.0, 73.0, 69.0, 66.0, 62.0, 59.0, 57.0],
    current_to_amps: 1.0,
    kw_per_volt_current: 1e-3,
    hydrogen: HydrogenCurve::IdealPower {
        factor_kg_per_kwh: 0.059,
    },
    nominal_temperature_c: 60.0,
    voltage_drift_per_hour: 5e-6 * 96.0,
    voltage_per_kelvin: 5e-4 * 96.0,
    end_of_life_voltage: 46.2,
    initial_factor_kg_per_kwh: 0.059,
    thermal: ThermalParams {
        // 16 rows of 0.58 m stacks
        length_m: 0.58 * 16.0,
        // hydraulic radius of a 0.588 m x 0.576 m box
        radius_m: 0.5 * (4.0 * 0.588 * 0.576) / (2.0 * 0.576 + 2.0 * 0.588),
        length_scaling: LengthScaling::Linear,
        scale_radius: false,
        shell_thickness_m: 0.004,
        container_radius_m: 1.0,
        insulation_thickness_m: 0.2,
        h_internal: None,
        h_gap: 10.0,
        h_external: 20.0,
        k_shell: 52.0,
        k_insulation: 0.05,
        fill_density_kg_m3: 2240.0 / 5.0,
        specific_heat: 710.0,
    },
};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tables_are_consistent() {
        for p in [ELECTROLYZER, FUEL_CELL] {
            assert_eq!(p.current.len(), p.ideal_voltage.len(), "{}", p.name);
            assert!(p.current.windows(2).all(|w| w[1] > w[0]), "{}", p.name);
        }
    }

    #[test]
    fn end_of_life_direction() {
        assert!(!ELECTROLYZER.end_of_life_reached(0.0));
        // (2.3 - 1.9) / 3e-6 hours
        assert!(ELECTROLYZER.end_of_life_reached(140_000.0));
        assert!(!FUEL_CELL.end_of_life_reached(0.0));
        // (57 - 46.2) / 4.8e-4 hours
        assert!(FUEL_CELL.end_of_life_reached(23_000.0));
    }
}
