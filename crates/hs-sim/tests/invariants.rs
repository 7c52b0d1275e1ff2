use hs_sim::{PlantConstants, PlantSizing, SimOptions, TimeSeries, run_full_year};
use proptest::prelude::*;

fn series(steps: &[(f64, f64)]) -> TimeSeries {
    let n = steps.len();
    TimeSeries::new(
        steps.iter().map(|s| s.0).collect(),
        vec![0.0; n],
        steps.iter().map(|s| s.1).collect(),
        vec![10.0; n],
    )
    .unwrap()
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    #[test]
    fn soc_and_tanks_stay_in_bounds(
        steps in proptest::collection::vec((0.0f64..600.0, 0.0f64..400.0), 1..400),
        battery in 0.0f64..400.0,
        tank in 0.0f64..50.0,
        el in 1u32..30,
        fc in 1u32..10,
    ) {
        let sizing = PlantSizing {
            electrolyzer_cells: el,
            fuel_cell_stacks: fc,
            battery_kwh: battery,
            high_pressure_tank_kg: tank,
            pv_increments: 0,
        };
        let opts = SimOptions { record_trace: true, ..SimOptions::default() };
        let r = run_full_year(&series(&steps), &sizing, &PlantConstants::default(), &opts).unwrap();
        let lp_cap = opts.storage.low_pressure_capacity_kg;

        let mut lp_prev = 0.0;
        for s in &r.trace {
            prop_assert!(s.soc >= 0.15 - 1e-12 && s.soc <= 0.95 + 1e-12, "soc {}", s.soc);
            prop_assert!(s.low_pressure_kg >= 0.0 && s.low_pressure_kg <= lp_cap + 1e-12);
            prop_assert!(s.high_pressure_kg >= 0.0 && s.high_pressure_kg <= tank + 1e-9);
            prop_assert!(s.compressed_kg <= lp_prev + 1e-12);
            prop_assert!(s.hydrogen_produced_kg <= lp_cap - (lp_prev - s.compressed_kg) + 1e-12);
            prop_assert!(s.excess_kw >= -1e-9 && s.deficit_kw >= -1e-9);
            lp_prev = s.low_pressure_kg;
        }
    }
}
