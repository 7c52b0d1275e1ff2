use hs_lifetime::{DEFAULT_HORIZON_YEARS, run_lifetime};
use hs_sim::{PlantConstants, PlantSizing, SimOptions, TimeSeries};

/// Two days of alternating surplus and deficit.
fn series() -> TimeSeries {
    let n = 2 * 1440;
    let wind = (0..n)
        .map(|i| if i % 1440 < 720 { 300.0 } else { 0.0 })
        .collect();
    TimeSeries::new(wind, vec![0.0; n], vec![100.0; n], vec![15.0; n]).unwrap()
}

fn sizing(el: u32, fc: u32) -> PlantSizing {
    PlantSizing {
        electrolyzer_cells: el,
        fuel_cell_stacks: fc,
        battery_kwh: 300.0,
        high_pressure_tank_kg: 500.0,
        pv_increments: 0,
    }
}

#[test]
fn produces_one_row_per_year() {
    let run = run_lifetime(
        &series(),
        &sizing(15, 10),
        &PlantConstants::default(),
        &SimOptions::default(),
        DEFAULT_HORIZON_YEARS,
    )
    .unwrap();

    assert_eq!(run.rows.len(), 20);
    for (i, row) in run.rows.iter().enumerate() {
        assert_eq!(row.year as usize, i + 1);
    }
    assert_eq!(run.rows[0].soh, run.first_year.final_soh);
    assert!(run.first_year.hydrogen_units_ran());
    assert!(!run.projection.nominal_factors);
    assert!(run.rows[1].battery_capacity_kwh > 0.0);
    assert!(run.rows.iter().all(|r| r.energy.load > 0.0));
}

#[test]
fn hydrogen_free_plant_uses_nominal_factors() {
    let run = run_lifetime(
        &series(),
        &sizing(0, 0),
        &PlantConstants::default(),
        &SimOptions::default(),
        DEFAULT_HORIZON_YEARS,
    )
    .unwrap();
    assert!(run.projection.nominal_factors);
    assert!(run.rows.iter().all(|r| r.hydrogen_produced_kg == 0.0));
    assert!(run.rows.iter().all(|r| r.energy.to_hydrogen == 0.0));
}

#[test]
fn later_years_are_reproducible() {
    let a = run_lifetime(&series(), &sizing(15, 10), &PlantConstants::default(), &SimOptions::default(), 5).unwrap();
    let b = run_lifetime(&series(), &sizing(15, 10), &PlantConstants::default(), &SimOptions::default(), 5).unwrap();
    assert_eq!(a.rows, b.rows);
    assert_eq!(a.rows.len(), 5);
}
