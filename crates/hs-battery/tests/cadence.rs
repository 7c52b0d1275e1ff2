use hs_battery::{Battery, CycleCountCadence, StorageModel};

/// Two charge/discharge swings per day, 30 days.
fn run(cadence: CycleCountCadence) -> Battery {
    let mut battery = Battery::new(500.0, 0.4, 60, cadence).unwrap();
    for i in 0..(30 * 1440) {
        let minute_of_day = i % 1440;
        let (res, load) = match minute_of_day / 360 {
            0 | 2 => (400.0, 100.0),
            _ => (50.0, 350.0),
        };
        battery.dispatch(res, load, i);
    }
    battery
}

#[test]
fn both_cadences_degrade_and_stay_physical() {
    for cadence in [CycleCountCadence::Daily, CycleCountCadence::Hourly] {
        let b = run(cadence);
        let st = b.state();
        assert!(st.damage > 0.0, "{cadence:?} produced no damage");
        assert!(st.soh < 1.0 && st.soh > 0.7, "{cadence:?} soh {}", st.soh);
        assert!(b.actual_capacity_kwh() < b.nominal_capacity_kwh());
    }
}

#[test]
fn cadences_count_differently() {
    let daily = run(CycleCountCadence::Daily);
    let hourly = run(CycleCountCadence::Hourly);
    assert_ne!(daily.state().damage, hourly.state().damage);
}

#[test]
fn rerun_is_bit_identical() {
    let a = run(CycleCountCadence::Daily);
    let b = run(CycleCountCadence::Daily);
    assert_eq!(a.state(), b.state());
}
