use hs_economics::{
    Component, ComponentSizes, EconomicsConfig, PriceTable, ProjectionYear, ReplacementPolicy,
    Technology, lcore,
};

fn prices() -> PriceTable {
    let mut table = PriceTable::default();
    for (tech, p) in [
        (Technology::Battery, [400_000.0, 250_000.0, 150_000.0]),
        (Technology::Electrolyzer, [1200.0, 700.0, 400.0]),
        (Technology::FuelCell, [1500.0, 900.0, 500.0]),
        (Technology::HydrogenTank, [600.0, 450.0, 350.0]),
        (Technology::Pv, [900.0, 600.0, 450.0]),
        (Technology::Wind, [1400.0, 1200.0, 1000.0]),
    ] {
        table.insert(tech, ProjectionYear::Y2020, p[0]);
        table.insert(tech, ProjectionYear::Y2030, p[1]);
        table.insert(tech, ProjectionYear::Y2050, p[2]);
    }
    table
}

fn config() -> EconomicsConfig {
    EconomicsConfig {
        prices: prices(),
        ..EconomicsConfig::default()
    }
}

#[test]
fn capital_and_om_only_matches_hand_computed_cash_flow() {
    // wind and PV only: 25-year lives, no replacement inside 20 years
    let sizes = ComponentSizes {
        pv_kwp: 160.0,
        wind_kw: 800.0,
        ..ComponentSizes::default()
    };
    let cfg = config();
    cfg.validate().unwrap();
    let inputs = cfg.lcore_inputs(&sizes, &[], 3000.0).unwrap();
    let b = lcore(&inputs, &[0.0; 20]).unwrap();

    let capex = 160.0 * 900.0 + 800.0 * 1400.0;
    let om = 0.025 * capex;
    let r: f64 = 0.05;
    let (mut num, mut den) = (capex, 0.0);
    for n in 1..=20 {
        num += om / (1.0 + r).powi(n);
        den += 3000.0 / (1.0 + r).powi(n);
    }
    assert!((b.lcore - num / den).abs() < 1e-9 * (num / den));
    assert!(b.capex[1..].iter().all(|c| *c == 0.0));
}

#[test]
fn saved_energy_override_takes_precedence() {
    let cfg = EconomicsConfig {
        saved_energy_mwh: Some(3007.74),
        ..config()
    };
    let inputs = cfg.lcore_inputs(&ComponentSizes::default(), &[], 10.0).unwrap();
    assert_eq!(inputs.saved_energy_mwh, 3007.74);
}

#[test]
fn extrapolated_lives_move_replacements() {
    let sizes = ComponentSizes {
        battery_mwh: 1.0,
        ..ComponentSizes::default()
    };
    let lives = [(Component::Battery, 6)];

    let nominal = config();
    let items = nominal.cost_items(&sizes, &lives).unwrap();
    let battery = items.iter().find(|i| i.component == Component::Battery).unwrap();
    assert_eq!(battery.life_years, 10);

    let extrapolated = EconomicsConfig {
        replacement_policy: ReplacementPolicy::Extrapolated,
        ..config()
    };
    let items = extrapolated.cost_items(&sizes, &lives).unwrap();
    let battery = items.iter().find(|i| i.component == Component::Battery).unwrap();
    assert_eq!(battery.life_years, 6);

    let a = lcore(&nominal.lcore_inputs(&sizes, &lives, 100.0).unwrap(), &[0.0; 20]).unwrap();
    let b = lcore(&extrapolated.lcore_inputs(&sizes, &lives, 100.0).unwrap(), &[0.0; 20]).unwrap();
    assert!(b.lcore > a.lcore);
}

#[test]
fn missing_year_fails_validation() {
    let mut cfg = config();
    cfg.prices = PriceTable::default();
    cfg.prices.insert(Technology::Pv, ProjectionYear::Y2020, 900.0);
    assert!(cfg.validate().is_err());
}

#[test]
fn yaml_round_trip_of_price_table() {
    let yaml = "battery: {2020: 400000.0, 2030: 250000.0}\npv: {2020: 900.0}\n";
    let table: PriceTable = serde_yaml::from_str(yaml).unwrap();
    assert_eq!(table.price(Technology::Battery, ProjectionYear::Y2030).unwrap(), 250_000.0);
    assert!(serde_yaml::from_str::<PriceTable>("pv: {2040: 1.0}\n").is_err());
}
