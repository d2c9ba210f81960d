//! Runs the default hydrogen micro gas-turbine cycle and prints the stage
//! results. An optional argument adds a recuperator of that effectiveness.
//!
//! ```text
//! cargo run --example microturbine_cycle
//! cargo run --example microturbine_cycle -- 0.85
//! RUST_LOG=debug cargo run --example microturbine_cycle
//! ```

use std::{env, error::Error};

use twine_microturbine::{
    models::cycle::{self, CycleConfig, RecuperatorConfig},
    support::thermo::{capability::HasPressure, model::IdealGasMixture},
};
use uom::si::{
    f64::Ratio, power::watt, pressure::kilopascal, ratio::ratio,
    thermodynamic_temperature::kelvin,
};

fn main() -> Result<(), Box<dyn Error>> {
    tracing_subscriber::fmt::init();

    let recuperator = match env::args().nth(1) {
        Some(arg) => Some(RecuperatorConfig::new(Ratio::new::<ratio>(arg.parse()?))?),
        None => None,
    };
    let config = CycleConfig {
        recuperator,
        ..CycleConfig::default()
    };

    let thermo = IdealGasMixture::new();
    let report = cycle::run(&config, &thermo)?;

    let stations = [
        ("compressor outlet", &report.compressor.outlet.state),
        ("combustor inlet", &report.mixture.state),
        ("combustor outlet", &report.combustor.state),
        ("turbine outlet", &report.turbine.outlet.state),
    ];
    for (name, state) in stations {
        println!(
            "{name:>18}: {:8.1} K {:8.1} kPa",
            state.temperature.get::<kelvin>(),
            thermo.pressure(state)?.get::<kilopascal>(),
        );
    }

    if let Some(recuperator) = &report.recuperator {
        println!(
            "{:>18}: {:8.1} K ({} iterations, {:.0} W recovered)",
            "preheated air",
            recuperator.air_outlet.state.temperature.get::<kelvin>(),
            recuperator.iterations,
            recuperator.heat_rate.get::<watt>(),
        );
        println!(
            "{:>18}: {:8.1} K",
            "stack",
            recuperator.exhaust_outlet.state.temperature.get::<kelvin>(),
        );
    }

    println!();
    println!("equivalence ratio:  {:.3}", report.equivalence_ratio);
    println!("compressor power:   {:.0} W", report.compressor.power.get::<watt>());
    println!("turbine power:      {:.0} W", report.turbine.power.get::<watt>());
    println!("net power:          {:.0} W", report.net_power.get::<watt>());
    println!("fuel power:         {:.0} W", report.fuel_power.get::<watt>());
    println!(
        "thermal efficiency: {:.1} %",
        100.0 * report.thermal_efficiency.get::<ratio>()
    );

    Ok(())
}
