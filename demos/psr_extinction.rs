//! Shortens the residence time of a hydrogen-air stirred reactor until the
//! flame blows out, then plots outlet temperature against residence time.
//!
//! ```text
//! cargo run --example psr_extinction
//! cargo run --example psr_extinction -- 0.4
//! ```
//!
//! The optional argument is the equivalence ratio (default 0.5).

use std::error::Error;

use twine_microturbine::{
    models::{
        combustion::{ContinuationEvent, ExtinctionConfig, PsrExtinction, premixed_inlet, sweep},
        reactor::StirredReactor,
    },
    support::thermo::{
        fluid::{Composition, Species},
        model::IdealGasMixture,
    },
};
use twine_observers::{PlotObserver, ShowConfig};
use uom::si::{
    f64::{MassRate, Pressure, ThermodynamicTemperature, Time},
    mass_rate::kilogram_per_second,
    pressure::pascal,
    thermodynamic_temperature::kelvin,
    time::second,
};

fn main() -> Result<(), Box<dyn Error>> {
    tracing_subscriber::fmt::init();

    let phi = std::env::args()
        .nth(1)
        .as_deref()
        .map(str::parse::<f64>)
        .transpose()?
        .unwrap_or(0.5);

    let thermo = IdealGasMixture::new();
    let inlet = premixed_inlet(
        &Composition::pure(Species::H2),
        &"O2:1, N2:3.76".parse::<Composition>()?,
        phi,
        ThermodynamicTemperature::new::<kelvin>(700.0),
        Pressure::new::<pascal>(3e5),
        MassRate::new::<kilogram_per_second>(1.0),
        &thermo,
    )?;

    let config = ExtinctionConfig::new(
        Time::new::<second>(1e-2),
        0.8,
        ThermodynamicTemperature::new::<kelvin>(1000.0),
        200,
    )?;

    let mut plot = PlotObserver::<1>::new(["Outlet temperature (K)"]);
    let run = sweep(
        &StirredReactor::new(thermo),
        &PsrExtinction { inlet: inlet.state },
        &config,
        |event: &ContinuationEvent| {
            plot.record(
                event.residence_time.get::<second>().log10(),
                [Some(event.temperature.get::<kelvin>())],
            );
            None
        },
    )?;

    println!("termination: {:?}", run.termination());
    if let Some(last) = run.last_burning() {
        println!(
            "last burning point: tau = {:.3e} s, T = {:.1} K",
            last.residence_time.get::<second>(),
            last.temperature.get::<kelvin>()
        );
    }

    plot.show(
        ShowConfig::new()
            .title(&format!(
                "Stirred reactor extinction, H2-air at phi = {phi} (x: log10 residence time [s])"
            ))
            .legend(),
    )?;

    Ok(())
}
