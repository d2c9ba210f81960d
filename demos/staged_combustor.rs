//! Burns a lean hydrogen-air mixture in a stirred primary zone and cools it
//! with dilution air injected over four plug-flow sections.
//!
//! ```text
//! cargo run --example staged_combustor
//! ```

use std::error::Error;

use twine_core::Model;
use twine_microturbine::{
    models::{
        combustion::{
            PrimaryZone, StagedCombustor, StagedCombustorConfig, StagedCombustorInput,
            premixed_inlet,
        },
        flow::MixerConfig,
        reactor::{PlugFlowConfig, StirredReactorConfig},
    },
    support::{
        stream::Stream,
        thermo::{
            capability::StateFrom,
            fluid::{Composition, Species},
            model::IdealGasMixture,
        },
    },
};
use uom::si::{
    area::square_meter,
    f64::{Area, Length, MassRate, Pressure, ThermodynamicTemperature, Time},
    length::{centimeter, meter},
    mass_rate::kilogram_per_second,
    pressure::pascal,
    thermodynamic_temperature::kelvin,
    time::second,
};

fn main() -> Result<(), Box<dyn Error>> {
    tracing_subscriber::fmt::init();

    let thermo = IdealGasMixture::new();
    let t_in = ThermodynamicTemperature::new::<kelvin>(450.0);
    let p = Pressure::new::<pascal>(3e5);

    let primary = premixed_inlet(
        &Composition::pure(Species::H2),
        &Composition::dry_air(),
        0.6,
        t_in,
        p,
        MassRate::new::<kilogram_per_second>(0.006),
        &thermo,
    )?;
    let dilution = Stream::new(
        thermo.state_from((Composition::dry_air(), t_in, p))?,
        MassRate::new::<kilogram_per_second>(0.014),
    )?;

    let config = StagedCombustorConfig::new(
        PrimaryZone::StirredReactor {
            residence_time: Time::new::<second>(5e-3),
            config: StirredReactorConfig::default(),
        },
        4,
        PlugFlowConfig::new(Length::new::<meter>(0.05), Area::new::<square_meter>(2e-3), 50)?,
        MixerConfig::default(),
    )?;

    let results =
        StagedCombustor::new(config, thermo).call(&StagedCombustorInput { primary, dilution })?;

    println!(
        "primary zone: {:.1} K",
        results.primary.state.temperature.get::<kelvin>()
    );
    for (i, section) in results.sections.iter().enumerate() {
        let series = section.series();
        let (Some(first), Some(last)) = (series.temperature.first(), series.temperature.last())
        else {
            continue;
        };
        let end = section
            .samples
            .last()
            .map_or(0.0, |sample| sample.position.get::<centimeter>());
        println!(
            "section {}: {first:.1} K -> {last:.1} K over {end:.1} cm",
            i + 1
        );
    }
    println!(
        "outlet: {:.1} K at {:.1} g/s",
        results.outlet.state.temperature.get::<kelvin>(),
        1e3 * results.outlet.mass_rate().get::<kilogram_per_second>()
    );

    Ok(())
}
