use approx::assert_relative_eq;
use twine_core::Model;
use twine_microturbine::{
    models::{
        combustion::{
            PrimaryZone, StagedCombustor, StagedCombustorConfig, StagedCombustorInput,
            premixed_inlet,
        },
        flow::MixerConfig,
        reactor::PlugFlowConfig,
    },
    support::{
        stream::Stream,
        thermo::{
            capability::{HasEnthalpy, StateFrom},
            fluid::{Composition, Species},
            model::IdealGasMixture,
        },
    },
};
use uom::si::{
    area::square_meter,
    f64::{Area, Length, MassRate, Pressure, ThermodynamicTemperature},
    length::meter,
    mass_rate::kilogram_per_second,
    pressure::pascal,
    thermodynamic_temperature::kelvin,
};

#[test]
fn dilution_cools_the_primary_products_and_conserves_energy() {
    let thermo = IdealGasMixture::new();
    let t_in = ThermodynamicTemperature::new::<kelvin>(600.0);
    let p = Pressure::new::<pascal>(3e5);

    let primary = premixed_inlet(
        &Composition::pure(Species::H2),
        &Composition::dry_air(),
        0.6,
        t_in,
        p,
        MassRate::new::<kilogram_per_second>(0.01),
        &thermo,
    )
    .unwrap();
    let dilution = Stream::new(
        thermo.state_from((Composition::dry_air(), t_in, p)).unwrap(),
        MassRate::new::<kilogram_per_second>(0.02),
    )
    .unwrap();

    let config = StagedCombustorConfig::new(
        PrimaryZone::Equilibrium,
        3,
        PlugFlowConfig::new(Length::new::<meter>(0.05), Area::new::<square_meter>(2e-3), 50)
            .unwrap(),
        MixerConfig::default(),
    )
    .unwrap();
    let combustor = StagedCombustor::new(config, thermo);
    let results = combustor
        .call(&StagedCombustorInput { primary, dilution })
        .unwrap();

    assert_eq!(results.sections.len(), 3);

    let t_primary = results.primary.state.temperature.get::<kelvin>();
    let t_exit = results.outlet.state.temperature.get::<kelvin>();
    assert!(600.0 < t_exit && t_exit < t_primary);

    // Each section starts cooler than the one before it.
    let starts: Vec<f64> = results
        .sections
        .iter()
        .map(|section| section.samples[0].state.temperature.get::<kelvin>())
        .collect();
    assert!(starts.windows(2).all(|w| w[1] < w[0]));

    assert_relative_eq!(
        results.outlet.mass_rate().get::<kilogram_per_second>(),
        0.03,
        max_relative = 1e-12
    );

    let energy_in = thermo.enthalpy(&primary.state).unwrap() * primary.mass_rate()
        + thermo.enthalpy(&dilution.state).unwrap() * dilution.mass_rate();
    let energy_out =
        thermo.enthalpy(&results.outlet.state).unwrap() * results.outlet.mass_rate();
    assert_relative_eq!(energy_out.value, energy_in.value, epsilon = 1e-3, max_relative = 1e-8);
}
