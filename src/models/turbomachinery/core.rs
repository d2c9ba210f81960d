//! Isentropic-efficiency process shared by both machines.

use uom::si::{
    f64::{Power, Pressure},
    power::watt,
    thermodynamic_temperature::kelvin,
};

use crate::{
    models::StageError,
    support::{
        stream::Stream,
        thermo::{
            State,
            capability::{HasEnthalpy, HasEntropy, HasPressure, StateFrom, ThermoModel},
        },
        units::{SpecificEnthalpy, SpecificEntropy},
    },
};

/// Required thermo model bounds for turbomachinery stages.
#[doc(hidden)]
pub trait TurbomachineryThermoModel<Fluid>:
    ThermoModel<Fluid = Fluid>
    + HasPressure
    + HasEnthalpy
    + HasEntropy
    + StateFrom<(Fluid, Pressure, SpecificEntropy)>
    + StateFrom<(Fluid, Pressure, SpecificEnthalpy)>
{
}

impl<Fluid, T> TurbomachineryThermoModel<Fluid> for T where
    T: ThermoModel<Fluid = Fluid>
        + HasPressure
        + HasEnthalpy
        + HasEntropy
        + StateFrom<(Fluid, Pressure, SpecificEntropy)>
        + StateFrom<(Fluid, Pressure, SpecificEnthalpy)>
{
}

/// Result of a compressor or turbine evaluation.
#[derive(Debug, Clone, PartialEq)]
pub struct MachineResults<Fluid> {
    /// Actual outlet stream, at the same mass flow as the inlet.
    pub outlet: Stream<Fluid>,

    /// Ideal outlet state at the inlet entropy and the outlet pressure.
    pub isentropic_outlet: State<Fluid>,

    /// Magnitude of the ideal specific work, `|h_out,s − h_in|`.
    pub isentropic_work: SpecificEnthalpy,

    /// Magnitude of the actual specific work, `|h_out − h_in|`.
    pub specific_work: SpecificEnthalpy,

    /// Shaft power, `specific_work · ṁ`.
    pub power: Power,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) enum Machine {
    Compressor,
    Turbine,
}

/// Runs the isentropic-efficiency process from `inlet` to `r·P_in`.
///
/// `pressure_ratio` and `efficiency` must already be validated.
///
/// # Errors
///
/// Returns [`StageError::ThermoModelFailed`] if any property evaluation or
/// state construction fails.
pub(super) fn isentropic_process<Fluid, T>(
    machine: Machine,
    inlet: &Stream<Fluid>,
    pressure_ratio: f64,
    efficiency: f64,
    thermo: &T,
) -> Result<MachineResults<Fluid>, StageError>
where
    Fluid: Clone,
    T: TurbomachineryThermoModel<Fluid>,
{
    let p_in = thermo
        .pressure(&inlet.state)
        .map_err(|err| StageError::thermo_failed("pressure(inlet)", err))?;
    let h_in = thermo
        .enthalpy(&inlet.state)
        .map_err(|err| StageError::thermo_failed("enthalpy(inlet)", err))?;
    let s_in = thermo
        .entropy(&inlet.state)
        .map_err(|err| StageError::thermo_failed("entropy(inlet)", err))?;

    let p_out = p_in * pressure_ratio;

    let isentropic_outlet = thermo
        .state_from((inlet.state.fluid.clone(), p_out, s_in))
        .map_err(|err| {
            StageError::thermo_failed(
                format!("isentropic_outlet_state_from(p_out={p_out:?}, s_in={s_in:?})"),
                err,
            )
        })?;

    let h_out_s = thermo
        .enthalpy(&isentropic_outlet)
        .map_err(|err| StageError::thermo_failed("enthalpy(isentropic outlet)", err))?;

    let isentropic_work = (h_out_s - h_in).abs();
    let (specific_work, h_out) = match machine {
        Machine::Compressor => {
            let work = isentropic_work / efficiency;
            (work, h_in + work)
        }
        Machine::Turbine => {
            let work = isentropic_work * efficiency;
            (work, h_in - work)
        }
    };

    let outlet_state = thermo
        .state_from((inlet.state.fluid.clone(), p_out, h_out))
        .map_err(|err| {
            StageError::thermo_failed(
                format!("outlet_state_from(p_out={p_out:?}, h_out={h_out:?})"),
                err,
            )
        })?;

    let power = specific_work * inlet.mass_rate();
    tracing::debug!(
        ?machine,
        pressure_ratio,
        efficiency,
        outlet_temperature_k = outlet_state.temperature.get::<kelvin>(),
        power_w = power.get::<watt>(),
        "machine evaluated"
    );

    Ok(MachineResults {
        outlet: inlet.with_state(outlet_state),
        isentropic_outlet,
        isentropic_work,
        specific_work,
        power,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    use crate::{
        models::test_support::{FakeMode, FakeThermo, fake_stream},
        support::thermo::PropertyError,
    };

    #[test]
    fn state_from_pressure_entropy_failure_is_wrapped() {
        let thermo = FakeThermo {
            mode: FakeMode::FailStateFromPressureEntropy,
        };

        let err =
            isentropic_process(Machine::Compressor, &fake_stream(), 2.0, 0.8, &thermo).unwrap_err();

        match err {
            StageError::ThermoModelFailed { context, source: _ } => {
                assert!(context.contains("isentropic_outlet_state_from("));
                assert!(context.contains("s_in="));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn state_from_pressure_enthalpy_failure_is_wrapped() {
        let thermo = FakeThermo {
            mode: FakeMode::FailStateFromPressureEnthalpy,
        };

        let err =
            isentropic_process(Machine::Turbine, &fake_stream(), 0.5, 0.8, &thermo).unwrap_err();

        match err {
            StageError::ThermoModelFailed { context, source: _ } => {
                assert!(context.starts_with("outlet_state_from("));
                assert!(context.contains("h_out="));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn property_failure_keeps_its_source() {
        let thermo = FakeThermo {
            mode: FakeMode::FailEntropy,
        };

        let err =
            isentropic_process(Machine::Compressor, &fake_stream(), 2.0, 0.8, &thermo).unwrap_err();

        match err {
            StageError::ThermoModelFailed { context, source } => {
                assert_eq!(context, "entropy(inlet)");
                let source = source
                    .downcast_ref::<PropertyError>()
                    .expect("expected PropertyError source");
                assert!(matches!(source, PropertyError::Calculation { .. }));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }
}
