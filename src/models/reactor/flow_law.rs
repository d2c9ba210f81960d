use uom::si::{
    f64::{Mass, MassRate, Pressure, ThermodynamicTemperature, Time, Volume},
    mass_rate::kilogram_per_second,
};

use crate::support::{
    constraint::{Constrained, ConstraintResult, NonNegative, StrictlyPositive},
    units::FlowCoefficient,
};

/// What a flow law can see of the reactor it feeds.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ReactorView {
    pub time: Time,
    pub volume: Volume,
    pub mass: Mass,
    pub pressure: Pressure,
    pub temperature: ThermodynamicTemperature,
}

/// Mass flow rate drawn by an inlet, as a function of the reactor state.
///
/// Any `Fn(&ReactorView) -> MassRate` closure is a flow law.
pub trait FlowLaw {
    fn mass_rate(&self, reactor: &ReactorView) -> MassRate;
}

impl<F> FlowLaw for F
where
    F: Fn(&ReactorView) -> MassRate,
{
    fn mass_rate(&self, reactor: &ReactorView) -> MassRate {
        self(reactor)
    }
}

/// A fixed mass flow rate.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ConstantFlow(Constrained<MassRate, NonNegative>);

impl ConstantFlow {
    /// # Errors
    ///
    /// Returns an error if `mass_rate` is negative or `NaN`.
    pub fn new(mass_rate: MassRate) -> ConstraintResult<Self> {
        Ok(Self(NonNegative::new(mass_rate)?))
    }

    #[must_use]
    pub fn from_constrained(mass_rate: Constrained<MassRate, NonNegative>) -> Self {
        Self(mass_rate)
    }
}

impl FlowLaw for ConstantFlow {
    fn mass_rate(&self, _reactor: &ReactorView) -> MassRate {
        self.0.into_inner()
    }
}

/// Feeds the reactor at `m / τ`, holding its residence time at `τ`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ResidenceTimeFlow {
    residence_time: Constrained<Time, StrictlyPositive>,
}

impl ResidenceTimeFlow {
    /// # Errors
    ///
    /// Returns an error if `residence_time` is not strictly positive.
    pub fn new(residence_time: Time) -> ConstraintResult<Self> {
        Ok(Self {
            residence_time: StrictlyPositive::new(residence_time)?,
        })
    }

    #[must_use]
    pub fn residence_time(&self) -> Time {
        self.residence_time.into_inner()
    }
}

impl FlowLaw for ResidenceTimeFlow {
    fn mass_rate(&self, reactor: &ReactorView) -> MassRate {
        reactor.mass / self.residence_time.into_inner()
    }
}

/// How a well-mixed reactor releases mass.
///
/// Both variants are proportional controllers on the pressure difference to
/// the downstream reservoir, and neither lets flow run backwards.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Outlet {
    /// Follows the inlet flow and corrects toward the downstream pressure,
    /// `ṁ_out = max(ṁ_in + K·(P − P_down), 0)`.
    PressureController {
        coefficient: FlowCoefficient,
        downstream: Pressure,
    },
    /// Flow proportional to the pressure drop, `ṁ_out = max(K·(P − P_down), 0)`.
    Valve {
        coefficient: FlowCoefficient,
        downstream: Pressure,
    },
}

impl Outlet {
    #[must_use]
    pub fn mass_rate(&self, inflow: MassRate, pressure: Pressure) -> MassRate {
        let zero = MassRate::new::<kilogram_per_second>(0.0);
        let rate = match *self {
            Self::PressureController {
                coefficient,
                downstream,
            } => inflow + coefficient * (pressure - downstream),
            Self::Valve {
                coefficient,
                downstream,
            } => coefficient * (pressure - downstream),
        };
        if rate > zero { rate } else { zero }
    }

    #[must_use]
    pub fn coefficient(&self) -> FlowCoefficient {
        match *self {
            Self::PressureController { coefficient, .. } | Self::Valve { coefficient, .. } => {
                coefficient
            }
        }
    }

    #[must_use]
    pub fn downstream(&self) -> Pressure {
        match *self {
            Self::PressureController { downstream, .. } | Self::Valve { downstream, .. } => {
                downstream
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use approx::assert_relative_eq;
    use uom::si::{
        mass::kilogram, pressure::pascal, thermodynamic_temperature::kelvin, time::second,
        volume::cubic_meter,
    };

    fn view(mass: f64, pressure: f64) -> ReactorView {
        ReactorView {
            time: Time::new::<second>(0.0),
            volume: Volume::new::<cubic_meter>(1.0),
            mass: Mass::new::<kilogram>(mass),
            pressure: Pressure::new::<pascal>(pressure),
            temperature: ThermodynamicTemperature::new::<kelvin>(1000.0),
        }
    }

    fn coefficient(k: f64) -> FlowCoefficient {
        MassRate::new::<kilogram_per_second>(k) / Pressure::new::<pascal>(1.0)
    }

    #[test]
    fn residence_time_flow_scales_with_mass() {
        let law = ResidenceTimeFlow::new(Time::new::<second>(0.5)).unwrap();
        assert_relative_eq!(
            law.mass_rate(&view(2.0, 1e5)).get::<kilogram_per_second>(),
            4.0
        );
        assert!(ResidenceTimeFlow::new(Time::new::<second>(0.0)).is_err());
    }

    #[test]
    fn closures_are_flow_laws() {
        let law = |reactor: &ReactorView| reactor.mass / Time::new::<second>(1.0);
        assert_relative_eq!(
            law.mass_rate(&view(3.0, 1e5)).get::<kilogram_per_second>(),
            3.0
        );
    }

    #[test]
    fn outlets_never_reverse() {
        let downstream = Pressure::new::<pascal>(1e5);
        let inflow = MassRate::new::<kilogram_per_second>(0.5);

        let controller = Outlet::PressureController {
            coefficient: coefficient(0.01),
            downstream,
        };
        let at = |p: f64| {
            controller
                .mass_rate(inflow, Pressure::new::<pascal>(p))
                .get::<kilogram_per_second>()
        };
        assert_relative_eq!(at(1e5), 0.5);
        assert_relative_eq!(at(1e5 + 10.0), 0.6, epsilon = 1e-12);
        assert_eq!(at(1e5 - 100.0), 0.0);

        let valve = Outlet::Valve {
            coefficient: coefficient(0.01),
            downstream,
        };
        assert_relative_eq!(
            valve
                .mass_rate(inflow, Pressure::new::<pascal>(1e5 + 20.0))
                .get::<kilogram_per_second>(),
            0.2,
            epsilon = 1e-12
        );
        assert_eq!(
            valve
                .mass_rate(inflow, Pressure::new::<pascal>(0.5e5))
                .get::<kilogram_per_second>(),
            0.0
        );
    }
}
