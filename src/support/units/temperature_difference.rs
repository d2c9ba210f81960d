use uom::si::{
    f64::{TemperatureInterval, ThermodynamicTemperature},
    temperature_interval::kelvin as delta_kelvin,
    thermodynamic_temperature::kelvin as abs_kelvin,
};

/// Temperature differences as intervals.
///
/// `uom` treats the difference of two absolute temperatures as another
/// absolute temperature, which multiplies wrongly against a heat capacity.
/// [`minus`](Self::minus) yields a [`TemperatureInterval`] so that
/// `cp * t.minus(t_ref)` is a specific enthalpy.
pub trait TemperatureDifference {
    /// `self − other`.
    fn minus(self, other: Self) -> TemperatureInterval;
}

impl TemperatureDifference for ThermodynamicTemperature {
    fn minus(self, other: Self) -> TemperatureInterval {
        TemperatureInterval::new::<delta_kelvin>(
            self.get::<abs_kelvin>() - other.get::<abs_kelvin>(),
        )
    }
}
