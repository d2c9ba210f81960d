use uom::{
    si::{ISQ, Quantity, SI},
    typenum::{N1, N2, N3, P1, P2, Z0},
};

/// Specific gas constant, J/kg·K in SI.
pub type SpecificGasConstant = Quantity<ISQ<P2, Z0, N2, Z0, N1, Z0, Z0>, SI<f64>, f64>;

/// Specific enthalpy, J/kg in SI.
pub type SpecificEnthalpy = Quantity<ISQ<P2, Z0, N2, Z0, Z0, Z0, Z0>, SI<f64>, f64>;

/// Specific entropy, J/kg·K in SI.
pub type SpecificEntropy = Quantity<ISQ<P2, Z0, N2, Z0, N1, Z0, Z0>, SI<f64>, f64>;

/// Specific internal energy, J/kg in SI.
pub type SpecificInternalEnergy = Quantity<ISQ<P2, Z0, N2, Z0, Z0, Z0, Z0>, SI<f64>, f64>;

/// Mass flow per unit pressure difference, kg/(s·Pa) (equivalently m·s) in SI.
///
/// Used as the gain `K` of valves and pressure controllers.
pub type FlowCoefficient = Quantity<ISQ<P1, Z0, P1, Z0, Z0, Z0, Z0>, SI<f64>, f64>;

/// Volumetric mass production rate, kg/(m³·s) in SI.
pub type MassProductionRate = Quantity<ISQ<N3, P1, N1, Z0, Z0, Z0, Z0>, SI<f64>, f64>;

/// Power per unit volume, W/m³ in SI.
///
/// Reported as the heat release rate of a reacting mixture.
pub type VolumetricPower = Quantity<ISQ<N1, P1, N3, Z0, Z0, Z0, Z0>, SI<f64>, f64>;
