//! NASA 7-coefficient species thermodynamics.
//!
//! Coefficients are the GRI-Mech 3.0 fits. Each species has a low range
//! (200 K to `t_mid`) and a high range (`t_mid` to 3500 K, 5000 K for argon):
//!
//! ```text
//! cp/R  = a0 + a1·T + a2·T² + a3·T³ + a4·T⁴
//! h/RT  = a0 + a1·T/2 + a2·T²/3 + a3·T³/4 + a4·T⁴/5 + a5/T
//! s°/R  = a0·ln T + a1·T + a2·T²/2 + a3·T³/3 + a4·T⁴/4 + a6
//! ```
//!
//! Enthalpies include the heat of formation, so a reacting mixture conserves
//! energy without a separate heat-release term.

use crate::support::thermo::fluid::Species;

/// Universal gas constant, J/(mol·K).
pub(super) const GAS_CONSTANT: f64 = 8.314_462_618;

/// Standard-state pressure of the fits, Pa.
pub(super) const REFERENCE_PRESSURE: f64 = 101_325.0;

#[derive(Debug, Clone, Copy)]
pub(super) struct Nasa7 {
    t_mid: f64,
    low: [f64; 7],
    high: [f64; 7],
}

impl Nasa7 {
    fn coefficients(&self, t: f64) -> &[f64; 7] {
        if t < self.t_mid { &self.low } else { &self.high }
    }

    /// Dimensionless heat capacity, `cp/R`.
    pub(super) fn cp_r(&self, t: f64) -> f64 {
        let a = self.coefficients(t);
        a[0] + t * (a[1] + t * (a[2] + t * (a[3] + t * a[4])))
    }

    /// Dimensionless enthalpy, `h/RT`.
    pub(super) fn h_rt(&self, t: f64) -> f64 {
        let a = self.coefficients(t);
        a[0] + t * (a[1] / 2.0 + t * (a[2] / 3.0 + t * (a[3] / 4.0 + t * a[4] / 5.0))) + a[5] / t
    }

    /// Dimensionless standard-state entropy, `s°/R`.
    pub(super) fn s_r(&self, t: f64) -> f64 {
        let a = self.coefficients(t);
        a[0] * t.ln() + t * (a[1] + t * (a[2] / 2.0 + t * (a[3] / 3.0 + t * a[4] / 4.0))) + a[6]
    }

    /// Dimensionless standard-state Gibbs energy, `g°/RT`.
    pub(super) fn g_rt(&self, t: f64) -> f64 {
        self.h_rt(t) - self.s_r(t)
    }
}

pub(super) fn polynomial(species: Species) -> &'static Nasa7 {
    match species {
        Species::H2 => &H2,
        Species::O2 => &O2,
        Species::H2O => &H2O,
        Species::N2 => &N2,
        Species::Ar => &AR,
    }
}

const H2: Nasa7 = Nasa7 {
    t_mid: 1000.0,
    low: [
        2.344_331_12,
        7.980_520_75e-3,
        -1.947_815_10e-5,
        2.015_720_94e-8,
        -7.376_117_61e-12,
        -917.935_173,
        0.683_010_238,
    ],
    high: [
        3.337_279_2,
        -4.940_247_31e-5,
        4.994_567_78e-7,
        -1.795_663_94e-10,
        2.002_553_76e-14,
        -950.158_922,
        -3.205_023_31,
    ],
};

const O2: Nasa7 = Nasa7 {
    t_mid: 1000.0,
    low: [
        3.782_456_36,
        -2.996_734_16e-3,
        9.847_302_01e-6,
        -9.681_295_09e-9,
        3.243_728_37e-12,
        -1_063.943_56,
        3.657_675_73,
    ],
    high: [
        3.282_537_84,
        1.483_087_54e-3,
        -7.579_666_69e-7,
        2.094_705_55e-10,
        -2.167_177_94e-14,
        -1_088.457_72,
        5.453_231_29,
    ],
};

const H2O: Nasa7 = Nasa7 {
    t_mid: 1000.0,
    low: [
        4.198_640_56,
        -2.036_434_1e-3,
        6.520_402_11e-6,
        -5.487_970_62e-9,
        1.771_978_17e-12,
        -30_293.726_7,
        -0.849_032_208,
    ],
    high: [
        3.033_992_49,
        2.176_918_04e-3,
        -1.640_725_18e-7,
        -9.704_198_7e-11,
        1.682_009_92e-14,
        -30_004.297_1,
        4.966_770_1,
    ],
};

const N2: Nasa7 = Nasa7 {
    t_mid: 1000.0,
    low: [
        3.298_677,
        1.408_240_4e-3,
        -3.963_222e-6,
        5.641_515e-9,
        -2.444_854e-12,
        -1_020.899_9,
        3.950_372,
    ],
    high: [
        2.926_64,
        1.487_976_8e-3,
        -5.684_76e-7,
        1.009_703_8e-10,
        -6.753_351e-15,
        -922.797_7,
        5.980_528,
    ],
};

const AR: Nasa7 = Nasa7 {
    t_mid: 1000.0,
    low: [2.5, 0.0, 0.0, 0.0, 0.0, -745.375, 4.366],
    high: [2.5, 0.0, 0.0, 0.0, 0.0, -745.375, 4.366],
};
