//! Supporting utilities shared by the models.
//!
//! - [`units`]: extra [`uom`] quantities.
//! - [`constraint`]: numeric ranges checked at construction.
//! - [`thermo`]: the thermodynamic state provider and its models.
//! - [`stream`]: a flowing fluid, the value passed between stages.

pub mod constraint;
pub mod stream;
pub mod thermo;
pub mod units;
