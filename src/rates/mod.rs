//! Rate resolution, payment sizing and prepayment scheduling

mod schedule;
mod payment;
mod prepayment;

pub use schedule::{RatePath, RateSchedule, RateTrack};
pub use payment::{annuity_payment, periodic_payment, periodic_rate};
pub use prepayment::PrepaymentPolicy;
