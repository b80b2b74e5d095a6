pub mod reservation;
pub mod user;
pub mod vehicle;

pub use reservation::{NewReservation, Reservation, ReservationStatus};
pub use user::{RequestContext, Role, User};
pub use vehicle::Vehicle;
