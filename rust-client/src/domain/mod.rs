pub mod geography;
pub mod meter;
pub mod receipt;
pub mod user;

pub use geography::{District, InfrastructureSite, Zone};
pub use meter::{Meter, MeterError, MeterReading};
pub use receipt::Receipt;
pub use user::User;
