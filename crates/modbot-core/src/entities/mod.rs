//! Domain entities - core business objects

mod punishment;
mod user;
mod warn;

pub use punishment::{Punishment, PunishmentKind};
pub use user::{User, UserInformation};
pub use warn::Warn;
