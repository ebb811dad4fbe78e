//! Moderation events published on the event bus

mod mod_event;

pub use mod_event::{
    CommandPreProcessEvent, EventKind, ModEvent, PunishmentCreateEvent, PunishmentRevokeEvent,
    UserJoinEvent, WarnCreateEvent,
};
