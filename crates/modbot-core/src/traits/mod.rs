//! Collaborator traits (ports) - interfaces the core consumes

mod collaborators;

pub use collaborators::{GatewayError, MessagingGateway, StoreError, UserStore};
