//! Value objects returned by the directory service.

pub mod model;

pub use model::{
    DirectoryGroup, DirectoryUser, EntityPage, OrganizationRef, PresenceDefinition, UserImage,
};
