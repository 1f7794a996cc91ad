//! Typed client for the partner listing-syndication API.
//!
//! The partner distributes a paid listing to external real-estate portals.
//! Its REST API works in four resources: the agency account, properties
//! (the physical object), listings (a publication of a property), and
//! targets (the individual portals a listing is pushed to).

pub mod client;

pub use client::{
    Account, PortalListing, Property, PropertyInput, PublishInput, SyndicationClient,
    SyndicationConfig, SyndicationError, Target,
};
