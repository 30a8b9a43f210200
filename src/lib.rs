//! Forwards form submissions to a Mailchimp audience.
//!
//! The core is `forwarder::SubscriberForwarder::process`, which turns one
//! submission into at most one `POST /lists/{list_id}/members` request and
//! reports the outcome through a `connector_log::ConnectorLog`. Everything
//! else (`startup`, `routes`) wraps it in a small webhook server for the form
//! host.

pub mod configuration;
pub mod connector;
pub mod connector_log;
pub mod domain;
pub mod forwarder;
pub mod mailchimp_client;
pub mod routes;
pub mod startup;
pub mod telemetry;
