mod connector;
mod health_check;
mod submissions;

pub use connector::connector_info;
pub use health_check::health_check;
pub use submissions::receive_submission;
