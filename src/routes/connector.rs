use actix_web::HttpResponse;
use serde::Serialize;

use crate::connector::Connector;
use crate::connector::Field;
use crate::connector::MailchimpConnector;

#[derive(Serialize)]
struct ConnectorInfo {
    handle: &'static str,
    name: &'static str,
    fieldset: Vec<Field>,
}

/// `GET /connector`
///
/// Identity and settings schema, for the host's connector registry.
pub async fn connector_info() -> HttpResponse {
    let connector = MailchimpConnector;
    HttpResponse::Ok().json(ConnectorInfo {
        handle: connector.handle(),
        name: connector.name(),
        fieldset: connector.fieldset(),
    })
}
