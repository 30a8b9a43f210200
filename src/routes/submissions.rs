use actix_web::web;
use actix_web::HttpResponse;

use crate::configuration::FormSettings;
use crate::domain::FormSubmission;
use crate::forwarder::SubscriberForwarder;

/// `POST /submissions`
///
/// Called by the form host once per completed submission, with a JSON
/// `FormSubmission` body. The submission is forwarded to Mailchimp using the
/// config of its form.
///
/// Answers 202 whatever the outcome: a failed forward must never make the
/// host's submission fail. Outcomes are only visible in the logs. A body that
/// doesn't parse as a `FormSubmission` gets a 400 from the extractor.
///
/// # Request example
///
/// ```sh
///     curl -v --json '{"id":"1","form":{"handle":"contact"},"data":{"email":"john@foo.com"}}' \
///         http://127.0.0.1:8000/submissions
/// ```
#[tracing::instrument(
    name = "Receiving form submission",
    skip(submission, forms, forwarder),
    fields(
        form = %submission.form.handle,
        submission_id = %submission.id,
    )
)]
pub async fn receive_submission(
    submission: web::Json<FormSubmission>,
    forms: web::Data<FormSettings>,
    forwarder: web::Data<SubscriberForwarder>,
) -> HttpResponse {
    let config = forms.get(&submission.form.handle);
    forwarder.process(&submission.0, &config).await;
    HttpResponse::Accepted().finish()
}
