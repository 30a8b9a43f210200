use std::sync::Arc;

use reqwest::StatusCode;
use secrecy::ExposeSecret;
use serde_json::Value;

use crate::connector_log::ConnectorLog;
use crate::connector_log::LogContext;
use crate::domain::Datacenter;
use crate::domain::MailchimpConfig;
use crate::domain::MemberPayload;
use crate::domain::MergeFields;
use crate::domain::SubscriberEmail;
use crate::domain::Submission;
use crate::domain::SubscriptionStatus;
use crate::mailchimp_client::ClientError;
use crate::mailchimp_client::MailchimpClient;

/// Every way a submission can fail to reach Mailchimp. None of these ever
/// leave `SubscriberForwarder::process`; each is turned into one log event.
#[derive(thiserror::Error, Debug)]
pub enum ForwardError {
    #[error("Mailchimp connector: Missing API key or list ID")]
    MissingCredentials,

    #[error("Mailchimp connector: Invalid or missing email")]
    InvalidEmail {
        email_field: String,
        /// Raw submitted value, `null` if the field was absent
        email: Value,
    },

    #[error("Mailchimp connector: Invalid API key format")]
    InvalidApiKey,

    #[error("Mailchimp API error")]
    Rejected {
        status: StatusCode,
        /// Parsed JSON if possible, otherwise the raw text
        body: Option<Value>,
        email: String,
    },

    #[error("Mailchimp connector exception")]
    Transport {
        #[source]
        source: ClientError,
        email: String,
    },
}

impl ForwardError {
    /// Emit exactly one event describing this failure. `context` already holds
    /// the form handle and submission id.
    fn report(
        &self,
        log: &dyn ConnectorLog,
        context: LogContext,
    ) {
        let message = self.to_string();
        match self {
            Self::MissingCredentials => log.warn(&message, context),
            Self::InvalidEmail { email_field, email } => log.warn(
                &message,
                context
                    .with("email_field", email_field.as_str())
                    .with("email", email.clone()),
            ),
            Self::InvalidApiKey => log.error(&message, context),
            Self::Rejected {
                status,
                body,
                email,
            } => {
                let detail = body
                    .as_ref()
                    .and_then(|b| b.get("detail"))
                    .filter(|v| !v.is_null())
                    .cloned()
                    .unwrap_or_else(|| "Unknown error".into());
                let errors = body
                    .as_ref()
                    .and_then(|b| b.get("errors"))
                    .filter(|v| !v.is_null())
                    .cloned()
                    .unwrap_or_else(|| Value::Array(vec![]));
                log.error(
                    &message,
                    context
                        .with("status_code", status.as_u16())
                        .with("error_detail", detail)
                        .with("error_list", errors)
                        .with("full_response_body", body.clone().unwrap_or(Value::Null))
                        .with("email", email.as_str()),
                )
            }
            Self::Transport { source, email } => log.error(
                &message,
                context
                    .with("error_message", source.to_string())
                    .with("email", email.as_str()),
            ),
        }
    }
}

/// A member that Mailchimp accepted
#[derive(Debug)]
pub struct Subscribed {
    pub email: SubscriberEmail,
    pub list_id: String,
    pub status: SubscriptionStatus,
}

/// Sends each form submission to a Mailchimp audience, as configured per form.
///
/// Holds no per-submission state, so one forwarder can serve any number of
/// concurrent submissions.
#[derive(Clone)]
pub struct SubscriberForwarder {
    client: MailchimpClient,
    log: Arc<dyn ConnectorLog>,
}

impl SubscriberForwarder {
    pub fn new(
        client: MailchimpClient,
        log: Arc<dyn ConnectorLog>,
    ) -> Self {
        Self { client, log }
    }

    /// Forward one submission. This never fails from the caller's point of
    /// view: whatever happens is reported through the `ConnectorLog`, so the
    /// host can call this unconditionally.
    ///
    /// At most one request is sent, and it is never retried. Submitting the
    /// same email twice is harmless, as Mailchimp dedupes members by address.
    #[tracing::instrument(
        name = "Forwarding submission to Mailchimp",
        skip_all,
        fields(
            form = %submission.form_handle(),
            submission_id = %submission.id(),
        )
    )]
    pub async fn process(
        &self,
        submission: &impl Submission,
        config: &MailchimpConfig,
    ) {
        let context = LogContext::new()
            .with("form", submission.form_handle())
            .with("submission_id", submission.id());

        match self.forward(submission, config).await {
            Ok(subscribed) => self.log.info(
                "Mailchimp subscriber added successfully",
                LogContext::new()
                    .with("email", subscribed.email.as_ref())
                    .with("list_id", subscribed.list_id)
                    .with("status", subscribed.status.as_str())
                    .with("form", submission.form_handle())
                    .with("submission_id", submission.id()),
            ),
            Err(e) => e.report(self.log.as_ref(), context),
        }
    }

    /// Validate, build the payload, send it. Returns at the first failure.
    async fn forward(
        &self,
        submission: &impl Submission,
        config: &MailchimpConfig,
    ) -> Result<Subscribed, ForwardError> {
        let (api_key, list_id) = config
            .credentials()
            .ok_or(ForwardError::MissingCredentials)?;

        let data = submission.data();
        let raw_email = data.get(&config.email_field).cloned().unwrap_or(Value::Null);
        let email = raw_email
            .as_str()
            .and_then(|e| SubscriberEmail::parse(e.to_string()).ok())
            .ok_or_else(|| ForwardError::InvalidEmail {
                email_field: config.email_field.clone(),
                email: raw_email.clone(),
            })?;

        let datacenter = Datacenter::parse(api_key.expose_secret())
            .map_err(|_| ForwardError::InvalidApiKey)?;

        let payload = MemberPayload {
            email_address: email.clone(),
            status: SubscriptionStatus::from_double_optin(config.double_optin),
            merge_fields: MergeFields::from_mapping(&config.field_mapping, data),
        };

        let response = self
            .client
            .add_member(&datacenter, list_id, api_key, &payload)
            .await
            .map_err(|source| ForwardError::Transport {
                source,
                email: email.to_string(),
            })?;

        let status = response.status();
        if !status.is_success() {
            // a body that can't be read is a transport fault, not a rejection
            let text = response
                .text()
                .await
                .map_err(|source| ForwardError::Transport {
                    source: source.into(),
                    email: email.to_string(),
                })?;
            let body = Some(text)
                .filter(|text| !text.is_empty())
                .map(|text| serde_json::from_str(&text).unwrap_or(Value::String(text)));
            return Err(ForwardError::Rejected {
                status,
                body,
                email: email.to_string(),
            });
        }

        Ok(Subscribed {
            email,
            list_id: list_id.to_string(),
            status: payload.status,
        })
    }
}
