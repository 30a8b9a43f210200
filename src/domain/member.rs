use serde::Serialize;

use super::MergeFields;
use super::SubscriberEmail;

/// `subscribed` adds the contact straight away; `pending` makes Mailchimp send
/// a confirmation email first (double opt-in).
#[derive(Serialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum SubscriptionStatus {
    Subscribed,
    Pending,
}

impl SubscriptionStatus {
    pub fn from_double_optin(double_optin: bool) -> Self {
        match double_optin {
            true => Self::Pending,
            false => Self::Subscribed,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Subscribed => "subscribed",
            Self::Pending => "pending",
        }
    }
}

/// Body of `POST /lists/{list_id}/members`
#[derive(Serialize, Debug)]
pub struct MemberPayload {
    #[serde(serialize_with = "serialize_email")]
    pub email_address: SubscriberEmail,
    pub status: SubscriptionStatus,
    pub merge_fields: MergeFields,
}

fn serialize_email<S>(
    email: &SubscriberEmail,
    serializer: S,
) -> Result<S::Ok, S::Error>
where
    S: serde::Serializer,
{
    serializer.serialize_str(email.as_ref())
}
