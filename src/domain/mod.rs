mod datacenter;
mod mailchimp_config;
mod member;
mod merge_fields;
mod submission;
mod subscriber_email;
// allow external `use` statements to skip `merge_fields` etc
pub use datacenter::Datacenter;
pub use mailchimp_config::FieldMapping;
pub use mailchimp_config::MailchimpConfig;
pub use member::MemberPayload;
pub use member::SubscriptionStatus;
pub use merge_fields::MergeFields;
pub use submission::Form;
pub use submission::FormSubmission;
pub use submission::Submission;
pub use submission::SubmissionData;
pub use subscriber_email::SubscriberEmail;
