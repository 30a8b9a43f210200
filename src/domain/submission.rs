use serde::Deserialize;
use serde_json::Map;
use serde_json::Value;

/// Submitted field values, keyed by form field name
pub type SubmissionData = Map<String, Value>;

/// What the connector needs to know about a completed form submission. The
/// submission is owned by the host; we only ever read it.
pub trait Submission {
    /// Handle of the form that was submitted
    fn form_handle(&self) -> &str;
    fn id(&self) -> &str;
    fn data(&self) -> &SubmissionData;
}

#[derive(Deserialize, Debug, Clone)]
pub struct Form {
    pub handle: String,
}

/// A submission as delivered by the host's webhook:
///
/// ```json
/// { "id": "abc", "form": { "handle": "contact" }, "data": { "email": "john@foo.com" } }
/// ```
#[derive(Deserialize, Debug, Clone)]
pub struct FormSubmission {
    pub id: String,
    pub form: Form,
    #[serde(default)]
    pub data: SubmissionData,
}

impl Submission for FormSubmission {
    fn form_handle(&self) -> &str { &self.form.handle }

    fn id(&self) -> &str { &self.id }

    fn data(&self) -> &SubmissionData { &self.data }
}
