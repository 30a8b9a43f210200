use secrecy::ExposeSecret;
use secrecy::Secret;
use serde::Deserialize;
use serde::Deserializer;
use serde_aux::field_attributes::deserialize_bool_from_anything;

/// Connector configuration for a single form, as entered in the host's admin
/// UI (see `Connector::fieldset`). Every key is optional at the type level;
/// `api_key` and `list_id` are checked when a submission is processed, not
/// when the config is loaded. A key set to null (`~` in yaml) is treated as
/// absent.
#[derive(Deserialize, Clone, Debug)]
pub struct MailchimpConfig {
    /// `<key>-<datacenter>`
    #[serde(default)]
    pub api_key: Option<Secret<String>>,

    #[serde(default)]
    pub list_id: Option<String>,

    /// Name of the form field holding the subscriber's email address
    #[serde(
        default = "default_email_field",
        deserialize_with = "deserialize_email_field"
    )]
    pub email_field: String,

    /// Toggles come through as bools, but also as "1"/"true" when the config
    /// is sourced from env vars
    #[serde(default, deserialize_with = "deserialize_toggle")]
    pub double_optin: bool,

    #[serde(default, deserialize_with = "null_as_default")]
    pub field_mapping: Vec<FieldMapping>,
}

fn default_email_field() -> String { "email".to_string() }

fn deserialize_email_field<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let field = Option::<String>::deserialize(deserializer)?;
    Ok(field.unwrap_or_else(default_email_field))
}

/// `deserialize_bool_from_anything`, but null is `false`
#[derive(Deserialize)]
#[serde(transparent)]
struct Toggle(#[serde(deserialize_with = "deserialize_bool_from_anything")] bool);

fn deserialize_toggle<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    let toggle = Option::<Toggle>::deserialize(deserializer)?;
    Ok(toggle.map(|t| t.0).unwrap_or_default())
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

impl Default for MailchimpConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            list_id: None,
            email_field: default_email_field(),
            double_optin: false,
            field_mapping: vec![],
        }
    }
}

impl MailchimpConfig {
    /// Both required keys, if present and non-empty
    pub fn credentials(&self) -> Option<(&Secret<String>, &str)> {
        let api_key = self
            .api_key
            .as_ref()
            .filter(|k| !k.expose_secret().is_empty())?;
        let list_id = self.list_id.as_deref().filter(|l| !l.is_empty())?;
        Some((api_key, list_id))
    }
}

/// One row of the field mapping grid: copy the form's `form_field` into the
/// Mailchimp merge tag `mailchimp_field`. Incomplete rows are tolerated here,
/// and skipped when merge fields are built.
#[derive(Deserialize, Clone, Debug, Default)]
pub struct FieldMapping {
    #[serde(default)]
    pub form_field: String,

    #[serde(default, alias = "provider_field")]
    pub mailchimp_field: String,
}

impl FieldMapping {
    pub fn new(
        form_field: &str,
        mailchimp_field: &str,
    ) -> Self {
        Self {
            form_field: form_field.to_string(),
            mailchimp_field: mailchimp_field.to_string(),
        }
    }
}
