use serde::Serialize;
use serde_json::Value;

/// What the host's connector registry needs to list a connector and render
/// its settings form.
pub trait Connector {
    /// Stable, machine-readable identifier
    fn handle(&self) -> &'static str;

    /// Shown to humans
    fn name(&self) -> &'static str;

    /// Declarative description of the connector's per-form settings
    fn fieldset(&self) -> Vec<Field>;
}

#[derive(Serialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum FieldType {
    Text,
    Toggle,
    /// Repeatable rows of sub-fields
    Grid,
}

#[derive(Serialize, Debug, Clone)]
pub struct Field {
    pub handle: &'static str,
    pub field: FieldConfig,
}

#[derive(Serialize, Debug, Clone)]
pub struct FieldConfig {
    #[serde(rename = "type")]
    pub kind: FieldType,
    pub display: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub instructions: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub validate: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default: Option<Value>,
    /// Column width (percent) inside a grid
    #[serde(skip_serializing_if = "Option::is_none")]
    pub width: Option<u8>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub fields: Vec<Field>,
}

impl Field {
    fn new(
        handle: &'static str,
        kind: FieldType,
        display: &'static str,
    ) -> Self {
        Self {
            handle,
            field: FieldConfig {
                kind,
                display,
                instructions: None,
                validate: None,
                default: None,
                width: None,
                fields: vec![],
            },
        }
    }

    fn instructions(
        mut self,
        instructions: &'static str,
    ) -> Self {
        self.field.instructions = Some(instructions);
        self
    }

    fn required(mut self) -> Self {
        self.field.validate = Some("required");
        self
    }

    fn default_value(
        mut self,
        default: impl Into<Value>,
    ) -> Self {
        self.field.default = Some(default.into());
        self
    }

    fn width(
        mut self,
        width: u8,
    ) -> Self {
        self.field.width = Some(width);
        self
    }

    fn fields(
        mut self,
        fields: Vec<Field>,
    ) -> Self {
        self.field.fields = fields;
        self
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct MailchimpConnector;

impl Connector for MailchimpConnector {
    fn handle(&self) -> &'static str { "mailchimp" }

    fn name(&self) -> &'static str { "Mailchimp" }

    fn fieldset(&self) -> Vec<Field> {
        vec![
            Field::new("api_key", FieldType::Text, "API Key")
                .instructions("Your Mailchimp API key")
                .required(),
            Field::new("list_id", FieldType::Text, "List ID")
                .instructions("The Mailchimp list ID to add subscribers to")
                .required(),
            Field::new("email_field", FieldType::Text, "Email Field")
                .instructions("Form field containing the email address")
                .default_value("email"),
            Field::new("double_optin", FieldType::Toggle, "Double Opt-in")
                .instructions("Require email confirmation")
                .default_value(false),
            Field::new("field_mapping", FieldType::Grid, "Field Mapping")
                .instructions("Map form fields to Mailchimp merge fields")
                .fields(vec![
                    Field::new("form_field", FieldType::Text, "Form Field").width(50),
                    Field::new("mailchimp_field", FieldType::Text, "Mailchimp Merge Tag")
                        .instructions("e.g. FNAME, LNAME, PHONE")
                        .width(50),
                ]),
        ]
    }
}
