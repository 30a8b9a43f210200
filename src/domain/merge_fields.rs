use serde::Serialize;
use serde_json::Map;
use serde_json::Value;

use super::FieldMapping;
use super::SubmissionData;

/// Mailchimp merge fields (custom contact attributes, e.g. `FNAME`), in field
/// mapping order.
///
/// The members endpoint rejects `"merge_fields": []`, so this always
/// serializes as a JSON object, even when empty.
#[derive(Serialize, Debug, Clone, Default, PartialEq)]
#[serde(transparent)]
pub struct MergeFields(Map<String, Value>);

impl MergeFields {
    /// Copy every mapped form field that was actually submitted. Rows missing
    /// either side of the mapping are skipped, as are fields absent from (or
    /// null in) `data`. If two rows target the same merge tag, the later one
    /// wins.
    pub fn from_mapping(
        mapping: &[FieldMapping],
        data: &SubmissionData,
    ) -> Self {
        let fields = mapping
            .iter()
            .filter(|m| !m.form_field.is_empty() && !m.mailchimp_field.is_empty())
            .filter_map(|m| {
                data.get(&m.form_field)
                    .filter(|v| !v.is_null())
                    .map(|v| (m.mailchimp_field.clone(), v.clone()))
            })
            .collect();
        Self(fields)
    }

    pub fn get(
        &self,
        tag: &str,
    ) -> Option<&Value> {
        self.0.get(tag)
    }

    pub fn len(&self) -> usize { self.0.len() }

    pub fn is_empty(&self) -> bool { self.0.is_empty() }
}
