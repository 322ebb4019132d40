use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::models::resource::{FormValues, Resource, ResourceId};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Clinic {
    pub clinic_id: ResourceId,
    #[serde(default)]
    pub clinic_name: String,
}

impl Resource for Clinic {
    const LABEL: &'static str = "clinic";

    fn id(&self) -> &ResourceId {
        &self.clinic_id
    }

    fn cells(&self) -> Vec<String> {
        vec![self.clinic_id.to_string(), self.clinic_name.clone()]
    }

    fn form_values(&self) -> FormValues {
        FormValues::new().with("clinicName", &self.clinic_name)
    }

    fn payload(form: &FormValues, id: Option<&ResourceId>) -> serde_json::Value {
        let mut body = json!({ "clinicName": form.value("clinicName") });
        if let Some(id) = id {
            body["clinicId"] = json!(id);
        }
        body
    }
}
