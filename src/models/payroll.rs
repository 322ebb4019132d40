use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::models::resource::{FormValues, Resource, ResourceId};

/// Periodo de nómina
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PayPeriod {
    pub pay_period_id: ResourceId,
    #[serde(default)]
    pub start_date: String,
    #[serde(default)]
    pub end_date: String,
    #[serde(default)]
    pub status: Option<String>,
}

impl Resource for PayPeriod {
    const LABEL: &'static str = "pay period";

    fn id(&self) -> &ResourceId {
        &self.pay_period_id
    }

    fn cells(&self) -> Vec<String> {
        vec![
            self.pay_period_id.to_string(),
            self.start_date.clone(),
            self.end_date.clone(),
            self.status.clone().unwrap_or_else(|| "-".to_string()),
        ]
    }

    fn form_values(&self) -> FormValues {
        FormValues::new()
            .with("startDate", &self.start_date)
            .with("endDate", &self.end_date)
    }

    fn payload(form: &FormValues, id: Option<&ResourceId>) -> serde_json::Value {
        let mut body = json!({
            "startDate": form.value("startDate"),
            "endDate": form.value("endDate"),
        });
        if let Some(id) = id {
            body["payPeriodId"] = json!(id);
        }
        body
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    fn missing_status_renders_a_dash() {
        let period: PayPeriod = serde_json::from_value(json!({
            "payPeriodId": 3,
            "startDate": "2026-10-01",
            "endDate": "2026-10-15"
        }))
        .expect("pay period");
        assert_eq!(period.cells(), vec!["3", "2026-10-01", "2026-10-15", "-"]);
        assert_eq!(period.form_values().get("endDate"), Some("2026-10-15"));
    }
}
