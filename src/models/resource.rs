// ============================================================================
// RECURSOS - Tipos genéricos compartidos por clínicas, nóminas, etc.
// ============================================================================

use serde::{Deserialize, Deserializer, Serialize};
use serde::de::DeserializeOwned;
use std::collections::BTreeMap;
use std::fmt;

/// Identificador asignado por el backend (el cliente nunca lo genera).
///
/// Acepta string o entero en el JSON. Los identificadores puramente numéricos
/// se normalizan sin ceros a la izquierda: `"01"` → `"1"`.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct ResourceId(String);

impl ResourceId {
    pub fn new(raw: impl Into<String>) -> Self {
        let raw = raw.into();
        let trimmed = raw.trim();
        if !trimmed.is_empty() && trimmed.bytes().all(|b| b.is_ascii_digit()) {
            let stripped = trimmed.trim_start_matches('0');
            let normalized = if stripped.is_empty() { "0" } else { stripped };
            Self(normalized.to_string())
        } else {
            Self(trimmed.to_string())
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ResourceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ResourceId {
    fn from(raw: &str) -> Self {
        Self::new(raw)
    }
}

impl<'de> Deserialize<'de> for ResourceId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum RawId {
            Text(String),
            Signed(i64),
            Unsigned(u64),
        }

        Ok(match RawId::deserialize(deserializer)? {
            RawId::Text(text) => Self::new(text),
            RawId::Signed(n) => Self::new(n.to_string()),
            RawId::Unsigned(n) => Self::new(n.to_string()),
        })
    }
}

/// Valores de un formulario: nombre del campo → valor
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct FormValues(BTreeMap<String, String>);

impl FormValues {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder: agregar un campo
    pub fn with(mut self, name: &str, value: &str) -> Self {
        self.insert(name, value);
        self
    }

    pub fn insert(&mut self, name: &str, value: &str) {
        self.0.insert(name.to_string(), value.to_string());
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.0.get(name).map(String::as_str)
    }

    /// Valor recortado, vacío si el campo no existe
    pub fn value(&self, name: &str) -> String {
        self.get(name).map(str::trim).unwrap_or_default().to_string()
    }
}

impl FromIterator<(String, String)> for FormValues {
    fn from_iter<I: IntoIterator<Item = (String, String)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// Fila lista para renderizar en una tabla
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TableRow {
    pub id: ResourceId,
    pub cells: Vec<String>,
}

/// Un registro del backend con su mapeo de campos (tabla + formulario + payload)
pub trait Resource: Clone + DeserializeOwned + 'static {
    /// Nombre legible en singular, p.ej. "clinic"
    const LABEL: &'static str;

    fn id(&self) -> &ResourceId;

    /// Celdas de la fila, en orden de columnas
    fn cells(&self) -> Vec<String>;

    /// Valores para rellenar el formulario de edición
    fn form_values(&self) -> FormValues;

    /// Cuerpo JSON para create (`id = None`) o update
    fn payload(form: &FormValues, id: Option<&ResourceId>) -> serde_json::Value;

    fn table_row(&self) -> TableRow {
        TableRow {
            id: self.id().clone(),
            cells: self.cells(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("01", "1")]
    #[case("000", "0")]
    #[case("42", "42")]
    #[case(" 007 ", "7")]
    #[case("64f1c2ab", "64f1c2ab")]
    #[case("A-01", "A-01")]
    fn numeric_ids_lose_leading_zeros(#[case] raw: &str, #[case] expected: &str) {
        assert_eq!(ResourceId::new(raw).as_str(), expected);
    }

    #[rstest]
    fn ids_deserialize_from_strings_and_integers() {
        let ids: Vec<ResourceId> =
            serde_json::from_str(r#"["05", 12, "abc"]"#).expect("valid ids");
        assert_eq!(ids, vec![ResourceId::from("5"), ResourceId::from("12"), ResourceId::from("abc")]);
    }

    #[rstest]
    fn form_value_is_trimmed_and_defaults_to_empty() {
        let form = FormValues::new().with("clinicName", "  Downtown ");
        assert_eq!(form.value("clinicName"), "Downtown");
        assert_eq!(form.value("missing"), "");
    }
}
