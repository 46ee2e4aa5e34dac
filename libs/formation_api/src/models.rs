use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A single container workload inside a [`FormationConfiguration`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Flight {
    /// Human readable name, unique within the configuration.
    pub name: String,
    /// Container image reference, e.g. `registry.example.com/my/image:latest`.
    pub image: String,
    /// Minimum number of instances to keep running.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub minimum: Option<u64>,
    /// Maximum number of instances to scale to. Unbounded when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub maximum: Option<u64>,
}

impl Flight {
    pub fn new<S: Into<String>>(name: S, image: S) -> Self {
        Self {
            name: name.into(),
            image: image.into(),
            minimum: None,
            maximum: None,
        }
    }
}

/// A versioned configuration of a formation. The platform assigns each
/// configuration a UUID on creation; the payload itself is just the set of
/// flights to run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct FormationConfiguration {
    pub flights: Vec<Flight>,
}

impl FormationConfiguration {
    pub fn new(flights: Vec<Flight>) -> Self {
        Self { flights }
    }
}

/// One entry of a formation's active configuration set: which configuration is
/// in effect and what share of traffic it receives.
///
/// Serialization is explicit and typed; the exact wire fields are
/// `configuration_id` and (optionally) `traffic_weight`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActiveConfiguration {
    pub configuration_id: Uuid,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub traffic_weight: Option<f32>,
}

impl ActiveConfiguration {
    pub fn new(configuration_id: Uuid) -> Self {
        Self {
            configuration_id,
            traffic_weight: None,
        }
    }
}

/// The full active configuration set of a formation. Serializes as a bare
/// JSON array.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(transparent)]
pub struct ActiveConfigurations(pub Vec<ActiveConfiguration>);

impl ActiveConfigurations {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn add_configuration(mut self, config: ActiveConfiguration) -> Self {
        self.0.push(config);
        self
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, ActiveConfiguration> {
        self.0.iter()
    }
}

/// Names of all formations visible to the caller. Serializes as a bare JSON
/// array of strings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(transparent)]
pub struct FormationNames(pub Vec<String>);

/// The platform's JSON error body, returned with every non-2xx response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorBody {
    pub status: u16,
    pub title: String,
    pub detail: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn active_configuration_wire_shape() {
        let id: Uuid = "aa8522e7-06cc-4e35-8966-484ae26e02a9".parse().unwrap();
        let config = ActiveConfiguration {
            configuration_id: id,
            traffic_weight: Some(0.5),
        };
        assert_eq!(
            serde_json::to_value(&config).unwrap(),
            json!({
                "configuration_id": "aa8522e7-06cc-4e35-8966-484ae26e02a9",
                "traffic_weight": 0.5
            })
        );

        // The weight is omitted, not null, when unset.
        let config = ActiveConfiguration::new(id);
        assert_eq!(
            serde_json::to_value(&config).unwrap(),
            json!({ "configuration_id": "aa8522e7-06cc-4e35-8966-484ae26e02a9" })
        );
    }

    #[test]
    fn active_configurations_serialize_as_array() {
        let id: Uuid = "aa8522e7-06cc-4e35-8966-484ae26e02a9".parse().unwrap();
        let configs = ActiveConfigurations::new().add_configuration(ActiveConfiguration::new(id));
        let value = serde_json::to_value(&configs).unwrap();
        assert!(value.is_array());
        assert_eq!(value.as_array().unwrap().len(), 1);
    }

    #[test]
    fn formation_configuration_roundtrip() {
        let config = FormationConfiguration::new(vec![Flight {
            name: "frontend".to_string(),
            image: "registry.example.com/frontend:latest".to_string(),
            minimum: Some(1),
            maximum: Some(4),
        }]);
        let value = serde_json::to_value(&config).unwrap();
        assert_eq!(value["flights"][0]["name"], "frontend");
        let decoded: FormationConfiguration = serde_json::from_value(value).unwrap();
        assert_eq!(decoded, config);
    }

    #[test]
    fn flight_optional_fields_default() {
        let flight: Flight = serde_json::from_value(json!({
            "name": "worker",
            "image": "my/image:v2"
        }))
        .unwrap();
        assert_eq!(flight.minimum, None);
        assert_eq!(flight.maximum, None);
    }
}
