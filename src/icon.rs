use serde::{Deserialize, Serialize};

/// Size buckets an icon can ship in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Sizes {
    SM,
    MD,
    LG,
}

/// One available rendering of an icon: a size bucket and its pixel value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct IconSize {
    pub name: Sizes,
    #[serde(rename = "sizeInPX")]
    pub size_in_px: String,
}

/// The icon entity as it appears on the wire.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Icon {
    pub id: String,
    pub name: String,
    pub default_font_size: i32,
    pub color: String,
    pub svg_available: bool,
    pub sizes_available: Vec<IconSize>,
}

/// The creation payload. Only `name` is required; the rest default when the
/// record is shaped into an [`Icon`]. Input objects are closed: unknown
/// fields are rejected at the boundary.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct IconInput {
    /// Accepted by the contract but never used: the server assigns ids.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_font_size: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub svg_available: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sizes_available: Option<Vec<IconSize>>,
}

impl Icon {
    /// Shape a raw record into the entity under the given identifier,
    /// filling the documented defaults for any field the record omits.
    /// A client-supplied `id` in the record is ignored.
    pub fn from_input(id: impl Into<String>, input: &IconInput) -> Self {
        Self {
            id: id.into(),
            name: input.name.clone(),
            default_font_size: input.default_font_size.unwrap_or(0),
            color: input.color.clone().unwrap_or_default(),
            svg_available: input.svg_available.unwrap_or(false),
            sizes_available: input.sizes_available.clone().unwrap_or_default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn name_only(name: &str) -> IconInput {
        IconInput {
            name: name.to_string(),
            ..IconInput::default()
        }
    }

    #[test]
    fn test_defaults_applied_when_shaping() {
        let icon = Icon::from_input("abc", &name_only("home"));
        assert_eq!(icon.id, "abc");
        assert_eq!(icon.name, "home");
        assert_eq!(icon.default_font_size, 0);
        assert_eq!(icon.color, "");
        assert!(!icon.svg_available);
        assert!(icon.sizes_available.is_empty());
    }

    #[test]
    fn test_client_supplied_id_is_ignored() {
        let input = IconInput {
            id: Some("client-pick".to_string()),
            ..name_only("home")
        };
        let icon = Icon::from_input("server-pick", &input);
        assert_eq!(icon.id, "server-pick");
    }

    #[test]
    fn test_wire_field_names() {
        let icon = Icon::from_input(
            "abc",
            &IconInput {
                default_font_size: Some(16),
                svg_available: Some(true),
                sizes_available: Some(vec![IconSize {
                    name: Sizes::SM,
                    size_in_px: "16".to_string(),
                }]),
                ..name_only("star")
            },
        );
        let value = serde_json::to_value(&icon).unwrap();
        assert_eq!(
            value,
            json!({
                "id": "abc",
                "name": "star",
                "defaultFontSize": 16,
                "color": "",
                "svgAvailable": true,
                "sizesAvailable": [{"name": "SM", "sizeInPX": "16"}],
            })
        );
    }

    #[test]
    fn test_input_requires_name() {
        let err = serde_json::from_value::<IconInput>(json!({"color": "red"}));
        assert!(err.is_err());
    }

    #[test]
    fn test_input_rejects_unknown_fields() {
        let err = serde_json::from_value::<IconInput>(json!({"name": "home", "weight": 400}));
        assert!(err.is_err());
    }

    #[test]
    fn test_size_name_must_be_in_enumeration() {
        let err = serde_json::from_value::<IconSize>(json!({"name": "XL", "sizeInPX": "64"}));
        assert!(err.is_err());
    }
}
