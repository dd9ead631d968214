//! Display helper functions for objects

use crate::object::{EditableObject, LightKind, ObjectKind};

/// Outliner label for an object
pub fn object_display_name(object: &EditableObject) -> String {
    if object.name.is_empty() {
        format!("{} #{}", kind_label(object), object.id())
    } else {
        object.name.clone()
    }
}

/// Kind label shown in the properties header
pub fn kind_label(object: &EditableObject) -> String {
    match &object.kind {
        ObjectKind::Mesh(mesh) => format!("{} Mesh", mesh.geometry.label()),
        ObjectKind::Light(light) => format!("{} Light", light.kind.label()),
        ObjectKind::Model(_) => "Model".to_string(),
    }
}

/// Get icon for an object
pub fn object_icon(object: &EditableObject) -> &'static str {
    match &object.kind {
        ObjectKind::Mesh(_) => "[M]",
        ObjectKind::Light(light) => match light.kind {
            LightKind::Point => "[*]",
            LightKind::Directional => "[>]",
            LightKind::Spot { .. } => "[V]",
            LightKind::Ambient => "[~]",
        },
        ObjectKind::Model(_) => "[G]",
    }
}

#[cfg(test)]
mod tests {
    use shared::GeometryKind;

    use super::*;
    use crate::fixtures::{light_object, mesh_object};
    use crate::object::LightPreset;

    #[test]
    fn test_display_name_falls_back_to_kind() {
        let mut obj = mesh_object("", GeometryKind::Knot);
        obj.id = 7;
        assert_eq!(object_display_name(&obj), "Knot Mesh #7");
        obj.name = "Pretzel".to_string();
        assert_eq!(object_display_name(&obj), "Pretzel");
    }

    #[test]
    fn test_light_icons() {
        let spot = light_object("Spot", LightPreset::Spot);
        assert_eq!(object_icon(&spot), "[V]");
        assert_eq!(kind_label(&spot), "Spot Light");
    }
}
