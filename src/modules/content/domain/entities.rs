//! Content entities mirrored from the remote store.
//!
//! Field names follow the document shapes on the wire (camelCase), so these
//! types deserialize straight from snapshot bodies. Every field carries a
//! default: partially-filled documents written by older admin sessions must
//! still decode.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

//
// ──────────────────────────────────────────────────────────
// Singleton sections
// ──────────────────────────────────────────────────────────
//

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct About {
    pub title: String,
    pub bio: String,
    pub taglines: Vec<String>,
    pub profile_image: String,
    pub stats: Vec<Stat>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct Stat {
    pub value: String,
    pub label: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct Hero {
    pub title: String,
    pub subtitle: String,
    pub description: String,
    /// Platform name -> URL; kept ordered for stable rendering.
    pub social_links: BTreeMap<String, String>,
    pub resume_link: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct Contact {
    pub email: String,
    pub phone: String,
    pub location: String,
    pub whatsapp: String,
    pub map_link: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct Experience {
    pub work: Vec<WorkEntry>,
    pub education: Vec<EducationEntry>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct WorkEntry {
    pub role: String,
    pub company: String,
    pub period: String,
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct EducationEntry {
    pub degree: String,
    pub institution: String,
    pub year: String,
    pub description: String,
}

/// Three accent colors as hex strings. Applied to presentation state on every
/// remote update and never torn down.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct Theme {
    pub primary: String,
    pub secondary: String,
    pub accent: String,
}

//
// ──────────────────────────────────────────────────────────
// Skills (one singleton document holding the whole list)
// ──────────────────────────────────────────────────────────
//

/// Skill categories are addressed by title: the title is the natural key.
/// Renaming one therefore re-keys it; see the skill list transforms for the
/// defensive not-found handling around that.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct SkillCategory {
    pub title: String,
    pub skills: Vec<Skill>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct Skill {
    pub name: String,
    /// Proficiency 0-100.
    pub level: u8,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub link: Option<String>,
}

//
// ──────────────────────────────────────────────────────────
// Collections
// ──────────────────────────────────────────────────────────
//

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct Project {
    pub id: String,
    pub title: String,
    /// Short description shown on cards.
    pub description: String,
    pub long_description: String,
    /// Category name, denormalized: no foreign key to `Category.id`.
    pub category: String,
    pub tech_stack: Vec<String>,
    pub github: String,
    /// Live demo URL.
    pub link: String,
    pub image: String,
    /// RFC 3339 creation stamp; drives newest-first ordering.
    pub created_at: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct Category {
    pub id: String,
    pub name: String,
    /// Sparse sort key; documents without one sort last.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub order: Option<i64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum ServiceIcon {
    #[default]
    Briefcase,
    Code,
    Database,
    Palette,
    Shield,
    Zap,
    Globe,
    Cpu,
    Server,
}

impl ServiceIcon {
    pub const ALL: [ServiceIcon; 9] = [
        ServiceIcon::Briefcase,
        ServiceIcon::Code,
        ServiceIcon::Database,
        ServiceIcon::Palette,
        ServiceIcon::Shield,
        ServiceIcon::Zap,
        ServiceIcon::Globe,
        ServiceIcon::Cpu,
        ServiceIcon::Server,
    ];
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct Service {
    pub id: String,
    pub title: String,
    pub description: String,
    pub icon: ServiceIcon,
    pub order: i64,
    pub created_at: String,
    pub updated_at: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum AppointmentStatus {
    #[default]
    Pending,
    Completed,
    Cancelled,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct Appointment {
    pub id: String,
    pub name: String,
    pub phone: String,
    pub purpose: String,
    /// Human-readable day string as picked in the booking calendar.
    pub date: String,
    /// One of the eight fixed slot labels.
    pub time: String,
    /// RFC 3339 submission stamp; drives newest-first ordering.
    pub timestamp: String,
    pub status: AppointmentStatus,
}

//
// ──────────────────────────────────────────────────────────
// Creation payloads
// ──────────────────────────────────────────────────────────
//

#[derive(Debug, Clone, Serialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct NewProject {
    pub title: String,
    pub description: String,
    pub long_description: String,
    pub category: String,
    pub tech_stack: Vec<String>,
    pub github: String,
    pub link: String,
    pub image: String,
}

#[derive(Debug, Clone, Serialize, Default)]
pub struct NewCategory {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub order: Option<i64>,
}

#[derive(Debug, Clone, Serialize, Default)]
pub struct NewService {
    pub title: String,
    pub description: String,
    pub icon: ServiceIcon,
    pub order: i64,
}

/// Booking payload: status and timestamp are stamped by the store, never by
/// the caller.
#[derive(Debug, Clone, Serialize, Default)]
pub struct NewAppointment {
    pub name: String,
    pub phone: String,
    pub purpose: String,
    pub date: String,
    pub time: String,
}

//
// ──────────────────────────────────────────────────────────
// Merge-write patches
// ──────────────────────────────────────────────────────────
//
// Present fields overwrite the remote value; absent fields are preserved.
// Skipping `None` during serialization is what keeps the write a merge.
//

#[derive(Debug, Clone, Serialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct ProjectPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub long_description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tech_stack: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub github: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub link: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
}

#[derive(Debug, Clone, Serialize, Default)]
pub struct CategoryPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub order: Option<i64>,
}

#[derive(Debug, Clone, Serialize, Default)]
pub struct ServicePatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub icon: Option<ServiceIcon>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub order: Option<i64>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_project_decodes_from_wire_shape() {
        let body = json!({
            "title": "Atlas",
            "description": "Catalog",
            "longDescription": "A longer story",
            "category": "Web",
            "techStack": ["Rust"],
            "createdAt": "2026-08-01T00:00:00Z"
        });

        let project: Project = serde_json::from_value(body).unwrap();
        assert_eq!(project.title, "Atlas");
        assert_eq!(project.long_description, "A longer story");
        assert_eq!(project.tech_stack, vec!["Rust".to_string()]);
        assert_eq!(project.created_at, "2026-08-01T00:00:00Z");
        // Missing fields fall back to defaults.
        assert_eq!(project.github, "");
        assert_eq!(project.id, "");
    }

    #[test]
    fn test_patch_skips_absent_fields() {
        let patch = ProjectPatch {
            title: Some("New title".to_string()),
            ..Default::default()
        };

        let value = serde_json::to_value(&patch).unwrap();
        assert_eq!(value, json!({ "title": "New title" }));
    }

    #[test]
    fn test_service_icon_wire_names() {
        assert_eq!(
            serde_json::to_value(ServiceIcon::Briefcase).unwrap(),
            json!("Briefcase")
        );
        let icon: ServiceIcon = serde_json::from_value(json!("Zap")).unwrap();
        assert_eq!(icon, ServiceIcon::Zap);
    }

    #[test]
    fn test_appointment_status_is_lowercase_on_wire() {
        assert_eq!(
            serde_json::to_value(AppointmentStatus::Pending).unwrap(),
            json!("pending")
        );
        let status: AppointmentStatus = serde_json::from_value(json!("cancelled")).unwrap();
        assert_eq!(status, AppointmentStatus::Cancelled);
    }

    #[test]
    fn test_category_missing_order_decodes_none() {
        let category: Category =
            serde_json::from_value(json!({ "id": "c1", "name": "Web" })).unwrap();
        assert_eq!(category.order, None);
    }
}
