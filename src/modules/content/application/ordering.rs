//! Local ordering applied after every snapshot refresh. The backend does not
//! guarantee any collection order, so the mirror sorts before publishing.

use chrono::{DateTime, Utc};

use crate::modules::content::domain::entities::{Appointment, Category, Project, Service};

/// Sort key for documents that carry no explicit order.
const MISSING_CATEGORY_ORDER: i64 = 999;

fn parse_stamp(stamp: &str) -> DateTime<Utc> {
    DateTime::parse_from_rfc3339(stamp)
        .map(|dt| dt.with_timezone(&Utc))
        .unwrap_or(DateTime::<Utc>::UNIX_EPOCH)
}

/// Projects: newest first by creation stamp.
pub fn sort_projects(projects: &mut [Project]) {
    projects.sort_by_key(|p| std::cmp::Reverse(parse_stamp(&p.created_at)));
}

/// Categories: ascending by `order`; documents missing one sort last.
pub fn sort_categories(categories: &mut [Category]) {
    categories.sort_by_key(|c| c.order.unwrap_or(MISSING_CATEGORY_ORDER));
}

/// Appointments: newest first by submission stamp.
pub fn sort_appointments(appointments: &mut [Appointment]) {
    appointments.sort_by_key(|a| std::cmp::Reverse(parse_stamp(&a.timestamp)));
}

/// Services: ascending by `order` (defaults to 0 at decode time).
pub fn sort_services(services: &mut [Service]) {
    services.sort_by_key(|s| s.order);
}

#[cfg(test)]
mod tests {
    use super::*;

    fn project(title: &str, created_at: &str) -> Project {
        Project {
            title: title.to_string(),
            created_at: created_at.to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn test_projects_newest_first() {
        let mut projects = vec![
            project("old", "2025-01-01T00:00:00Z"),
            project("new", "2026-06-15T12:00:00Z"),
            project("mid", "2026-01-01T00:00:00Z"),
        ];

        sort_projects(&mut projects);

        let titles: Vec<&str> = projects.iter().map(|p| p.title.as_str()).collect();
        assert_eq!(titles, vec!["new", "mid", "old"]);
    }

    #[test]
    fn test_unparseable_stamp_sorts_oldest() {
        let mut projects = vec![project("bad", "not-a-date"), project("ok", "2026-01-01T00:00:00Z")];
        sort_projects(&mut projects);
        assert_eq!(projects[0].title, "ok");
    }

    #[test]
    fn test_categories_missing_order_sort_last() {
        let mut categories = vec![
            Category {
                id: "a".to_string(),
                name: "Unordered".to_string(),
                order: None,
            },
            Category {
                id: "b".to_string(),
                name: "Second".to_string(),
                order: Some(1),
            },
            Category {
                id: "c".to_string(),
                name: "First".to_string(),
                order: Some(0),
            },
        ];

        sort_categories(&mut categories);

        let names: Vec<&str> = categories.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["First", "Second", "Unordered"]);
    }

    #[test]
    fn test_appointments_newest_first() {
        let mut appointments = vec![
            Appointment {
                name: "early".to_string(),
                timestamp: "2026-08-01T09:00:00Z".to_string(),
                ..Default::default()
            },
            Appointment {
                name: "late".to_string(),
                timestamp: "2026-08-20T09:00:00Z".to_string(),
                ..Default::default()
            },
        ];

        sort_appointments(&mut appointments);
        assert_eq!(appointments[0].name, "late");
    }

    #[test]
    fn test_services_ascending_by_order() {
        let mut services = vec![
            Service {
                title: "b".to_string(),
                order: 2,
                ..Default::default()
            },
            Service {
                title: "a".to_string(),
                order: 0,
                ..Default::default()
            },
        ];

        sort_services(&mut services);
        assert_eq!(services[0].title, "a");
    }
}
