//! Pure transforms over the skill-category list.
//!
//! The whole skills section is one singleton document holding an array, so
//! every mutation rewrites the list functionally and persists it in a single
//! write. Categories are addressed by title (the natural key); addressing a
//! title that does not exist reports `CategoryNotFound` instead of silently
//! returning the list unchanged.

use crate::modules::content::domain::entities::{Skill, SkillCategory};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SkillListError {
    #[error("skill category '{0}' not found")]
    CategoryNotFound(String),

    #[error("skill category '{0}' already exists")]
    DuplicateCategory(String),
}

/// Appends a new empty category. Titles are unique within the list.
pub fn add_category(
    list: &[SkillCategory],
    title: &str,
) -> Result<Vec<SkillCategory>, SkillListError> {
    if list.iter().any(|cat| cat.title == title) {
        return Err(SkillListError::DuplicateCategory(title.to_string()));
    }
    let mut next = list.to_vec();
    next.push(SkillCategory {
        title: title.to_string(),
        skills: Vec::new(),
    });
    Ok(next)
}

pub fn remove_category(
    list: &[SkillCategory],
    title: &str,
) -> Result<Vec<SkillCategory>, SkillListError> {
    if !list.iter().any(|cat| cat.title == title) {
        return Err(SkillListError::CategoryNotFound(title.to_string()));
    }
    Ok(list.iter().filter(|cat| cat.title != title).cloned().collect())
}

pub fn add_skill(
    list: &[SkillCategory],
    category_title: &str,
    skill: Skill,
) -> Result<Vec<SkillCategory>, SkillListError> {
    if !list.iter().any(|cat| cat.title == category_title) {
        return Err(SkillListError::CategoryNotFound(category_title.to_string()));
    }
    Ok(list
        .iter()
        .map(|cat| {
            if cat.title == category_title {
                let mut updated = cat.clone();
                updated.skills.push(skill.clone());
                updated
            } else {
                cat.clone()
            }
        })
        .collect())
}

/// Removes a skill by name from the named category. A skill name with no
/// match leaves that category unchanged; only the category itself must exist.
pub fn remove_skill(
    list: &[SkillCategory],
    category_title: &str,
    skill_name: &str,
) -> Result<Vec<SkillCategory>, SkillListError> {
    if !list.iter().any(|cat| cat.title == category_title) {
        return Err(SkillListError::CategoryNotFound(category_title.to_string()));
    }
    Ok(list
        .iter()
        .map(|cat| {
            if cat.title == category_title {
                let mut updated = cat.clone();
                updated.skills.retain(|s| s.name != skill_name);
                updated
            } else {
                cat.clone()
            }
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Vec<SkillCategory> {
        vec![
            SkillCategory {
                title: "Backend".to_string(),
                skills: vec![Skill {
                    name: "Rust".to_string(),
                    level: 80,
                    link: None,
                }],
            },
            SkillCategory {
                title: "Security".to_string(),
                skills: Vec::new(),
            },
        ]
    }

    #[test]
    fn test_add_category() {
        let next = add_category(&sample(), "Frontend").unwrap();
        assert_eq!(next.len(), 3);
        assert_eq!(next[2].title, "Frontend");
        assert!(next[2].skills.is_empty());
    }

    #[test]
    fn test_add_duplicate_category_rejected() {
        let err = add_category(&sample(), "Backend").unwrap_err();
        assert_eq!(err, SkillListError::DuplicateCategory("Backend".to_string()));
    }

    #[test]
    fn test_add_skill_to_existing_category() {
        let skill = Skill {
            name: "Tokio".to_string(),
            level: 70,
            link: Some("https://tokio.rs".to_string()),
        };
        let next = add_skill(&sample(), "Backend", skill).unwrap();
        assert_eq!(next[0].skills.len(), 2);
        assert_eq!(next[0].skills[1].name, "Tokio");
        // Sibling categories untouched.
        assert_eq!(next[1], sample()[1]);
    }

    #[test]
    fn test_add_skill_unknown_category_reports_not_found() {
        let list = sample();
        let skill = Skill {
            name: "React".to_string(),
            level: 60,
            link: None,
        };

        let err = add_skill(&list, "Frontend", skill).unwrap_err();

        assert_eq!(err, SkillListError::CategoryNotFound("Frontend".to_string()));
        // The input list is untouched: no transform output exists at all.
        assert_eq!(list, sample());
    }

    #[test]
    fn test_remove_skill() {
        let next = remove_skill(&sample(), "Backend", "Rust").unwrap();
        assert!(next[0].skills.is_empty());
    }

    #[test]
    fn test_remove_missing_skill_is_silent_within_existing_category() {
        let next = remove_skill(&sample(), "Backend", "Go").unwrap();
        assert_eq!(next, sample());
    }

    #[test]
    fn test_remove_category() {
        let next = remove_category(&sample(), "Security").unwrap();
        assert_eq!(next.len(), 1);
        assert_eq!(next[0].title, "Backend");
    }

    #[test]
    fn test_remove_unknown_category_reports_not_found() {
        let err = remove_category(&sample(), "Cloud").unwrap_err();
        assert_eq!(err, SkillListError::CategoryNotFound("Cloud".to_string()));
    }
}
