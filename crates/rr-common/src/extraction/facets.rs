use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use super::ExtractedFields;

/// Distinct values seen across a batch, used to offer filter choices.
/// Each list is sorted and excludes empty values.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldFacets {
    pub previous_departments: Vec<String>,
    pub previous_positions: Vec<String>,
    pub targeted_departments: Vec<String>,
    pub targeted_positions: Vec<String>,
    pub skills: Vec<String>,
}

impl FieldFacets {
    pub fn from_fields<'a, I>(fields: I) -> Self
    where
        I: IntoIterator<Item = &'a ExtractedFields>,
    {
        let mut previous_departments = BTreeSet::new();
        let mut previous_positions = BTreeSet::new();
        let mut targeted_departments = BTreeSet::new();
        let mut targeted_positions = BTreeSet::new();
        let mut skills = BTreeSet::new();

        for record in fields {
            insert_non_empty(&mut previous_departments, &record.previous_department);
            insert_non_empty(&mut previous_positions, &record.previous_position);
            insert_non_empty(&mut targeted_departments, &record.targeted_department);
            insert_non_empty(&mut targeted_positions, &record.targeted_position);
            for skill in &record.skills {
                insert_non_empty(&mut skills, skill);
            }
        }

        Self {
            previous_departments: previous_departments.into_iter().collect(),
            previous_positions: previous_positions.into_iter().collect(),
            targeted_departments: targeted_departments.into_iter().collect(),
            targeted_positions: targeted_positions.into_iter().collect(),
            skills: skills.into_iter().collect(),
        }
    }
}

fn insert_non_empty(set: &mut BTreeSet<String>, value: &str) {
    if !value.is_empty() {
        set.insert(value.to_string());
    }
}
