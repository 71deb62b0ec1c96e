use std::sync::Arc;

use catalog::SyllabusRepository;
use course_core::model::{Dimension, DimensionCategory};

use crate::error::StudyError;

/// Dimensions that share a category, in catalog order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DimensionGroup {
    pub category: DimensionCategory,
    pub dimensions: Vec<Dimension>,
}

/// Browses the institutional dimensions and their two-model comparison.
#[derive(Clone)]
pub struct ConceptExplorer {
    syllabus: Arc<dyn SyllabusRepository>,
}

impl ConceptExplorer {
    #[must_use]
    pub fn new(syllabus: Arc<dyn SyllabusRepository>) -> Self {
        Self { syllabus }
    }

    /// Dimensions grouped by category; groups appear in first-seen order.
    ///
    /// # Errors
    ///
    /// Returns `StudyError::Catalog` if the dimension table cannot be read.
    pub async fn groups(&self) -> Result<Vec<DimensionGroup>, StudyError> {
        Ok(group_by_category(self.syllabus.dimensions().await?))
    }

    /// The Westminster and Consensus positions for one dimension.
    ///
    /// # Errors
    ///
    /// Returns `StudyError::UnknownDimension` for an id not in the table.
    pub async fn compare(&self, id: &str) -> Result<Dimension, StudyError> {
        self.syllabus
            .dimensions()
            .await?
            .into_iter()
            .find(|d| d.id == id)
            .ok_or_else(|| StudyError::UnknownDimension { id: id.to_owned() })
    }
}

fn group_by_category(dimensions: Vec<Dimension>) -> Vec<DimensionGroup> {
    let mut groups: Vec<DimensionGroup> = Vec::new();
    for dimension in dimensions {
        match groups.iter_mut().find(|g| g.category == dimension.category) {
            Some(group) => group.dimensions.push(dimension),
            None => groups.push(DimensionGroup {
                category: dimension.category,
                dimensions: vec![dimension],
            }),
        }
    }
    groups
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dimension(id: &str, category: DimensionCategory) -> Dimension {
        Dimension {
            id: id.into(),
            name: id.into(),
            category,
            chapter: 1,
            westminster: "W".into(),
            consensus: "C".into(),
            description: String::new(),
        }
    }

    #[test]
    fn groups_keep_order_within_category() {
        let groups = group_by_category(vec![
            dimension("cabinets", DimensionCategory::ExecutivesParties),
            dimension("federalism", DimensionCategory::FederalUnitary),
            dimension("party_system", DimensionCategory::ExecutivesParties),
        ]);
        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0].category, DimensionCategory::ExecutivesParties);
        let ids: Vec<_> = groups[0].dimensions.iter().map(|d| d.id.as_str()).collect();
        assert_eq!(ids, ["cabinets", "party_system"]);
    }
}
