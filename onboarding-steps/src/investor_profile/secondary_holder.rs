//! Secondary (joint) account holder.

use questionnaire::{SchemaError, StepSchema};

use super::account_holder::holder_schema;

/// Same questions as the primary holder, namespaced under step 4.
pub fn schema() -> Result<StepSchema, SchemaError> {
    holder_schema("secondary-holder", "step4")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mirrors_primary_holder() {
        let primary = super::super::account_holder::schema().unwrap();
        let secondary = schema().unwrap();
        assert_eq!(primary.questions().len(), secondary.questions().len());
        assert_eq!(primary.default_tree(), secondary.default_tree());
        for (p, s) in primary.questions().iter().zip(secondary.questions()) {
            assert_eq!(p.path, s.path);
            assert_eq!(s.id.as_str(), format!("step4.{}", s.path));
        }
    }
}
