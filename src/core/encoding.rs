use crate::models::EncodedLabel;

/// Maps each distinct category to its index in the sorted list of categories
///
/// A missing value is a class of its own and sorts after every present one,
/// so with genders `Female`, `Male` and missing the codes are 0, 1 and 2.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LabelEncoder {
    classes: Vec<Option<String>>,
}

impl LabelEncoder {
    pub fn fit<'a, I>(values: I) -> Self
    where
        I: IntoIterator<Item = Option<&'a str>>,
    {
        let mut classes: Vec<Option<String>> =
            values.into_iter().map(|v| v.map(str::to_owned)).collect();

        // `None < Some(_)` for Option, so missing is pulled out and re-appended
        classes.sort_unstable_by(|a, b| match (a, b) {
            (Some(x), Some(y)) => x.cmp(y),
            (Some(_), None) => std::cmp::Ordering::Less,
            (None, Some(_)) => std::cmp::Ordering::Greater,
            (None, None) => std::cmp::Ordering::Equal,
        });
        classes.dedup();

        Self { classes }
    }

    /// Code of a value seen during `fit`
    pub fn encode(&self, value: Option<&str>) -> Option<usize> {
        self.classes.iter().position(|c| c.as_deref() == value)
    }

    pub fn classes(&self) -> &[Option<String>] {
        &self.classes
    }

    pub fn len(&self) -> usize {
        self.classes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.classes.is_empty()
    }

    pub fn labels(&self) -> Vec<EncodedLabel> {
        self.classes
            .iter()
            .enumerate()
            .map(|(code, label)| EncodedLabel { code, label: label.clone() })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sorted_with_missing_last() {
        let encoder = LabelEncoder::fit(vec![Some("Male"), None, Some("Female"), Some("Male")]);

        assert_eq!(encoder.len(), 3);
        assert_eq!(encoder.encode(Some("Female")), Some(0));
        assert_eq!(encoder.encode(Some("Male")), Some(1));
        assert_eq!(encoder.encode(None), Some(2));
        assert_eq!(encoder.encode(Some("Other")), None);
    }

    #[test]
    fn test_labels() {
        let encoder = LabelEncoder::fit(vec![Some("Water Supply"), Some("Commercial Banks")]);
        let labels = encoder.labels();

        assert_eq!(labels[0].label.as_deref(), Some("Commercial Banks"));
        assert_eq!(labels[1].code, 1);
    }

    #[test]
    fn test_empty() {
        let encoder = LabelEncoder::fit(Vec::<Option<&str>>::new());
        assert!(encoder.is_empty());
        assert_eq!(encoder.encode(None), None);
    }
}
