use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// A list setting which a level of the library hierarchy may leave to its parent,
/// explicitly clear, or explicitly set.
///
/// In `shelf.yaml` an absent key or `null` is [`TriState::Inherit`], `[]` is
/// [`TriState::Empty`] and a non-empty list is [`TriState::Value`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TriState<T> {
    Inherit,
    Empty,
    Value(Vec<T>),
}

impl<T> Default for TriState<T> {
    fn default() -> Self {
        Self::Inherit
    }
}

impl<T> From<Option<Vec<T>>> for TriState<T> {
    fn from(value: Option<Vec<T>>) -> Self {
        match value {
            None => Self::Inherit,
            Some(list) if list.is_empty() => Self::Empty,
            Some(list) => Self::Value(list),
        }
    }
}

impl<T> TriState<T> {
    #[must_use]
    pub fn is_inherit(&self) -> bool {
        matches!(self, Self::Inherit)
    }

    /// The explicit payload of this level, `None` when it defers upwards.
    /// An empty `Value` is treated exactly like `Empty`.
    #[must_use]
    pub fn explicit(&self) -> Option<&[T]> {
        match self {
            Self::Inherit => None,
            Self::Empty => Some(&[]),
            Self::Value(list) => Some(list),
        }
    }

    /// Walks `levels` from the most specific to the least specific one and returns
    /// the payload of the first level that does not inherit.
    #[must_use]
    pub fn first_explicit<'a, I>(levels: I) -> Option<&'a [T]>
    where
        I: IntoIterator<Item = &'a TriState<T>>,
        T: 'a,
    {
        levels.into_iter().find_map(TriState::explicit)
    }

    /// Same as [`TriState::first_explicit`], but falls back to an empty list when
    /// every level inherits.
    #[must_use]
    pub fn resolve<'a, I>(levels: I) -> &'a [T]
    where
        I: IntoIterator<Item = &'a TriState<T>>,
        T: 'a,
    {
        Self::first_explicit(levels).unwrap_or(&[])
    }
}

impl<T: Serialize> Serialize for TriState<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.explicit().serialize(serializer)
    }
}

impl<'de, T: Deserialize<'de>> Deserialize<'de> for TriState<T> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Option::<Vec<T>>::deserialize(deserializer).map(Self::from)
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::TriState;

    #[test]
    fn from_option() {
        assert_eq!(TriState::<u8>::from(None), TriState::Inherit);
        assert_eq!(TriState::<u8>::from(Some(vec![])), TriState::Empty);
        assert_eq!(TriState::from(Some(vec![1])), TriState::Value(vec![1]));
    }

    #[test]
    fn first_non_inherit_level_wins() {
        let levels = [
            TriState::Inherit,
            TriState::Value(vec![2]),
            TriState::Value(vec![3]),
        ];
        assert_eq!(TriState::resolve(&levels), &[2]);

        let levels = [TriState::Inherit, TriState::Empty, TriState::Value(vec![3])];
        assert_eq!(TriState::resolve(&levels), &[] as &[i32]);
        assert_eq!(TriState::first_explicit(&levels), Some(&[] as &[i32]));
    }

    #[test]
    fn all_inherit_resolves_to_nothing() {
        let levels: [TriState<i32>; 3] = [TriState::Inherit, TriState::Inherit, TriState::Inherit];
        assert_eq!(TriState::first_explicit(&levels), None);
        assert_eq!(TriState::resolve(&levels), &[] as &[i32]);
        assert_eq!(TriState::resolve(&[] as &[TriState<i32>]), &[] as &[i32]);
    }

    #[test]
    fn empty_value_behaves_as_empty() {
        let levels = [TriState::Value(vec![]), TriState::Value(vec![1])];
        assert_eq!(TriState::resolve(&levels), &[] as &[i32]);
    }

    #[test]
    fn yaml() {
        let null: TriState<u8> = serde_yaml::from_str("~").unwrap();
        let empty: TriState<u8> = serde_yaml::from_str("[]").unwrap();
        let value: TriState<u8> = serde_yaml::from_str("[1, 2]").unwrap();

        assert_eq!(null, TriState::Inherit);
        assert_eq!(empty, TriState::Empty);
        assert_eq!(value, TriState::Value(vec![1, 2]));

        assert_eq!(serde_yaml::to_string(&empty).unwrap().trim(), "[]");
        assert_eq!(serde_yaml::to_string(&null).unwrap().trim(), "null");
    }
}
