//! Field masks for partial updates.
//!
//! A mask is an ordered list of field-name tokens. Each entity defines a
//! closed enum of the tokens it understands; anything else is ignored.
//! An empty mask selects every field of the entity.

/// A token of an entity's update mask.
pub trait MaskField: Copy + Eq + Sized + 'static {
    /// Every field, in the order a full replace applies them.
    const ALL: &'static [Self];

    fn from_name(name: &str) -> Option<Self>;
}

/// Resolve raw mask paths into the fields to apply.
pub fn resolve_mask<F: MaskField>(paths: &[String]) -> Vec<F> {
    if paths.is_empty() {
        return F::ALL.to_vec();
    }

    let mut fields = Vec::with_capacity(paths.len());
    for field in paths.iter().filter_map(|p| F::from_name(p.trim())) {
        if !fields.contains(&field) {
            fields.push(field);
        }
    }
    fields
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    enum Field {
        A,
        B,
    }

    impl MaskField for Field {
        const ALL: &'static [Self] = &[Field::A, Field::B];

        fn from_name(name: &str) -> Option<Self> {
            match name {
                "a" => Some(Field::A),
                "b" => Some(Field::B),
                _ => None,
            }
        }
    }

    fn paths(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_empty_mask_selects_everything() {
        assert_eq!(resolve_mask::<Field>(&[]), vec![Field::A, Field::B]);
    }

    #[test]
    fn test_unknown_tokens_are_ignored() {
        assert_eq!(resolve_mask::<Field>(&paths(&["b", "zzz"])), vec![Field::B]);
        assert!(resolve_mask::<Field>(&paths(&["zzz"])).is_empty());
    }

    #[test]
    fn test_duplicates_collapse_in_order() {
        assert_eq!(
            resolve_mask::<Field>(&paths(&["b", "a", "b"])),
            vec![Field::B, Field::A]
        );
    }
}
