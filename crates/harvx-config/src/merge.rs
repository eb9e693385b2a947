use harvx_types::Profile;

/// Merge `child` over `parent`: scalars in `child` override when present;
/// `Vec` fields replace wholesale when `child`'s is non-empty (matching
/// spec's "arrays replace, not concatenate"); `Option<Vec<_>>` fields
/// (`tier_definitions`) replace whenever `child` sets them at all, even to
/// an empty list, since `Option` lets us distinguish "unset" from
/// "explicitly cleared" where a plain `Vec` cannot.
pub fn merge_profile(parent: &Profile, child: &Profile) -> Profile {
    Profile {
        extends: child.extends.clone(),
        output_path: child.output_path.clone().or_else(|| parent.output_path.clone()),
        format: child.format.or(parent.format),
        max_tokens: child.max_tokens.or(parent.max_tokens),
        tokenizer: child.tokenizer.or(parent.tokenizer),
        compression_enabled: child.compression_enabled.or(parent.compression_enabled),
        redaction: child.redaction.clone().or_else(|| parent.redaction.clone()),
        priority_files: replace_if_nonempty(&parent.priority_files, &child.priority_files),
        tier_definitions: child
            .tier_definitions
            .clone()
            .or_else(|| parent.tier_definitions.clone()),
        ignore: replace_if_nonempty(&parent.ignore, &child.ignore),
        include: replace_if_nonempty(&parent.include, &child.include),
        target: child.target.or(parent.target),
        unknown_keys: replace_if_nonempty(&parent.unknown_keys, &child.unknown_keys),
    }
}

fn replace_if_nonempty(parent: &[String], child: &[String]) -> Vec<String> {
    if child.is_empty() {
        parent.to_vec()
    } else {
        child.to_vec()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_child_vec_keeps_parent() {
        let parent = Profile {
            ignore: vec!["a".into()],
            ..Profile::default()
        };
        let child = Profile::default();
        let merged = merge_profile(&parent, &child);
        assert_eq!(merged.ignore, vec!["a".to_string()]);
    }

    #[test]
    fn nonempty_child_vec_replaces_parent() {
        let parent = Profile {
            ignore: vec!["a".into()],
            ..Profile::default()
        };
        let child = Profile {
            ignore: vec!["b".into(), "c".into()],
            ..Profile::default()
        };
        let merged = merge_profile(&parent, &child);
        assert_eq!(merged.ignore, vec!["b".to_string(), "c".to_string()]);
    }

    #[test]
    fn scalar_child_some_overrides_parent() {
        let parent = Profile {
            max_tokens: Some(100),
            ..Profile::default()
        };
        let child = Profile {
            max_tokens: Some(200),
            ..Profile::default()
        };
        assert_eq!(merge_profile(&parent, &child).max_tokens, Some(200));
    }

    #[test]
    fn scalar_child_none_keeps_parent() {
        let parent = Profile {
            max_tokens: Some(100),
            ..Profile::default()
        };
        let child = Profile::default();
        assert_eq!(merge_profile(&parent, &child).max_tokens, Some(100));
    }
}
