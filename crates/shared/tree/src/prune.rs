use crate::naming::{ARGS_SUFFIX, implementation_args_field, selector_member};
use crate::tree::ConfigTree;
use crate::value::Value;

/// Removes, in place, the parameter subtrees of every variant that is not selected.
///
/// For each `<member>_class_type` key, every sibling key that starts with `<member>_` and
/// ends with `_args` is deleted except `<member>_<selected>_args`. A selector that is not
/// a string (for example `null`) selects nothing, so all of that member's variant
/// subtrees go. Nested trees are pruned after the current level.
pub fn remove_unused_components(tree: &mut ConfigTree) {
    let selections: Vec<(String, Option<String>)> = tree
        .iter()
        .filter_map(|(key, value)| {
            selector_member(key).map(|member| {
                let kept = value.as_str().map(|selected| implementation_args_field(member, selected));
                (format!("{member}_"), kept)
            })
        })
        .collect();

    for (prefix, kept) in &selections {
        tree.retain(|key, _| {
            let is_variant = key.starts_with(prefix.as_str()) && key.ends_with(ARGS_SUFFIX);
            !is_variant || kept.as_deref() == Some(key)
        });
    }

    for value in tree.values_mut() {
        if let Value::Tree(subtree) = value {
            remove_unused_components(subtree);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config_tree;

    #[test]
    fn keeps_only_selected_variant() {
        let mut tree = config_tree! {
            "a_class_type" => "A2",
            "a_A1_args" => config_tree! { "m" => 3 },
            "a_A2_args" => config_tree! { "n" => "2" },
        };
        remove_unused_components(&mut tree);
        assert_eq!(tree.keys().collect::<Vec<_>>(), ["a_class_type", "a_A2_args"]);
    }

    #[test]
    fn undefaulted_selector_drops_every_variant() {
        let mut tree = config_tree! {
            "a_class_type" => "UNDEFAULTED",
            "a_A1_args" => config_tree! {},
            "b_args" => config_tree! {},
        };
        remove_unused_components(&mut tree);
        assert_eq!(tree.keys().collect::<Vec<_>>(), ["a_class_type", "b_args"]);
    }

    #[test]
    fn null_selector_drops_every_variant() {
        let mut tree = config_tree! {
            "a_class_type" => Value::Null,
            "a_A1_args" => config_tree! {},
        };
        remove_unused_components(&mut tree);
        assert_eq!(tree.len(), 1);
    }

    #[test]
    fn recurses_into_surviving_subtrees() {
        let mut tree = config_tree! {
            "outer_args" => config_tree! {
                "inner_class_type" => "X",
                "inner_X_args" => config_tree! {},
                "inner_Y_args" => config_tree! {},
            },
        };
        remove_unused_components(&mut tree);
        let outer = tree.get_tree("outer_args").unwrap();
        assert!(outer.contains_key("inner_X_args"));
        assert!(!outer.contains_key("inner_Y_args"));
    }
}
