use proptest::prelude::*;
use strata_kernel::prelude::*;

proptest! {
    #[test]
    fn one_variant_per_registered_implementation(
        names in proptest::collection::btree_set("[A-Z][a-z]{2,6}", 1..6),
        pick in any::<prop::sample::Index>(),
    ) {
        let names: Vec<String> = names.into_iter().collect();
        let registry = Registry::new();
        let root = Class::replaceable("Base").build();
        for (i, name) in names.iter().enumerate() {
            let weight = i64::try_from(i).unwrap_or_default();
            registry.register(Class::extends(&root, name.as_str()).field("weight", weight).build()).unwrap();
        }
        let holder = Class::configurable("Holder").member("part", &root).build();

        let mut tree = registry.default_args(&holder).unwrap();
        let variants: Vec<String> =
            tree.keys().filter(|key| key.ends_with("_args")).map(str::to_owned).collect();
        let expected: Vec<String> = names.iter().map(|name| format!("part_{name}_args")).collect();
        prop_assert_eq!(&variants, &expected);

        let selected = pick.get(&names).clone();
        tree.insert("part_class_type", selected.as_str());
        remove_unused_components(&mut tree);
        let built = registry.construct(&holder, &tree).unwrap();

        prop_assert_eq!(tree.len(), 2);
        prop_assert_eq!(built.member("part").map(|part| part.class().name()), Some(selected.as_str()));
    }
}
