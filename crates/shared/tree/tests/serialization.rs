use strata_tree::{ConfigTree, Value, config_tree};

fn sample() -> ConfigTree {
    config_tree! {
        "renderer_class_type" => "MultiPassEmissionAbsorptionRenderer",
        "renderer_MultiPassEmissionAbsorptionRenderer_args" => config_tree! {
            "n_pts_per_ray_fine_training" => 64,
            "stratified_sampling_coarse_training" => true,
            "bg_color" => vec![0.0, 0.5, 1.0],
            "density_noise_std_train" => 0.0,
        },
        "feature_vector_size" => 3,
        "mode" => "idr",
        "image_width" => Value::Missing,
        "label" => "2",
        "note" => Value::Null,
    }
}

#[test]
fn yaml_round_trip_preserves_order_and_types() {
    let tree = sample();
    let yaml = tree.to_yaml().unwrap();
    let back = ConfigTree::from_yaml(&yaml).unwrap();

    assert_eq!(back, tree);
    assert_eq!(back.keys().collect::<Vec<_>>(), tree.keys().collect::<Vec<_>>());
    assert_eq!(
        back.get_path("renderer_MultiPassEmissionAbsorptionRenderer_args.density_noise_std_train"),
        Some(&Value::Float(0.0))
    );
    // A numeric-looking string stays a string.
    assert_eq!(back.get("label"), Some(&Value::from("2")));
}

#[test]
fn json_round_trip_preserves_order_and_types() {
    let tree = sample();
    let json = tree.to_json().unwrap();
    let back = ConfigTree::from_json(&json).unwrap();

    assert_eq!(back, tree);
    assert_eq!(back.get("image_width"), Some(&Value::Missing));
    assert_eq!(back.get("feature_vector_size"), Some(&Value::Int(3)));
}

#[test]
fn yaml_is_written_in_insertion_order() {
    let tree = config_tree! { "z" => 1, "a" => 2 };
    assert_eq!(tree.to_yaml().unwrap(), "z: 1\na: 2\n");
}

#[test]
fn reads_hand_written_yaml() {
    let text = "\
a_class_type: A1
a_A1_args:
  m: 5
  dims: [512, 512]
scale: 1.5
";
    let tree = ConfigTree::from_yaml(text).unwrap();
    assert_eq!(tree.get_path("a_A1_args.m"), Some(&Value::Int(5)));
    assert_eq!(tree.get_path("a_A1_args.dims"), Some(&Value::from(vec![512, 512])));
    assert_eq!(tree.get("scale"), Some(&Value::Float(1.5)));
}

#[test]
fn rejects_non_mapping_documents() {
    assert!(ConfigTree::from_json("[1, 2]").is_err());
    assert!(ConfigTree::from_yaml("just a string").is_err());
}

#[test]
fn json_refuses_non_finite_floats_with_their_path() {
    let tree = config_tree! {
        "scale" => 1.5,
        "raymarcher_args" => config_tree! { "bg_color" => vec![0.0, f64::INFINITY] },
    };

    let err = tree.to_json().unwrap_err();
    assert_eq!(err.kind(), "Internal");
    assert!(err.to_string().contains("'raymarcher_args.bg_color[1]'"), "{err}");

    let nan = config_tree! { "density_noise_std_train" => f64::NAN };
    assert!(nan.to_json().is_err());
}

#[test]
fn yaml_keeps_infinite_floats() {
    let tree = config_tree! { "far" => f64::INFINITY, "near" => f64::NEG_INFINITY };
    let back = ConfigTree::from_yaml(&tree.to_yaml().unwrap()).unwrap();
    assert_eq!(back, tree);
}
