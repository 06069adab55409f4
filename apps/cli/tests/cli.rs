use assert_cmd::Command;
use predicates::prelude::*;
use std::error::Error;
use std::fs;
use tempfile::TempDir;

/// The binary run from an empty directory, so no stray `strata.*` settings file applies.
fn strata(dir: &TempDir) -> Result<Command, Box<dyn Error>> {
    let mut cmd = Command::cargo_bin("strata")?;
    cmd.current_dir(dir.path()).env_remove("RUST_LOG").env_remove("STRATA__OUTPUT");
    Ok(cmd)
}

#[test]
fn without_arguments_prints_help() -> Result<(), Box<dyn Error>> {
    let dir = tempfile::tempdir()?;
    strata(&dir)?.assert().failure().stderr(predicate::str::contains("Usage"));
    Ok(())
}

#[test]
fn list_shows_namespaces_and_entries() -> Result<(), Box<dyn Error>> {
    let dir = tempfile::tempdir()?;
    strata(&dir)?
        .arg("list")
        .assert()
        .success()
        .stdout(predicate::str::contains("RaymarcherBase:"))
        .stdout(predicate::str::contains("- SignedDistanceFunctionRenderer"))
        .stdout(predicate::str::contains("- RayNormalColoringNetwork"));
    Ok(())
}

#[test]
fn pruned_defaults_as_json() -> Result<(), Box<dyn Error>> {
    let dir = tempfile::tempdir()?;
    let output = strata(&dir)?
        .args(["defaults", "MeshRenderer", "--prune", "--format", "json"])
        .output()?;
    assert!(output.status.success());

    let tree: serde_json::Value = serde_json::from_slice(&output.stdout)?;
    assert_eq!(tree["shader_class_type"], "SoftPhongShader");
    assert_eq!(tree["shader_SoftPhongShader_args"]["zfar"], 100.0);
    assert!(tree.get("shader_HardFlatShader_args").is_none());
    assert_eq!(tree["rasterizer_MeshRasterizer_args"]["bin_size"], serde_json::Value::Null);
    Ok(())
}

#[test]
fn build_applies_files_and_overrides() -> Result<(), Box<dyn Error>> {
    let dir = tempfile::tempdir()?;
    let tree = dir.path().join("model.yaml");
    fs::write(&tree, "renderer_class_type: SignedDistanceFunctionRenderer\n")?;

    strata(&dir)?
        .args(["build", "GenericModel", "--file"])
        .arg(&tree)
        .args(["--set", "renderer_SignedDistanceFunctionRenderer_args.ray_tracer_args.n_steps=64"])
        .assert()
        .success()
        .stdout(predicate::str::contains("class: SignedDistanceFunctionRenderer"))
        .stdout(predicate::str::contains("class: RayTracing"))
        .stdout(predicate::str::contains("n_steps: 64"));
    Ok(())
}

#[test]
fn settings_file_selects_the_output_format() -> Result<(), Box<dyn Error>> {
    let dir = tempfile::tempdir()?;
    let settings = dir.path().join("settings.toml");
    fs::write(&settings, "output = \"json\"\n\n[log]\nlevel = \"error\"\n")?;

    strata(&dir)?
        .arg("--config")
        .arg(&settings)
        .args(["defaults", "RayNormalColoringNetwork"])
        .assert()
        .success()
        .stdout(predicate::str::starts_with("{"))
        .stdout(predicate::str::contains("\"mode\": \"idr\""));
    Ok(())
}

#[test]
fn environment_overrides_the_output_format() -> Result<(), Box<dyn Error>> {
    let dir = tempfile::tempdir()?;
    strata(&dir)?
        .env("STRATA__OUTPUT", "json")
        .args(["defaults", "RayTracing"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"sphere_tracing_iters\": 10"));
    Ok(())
}

#[test]
fn verbose_runs_log_to_stderr_only() -> Result<(), Box<dyn Error>> {
    let dir = tempfile::tempdir()?;
    strata(&dir)?
        .args(["-vvv", "defaults", "RayTracing", "--format", "yaml"])
        .assert()
        .success()
        .stdout(predicate::str::starts_with("object_bounding_sphere: 1.0"))
        .stderr(predicate::str::contains("Demo catalog ready"));
    Ok(())
}

#[test]
fn unknown_classes_fail_with_a_hint() -> Result<(), Box<dyn Error>> {
    let dir = tempfile::tempdir()?;
    strata(&dir)?
        .args(["defaults", "NeRFormer"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Unknown class 'NeRFormer'"));
    Ok(())
}

#[test]
fn unregistered_selections_fail_construction() -> Result<(), Box<dyn Error>> {
    let dir = tempfile::tempdir()?;
    strata(&dir)?
        .args(["build", "MeshRenderer", "--set", "rasterizer_class_type=PulsarRasterizer"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Constructing MeshRenderer"))
        .stderr(predicate::str::contains("PulsarRasterizer"));
    Ok(())
}

#[test]
fn malformed_settings_are_critical() -> Result<(), Box<dyn Error>> {
    let dir = tempfile::tempdir()?;
    let settings = dir.path().join("settings.toml");
    fs::write(&settings, "output = \"xml\"\n")?;

    strata(&dir)?
        .arg("--config")
        .arg(&settings)
        .arg("list")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Configuration is malformed"));
    Ok(())
}
