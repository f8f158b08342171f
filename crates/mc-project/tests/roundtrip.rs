use mc_project::schema::*;
use mc_project::{ProjectError, load, load_json, load_yaml, save_json, save_yaml, validate_config};

#[test]
fn roundtrip_yaml_default_config() {
    let config = MonolithConfig::default();
    validate_config(&config).unwrap();

    let path = std::env::temp_dir().join("mc_project_roundtrip_default.yaml");
    save_yaml(&path, &config).unwrap();
    let loaded = load_yaml(&path).unwrap();

    assert_eq!(config, loaded);
}

#[test]
fn roundtrip_json_modified_config() {
    let mut config = MonolithConfig::default();
    config.name = "fine grid".to_string();
    config.grid.nz = 10;
    config.grid.ns = 9;
    config.grid.axial_scheme = AxialScheme::Central;
    config.substrate.coupling = SubstrateCoupling::Conduction;
    config.solver.max_step_s = Some(5.0);
    config.kinetics.enabled = false;

    let path = std::env::temp_dir().join("mc_project_roundtrip_modified.json");
    save_json(&path, &config).unwrap();
    let loaded = load_json(&path).unwrap();
    assert_eq!(config, loaded);

    // Extension dispatch picks JSON.
    assert_eq!(load(&path).unwrap(), config);
}

#[test]
fn save_refuses_invalid_config() {
    let mut config = MonolithConfig::default();
    config.grid.nz = 0;
    let path = std::env::temp_dir().join("mc_project_invalid.yaml");
    let err = save_yaml(&path, &config).unwrap_err();
    assert!(matches!(err, ProjectError::Validation(_)));
}

#[test]
fn load_reports_validation_errors() {
    let path = std::env::temp_dir().join("mc_project_bad_tolerance.yaml");
    std::fs::write(&path, "solver:\n  atol: -1.0\n").unwrap();
    let err = load_yaml(&path).unwrap_err();
    assert!(matches!(err, ProjectError::Validation(_)));
}

#[test]
fn load_reports_missing_file() {
    let path = std::env::temp_dir().join("mc_project_does_not_exist.yaml");
    let _ = std::fs::remove_file(&path);
    assert!(matches!(load_yaml(&path), Err(ProjectError::Io(_))));
}
