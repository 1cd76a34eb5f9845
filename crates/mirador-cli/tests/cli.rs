use assert_cmd::Command;
use predicates::str::contains;
use std::path::{Path, PathBuf};
use tempfile::{tempdir, TempDir};

fn cmd() -> Command {
    Command::cargo_bin("mirador").unwrap()
}

struct Fixture {
    _dir: TempDir,
    homicides: PathBuf,
    tourism: PathBuf,
    hazards: PathBuf,
}

impl Fixture {
    fn source_args(&self) -> Vec<String> {
        vec![
            "--homicides".to_string(),
            self.homicides.display().to_string(),
            "--tourism".to_string(),
            self.tourism.display().to_string(),
            "--hazards".to_string(),
            self.hazards.display().to_string(),
            "--utf8".to_string(),
        ]
    }
}

fn write(path: &Path, content: &str) {
    std::fs::write(path, content).expect("write fixture");
}

fn fixture() -> Fixture {
    let dir = tempdir().expect("tempdir");
    let homicides = dir.path().join("homicides.csv");
    let tourism = dir.path().join("tourism.csv");
    let hazards = dir.path().join("hazards.csv");
    write(
        &homicides,
        "Provincia;Tipo Muert.;Arma;Sexo\nPICHINCHA;ASESINATO;ARMA DE FUEGO;HOMBRE\nGUAYAS;ASESINATO;ARMA BLANCA;MUJER\n",
    );
    write(
        &tourism,
        "nombre,categoria,tipo,lat,lon\nMitad del Mundo,CULTURAL,MONUMENTO,-0.0022,-78.4558\nSin coordenadas,CULTURAL,MUSEO,,\n",
    );
    write(
        &hazards,
        "EVENTO;PROVINCIA;CANTON;DESCRIPCION;lat;lon\nINTOXICACIÓN;NAPO;TENA;Evento masivo;-0.9938;-77.8129\n",
    );
    Fixture {
        _dir: dir,
        homicides,
        tourism,
        hazards,
    }
}

#[test]
fn help_lists_subcommands() {
    cmd()
        .arg("--help")
        .assert()
        .success()
        .stdout(contains("validate"))
        .stdout(contains("chart"))
        .stdout(contains("chat"));
}

#[test]
fn validate_reports_row_counts() {
    let fx = fixture();
    cmd()
        .arg("validate")
        .args(fx.source_args())
        .assert()
        .success()
        .stdout(contains("2 homicides"))
        .stdout(contains("2 tourism sites"))
        .stdout(contains("1 hazard events"));
}

#[test]
fn validate_json_is_machine_readable() {
    let fx = fixture();
    let output = cmd()
        .args(["--json", "validate"])
        .args(fx.source_args())
        .output()
        .expect("run validate");
    assert!(output.status.success());
    let value: serde_json::Value =
        serde_json::from_slice(&output.stdout).expect("validate json");
    assert_eq!(value["homicides"], 2);
    assert_eq!(value["hazards"], 1);
}

#[test]
fn validate_fails_with_exit_code_3_on_missing_column() {
    let fx = fixture();
    write(
        &fx.homicides,
        "Provincia;Arma;Sexo\nPICHINCHA;ARMA DE FUEGO;HOMBRE\n",
    );
    cmd()
        .arg("validate")
        .args(fx.source_args())
        .assert()
        .failure()
        .code(3)
        .stderr(contains("Tipo Muert."));
}

#[test]
fn distinct_lists_sorted_provinces() {
    let fx = fixture();
    cmd()
        .args(["distinct", "--column", "province"])
        .args(fx.source_args())
        .assert()
        .success()
        .stdout(contains("GUAYAS\nPICHINCHA"));
}

#[test]
fn chart_homicides_counts_matching_rows() {
    let fx = fixture();
    let output = cmd()
        .args([
            "--json",
            "chart",
            "homicides",
            "--province",
            "PICHINCHA",
            "--death-type",
            "ASESINATO",
        ])
        .args(fx.source_args())
        .output()
        .expect("run chart");
    assert!(output.status.success());
    let value: serde_json::Value = serde_json::from_slice(&output.stdout).expect("chart json");
    assert_eq!(value["total"], 1);
    assert_eq!(value["groups"][0]["weapon"], "ARMA DE FUEGO");
    assert_eq!(value["groups"][0]["sex"], "HOMBRE");
}

#[test]
fn chart_rejects_out_of_domain_province() {
    let fx = fixture();
    cmd()
        .args(["chart", "homicides", "--province", "ATLANTIS"])
        .args(fx.source_args())
        .assert()
        .failure()
        .code(3)
        .stderr(contains("ATLANTIS"));
}

#[test]
fn map_tourism_writes_a_self_contained_artifact() {
    let fx = fixture();
    let out = fx._dir.path().join("tourism_map.json");
    cmd()
        .args(["map", "tourism", "--out"])
        .arg(&out)
        .args(fx.source_args())
        .assert()
        .success();
    let value: serde_json::Value =
        serde_json::from_slice(&std::fs::read(&out).expect("read artifact")).expect("artifact");
    assert_eq!(value["zoom"], 6);
    assert_eq!(value["layers"][0]["name"], "Atractivos Turísticos");
    assert_eq!(
        value["layers"][0]["markers"].as_array().expect("markers").len(),
        1
    );
}

#[test]
fn map_data_uri_prints_an_embeddable_string() {
    let fx = fixture();
    cmd()
        .args(["map", "hazards", "--data-uri"])
        .args(fx.source_args())
        .assert()
        .success()
        .stdout(contains("data:application/json;base64,"));
}

#[test]
fn chat_without_credential_fails_with_dependency_exit_code() {
    cmd()
        .arg("chat")
        .env_remove("MIRADOR_GEMINI_API_KEY")
        .assert()
        .failure()
        .code(4)
        .stderr(contains("MIRADOR_GEMINI_API_KEY"));
}
