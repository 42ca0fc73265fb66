use test_support::{cmd_bin, fixture_path, tempdir};

#[test]
fn out_dir_receives_pages_and_manifest() {
  let td = tempdir();
  let out_dir = td.path().join("wiki");

  let out = cmd_bin("weekly-hours-report")
    .arg("--tasks")
    .arg(fixture_path("tasks.json"))
    .args(["--project", "Apollo", "--all-weeks", "--detailed", "--format", "wiki"])
    .args(["--today-override", "2023-06-15"])
    .arg("--out")
    .arg(&out_dir)
    .output()
    .unwrap();
  assert!(out.status.success(), "{}", String::from_utf8_lossy(&out.stderr));

  let pointer: serde_json::Value = serde_json::from_slice(&out.stdout).unwrap();
  assert_eq!(pointer["manifest"].as_str().unwrap(), "manifest.json");

  let manifest: serde_json::Value =
    serde_json::from_slice(&std::fs::read(out_dir.join("manifest.json")).unwrap()).unwrap();
  assert_eq!(manifest["generated_on"].as_str().unwrap(), "2023-06-15");
  assert_eq!(manifest["format"].as_str().unwrap(), "wiki");

  // W05 through W12: one summary plus eight weekly pages
  let pages = manifest["pages"].as_array().unwrap();
  assert_eq!(pages.len(), 9);
  assert_eq!(pages[0]["identifier"].as_str().unwrap(), "HoursperweekforprojectApollo");
  assert!(pages[0]["parent"].is_null());
  assert_eq!(pages[8]["identifier"].as_str().unwrap(), "HoursperweekforprojectApollo-2023W12");

  for page in pages {
    let file = page["file"].as_str().unwrap();
    assert!(file.ends_with(".twiki"));
    assert!(out_dir.join(file).is_file(), "missing {file}");
  }
  for page in &pages[1..] {
    assert_eq!(page["parent"].as_str().unwrap(), "HoursperweekforprojectApollo");
  }

  let summary = std::fs::read_to_string(out_dir.join("HoursperweekforprojectApollo.twiki")).unwrap();
  assert!(summary.contains("[[HoursperweekforprojectApollo-2023W12][2023-W12]]"));
}

#[test]
fn plain_pages_use_txt_extension() {
  let td = tempdir();
  let out_dir = td.path().join("plain");

  cmd_bin("weekly-hours-report")
    .arg("--tasks")
    .arg(fixture_path("tasks.json"))
    .args(["--project", "Apollo", "--weeks", "6/2023"])
    .arg("--out")
    .arg(&out_dir)
    .assert()
    .success();

  let body = std::fs::read_to_string(out_dir.join("2023W06.txt")).unwrap();
  assert!(body.contains("2023-W06 (06 Feb - 12 Feb 2023) for project Apollo"));
  assert!(!body.contains("[["));
}
