use std::path::{Path, PathBuf};

use kitgen_compose::{ComposeManifest, PortSpec, Synthesizer, host_ports};
use kitgen_config::Config;
use kitgen_core::{Error, Filesystem, LocalFilesystem, testing::MemoryFilesystem};
use tempfile::TempDir;

const MANIFEST: &str = "docker-compose.yml";

fn with_service(fs: MemoryFilesystem, name: &str, http: bool, grpc: bool) -> MemoryFilesystem {
    let mut fs = fs.with_file(
        format!("{}/pkg/service/service.go", name),
        "package service\n",
    );
    if http {
        fs = fs.with_file(format!("{}/pkg/http/handler.go", name), "package http\n");
    }
    if grpc {
        fs = fs.with_file(format!("{}/pkg/grpc/handler.go", name), "package grpc\n");
    }
    fs
}

fn synthesize(fs: &MemoryFilesystem) -> kitgen_core::Result<kitgen_compose::ComposeReport> {
    let config = Config::default();
    Synthesizer::new(fs, &config, "shop").run()
}

fn manifest(fs: &MemoryFilesystem) -> ComposeManifest {
    ComposeManifest::parse(&fs.file(MANIFEST).unwrap(), MANIFEST).unwrap()
}

fn ports(manifest: &ComposeManifest, name: &str) -> Vec<String> {
    manifest.services[name]
        .ports
        .iter()
        .flatten()
        .map(|p| match p {
            PortSpec::Short(s) => s.clone(),
            other => panic!("unexpected port spec {:?}", other),
        })
        .collect()
}

#[test]
fn test_alpha_and_beta_from_scratch() {
    let fs = with_service(MemoryFilesystem::new(), "alpha", true, false);
    let fs = with_service(fs, "beta", true, true);

    let report = synthesize(&fs).unwrap();
    assert!(report.manifest_written);
    assert_eq!(report.registered.len(), 2);

    let m = manifest(&fs);
    assert_eq!(m.version.as_deref(), Some("3"));
    assert_eq!(ports(&m, "alpha"), vec!["8800:8081"]);
    assert_eq!(ports(&m, "beta"), vec!["8801:8081", "8802:8082"]);

    let alpha = &m.services["alpha"];
    assert_eq!(alpha.image.as_deref(), Some("golang:1.14"));
    assert_eq!(alpha.working_dir.as_deref(), Some("/alpha"));
    assert!(m.extra.contains_key("networks"));
    assert!(m.extra.contains_key("volumes"));
}

#[test]
fn test_adding_gamma_keeps_existing_ports() {
    let fs = with_service(MemoryFilesystem::new(), "alpha", true, false);
    let fs = with_service(fs, "beta", true, true);
    synthesize(&fs).unwrap();
    let before = manifest(&fs);

    let fs = with_service(fs, "gamma", true, false);
    let report = synthesize(&fs).unwrap();

    assert_eq!(report.unchanged, vec!["alpha", "beta"]);
    assert_eq!(report.registered.len(), 1);

    let after = manifest(&fs);
    assert_eq!(after.services["alpha"], before.services["alpha"]);
    assert_eq!(after.services["beta"], before.services["beta"]);
    assert_eq!(ports(&after, "gamma"), vec!["8803:8081"]);
}

#[test]
fn test_second_run_is_byte_identical() {
    let fs = with_service(MemoryFilesystem::new(), "alpha", true, false);
    let fs = with_service(fs, "beta", true, true);

    synthesize(&fs).unwrap();
    let first = fs.file(MANIFEST).unwrap();
    let writes = fs.write_count();

    let report = synthesize(&fs).unwrap();
    assert!(!report.manifest_written);
    assert_eq!(fs.file(MANIFEST).unwrap(), first);
    assert_eq!(fs.write_count(), writes);
}

#[test]
fn test_host_ports_are_unique() {
    let mut fs = MemoryFilesystem::new().with_file(
        MANIFEST,
        "services:\n  db:\n    image: postgres\n    ports: [\"8800:5432\", \"8802-8803:9000-9001\"]\n",
    );
    for name in ["a", "b", "c", "d"] {
        fs = with_service(fs, name, true, true);
    }

    synthesize(&fs).unwrap();
    let m = manifest(&fs);

    let mut all: Vec<u16> = m
        .services
        .values()
        .flat_map(|e| e.ports.iter().flatten())
        .flat_map(host_ports)
        .collect();
    let total = all.len();
    all.sort();
    all.dedup();
    assert_eq!(all.len(), total);
    assert_eq!(ports(&m, "a"), vec!["8801:8081", "8804:8082"]);
}

#[test]
fn test_unknown_fields_survive() {
    let fs = with_service(MemoryFilesystem::new(), "alpha", true, false).with_file(
        MANIFEST,
        "version: \"3.8\"\nx-logging:\n  driver: json-file\nservices:\n  db:\n    image: postgres\n    healthcheck:\n      test: [\"CMD\", \"pg_isready\"]\n",
    );

    synthesize(&fs).unwrap();
    let m = manifest(&fs);

    assert_eq!(m.version.as_deref(), Some("3.8"));
    assert!(m.extra.contains_key("x-logging"));
    assert!(m.services["db"].extra.contains_key("healthcheck"));
    assert_eq!(ports(&m, "alpha"), vec!["8800:8081"]);
}

#[test]
fn test_ports_inherited_through_merge_key_are_not_reused() {
    let fs = with_service(MemoryFilesystem::new(), "alpha", true, false).with_file(
        MANIFEST,
        "x-legacy: &legacy\n  image: nginx\n  ports: [\"8800:80\"]\nservices:\n  legacy:\n    <<: *legacy\n    restart: always\n",
    );

    let report = synthesize(&fs).unwrap();
    assert_eq!(report.registered[0].ports[0].host, 8801);

    let m = manifest(&fs);
    assert_eq!(ports(&m, "alpha"), vec!["8801:8081"]);

    let legacy = &m.services["legacy"];
    assert!(legacy.extra.contains_key("restart"));
    assert_eq!(
        legacy.effective_ports(),
        vec![PortSpec::Short("8800:80".to_string())]
    );

    let mut hosts: Vec<u16> = m
        .services
        .values()
        .flat_map(|entry| entry.effective_ports())
        .flat_map(|spec| host_ports(&spec))
        .collect();
    let total = hosts.len();
    hosts.sort();
    hosts.dedup();
    assert_eq!(hosts.len(), total);

    let report = synthesize(&fs).unwrap();
    assert!(!report.manifest_written);
}

#[test]
fn test_service_without_transports_has_no_ports() {
    let fs = with_service(MemoryFilesystem::new(), "worker", false, false);

    synthesize(&fs).unwrap();
    assert!(manifest(&fs).services["worker"].ports.is_none());
}

#[test]
fn test_dockerfile_written_once() {
    let fs = with_service(MemoryFilesystem::new(), "alpha", true, false);

    let report = synthesize(&fs).unwrap();
    assert_eq!(report.dockerfiles, vec![PathBuf::from("alpha/Dockerfile")]);

    fs.write_file(Path::new("alpha/Dockerfile"), "FROM custom\n").unwrap();
    let report = synthesize(&fs).unwrap();
    assert!(report.dockerfiles.is_empty());
    assert_eq!(fs.file("alpha/Dockerfile").as_deref(), Some("FROM custom\n"));
}

#[test]
fn test_external_dockerfile_service_is_registered() {
    let fs = MemoryFilesystem::new()
        .with_file("legacy/Dockerfile", "FROM scratch\n")
        .with_file("legacy/pkg/http/handler.go", "package http\n")
        .with_dir("docs");

    let report = synthesize(&fs).unwrap();

    assert_eq!(report.registered.len(), 1);
    let legacy = &report.registered[0];
    assert!(legacy.external);
    assert_eq!(legacy.build_context, "/go/src/shop/legacy");
    assert!(report.dockerfiles.is_empty());
    assert!(!manifest(&fs).contains("docs"));
}

#[test]
fn test_corrupt_manifest_writes_nothing() {
    let fs = with_service(MemoryFilesystem::new(), "alpha", true, false)
        .with_file(MANIFEST, "services: [unclosed\n");

    let err = synthesize(&fs).unwrap_err();
    assert!(matches!(*err, Error::ManifestCorrupt { .. }));
    assert_eq!(fs.write_count(), 0);
    assert_eq!(fs.file(MANIFEST).as_deref(), Some("services: [unclosed\n"));
}

#[test]
fn test_exhaustion_writes_nothing() {
    let fs = with_service(MemoryFilesystem::new(), "alpha", true, true);
    let mut config = Config::default();
    config.compose.port_window = 1;

    let err = Synthesizer::new(&fs, &config, "shop").run().unwrap_err();
    assert!(matches!(*err, Error::ResourceExhausted { .. }));
    assert_eq!(fs.write_count(), 0);
}

#[test]
fn test_local_filesystem_round_trip() {
    let temp = TempDir::new().unwrap();
    let root = temp.path();
    std::fs::create_dir_all(root.join("alpha/pkg/service")).unwrap();
    std::fs::create_dir_all(root.join("alpha/pkg/http")).unwrap();
    std::fs::write(root.join("alpha/pkg/service/service.go"), "package service\n").unwrap();
    std::fs::write(root.join("alpha/pkg/http/handler.go"), "package http\n").unwrap();

    let fs = LocalFilesystem::new(root);
    let config = Config::default();
    let report = Synthesizer::new(&fs, &config, "shop").run().unwrap();

    assert!(report.manifest_written);
    assert!(root.join("alpha/Dockerfile").is_file());
    let written = std::fs::read_to_string(root.join(MANIFEST)).unwrap();
    assert!(written.contains("8800:8081"));

    let report = Synthesizer::new(&fs, &config, "shop").run().unwrap();
    assert!(!report.manifest_written);
    assert_eq!(std::fs::read_to_string(root.join(MANIFEST)).unwrap(), written);
}
