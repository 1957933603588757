use std::path::Path;

use super::*;
use crate::acquisition::transport::TransportError;
use crate::test_fixtures::{MockTransport, create_temp_dir, zip_bytes};

const WIDGET_MANIFEST: &str = "@{\n    RootModule = 'widget.psm1'\n    ModuleVersion = '2.1.0'\n    Author = 'Acme'\n    FunctionsToExport = @('Get-Widget')\n}\n";

fn config(temp: &Path) -> InstallConfig {
    InstallConfig {
        temp_root: temp.join("cache"),
        ..InstallConfig::default()
    }
}

fn widget_zip() -> Vec<u8> {
    zip_bytes(&[
        ("acme-widget-0a1b2c/widget.psd1", WIDGET_MANIFEST),
        ("acme-widget-0a1b2c/widget.psm1", "function Get-Widget { 'widget' }"),
        ("acme-widget-0a1b2c/Public/Get-Widget.ps1", ""),
    ])
}

fn request(repo: &str, destination: &Path) -> InstallRequest {
    InstallRequest {
        destination: Some(destination.to_path_buf()),
        ..InstallRequest::new(SourceRef::Repo(repo.to_string()))
    }
}

fn unix_pipeline<'a>(config: &'a InstallConfig, transport: &'a dyn Transport) -> InstallPipeline<'a> {
    InstallPipeline::new(config, transport).with_platform(Platform::Unix, EnvPaths::default())
}

#[test]
fn test_install_valid_module() {
    let temp = create_temp_dir();
    let config = config(temp.path());
    let transport = MockTransport::new(vec![Ok(widget_zip())]);
    let modules = temp.path().join("modules");

    let outcome = unix_pipeline(&config, &transport)
        .install(&request("acme/widget", &modules))
        .unwrap();

    assert_eq!(outcome.module_name, "widget");
    assert_eq!(outcome.version().to_string(), "2.1.0");
    assert_eq!(outcome.path, modules.join("widget").join("2.1.0"));
    assert!(outcome.path.join("widget.psd1").is_file());
    assert!(outcome.path.join("Public/Get-Widget.ps1").is_file());
    assert_eq!(outcome.files, 3);
    assert!(outcome.warnings.is_empty());
    assert!(!outcome.manifest.repaired);

    // Valid manifest installed byte for byte
    assert_eq!(
        fs::read_to_string(outcome.path.join("widget.psd1")).unwrap(),
        WIDGET_MANIFEST
    );

    // Archive removed, extraction kept
    let cache = config.temp_root.clone();
    assert!(!cache.join(format!("{}.zip", outcome.content_hash.hex())).exists());
    assert!(cache.join(outcome.content_hash.hex()).is_dir());

    assert_eq!(
        transport.requested_urls(),
        vec!["https://api.github.com/repos/acme/widget/zipball/master".to_string()]
    );
}

#[test]
fn test_install_repairs_manifest_with_asserted_version() {
    let temp = create_temp_dir();
    let config = config(temp.path());
    let transport = MockTransport::new(vec![Ok(zip_bytes(&[
        (
            "acme-broken-99/broken.psd1",
            "@{\n  RootModule = 'broken.psm1'\n  Author = 'Acme'\n  Copyright = (c) Acme\n}",
        ),
        ("acme-broken-99/broken.psm1", ""),
    ]))]);
    let modules = temp.path().join("modules");

    let outcome = unix_pipeline(&config, &transport)
        .install(&InstallRequest {
            assert_version: Some("1.2.3".parse().unwrap()),
            ..request("acme/broken", &modules)
        })
        .unwrap();

    assert_eq!(outcome.path, modules.join("broken").join("1.2.3"));
    assert!(outcome.manifest.repaired);

    let installed = fs::read_to_string(outcome.path.join("broken.psd1")).unwrap();
    assert!(installed.contains("ModuleVersion = '1.2.3'"));
    assert!(installed.contains("Author = 'Acme'"));
    assert!(!installed.contains("Copyright"));
}

#[test]
fn test_install_missing_version_defaults() {
    let temp = create_temp_dir();
    let config = config(temp.path());
    let transport = MockTransport::new(vec![Ok(zip_bytes(&[(
        "acme-noversion-1/noversion.psd1",
        "@{ Author = 'Acme' }",
    )]))]);
    let modules = temp.path().join("modules");

    let outcome = unix_pipeline(&config, &transport)
        .install(&request("acme/noversion", &modules))
        .unwrap();

    assert_eq!(outcome.path, modules.join("noversion").join("0.5.0"));
}

#[test]
fn test_unrepairable_manifest_places_nothing() {
    let temp = create_temp_dir();
    let config = config(temp.path());
    let transport = MockTransport::new(vec![Ok(zip_bytes(&[(
        "acme-bad-1/bad.psd1",
        "@{ RootModule = 'a.psm1'; ModuleToProcess = 'b.psm1' }",
    )]))]);
    let modules = temp.path().join("modules");

    let err = unix_pipeline(&config, &transport)
        .install(&request("acme/bad", &modules))
        .unwrap_err();

    assert!(matches!(err, ModfetchError::ManifestRepair { .. }));
    assert!(!modules.join("bad").exists());
}

#[test]
fn test_non_github_uri_never_downloads() {
    let temp = create_temp_dir();
    let config = config(temp.path());
    let transport = MockTransport::new(vec![Ok(widget_zip())]);

    let req = InstallRequest {
        destination: Some(temp.path().join("modules")),
        ..InstallRequest::new(SourceRef::Uri("https://gitlab.com/acme/widget".to_string()))
    };
    let err = unix_pipeline(&config, &transport).install(&req).unwrap_err();

    assert!(matches!(err, ModfetchError::InvalidSource { .. }));
    assert!(transport.requested_urls().is_empty());
}

#[test]
fn test_uri_branch_is_used() {
    let temp = create_temp_dir();
    let config = config(temp.path());
    let transport = MockTransport::new(vec![Ok(widget_zip())]);

    let req = InstallRequest {
        destination: Some(temp.path().join("modules")),
        ..InstallRequest::new(SourceRef::Uri(
            "https://github.com/acme/widget/tree/develop".to_string(),
        ))
    };
    let outcome = unix_pipeline(&config, &transport).install(&req).unwrap();

    assert_eq!(outcome.source.branch, "develop");
    assert_eq!(
        transport.requested_urls(),
        vec!["https://api.github.com/repos/acme/widget/zipball/develop".to_string()]
    );
}

#[test]
fn test_fallback_download_installs() {
    let temp = create_temp_dir();
    let config = config(temp.path());
    let transport = MockTransport::new(vec![
        Err(TransportError::Status { status: 403 }),
        Ok(widget_zip()),
    ]);

    let outcome = unix_pipeline(&config, &transport)
        .install(&request("acme/widget", &temp.path().join("modules")))
        .unwrap();

    assert_eq!(outcome.version().to_string(), "2.1.0");
    assert_eq!(transport.requested_urls().len(), 2);
}

#[test]
fn test_download_failure_places_nothing() {
    let temp = create_temp_dir();
    let config = config(temp.path());
    let transport = MockTransport::new(vec![
        Err(TransportError::Network("connection reset".to_string())),
        Err(TransportError::Status { status: 404 }),
    ]);
    let modules = temp.path().join("modules");

    let err = unix_pipeline(&config, &transport)
        .install(&request("acme/widget", &modules))
        .unwrap_err();

    match err {
        ModfetchError::Acquisition { attempts, .. } => assert_eq!(attempts, 2),
        other => panic!("Expected Acquisition error, got {other:?}"),
    }
    assert!(!modules.exists());
}

#[test]
fn test_settings_psd1_at_root_is_not_the_manifest() {
    let temp = create_temp_dir();
    let config = config(temp.path());
    let settings = "@{ IncludeDefaultRules = $true }";
    let transport = MockTransport::new(vec![Ok(zip_bytes(&[
        ("acme-pswidget-tools-1/PSScriptAnalyzerSettings.psd1", settings),
        ("acme-pswidget-tools-1/src/Widget/Widget.psd1", WIDGET_MANIFEST),
        ("acme-pswidget-tools-1/src/Widget/widget.psm1", ""),
    ]))]);
    let modules = temp.path().join("modules");

    let outcome = unix_pipeline(&config, &transport)
        .install(&request("acme/pswidget-tools", &modules))
        .unwrap();

    assert_eq!(outcome.path, modules.join("pswidget-tools").join("2.1.0"));
    assert!(!outcome.manifest.repaired);
    assert_eq!(
        fs::read_to_string(outcome.path.join("PSScriptAnalyzerSettings.psd1")).unwrap(),
        settings
    );
}

#[test]
fn test_no_manifest() {
    let temp = create_temp_dir();
    let config = config(temp.path());
    let transport = MockTransport::new(vec![Ok(zip_bytes(&[("acme-x-1/x.psm1", "")]))]);

    let err = unix_pipeline(&config, &transport)
        .install(&request("acme/x", &temp.path().join("modules")))
        .unwrap_err();

    assert!(matches!(err, ModfetchError::NoManifest { .. }));
}

#[test]
fn test_scope_base_dir_without_override() {
    let temp = create_temp_dir();
    let config = config(temp.path());
    let transport = MockTransport::new(vec![Ok(widget_zip())]);
    let home = temp.path().join("home");
    let env = EnvPaths {
        home: Some(home.clone()),
        ..EnvPaths::default()
    };

    let outcome = InstallPipeline::new(&config, &transport)
        .with_platform(Platform::Unix, env)
        .install(&InstallRequest::new(SourceRef::Repo("acme/widget".to_string())))
        .unwrap();

    assert_eq!(
        outcome.path,
        home.join(".local/share/powershell/Modules/widget/2.1.0")
    );
}

#[test]
fn test_explicit_module_name() {
    let temp = create_temp_dir();
    let config = config(temp.path());
    let transport = MockTransport::new(vec![Ok(widget_zip())]);
    let modules = temp.path().join("modules");

    let outcome = unix_pipeline(&config, &transport)
        .install(&InstallRequest {
            module_name: Some("AcmeWidget".to_string()),
            ..request("acme/widget", &modules)
        })
        .unwrap();

    assert_eq!(outcome.path, modules.join("AcmeWidget").join("2.1.0"));
}

#[test]
fn test_invalid_module_name_rejected() {
    let temp = create_temp_dir();
    let config = config(temp.path());
    let transport = MockTransport::new(vec![Ok(widget_zip())]);

    let err = unix_pipeline(&config, &transport)
        .install(&InstallRequest {
            module_name: Some("..".to_string()),
            ..request("acme/widget", &temp.path().join("modules"))
        })
        .unwrap_err();

    assert!(matches!(err, ModfetchError::InvalidSource { .. }));
    assert!(transport.requested_urls().is_empty());
}

#[derive(Default)]
struct RecordingProgress {
    stages: Vec<Stage>,
    finished: bool,
    abandoned: bool,
}

impl ProgressReporter for RecordingProgress {
    fn stage(&mut self, stage: Stage, _detail: &str) {
        self.stages.push(stage);
    }

    fn finish(&mut self) {
        self.finished = true;
    }

    fn abandon(&mut self) {
        self.abandoned = true;
    }
}

#[test]
fn test_progress_reports_each_stage() {
    let temp = create_temp_dir();
    let config = config(temp.path());
    let transport = MockTransport::new(vec![Ok(widget_zip())]);
    let mut progress = RecordingProgress::default();

    unix_pipeline(&config, &transport)
        .with_progress(&mut progress)
        .install(&request("acme/widget", &temp.path().join("modules")))
        .unwrap();

    assert_eq!(
        progress.stages,
        vec![
            Stage::Resolve,
            Stage::Download,
            Stage::Extract,
            Stage::Manifest,
            Stage::Place
        ]
    );
    assert!(progress.finished);
    assert!(!progress.abandoned);
}

#[test]
fn test_progress_abandoned_on_error() {
    let temp = create_temp_dir();
    let config = config(temp.path());
    let transport = MockTransport::new(vec![]);
    let mut progress = RecordingProgress::default();

    let result = unix_pipeline(&config, &transport)
        .with_progress(&mut progress)
        .install(&request("acme/widget", &temp.path().join("modules")));

    assert!(result.is_err());
    assert!(progress.abandoned);
}
