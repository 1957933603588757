//! Install command implementation
//!
//! The installation process:
//! 1. Load configuration (config file, then CLI flags on top)
//! 2. Build the install request from CLI arguments
//! 3. Run the install pipeline (resolve, download, extract, manifest, place)
//! 4. Report the result and any non-fatal copy failures

use std::path::PathBuf;

use console::Style;
use serde::Serialize;

use crate::acquisition::HttpTransport;
use crate::cli::InstallArgs;
use crate::config::InstallConfig;
use crate::error::Result;
use crate::manifest::{ManifestSummary, ModuleVersion};
use crate::pipeline::{InstallOutcome, InstallPipeline, InstallRequest};
use crate::source::SourceRef;
use crate::ui::{InteractiveProgressReporter, ProgressReporter, SilentProgressReporter};

pub fn run(config_path: Option<PathBuf>, args: InstallArgs) -> Result<()> {
    let config = super::load_config(config_path.as_deref())?;
    let request = build_request(&args, &config)?;
    let transport = HttpTransport::new(config.timeout)?;

    let mut progress: Box<dyn ProgressReporter> =
        if args.json || !console::user_attended_stderr() {
            Box::new(SilentProgressReporter)
        } else {
            Box::new(InteractiveProgressReporter::new())
        };

    let outcome = InstallPipeline::new(&config, &transport)
        .with_progress(progress.as_mut())
        .install(&request)?;

    report(&outcome, &args)
}

/// Merge CLI arguments over configured defaults
fn build_request(args: &InstallArgs, config: &InstallConfig) -> Result<InstallRequest> {
    let source = SourceRef::from_parts(args.repo.clone(), args.uri.clone())?;

    let assert_version = args
        .assert_version
        .as_deref()
        .map(str::parse::<ModuleVersion>)
        .transpose()?;

    Ok(InstallRequest {
        source,
        branch: args.branch.clone(),
        module_name: args.name.clone(),
        scope: args.scope.unwrap_or(config.default_scope),
        edition: args.edition.unwrap_or(config.default_edition),
        destination: args.destination.clone(),
        auth_token: args.token.clone().filter(|t| !t.trim().is_empty()),
        assert_version,
    })
}

/// `--json` output: where the module came from plus its manifest metadata
#[derive(Debug, Serialize)]
struct InstallSummary {
    source: String,
    branch: String,
    content_hash: String,
    files: usize,
    #[serde(flatten)]
    manifest: ManifestSummary,
}

impl InstallSummary {
    fn new(outcome: &InstallOutcome) -> Self {
        Self {
            source: outcome.source.slug(),
            branch: outcome.source.branch.clone(),
            content_hash: outcome.content_hash.prefixed(),
            files: outcome.files,
            manifest: outcome.manifest.summary(&outcome.module_name, &outcome.path),
        }
    }
}

fn report(outcome: &InstallOutcome, args: &InstallArgs) -> Result<()> {
    let warning = Style::new().yellow().bold();
    for failure in &outcome.warnings {
        eprintln!("{} {}", warning.apply_to("warning:"), failure);
    }

    let summary = InstallSummary::new(outcome);

    if args.json {
        println!("{}", serde_json::to_string_pretty(&summary)?);
        return Ok(());
    }

    println!(
        "{} {} {} -> {}",
        Style::new().green().bold().apply_to("Installed"),
        Style::new().bold().apply_to(&outcome.module_name),
        outcome.version(),
        outcome.path.display()
    );
    println!(
        "  {}",
        Style::new().dim().apply_to(format!(
            "from {} ({}, {} file{})",
            outcome.source,
            outcome.content_hash,
            outcome.files,
            if outcome.files == 1 { "" } else { "s" }
        ))
    );
    if outcome.manifest.repaired {
        println!(
            "  {}",
            Style::new().dim().apply_to(format!(
                "manifest {} was rebuilt",
                outcome.manifest.path.display()
            ))
        );
    }

    if args.show {
        print_summary(&summary.manifest);
    }

    Ok(())
}

fn print_summary(summary: &ManifestSummary) {
    let label = Style::new().cyan();

    if let Some(root_module) = &summary.root_module {
        println!("  {} {}", label.apply_to("Root module:"), root_module);
    }
    if let Some(author) = &summary.author {
        println!("  {} {}", label.apply_to("Author:"), author);
    }
    if let Some(description) = &summary.description {
        println!("  {} {}", label.apply_to("Description:"), description);
    }
    if !summary.functions.is_empty() {
        println!("  {} {}", label.apply_to("Functions:"), summary.functions.join(", "));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ModfetchError;
    use crate::placement::{Edition, Scope};

    fn args() -> InstallArgs {
        InstallArgs {
            repo: Some("acme/widget".to_string()),
            uri: None,
            branch: None,
            name: None,
            scope: None,
            edition: None,
            destination: None,
            token: None,
            assert_version: None,
            show: false,
            json: false,
        }
    }

    #[test]
    fn test_build_request_uses_config_defaults() {
        let config = InstallConfig {
            default_scope: Scope::AllUsers,
            default_edition: Edition::Desktop,
            ..InstallConfig::default()
        };
        let request = build_request(&args(), &config).unwrap();

        assert_eq!(request.source, SourceRef::Repo("acme/widget".to_string()));
        assert_eq!(request.scope, Scope::AllUsers);
        assert_eq!(request.edition, Edition::Desktop);
        assert!(request.branch.is_none());
    }

    #[test]
    fn test_build_request_flags_override_config() {
        let config = InstallConfig {
            default_scope: Scope::AllUsers,
            ..InstallConfig::default()
        };
        let request = build_request(
            &InstallArgs {
                scope: Some(Scope::CurrentUser),
                assert_version: Some("1.2.3".to_string()),
                token: Some("  ".to_string()),
                ..args()
            },
            &config,
        )
        .unwrap();

        assert_eq!(request.scope, Scope::CurrentUser);
        assert_eq!(request.assert_version.unwrap().to_string(), "1.2.3");
        assert!(request.auth_token.is_none());
    }

    #[test]
    fn test_json_summary_includes_source_and_hash() {
        let outcome = InstallOutcome {
            source: crate::source::ResolvedSource {
                owner: "acme".to_string(),
                repo: "widget".to_string(),
                branch: "develop".to_string(),
            },
            module_name: "widget".to_string(),
            path: PathBuf::from("/mods/widget/2.1.0"),
            content_hash: crate::hash::hash_bytes(b"zip"),
            manifest: crate::manifest::Manifest {
                path: PathBuf::from("/tmp/x/widget.psd1"),
                version: "2.1.0".parse().unwrap(),
                fields: vec![(
                    "Author".to_string(),
                    crate::manifest::Value::String("Acme".to_string()),
                )],
                repaired: false,
            },
            files: 3,
            warnings: Vec::new(),
        };

        let json = serde_json::to_value(InstallSummary::new(&outcome)).unwrap();
        assert_eq!(json["source"], "acme/widget");
        assert_eq!(json["branch"], "develop");
        assert_eq!(json["files"], 3);
        assert!(json["content_hash"].as_str().unwrap().starts_with("blake3:"));
        assert_eq!(json["module"], "widget");
        assert_eq!(json["version"], "2.1.0");
        assert_eq!(json["author"], "Acme");
    }

    #[test]
    fn test_build_request_missing_source() {
        let err = build_request(
            &InstallArgs {
                repo: None,
                ..args()
            },
            &InstallConfig::default(),
        )
        .unwrap_err();
        assert!(matches!(err, ModfetchError::MissingSource));
    }

    #[test]
    fn test_build_request_bad_assert_version() {
        let err = build_request(
            &InstallArgs {
                assert_version: Some("latest".to_string()),
                ..args()
            },
            &InstallConfig::default(),
        )
        .unwrap_err();
        assert!(matches!(err, ModfetchError::InvalidVersion { .. }));
    }
}
