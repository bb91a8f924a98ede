//! Component install pipeline
//!
//! One component installs in strict order: fetch the package (node_modules
//! sources only), load its manifest, copy its files, install its dependencies,
//! then apply its integration. The target project is detected once, before any
//! component runs.
//!
//! A fatal error stops the component it happened in. Components in a batch are
//! independent: one failing does not stop the others.

use crate::deps::{resolve_dependencies, PackageInstaller, VersionTable};
use crate::error::{InstallError, Result};
use crate::integrations::{apply_integration, Integration, IntegrationReport};
use crate::product::ProductConfig;
use crate::project::TargetProject;
use crate::registry::manifest::MANIFEST_FILE;
use crate::registry::{load_manifest, materialize, ComponentManifest, ComponentSource, InstallReport};

/// Outcome of installing one component
#[derive(Debug)]
pub struct ComponentInstall {
    pub manifest: ComponentManifest,
    pub files: InstallReport,
    /// Specifiers passed to the package manager, `None` when nothing was installed
    pub dependencies: Option<Vec<String>>,
    pub integration: Option<IntegrationReport>,
}

/// Installs components from one source into one target project
pub struct Installer<'a, C: ProductConfig, I: PackageInstaller> {
    product: &'a C,
    project: &'a TargetProject,
    source: ComponentSource,
    versions: VersionTable,
    installer: I,
}

impl<'a, C: ProductConfig, I: PackageInstaller> Installer<'a, C, I> {
    pub fn new(
        product: &'a C,
        project: &'a TargetProject,
        source: ComponentSource,
        versions: VersionTable,
        installer: I,
    ) -> Self {
        Self {
            product,
            project,
            source,
            versions,
            installer,
        }
    }

    pub fn project(&self) -> &TargetProject {
        self.project
    }

    pub fn source(&self) -> &ComponentSource {
        &self.source
    }

    /// Listed components are always accepted; a local registry also accepts
    /// any package it actually contains
    fn check_known(&self, name: &str) -> Result<()> {
        let local_package = matches!(self.source, ComponentSource::Local(_))
            && self.source.package_root(name).join(MANIFEST_FILE).is_file();
        if self.product.offers(name) || local_package {
            return Ok(());
        }
        Err(InstallError::UnknownComponent {
            name: name.to_string(),
            available: self
                .product
                .components()
                .iter()
                .map(|c| c.to_string())
                .collect(),
        })
    }

    /// Install a single component
    pub async fn install_component(&self, name: &str) -> Result<ComponentInstall> {
        self.check_known(name)?;

        if let Some(spec) = self.source.package_spec(name) {
            tracing::info!("fetching component package {}", spec);
            self.installer.install(&[spec]).await?;
        }

        let loaded = load_manifest(&self.source.package_root(name))?;
        let files = materialize(&loaded, self.project.root()).await?;
        let dependencies =
            resolve_dependencies(&loaded.manifest.dependencies, &self.versions, &self.installer)
                .await?;

        let integration = match self.product.integration(name) {
            Some(integration) => Some(apply_integration(self.project, &integration)?),
            None => None,
        };

        Ok(ComponentInstall {
            manifest: loaded.manifest,
            files,
            dependencies,
            integration,
        })
    }

    /// Install each component independently, in order
    pub async fn install_all(&self, names: &[String]) -> Vec<(String, Result<ComponentInstall>)> {
        let mut results = Vec::with_capacity(names.len());
        for name in names {
            let result = self.install_component(name).await;
            if let Err(e) = &result {
                tracing::debug!(component = %name, "install failed: {}", e);
            }
            results.push((name.clone(), result));
        }
        results
    }

    /// Apply an integration without a component manifest, installing the
    /// packages its files import first unless `install_dependencies` is false
    pub async fn init(
        &self,
        integration: &Integration,
        install_dependencies: bool,
    ) -> Result<(Option<Vec<String>>, IntegrationReport)> {
        let dependencies = if install_dependencies {
            let names: Vec<String> = integration
                .dependencies
                .iter()
                .map(|d| d.to_string())
                .collect();
            resolve_dependencies(&names, &self.versions, &self.installer).await?
        } else {
            None
        };

        let report = apply_integration(self.project, integration)?;
        Ok((dependencies, report))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::deps::runner::testing::RecordingInstaller;
    use crate::integrations::{self, PatchStep};
    use crate::patch::PatchOutcome;
    use crate::product::testing::TestProduct;
    use std::path::Path;
    use tempfile::TempDir;

    fn write_package(registry: &Path, name: &str, manifest: &str, files: &[(&str, &str)]) {
        let root = registry.join(name);
        std::fs::create_dir_all(&root).unwrap();
        std::fs::write(root.join(MANIFEST_FILE), manifest).unwrap();
        for (path, contents) in files {
            let file = root.join(path);
            std::fs::create_dir_all(file.parent().unwrap()).unwrap();
            std::fs::write(file, contents).unwrap();
        }
    }

    fn installer<'a>(
        project: &'a TargetProject,
        registry: &Path,
        recorder: RecordingInstaller,
    ) -> Installer<'a, TestProduct, RecordingInstaller> {
        static PRODUCT: TestProduct = TestProduct;
        Installer::new(
            &PRODUCT,
            project,
            ComponentSource::local(registry.to_path_buf()),
            VersionTable::builtin(),
            recorder,
        )
    }

    const SPLIT_DISPLAY: &str = r#"{
        "name": "split-display",
        "type": "registry:component",
        "dependencies": ["three"],
        "files": [{"path": "split-display.tsx", "target": "components/split-display.tsx"}]
    }"#;

    #[tokio::test]
    async fn test_split_display_into_empty_project() {
        let registry = TempDir::new().unwrap();
        let target = TempDir::new().unwrap();
        write_package(
            registry.path(),
            "split-display",
            SPLIT_DISPLAY,
            &[("split-display.tsx", "export function SplitDisplay() {}\n")],
        );
        let project = TargetProject::detect(target.path());
        let installer = installer(&project, registry.path(), RecordingInstaller::default());

        let result = installer.install_component("split-display").await.unwrap();

        assert_eq!(result.files.copied_count(), 1);
        assert_eq!(result.files.warning_count(), 0);
        assert!(target.path().join("components/split-display.tsx").is_file());
        assert_eq!(installer.installer.calls(), vec![vec!["three@^0.158.0".to_string()]]);
        assert!(result.integration.is_none());
    }

    #[tokio::test]
    async fn test_empty_files_still_installs_dependencies() {
        let registry = TempDir::new().unwrap();
        let target = TempDir::new().unwrap();
        write_package(
            registry.path(),
            "empty",
            r#"{"name": "empty", "dependencies": ["clsx"], "files": []}"#,
            &[],
        );
        let project = TargetProject::detect(target.path());
        let installer = installer(&project, registry.path(), RecordingInstaller::default());

        let result = installer.install_component("empty").await.unwrap();

        assert_eq!(result.files.copied_count(), 0);
        assert_eq!(result.files.warning_count(), 0);
        assert_eq!(result.dependencies, Some(vec!["clsx@*".to_string()]));
    }

    #[tokio::test]
    async fn test_dependency_failure_stops_component_after_files() {
        let registry = TempDir::new().unwrap();
        let target = TempDir::new().unwrap();
        write_package(
            registry.path(),
            "workos-authkit",
            r#"{"name": "workos-authkit", "dependencies": ["@workos-inc/authkit-nextjs"], "files": [{"path": "a.ts", "target": "lib/a.ts"}]}"#,
            &[("a.ts", "a")],
        );
        let project = TargetProject::detect(target.path());
        let installer = installer(&project, registry.path(), RecordingInstaller::failing());

        let err = installer
            .install_component("workos-authkit")
            .await
            .unwrap_err();

        assert!(matches!(err, InstallError::DependencyInstallFailed { .. }));
        assert!(target.path().join("lib/a.ts").is_file());
        // integration never ran
        assert!(!target.path().join(".env.local").exists());
        assert!(!target.path().join("middleware.ts").exists());
    }

    #[tokio::test]
    async fn test_integration_runs_last_and_patches_layout() {
        let registry = TempDir::new().unwrap();
        let target = TempDir::new().unwrap();
        write_package(
            registry.path(),
            "workos-authkit",
            r#"{"name": "workos-authkit", "files": [{"path": "layout.tsx", "target": "app/layout.tsx"}]}"#,
            &[(
                "layout.tsx",
                "import './globals.css'\nexport default function L({ children }) { return <html><body>{children}</body></html> }\n",
            )],
        );
        let project = TargetProject::detect(target.path());
        let installer = installer(&project, registry.path(), RecordingInstaller::default());

        let result = installer.install_component("workos-authkit").await.unwrap();

        let integration = result.integration.unwrap();
        assert!(matches!(
            integration.patch,
            PatchStep::Done(PatchOutcome::Applied { .. })
        ));
        let layout = std::fs::read_to_string(target.path().join("app/layout.tsx")).unwrap();
        assert!(layout.contains("<AuthKitProvider>{children}</AuthKitProvider>"));
        assert!(installer.installer.calls().is_empty());
    }

    #[tokio::test]
    async fn test_unrecognised_registry_type_still_installs() {
        let registry = TempDir::new().unwrap();
        let target = TempDir::new().unwrap();
        write_package(
            registry.path(),
            "split-display",
            r#"{"name": "split-display", "type": "registry:item", "files": [{"path": "a.tsx", "target": "components/a.tsx", "type": "registry:example"}]}"#,
            &[("a.tsx", "a")],
        );
        let project = TargetProject::detect(target.path());
        let installer = installer(&project, registry.path(), RecordingInstaller::default());

        let result = installer.install_component("split-display").await.unwrap();

        assert_eq!(result.files.copied_count(), 1);
        assert_eq!(result.files.copied[0].kind.as_str(), "registry:example");
        assert!(target.path().join("components/a.tsx").is_file());
    }

    #[tokio::test]
    async fn test_unknown_component() {
        let registry = TempDir::new().unwrap();
        let target = TempDir::new().unwrap();
        let project = TargetProject::detect(target.path());
        let installer = installer(&project, registry.path(), RecordingInstaller::default());

        let err = installer.install_component("nope").await.unwrap_err();
        assert!(matches!(err, InstallError::UnknownComponent { .. }));
    }

    #[tokio::test]
    async fn test_unlisted_local_package_is_accepted() {
        let registry = TempDir::new().unwrap();
        let target = TempDir::new().unwrap();
        write_package(registry.path(), "extra", r#"{"name": "extra", "files": []}"#, &[]);
        let project = TargetProject::detect(target.path());
        let installer = installer(&project, registry.path(), RecordingInstaller::default());

        assert!(installer.install_component("extra").await.is_ok());
    }

    #[tokio::test]
    async fn test_batch_continues_after_failure() {
        let registry = TempDir::new().unwrap();
        let target = TempDir::new().unwrap();
        write_package(
            registry.path(),
            "split-display",
            SPLIT_DISPLAY,
            &[("split-display.tsx", "x")],
        );
        write_package(registry.path(), "empty", r#"{"name": "empty"}"#, &[]);
        let project = TargetProject::detect(target.path());
        let installer = installer(&project, registry.path(), RecordingInstaller::default());

        let names = vec!["empty".to_string(), "split-display".to_string()];
        let results = installer.install_all(&names).await;

        assert!(matches!(results[0].1, Err(InstallError::ManifestMalformed { .. })));
        assert!(results[1].1.is_ok());
        assert!(target.path().join("components/split-display.tsx").is_file());
    }

    #[tokio::test]
    async fn test_listed_component_without_package_is_not_found() {
        let registry = TempDir::new().unwrap();
        let target = TempDir::new().unwrap();
        let project = TargetProject::detect(target.path());
        let installer = installer(&project, registry.path(), RecordingInstaller::default());

        let err = installer.install_component("split-display").await.unwrap_err();
        assert!(matches!(err, InstallError::ManifestNotFound { .. }));
    }

    #[tokio::test]
    async fn test_node_modules_source_fetches_package_first() {
        let target = TempDir::new().unwrap();
        let modules = target.path().join("node_modules/@test");
        write_package(&modules, "split-display", SPLIT_DISPLAY, &[("split-display.tsx", "x")]);
        let project = TargetProject::detect(target.path());
        static PRODUCT: TestProduct = TestProduct;
        let installer = Installer::new(
            &PRODUCT,
            &project,
            ComponentSource::node_modules(target.path(), "@test"),
            VersionTable::builtin(),
            RecordingInstaller::default(),
        );

        installer.install_component("split-display").await.unwrap();

        assert_eq!(
            installer.installer.calls(),
            vec![
                vec!["@test/split-display".to_string()],
                vec!["three@^0.158.0".to_string()],
            ]
        );
    }

    #[tokio::test]
    async fn test_init_installs_dependencies_before_patching() {
        let target = TempDir::new().unwrap();
        std::fs::create_dir_all(target.path().join("app")).unwrap();
        std::fs::write(
            target.path().join("app/layout.tsx"),
            "<html><body>{children}</body></html>\n",
        )
        .unwrap();
        let project = TargetProject::detect(target.path());
        let registry = TempDir::new().unwrap();
        let installer = installer(&project, registry.path(), RecordingInstaller::default());

        let (deps, report) = installer.init(&integrations::authkit(), true).await.unwrap();

        assert_eq!(
            deps,
            Some(vec!["@workos-inc/authkit-nextjs@^2.10.0".to_string()])
        );
        assert!(matches!(report.patch, PatchStep::Done(_)));

        let (deps, _) = installer.init(&integrations::authkit(), false).await.unwrap();
        assert!(deps.is_none());
        assert_eq!(installer.installer.calls().len(), 1);
    }
}
