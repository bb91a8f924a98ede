//! Provider integrations applied after a component's files are in place
//!
//! An integration scaffolds router-specific files, merges required variables
//! into `.env.local` and patches the root layout with a provider. The layout
//! patch only runs for app-router projects; a missing layout skips the patch
//! without failing the install.

use crate::error::InstallError;
use crate::patch::{AnchorPatcher, PatchOutcome, ProviderWrap};
use crate::project::{
    merge_env_file, scaffold, EnvMerge, EnvVar, RouterKind, ScaffoldFile, ScaffoldReport,
    ScaffoldSet, TargetProject,
};
use anyhow::Result;

/// Everything an integration contributes to a project
#[derive(Debug, Clone)]
pub struct Integration {
    pub name: &'static str,
    pub scaffold: ScaffoldSet,
    pub env: &'static [EnvVar],
    /// Provider to wrap the root layout's children with
    pub provider: Option<ProviderWrap>,
    /// Packages the scaffolded files import
    pub dependencies: &'static [&'static str],
}

/// What happened to the layout patch
#[derive(Debug)]
pub enum PatchStep {
    /// No provider, or the router kind does not use a root layout
    Skipped,
    Done(PatchOutcome),
    /// The patch could not run; earlier steps are unaffected
    Failed(InstallError),
}

#[derive(Debug)]
pub struct IntegrationReport {
    pub scaffold: ScaffoldReport,
    pub env: EnvMerge,
    pub patch: PatchStep,
}

/// Scaffold, merge env and patch the layout, in that order
pub fn apply_integration(
    project: &TargetProject,
    integration: &Integration,
) -> Result<IntegrationReport> {
    tracing::info!(
        integration = integration.name,
        router = %project.router(),
        "applying integration"
    );

    let scaffold = scaffold(project, &integration.scaffold)?;
    let env = merge_env_file(&project.env_file_path(), integration.env)?;

    let patch = match (&integration.provider, project.router()) {
        (Some(provider), RouterKind::App) => {
            match AnchorPatcher::new(provider.clone()).patch(&project.layout_path()) {
                Ok(outcome) => PatchStep::Done(outcome),
                Err(e) => {
                    tracing::debug!("could not update layout automatically: {}", e);
                    PatchStep::Failed(e)
                }
            }
        }
        _ => PatchStep::Skipped,
    };

    Ok(IntegrationReport {
        scaffold,
        env,
        patch,
    })
}

const AUTHKIT_ENV: &[EnvVar] = &[
    EnvVar::new("WORKOS_CLIENT_ID", "client_... # from WorkOS dashboard"),
    EnvVar::new("WORKOS_API_KEY", "sk_... # from WorkOS dashboard"),
    EnvVar::new("WORKOS_COOKIE_PASSWORD", "SET_A_STRONG_PASSWORD_32_CHARS_MIN"),
    EnvVar::new(
        "NEXT_PUBLIC_WORKOS_REDIRECT_URI",
        "http://localhost:3000/callback",
    ),
];

const MIDDLEWARE: ScaffoldFile = ScaffoldFile {
    path: "middleware.ts",
    contents: include_str!("../templates/authkit/middleware.ts"),
};

/// WorkOS AuthKit for Next.js
pub fn authkit() -> Integration {
    Integration {
        name: "workos-authkit",
        scaffold: ScaffoldSet {
            app: vec![
                ScaffoldFile {
                    path: "app/callback/route.ts",
                    contents: include_str!("../templates/authkit/app/callback/route.ts"),
                },
                ScaffoldFile {
                    path: "app/login/route.ts",
                    contents: include_str!("../templates/authkit/app/login/route.ts"),
                },
                ScaffoldFile {
                    path: "app/logout/route.ts",
                    contents: include_str!("../templates/authkit/app/logout/route.ts"),
                },
                MIDDLEWARE,
                ScaffoldFile {
                    path: "components/header.tsx",
                    contents: include_str!("../templates/authkit/components/header.tsx"),
                },
                ScaffoldFile {
                    path: "contexts/UserContext.tsx",
                    contents: include_str!("../templates/authkit/contexts/UserContext.tsx"),
                },
            ],
            pages: vec![
                MIDDLEWARE,
                ScaffoldFile {
                    path: "pages/api/auth/workos-callback.ts",
                    contents: include_str!("../templates/authkit/pages/workos-callback.ts"),
                },
            ],
            pages_notice: Some(
                "Detected Pages Router. AuthKit Next.js targets App Router; scaffolding middleware and a placeholder callback only.",
            ),
        },
        env: AUTHKIT_ENV,
        provider: Some(ProviderWrap::new(
            "AuthKitProvider",
            "@workos-inc/authkit-nextjs/components",
        )),
        dependencies: &["@workos-inc/authkit-nextjs"],
    }
}
