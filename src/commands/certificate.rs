//! Certificate commands.

use std::sync::Arc;

use anyhow::{bail, Result};

use crate::commands::{select_from, OutputFormat};
use crate::deps::{DeploymentClient, MessageStyle, UserInterface};
use crate::resources::{require_id, Certificate};
use crate::selector::Selector;

pub struct CertificateDependencies {
    pub ui: Arc<dyn UserInterface>,
    pub api: Arc<dyn DeploymentClient>,
}

pub async fn list_with_deps(
    selector: &Selector,
    format: OutputFormat,
    deps: &CertificateDependencies,
) -> Result<()> {
    let certificates = deps.api.list_certificates().await?;
    let matched = select_from(
        &certificates,
        selector,
        "certificate",
        |c| &c.name,
        |c| c.id.as_deref(),
        deps.ui.as_ref(),
    );
    render(&matched, format, deps);
    Ok(())
}

pub async fn delete_with_deps(
    selector: &Selector,
    deps: &CertificateDependencies,
) -> Result<()> {
    if matches!(selector, Selector::All) {
        bail!("either --name or --id must be supplied");
    }

    let certificates = deps.api.list_certificates().await?;
    let targets = select_from(
        &certificates,
        selector,
        "certificate",
        |c| &c.name,
        |c| c.id.as_deref(),
        deps.ui.as_ref(),
    );

    for certificate in targets {
        deps.api
            .delete_certificate(require_id(&certificate.id, "certificate")?)
            .await?;
        deps.ui.print_styled(
            &format!("Deleted certificate '{}'.", certificate.name),
            MessageStyle::Success,
        );
    }

    Ok(())
}

fn render(certificates: &[Certificate], format: OutputFormat, deps: &CertificateDependencies) {
    if certificates.is_empty() {
        deps.ui
            .print_styled("No certificates found.", MessageStyle::Yellow);
        return;
    }

    match format {
        OutputFormat::Json => {
            if let Ok(json) = serde_json::to_string_pretty(certificates) {
                deps.ui.print(&json);
            }
        }
        OutputFormat::Table => {
            for certificate in certificates {
                deps.ui
                    .print_styled(&certificate.name, MessageStyle::Bold);
                deps.ui.print(&format!(
                    "  Id:         {}",
                    certificate.id.as_deref().unwrap_or("-")
                ));
                if let Some(thumbprint) = &certificate.thumbprint {
                    deps.ui.print(&format!("  Thumbprint: {thumbprint}"));
                }
            }
        }
    }
}
