//! Subcommand implementations.

pub mod create;
pub mod delete;
pub mod get;
pub mod list;
pub mod login;
pub mod logout;
mod payload;
pub mod restore;
pub mod update;
pub mod whoami;

use clap::ValueEnum;

/// Record types the CLI can manage.
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntityKind {
    ScopeSheet,
    ScopeSheetExport,
    ScopeSheetPresentation,
    ClaimAgreementAlliance,
    ClaimPublicAdjuster,
    #[value(name = "w9form", alias = "w9-form")]
    W9Form,
    Zone,
    DocumentTemplateAlliance,
}

/// Call a generic `handler::<T>(args..)` with `T` chosen by an [`EntityKind`].
macro_rules! with_entity {
    ($kind:expr, $handler:ident($($arg:expr),* $(,)?)) => {{
        use claimdesk_core::entities::*;
        match $kind {
            $crate::commands::EntityKind::ScopeSheet => $handler::<ScopeSheet>($($arg),*).await,
            $crate::commands::EntityKind::ScopeSheetExport => {
                $handler::<ScopeSheetExport>($($arg),*).await
            }
            $crate::commands::EntityKind::ScopeSheetPresentation => {
                $handler::<ScopeSheetPresentation>($($arg),*).await
            }
            $crate::commands::EntityKind::ClaimAgreementAlliance => {
                $handler::<ClaimAgreementAlliance>($($arg),*).await
            }
            $crate::commands::EntityKind::ClaimPublicAdjuster => {
                $handler::<ClaimPublicAdjuster>($($arg),*).await
            }
            $crate::commands::EntityKind::W9Form => $handler::<W9Form>($($arg),*).await,
            $crate::commands::EntityKind::Zone => $handler::<Zone>($($arg),*).await,
            $crate::commands::EntityKind::DocumentTemplateAlliance => {
                $handler::<DocumentTemplateAlliance>($($arg),*).await
            }
        }
    }};
}

pub(crate) use with_entity;
