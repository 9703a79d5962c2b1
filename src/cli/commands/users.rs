use clap::Subcommand;

use super::accounts::{apply, list, show, PanelAction};
use crate::cli::{AdminContext, OutputFormat};
use crate::filter::{FilterCriteria, RoleFilter};
use crate::model::{AccountId, UserPatch};
use crate::types::ResourceKind;

#[derive(Subcommand)]
pub enum UsersCommands {
    #[command(about = "List users")]
    List {
        #[arg(long, help = "List inactive users instead of active ones")]
        inactive: bool,
        #[arg(long, short, default_value = "all", help = "Role filter: all, teacher, deanery, student")]
        role: RoleFilter,
        #[arg(long, short, help = "Substring of name, phone or telegram id")]
        search: Option<String>,
    },

    #[command(about = "Show one user")]
    Show {
        #[arg(help = "User ID")]
        id: AccountId,
        #[arg(long, help = "Look the user up among inactive users")]
        inactive: bool,
    },

    #[command(about = "Activate an inactive user")]
    Activate {
        #[arg(help = "User ID")]
        id: AccountId,
    },

    #[command(about = "Deactivate an active teacher or deanery user")]
    Deactivate {
        #[arg(help = "User ID")]
        id: AccountId,
    },

    #[command(about = "Change an active user's name")]
    Update {
        #[arg(help = "User ID")]
        id: AccountId,
        #[arg(long, help = "New first name")]
        first_name: Option<String>,
        #[arg(long, help = "New last name")]
        last_name: Option<String>,
    },

    #[command(about = "Delete a user")]
    Delete {
        #[arg(help = "User ID")]
        id: AccountId,
        #[arg(long, help = "Delete from the inactive users list")]
        inactive: bool,
        #[arg(long, short, help = "Skip the confirmation prompt")]
        yes: bool,
    },
}

fn collection(inactive: bool) -> ResourceKind {
    if inactive {
        ResourceKind::InactiveUsers
    } else {
        ResourceKind::ActiveUsers
    }
}

pub async fn handle(cmd: UsersCommands, ctx: &AdminContext, output_format: OutputFormat) -> anyhow::Result<()> {
    match cmd {
        UsersCommands::List { inactive, role, search } => {
            let criteria = FilterCriteria::new()
                .role(role)
                .query(search.unwrap_or_default());
            list(ctx, collection(inactive), &criteria, &output_format).await
        }
        UsersCommands::Show { id, inactive } => {
            show(ctx, collection(inactive), id, &output_format).await
        }
        UsersCommands::Activate { id } => {
            apply(ctx, ResourceKind::InactiveUsers, id, PanelAction::Activate, &output_format).await
        }
        UsersCommands::Deactivate { id } => {
            apply(ctx, ResourceKind::ActiveUsers, id, PanelAction::Deactivate, &output_format).await
        }
        UsersCommands::Update { id, first_name, last_name } => {
            let patch = UserPatch { first_name, last_name };
            if patch.is_empty() {
                anyhow::bail!("Укажите --first-name и/или --last-name");
            }
            apply(ctx, ResourceKind::ActiveUsers, id, PanelAction::Update(patch), &output_format).await
        }
        UsersCommands::Delete { id, inactive, yes } => {
            apply(ctx, collection(inactive), id, PanelAction::Delete { yes }, &output_format).await
        }
    }
}
