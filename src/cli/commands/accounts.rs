use clap::Subcommand;
use serde_json::json;

use crate::cli::utils::{confirm, output_account, output_accounts, output_success};
use crate::cli::{AdminContext, OutputFormat};
use crate::controller::ResourceController;
use crate::filter::FilterCriteria;
use crate::guard::{Decision, GuardState};
use crate::model::{AccountId, UserPatch};
use crate::panel::DetailPanel;
use crate::types::ResourceKind;

/// Pending-activation pages: teachers and deanery share the same operations
#[derive(Subcommand)]
pub enum PendingCommands {
    #[command(about = "List accounts awaiting activation")]
    List {
        #[arg(long, short, help = "Substring of name, phone or telegram id")]
        search: Option<String>,
    },

    #[command(about = "Show one account")]
    Show {
        #[arg(help = "Account ID")]
        id: AccountId,
    },

    #[command(about = "Activate an account")]
    Activate {
        #[arg(help = "Account ID")]
        id: AccountId,
    },

    #[command(about = "Delete an account")]
    Delete {
        #[arg(help = "Account ID")]
        id: AccountId,
        #[arg(long, short, help = "Skip the confirmation prompt")]
        yes: bool,
    },
}

pub async fn handle_pending(
    cmd: PendingCommands,
    kind: ResourceKind,
    ctx: &AdminContext,
    output_format: OutputFormat,
) -> anyhow::Result<()> {
    match cmd {
        PendingCommands::List { search } => {
            let criteria = FilterCriteria::new().query(search.unwrap_or_default());
            list(ctx, kind, &criteria, &output_format).await
        }
        PendingCommands::Show { id } => show(ctx, kind, id, &output_format).await,
        PendingCommands::Activate { id } => {
            apply(ctx, kind, id, PanelAction::Activate, &output_format).await
        }
        PendingCommands::Delete { id, yes } => {
            apply(ctx, kind, id, PanelAction::Delete { yes }, &output_format).await
        }
    }
}

/// What to do with the selected account
pub enum PanelAction {
    Activate,
    Deactivate,
    Update(UserPatch),
    Delete { yes: bool },
}

/// Run the route guard; every resource command starts here
pub async fn require_admission(ctx: &AdminContext) -> anyhow::Result<()> {
    let guard = ctx.guard();

    // Report the in-flight check; the task ends when the guard is dropped
    let mut states = guard.subscribe();
    tokio::spawn(async move {
        while states.changed().await.is_ok() {
            if *states.borrow_and_update() == GuardState::Checking {
                eprintln!("Проверка сессии...");
            }
        }
    });

    match guard.enter().await {
        Decision::Admit => Ok(()),
        Decision::RedirectToLogin(reason) => Err(anyhow::anyhow!(
            "{}. Выполните: consult-admin auth login <login>",
            reason
        )),
    }
}

async fn loaded(ctx: &AdminContext, kind: ResourceKind) -> anyhow::Result<ResourceController> {
    require_admission(ctx).await?;
    let mut controller = ctx.controller(kind);
    controller.load().await?;
    Ok(controller)
}

pub async fn list(
    ctx: &AdminContext,
    kind: ResourceKind,
    criteria: &FilterCriteria,
    output_format: &OutputFormat,
) -> anyhow::Result<()> {
    let controller = loaded(ctx, kind).await?;
    let visible = controller.visible(criteria);
    output_accounts(output_format, "users", &visible)
}

pub async fn show(
    ctx: &AdminContext,
    kind: ResourceKind,
    id: AccountId,
    output_format: &OutputFormat,
) -> anyhow::Result<()> {
    require_admission(ctx).await?;
    let account = ctx.controller(kind).detail(id).await?;
    output_account(output_format, &account)
}

pub async fn apply(
    ctx: &AdminContext,
    kind: ResourceKind,
    id: AccountId,
    action: PanelAction,
    output_format: &OutputFormat,
) -> anyhow::Result<()> {
    let mut controller = loaded(ctx, kind).await?;
    let account = controller
        .find(id)
        .cloned()
        .ok_or_else(|| anyhow::anyhow!("Пользователь {} не найден: {}", id, kind.label()))?;
    let name = account.display_name();

    let mut panel = DetailPanel::new();
    panel.open(account);

    let done = match action {
        PanelAction::Activate => {
            panel.activate(&mut controller).await?;
            "активирован"
        }
        PanelAction::Deactivate => {
            panel.deactivate(&mut controller).await?;
            "деактивирован"
        }
        PanelAction::Update(patch) => {
            let draft = panel.begin_edit()?;
            if patch.first_name.is_some() {
                draft.first_name = patch.first_name;
            }
            if patch.last_name.is_some() {
                draft.last_name = patch.last_name;
            }
            panel.save(&mut controller).await?;
            "обновлён"
        }
        PanelAction::Delete { yes } => {
            let question = panel.request_delete()?;
            if !yes && !confirm(&question)? {
                panel.cancel_delete();
                return output_success(output_format, "Удаление отменено", None);
            }
            panel.confirm_delete(&mut controller).await?;
            "удалён"
        }
    };

    // The change itself went through; a failed reload is reported alongside it
    let mut data = json!({ "id": id, "remaining": controller.items().len() });
    if let Some(e) = controller.error() {
        data["reload_error"] = json!(e.message());
        if let OutputFormat::Text = output_format {
            eprintln!("Warning: список не обновлён: {}", e);
        }
    }

    output_success(output_format, &format!("Пользователь {} {}", name, done), Some(data))
}
