use clap::Subcommand;
use serde_json::json;

use crate::api::Credentials;
use crate::auth;
use crate::cli::utils::{output_success, prompt};
use crate::cli::{AdminContext, OutputFormat};
use crate::guard::Decision;

#[derive(Subcommand)]
pub enum AuthCommands {
    #[command(about = "Login as administrator")]
    Login {
        #[arg(help = "Administrator login")]
        login: String,
        #[arg(long, help = "Password (will prompt if not provided)")]
        password: Option<String>,
    },

    #[command(about = "Forget the stored token")]
    Logout,

    #[command(about = "Check the stored token against the server")]
    Status,
}

pub async fn handle(cmd: AuthCommands, ctx: &AdminContext, output_format: OutputFormat) -> anyhow::Result<()> {
    match cmd {
        AuthCommands::Login { login, password } => {
            let password = match password {
                Some(password) => password,
                None => prompt("Пароль")?,
            };
            let credentials = Credentials::new(login, password);

            auth::login(ctx.api.as_ref(), &ctx.session, &credentials).await?;
            output_success(
                &output_format,
                &format!("Вход выполнен: {}", credentials.login),
                Some(json!({ "login": credentials.login })),
            )
        }
        AuthCommands::Logout => {
            auth::logout(&ctx.session)?;
            output_success(&output_format, "Выход выполнен", None)
        }
        AuthCommands::Status => match ctx.guard().enter().await {
            Decision::Admit => output_success(
                &output_format,
                "Сессия активна",
                Some(json!({ "authenticated": true })),
            ),
            Decision::RedirectToLogin(reason) => output_success(
                &output_format,
                &reason.to_string(),
                Some(json!({ "authenticated": false, "denied": reason })),
            ),
        },
    }
}
