use std::io::{self, BufRead, Write};

use serde_json::{json, Value};

use crate::cli::OutputFormat;
use crate::model::UserAccount;

const NOT_SET: &str = "Не указан";

/// Output a success message in the appropriate format
pub fn output_success(
    output_format: &OutputFormat,
    message: &str,
    data: Option<Value>,
) -> anyhow::Result<()> {
    match output_format {
        OutputFormat::Json => {
            let mut response = json!({
                "success": true,
                "message": message
            });

            if let (Some(Value::Object(extra)), Some(object)) = (data, response.as_object_mut()) {
                object.extend(extra);
            }

            println!("{}", serde_json::to_string_pretty(&response)?);
        }
        OutputFormat::Text => {
            println!("✓ {}", message);
        }
    }
    Ok(())
}

/// Output an error message in the appropriate format
pub fn output_error(
    output_format: &OutputFormat,
    message: &str,
    error_code: Option<&str>,
) -> anyhow::Result<()> {
    match output_format {
        OutputFormat::Json => {
            let mut response = json!({
                "success": false,
                "error": message
            });

            if let Some(code) = error_code {
                response["error_code"] = json!(code);
            }

            println!("{}", serde_json::to_string_pretty(&response)?);
        }
        OutputFormat::Text => {
            eprintln!("Error: {}", message);
        }
    }
    Ok(())
}

/// Output an empty collection in the appropriate format
pub fn output_empty_collection(
    output_format: &OutputFormat,
    collection_name: &str,
    message: &str,
) -> anyhow::Result<()> {
    match output_format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&json!({
                collection_name: []
            }))?);
        }
        OutputFormat::Text => {
            println!("{}", message);
        }
    }
    Ok(())
}

fn or_not_set(value: Option<&str>) -> &str {
    match value {
        Some(v) if !v.trim().is_empty() => v,
        _ => NOT_SET,
    }
}

/// One table row: id, role, name, phone, telegram id
pub fn account_row(account: &UserAccount) -> String {
    format!(
        "{:>6}  {:<8}  {:<30}  {:<16}  {}",
        account.id,
        account.role().as_str(),
        account.display_name(),
        or_not_set(account.phone.as_deref()),
        or_not_set(account.telegram_id.as_deref()),
    )
}

pub fn output_accounts(
    output_format: &OutputFormat,
    collection_name: &str,
    accounts: &[&UserAccount],
) -> anyhow::Result<()> {
    if accounts.is_empty() {
        return output_empty_collection(output_format, collection_name, "Нет пользователей");
    }

    match output_format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&json!({
                collection_name: accounts
            }))?);
        }
        OutputFormat::Text => {
            println!(
                "{:>6}  {:<8}  {:<30}  {:<16}  {}",
                "ID", "ROLE", "NAME", "PHONE", "TELEGRAM"
            );
            for account in accounts {
                println!("{}", account_row(account));
            }
        }
    }
    Ok(())
}

/// Field/value pairs shown for a single account; staff accounts carry extra fields
pub fn account_details(account: &UserAccount) -> Vec<(&'static str, String)> {
    let mut fields = vec![
        ("ID", account.id.to_string()),
        ("Роль", account.role().to_string()),
        ("Имя", or_not_set(Some(account.first_name.as_str())).to_string()),
        ("Фамилия", or_not_set(account.last_name()).to_string()),
    ];
    if account.role().can_deactivate() {
        fields.push(("Отчество", or_not_set(account.patronymic()).to_string()));
        fields.push(("Email", or_not_set(account.email()).to_string()));
    }
    fields.push(("Телефон", or_not_set(account.phone.as_deref()).to_string()));
    fields.push(("Telegram ID", or_not_set(account.telegram_id.as_deref()).to_string()));
    fields
}

pub fn output_account(output_format: &OutputFormat, account: &UserAccount) -> anyhow::Result<()> {
    match output_format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&json!({ "user": account }))?);
        }
        OutputFormat::Text => {
            for (label, value) in account_details(account) {
                println!("{:<12} {}", format!("{}:", label), value);
            }
        }
    }
    Ok(())
}

/// Ask a yes/no question on stderr; anything but y/yes/д/да is a no
pub fn confirm(prompt: &str) -> anyhow::Result<bool> {
    eprint!("{} [y/N] ", prompt);
    io::stderr().flush()?;
    let answer = read_line()?;
    Ok(matches!(
        answer.trim().to_lowercase().as_str(),
        "y" | "yes" | "д" | "да"
    ))
}

pub fn prompt(label: &str) -> anyhow::Result<String> {
    eprint!("{}: ", label);
    io::stderr().flush()?;
    Ok(read_line()?.trim_end_matches(['\r', '\n']).to_string())
}

fn read_line() -> anyhow::Result<String> {
    let mut line = String::new();
    io::stdin().lock().read_line(&mut line)?;
    Ok(line)
}
