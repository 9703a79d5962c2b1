use crate::model::UserAccount;

use super::types::FilterCriteria;

/// Visible subset of `collection` under `criteria`, in source order.
///
/// Role filtering keeps entities of the selected role. A non-empty query keeps
/// entities where it is a case-insensitive substring of the first name, last name,
/// phone or telegram id; absent fields simply do not match.
pub fn project<'a>(collection: &'a [UserAccount], criteria: &FilterCriteria) -> Vec<&'a UserAccount> {
    let needle = criteria.query.to_lowercase();

    collection
        .iter()
        .filter(|account| criteria.role.matches(account.role()))
        .filter(|account| needle.is_empty() || matches_query(account, &needle))
        .collect()
}

fn matches_query(account: &UserAccount, needle: &str) -> bool {
    let fields = [
        Some(account.first_name.as_str()),
        account.last_name(),
        account.phone.as_deref(),
        account.telegram_id.as_deref(),
    ];

    fields
        .into_iter()
        .flatten()
        .any(|field| field.to_lowercase().contains(needle))
}
