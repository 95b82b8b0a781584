//! Name search over the client list.

use crate::client::Client;

/// Clients whose full name contains `term`, ignoring case.
///
/// The term is trimmed first; an empty term matches every client. Order is
/// always the order of `clients`.
pub fn filter<'a>(clients: &'a [Client], term: &str) -> Vec<&'a Client> {
  let term = term.trim().to_lowercase();
  if term.is_empty() {
    return clients.iter().collect();
  }
  clients
    .iter()
    .filter(|c| c.full_name.to_lowercase().contains(&term))
    .collect()
}
