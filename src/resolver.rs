//! The resolver layer: one function per schema operation, all operating on
//! the injected [`IconStore`].

use crate::error::StoreError;
use crate::icon::{Icon, IconInput};
use crate::ident;
use crate::store::IconStore;

/// Fetch-by-id. An unknown identifier is not an error: it resolves to
/// `None`, which the endpoint layer renders as a null payload.
pub fn get_icon(store: &IconStore, id: &str) -> Result<Option<Icon>, StoreError> {
    Ok(store.get(id)?.map(|record| Icon::from_input(id, &record)))
}

/// Every stored record, shaped, in creation order.
pub fn list_icons(store: &IconStore) -> Result<Vec<Icon>, StoreError> {
    Ok(store
        .entries()?
        .into_iter()
        .map(|(id, record)| Icon::from_input(id, &record))
        .collect())
}

/// Create a record under a freshly generated identifier and return the
/// shaped entity. The payload is stored verbatim; a client-supplied `id`
/// inside it is never consulted.
pub fn create_icon(store: &IconStore, input: IconInput) -> Result<Icon, StoreError> {
    let id = ident::fresh_id();
    store.put(id.clone(), input.clone())?;
    log::debug!("created icon {id} ({})", input.name);
    Ok(Icon::from_input(id, &input))
}
