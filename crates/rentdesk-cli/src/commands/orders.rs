use std::io::Write;

use anyhow::Result;
use rentdesk_lib::validation::validate_phone;

use crate::output::write_orders;
use crate::GlobalOptions;

/// Look up every order placed with `phone`.
pub fn handle_orders<W: Write>(global: &GlobalOptions, phone: &str, out: &mut W) -> Result<()> {
    validate_phone(phone)?;

    let datastore = global.load_datastore();
    let orders = datastore.orders_by_phone(phone);
    tracing::info!(found = orders.len(), "orders lookup completed");

    write_orders(out, global.format, phone, &orders)?;
    Ok(())
}
