use anyhow::{bail, Result};
use std::collections::BTreeMap;
use tracing::{debug, warn};

use crate::catalog::Catalog;

/// Group the requested elements by the structure that defines them.
///
/// Columns listed in `common` are read from every structure anyway and are
/// never planned. An element defined by several structures is taken from the
/// first one in name order.
pub fn plan_reads(
    catalog: &Catalog,
    elements: &[String],
    common: &[String],
) -> Result<BTreeMap<String, Vec<String>>> {
    let mut plan: BTreeMap<String, Vec<String>> = BTreeMap::new();

    for element in elements {
        if common.contains(element) {
            debug!(%element, "common column, not planned");
            continue;
        }
        let structures = catalog.structures_for_element(element);
        let Some(first) = structures.first() else {
            bail!("element {} is not defined by any structure", element);
        };
        if structures.len() > 1 {
            warn!(
                %element,
                using = *first,
                candidates = ?structures,
                "element defined by several structures"
            );
        }
        let planned = plan.entry(first.to_string()).or_default();
        if !planned.contains(element) {
            planned.push(element.clone());
        }
    }

    Ok(plan)
}
