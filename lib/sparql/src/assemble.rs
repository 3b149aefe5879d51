use crate::executor::BindingRow;
use registry_model::{Contact, Entity, Organization, Process};
use rustc_hash::FxHashMap;

/// Builds entities from the rows of the data service details query.
///
/// Rows are grouped by `?service`. Each group becomes one entity, in the order in which the
/// services first appear. Optional joins repeat values across rows, so multi-valued members are
/// de-duplicated and single-valued members keep the first value seen. Rows without `?service`
/// are skipped.
pub fn assemble_entities(rows: &[BindingRow]) -> Vec<Entity> {
    let mut positions = FxHashMap::<&str, usize>::default();
    let mut entities = Vec::<Entity>::new();

    for row in rows {
        let Some(id) = row.get("service") else {
            tracing::debug!("Skipping solution without a service");
            continue;
        };
        let position = *positions.entry(id).or_insert_with(|| {
            entities.push(Entity::new(id.as_str(), Vec::<String>::new()));
            entities.len() - 1
        });
        merge_row(&mut entities[position], row);
    }

    entities
}

fn merge_row(entity: &mut Entity, row: &BindingRow) {
    let value = |name: &str| row.get(name).cloned();

    push_unique(&mut entity.types, value("type"));
    fill(&mut entity.title, value("title"));
    fill(&mut entity.description, value("description"));
    fill(&mut entity.endpoint_url, value("endpointURL"));
    fill(&mut entity.landing_page, value("landingPage"));
    push_unique(&mut entity.documentation, value("documentation"));

    if let Some(id) = value("publisher") {
        let publisher = entity.publisher.get_or_insert_with(|| Organization {
            id,
            types: Vec::new(),
            name: None,
            country_name: None,
        });
        fill(&mut publisher.name, value("publisherName"));
        fill(&mut publisher.country_name, value("countryName"));
    }

    if let Some(id) = value("contact") {
        let position = match entity.contact_point.iter().position(|c| c.id == id) {
            Some(position) => position,
            None => {
                entity.contact_point.push(Contact {
                    id,
                    types: Vec::new(),
                    full_name: None,
                    email: None,
                    url: None,
                });
                entity.contact_point.len() - 1
            }
        };
        let contact = &mut entity.contact_point[position];
        fill(&mut contact.full_name, value("contactName"));
        fill(&mut contact.email, value("contactEmail"));
    }

    if let Some(id) = value("process") {
        let position = match entity.contains_process.iter().position(|p| p.id == id) {
            Some(position) => position,
            None => {
                entity.contains_process.push(Process {
                    title: id.clone(),
                    id,
                    types: Vec::new(),
                    label: None,
                    page: None,
                });
                entity.contains_process.len() - 1
            }
        };
        let process = &mut entity.contains_process[position];
        if let Some(title) = value("processTitle") {
            if process.title == process.id {
                process.title = title;
            }
        }
        fill(&mut process.label, value("processLabel"));
        fill(&mut process.page, value("processPage"));
    }
}

fn fill(slot: &mut Option<String>, value: Option<String>) {
    if slot.is_none() {
        *slot = value;
    }
}

fn push_unique(values: &mut Vec<String>, value: Option<String>) {
    if let Some(value) = value {
        if !values.contains(&value) {
            values.push(value);
        }
    }
}
