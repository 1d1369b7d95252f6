//! Line-oriented front end over [`Session`].
//!
//! Each line is one command. Multi-field commands separate fields with `|` so
//! names may contain spaces:
//!
//! ```text
//! add-part in-house | Brake Pad | 4.25 | 12 | 1 | 40 | 17
//! add-product Bike | 199.99 | 3 | 1 | 10 | 1, 2
//! associate 100 3
//! disassociate 100 part#7
//! ```
//!
//! Parts are named by id, or by their `part#N` key once deleted, since a deleted
//! part can no longer be looked up by id but may still sit in a product.

use serde::Serialize;
use thiserror::Error;

use stockroom_core::{Entity, PartId, ProductId};
use stockroom_parts::{Part, PartKey, PartKind};
use stockroom_products::{Product, ProductKey};

use crate::forms::{PartForm, ProductForm, StockFields};
use crate::session::{Session, SessionError};

pub const HELP: &str = "\
commands:
  parts [query]                      list parts (blank: all, number: id, text: name)
  products [query]                   list products
  show-part <id>                     part as JSON
  show-product <id>                  product and its part ids as JSON
  add-part <in-house|outsourced> | name | price | stock | min | max | machine id or company
  modify-part <id> | <in-house|outsourced> | name | price | stock | min | max | machine id or company
  delete-part <id>
  add-product name | price | stock | min | max [| part id, part id, ...]
  modify-product <id> | name | price | stock | min | max
  associate <product id> <part id>
  disassociate <product id> <part id | part#key>
  delete-product <id>
  help
  quit";

#[derive(Debug, Error)]
pub enum ConsoleError {
    #[error("usage: {0}")]
    Usage(String),

    #[error(transparent)]
    Session(#[from] SessionError),

    #[error("failed to encode output: {0}")]
    Json(#[from] serde_json::Error),
}

/// What the front end should do after a command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Print(String),
    Quit,
}

fn usage(msg: impl Into<String>) -> ConsoleError {
    ConsoleError::Usage(msg.into())
}

/// Run one command line against the session.
pub fn execute(session: &mut Session, line: &str) -> Result<Outcome, ConsoleError> {
    let line = line.trim();
    let (command, rest) = match line.split_once(char::is_whitespace) {
        Some((command, rest)) => (command, rest.trim()),
        None => (line, ""),
    };

    let output = match command {
        "" => String::new(),
        "help" => HELP.to_string(),
        "quit" | "exit" => return Ok(Outcome::Quit),
        "parts" => part_table(&session.search_parts(rest)),
        "products" => product_table(session, &session.search_products(rest)),
        "show-part" => show_part(session, rest)?,
        "show-product" => show_product(session, rest)?,
        "add-part" => add_part(session, rest)?,
        "modify-part" => modify_part(session, rest)?,
        "delete-part" => {
            let key = part_selection(session, rest)?;
            session.delete_part(key)?;
            "part deleted".to_string()
        }
        "add-product" => add_product(session, rest)?,
        "modify-product" => modify_product(session, rest)?,
        "associate" => change_association(session, rest, true)?,
        "disassociate" => change_association(session, rest, false)?,
        "delete-product" => {
            let key = product_selection(session, rest)?;
            session.delete_product(key)?;
            "product deleted".to_string()
        }
        other => return Err(usage(format!("unknown command `{other}` (try `help`)"))),
    };

    Ok(Outcome::Print(output))
}

fn parse_id(text: &str) -> Result<u32, ConsoleError> {
    text.trim()
        .parse::<u32>()
        .map_err(|_| usage(format!("`{}` is not a record id", text.trim())))
}

/// Row key for a part id, or `None` when no row has that id.
fn part_selection(session: &Session, text: &str) -> Result<Option<PartKey>, ConsoleError> {
    let id = PartId::new(parse_id(text)?);
    Ok(session.inventory().lookup_part(id).map(|(key, _)| key))
}

fn product_selection(session: &Session, text: &str) -> Result<Option<ProductKey>, ConsoleError> {
    let id = ProductId::new(parse_id(text)?);
    Ok(session.inventory().lookup_product(id).map(|(key, _)| key))
}

/// A `part#N` key as printed for deleted parts, otherwise a part id.
fn association_target(session: &Session, text: &str) -> Result<Option<PartKey>, ConsoleError> {
    match text.trim().parse::<PartKey>() {
        Ok(key) => Ok(Some(key)),
        Err(_) => part_selection(session, text),
    }
}

fn split_fields(rest: &str) -> Vec<&str> {
    rest.split('|').map(str::trim).collect()
}

fn parse_kind(text: &str) -> Result<PartKind, ConsoleError> {
    match text.trim() {
        "in-house" | "inhouse" => Ok(PartKind::InHouse),
        "outsourced" => Ok(PartKind::Outsourced),
        other => Err(usage(format!("part source must be in-house or outsourced, got `{other}`"))),
    }
}

fn stock_fields(fields: &[&str]) -> StockFields {
    StockFields {
        name: fields[0].to_string(),
        price: fields[1].to_string(),
        stock: fields[2].to_string(),
        min: fields[3].to_string(),
        max: fields[4].to_string(),
    }
}

fn part_form(fields: &[&str]) -> Result<PartForm, ConsoleError> {
    match fields {
        [kind, rest @ ..] if rest.len() == 6 => Ok(PartForm {
            fields: stock_fields(rest),
            kind: parse_kind(kind)?,
            identifier: rest[5].to_string(),
        }),
        _ => Err(usage("<in-house|outsourced> | name | price | stock | min | max | identifier")),
    }
}

fn add_part(session: &mut Session, rest: &str) -> Result<String, ConsoleError> {
    let form = part_form(&split_fields(rest))?;
    session.open_add_part();
    let key = session.save_part(&form).inspect_err(|_| session.cancel())?;
    Ok(describe_part(session, key, "added"))
}

fn modify_part(session: &mut Session, rest: &str) -> Result<String, ConsoleError> {
    let fields = split_fields(rest);
    let Some((id, fields)) = fields.split_first() else {
        return Err(usage("modify-part <id> | ..."));
    };
    let form = part_form(fields)?;
    let selection = part_selection(session, id)?;
    session.open_modify_part(selection)?;
    let key = session.save_part(&form).inspect_err(|_| session.cancel())?;
    Ok(describe_part(session, key, "updated"))
}

fn add_product(session: &mut Session, rest: &str) -> Result<String, ConsoleError> {
    let fields = split_fields(rest);
    if fields.len() != 5 && fields.len() != 6 {
        return Err(usage("add-product name | price | stock | min | max [| part ids]"));
    }
    let form = ProductForm {
        fields: stock_fields(&fields),
    };

    let mut parts = Vec::new();
    if let Some(ids) = fields.get(5) {
        for id in ids.split(',').filter(|s| !s.trim().is_empty()) {
            match part_selection(session, id)? {
                Some(key) => parts.push(key),
                None => return Err(usage(format!("no part with id {}", id.trim()))),
            }
        }
    }

    session.open_add_product();
    let result = parts
        .into_iter()
        .try_for_each(|key| session.associate_part(Some(key)))
        .and_then(|()| session.save_product(&form));
    let key = result.inspect_err(|_| session.cancel())?;
    Ok(describe_product(session, key, "added"))
}

fn modify_product(session: &mut Session, rest: &str) -> Result<String, ConsoleError> {
    let fields = split_fields(rest);
    if fields.len() != 6 {
        return Err(usage("modify-product <id> | name | price | stock | min | max"));
    }
    let form = ProductForm {
        fields: stock_fields(&fields[1..]),
    };
    let selection = product_selection(session, fields[0])?;
    session.open_modify_product(selection)?;
    let key = session.save_product(&form).inspect_err(|_| session.cancel())?;
    Ok(describe_product(session, key, "updated"))
}

fn change_association(session: &mut Session, rest: &str, add: bool) -> Result<String, ConsoleError> {
    let (product_id, part_id) = rest
        .split_once(char::is_whitespace)
        .ok_or_else(|| usage("<product id> <part id>"))?;
    let product = product_selection(session, product_id)?;
    let part = association_target(session, part_id)?;

    let form = session.open_modify_product(product)?;
    let changed = if add {
        session.associate_part(part)
    } else {
        session.disassociate_part(part)
    };
    let key = changed
        .and_then(|()| session.save_product(&form))
        .inspect_err(|_| session.cancel())?;
    Ok(describe_product(session, key, "updated"))
}

fn describe_part(session: &Session, key: PartKey, verb: &str) -> String {
    match session.inventory().part(key) {
        Some(part) => format!("part {} {verb}: {}", part.id(), part.name()),
        None => format!("part {verb}"),
    }
}

fn describe_product(session: &Session, key: ProductKey, verb: &str) -> String {
    match session.inventory().product(key) {
        Some(product) => format!(
            "product {} {verb}: {} ({} parts)",
            product.id(),
            product.name(),
            product.all_associated_parts().len()
        ),
        None => format!("product {verb}"),
    }
}

fn part_table(rows: &[(PartKey, &Part)]) -> String {
    let mut out = format!(
        "{:>6}  {:<24} {:>6} {:>10}  {}",
        "ID", "Name", "Stock", "Price", "Source"
    );
    for (_, part) in rows {
        out.push_str(&format!(
            "\n{:>6}  {:<24} {:>6} {:>10.2}  {}: {}",
            part.id(),
            part.name(),
            part.stock(),
            part.price(),
            part.source().identifier_label(),
            part.source().identifier()
        ));
    }
    out
}

fn product_table(session: &Session, rows: &[(ProductKey, &Product)]) -> String {
    let mut out = format!(
        "{:>6}  {:<24} {:>6} {:>10}  {}",
        "ID", "Name", "Stock", "Price", "Parts"
    );
    for (_, product) in rows {
        let parts: Vec<String> = product
            .all_associated_parts()
            .iter()
            .map(|key| match session.inventory().part(*key) {
                Some(part) => part.id().to_string(),
                None => format!("{key} (deleted)"),
            })
            .collect();
        out.push_str(&format!(
            "\n{:>6}  {:<24} {:>6} {:>10.2}  {}",
            product.id(),
            product.name(),
            product.stock(),
            product.price(),
            parts.join(", ")
        ));
    }
    out
}

fn show_part(session: &Session, rest: &str) -> Result<String, ConsoleError> {
    let id = PartId::new(parse_id(rest)?);
    match session.inventory().lookup_part(id) {
        Some((_, part)) => Ok(serde_json::to_string_pretty(part)?),
        None => Ok(format!("no part with id {id}")),
    }
}

#[derive(Serialize)]
struct ProductView<'a> {
    #[serde(flatten)]
    product: &'a Product,
    parts: Vec<PartId>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    deleted_parts: Vec<String>,
}

fn show_product(session: &Session, rest: &str) -> Result<String, ConsoleError> {
    let id = ProductId::new(parse_id(rest)?);
    match session.inventory().lookup_product(id) {
        Some((_, product)) => {
            let mut view = ProductView {
                product,
                parts: Vec::new(),
                deleted_parts: Vec::new(),
            };
            for key in product.all_associated_parts() {
                match session.inventory().part(*key) {
                    Some(part) => view.parts.push(part.id()),
                    None => view.deleted_parts.push(key.to_string()),
                }
            }
            Ok(serde_json::to_string_pretty(&view)?)
        }
        None => Ok(format!("no product with id {id}")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use stockroom_inventory::Inventory;

    fn session() -> Session {
        Session::new(Inventory::with_sample_data())
    }

    fn print(session: &mut Session, line: &str) -> String {
        match execute(session, line).unwrap() {
            Outcome::Print(text) => text,
            Outcome::Quit => panic!("unexpected quit for `{line}`"),
        }
    }

    #[test]
    fn lists_and_searches() {
        let mut s = session();
        let all = print(&mut s, "parts");
        assert_eq!(all.lines().count(), 4);
        assert!(all.contains("Company Name: Vendor 1"));

        let by_id = print(&mut s, "parts 2");
        assert_eq!(by_id.lines().count(), 2);
        assert!(by_id.contains("Part 2"));

        let products = print(&mut s, "products Product 2");
        assert!(products.contains("1, 2, 3"));
    }

    #[test]
    fn add_part_then_show_it() {
        let mut s = session();
        let out = print(&mut s, "add-part outsourced | Brake Pad | 4.25 | 12 | 1 | 40 | Acme");
        assert_eq!(out, "part 4 added: Brake Pad");

        let json = print(&mut s, "show-part 4");
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["company_name"], "Acme");
        assert_eq!(value["price"], 4.25);
    }

    #[test]
    fn validation_message_is_surfaced_and_screen_reset() {
        let mut s = session();
        let err = execute(&mut s, "add-part in-house | Pad | 4.25 | 12 | 1 | 40 | M1").unwrap_err();
        assert_eq!(err.to_string(), "Invalid Machine Id");
        assert_eq!(s.screen(), &crate::session::Screen::Main);
        assert_eq!(s.inventory().part_count(), 3);
    }

    #[test]
    fn product_lifecycle_through_commands() {
        let mut s = session();
        let out = print(&mut s, "add-product Kit | 20 | 5 | 1 | 10 | 3, 1");
        assert_eq!(out, "product 301 added: Kit (2 parts)");

        let err = execute(&mut s, "delete-product 301").unwrap_err();
        assert_eq!(
            err.to_string(),
            "You cannot delete Products that has parts associated with it."
        );

        print(&mut s, "disassociate 301 3");
        print(&mut s, "disassociate 301 1");
        assert_eq!(print(&mut s, "delete-product 301"), "product deleted");
        assert!(print(&mut s, "show-product 301").starts_with("no product"));
    }

    #[test]
    fn associate_and_show_product() {
        let mut s = session();
        print(&mut s, "associate 300 3");
        let json = print(&mut s, "show-product 300");
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["parts"], serde_json::json!([2, 3]));
        assert_eq!(value["name"], "Product 3");
    }

    #[test]
    fn deleted_part_is_listed_by_key_and_blocks_product_deletion() {
        let mut s = session();
        print(&mut s, "delete-part 2");

        let listed = print(&mut s, "products 300");
        assert!(listed.contains("part#2 (deleted)"));
        let json = print(&mut s, "show-product 300");
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["parts"], serde_json::json!([]));
        assert_eq!(value["deleted_parts"], serde_json::json!(["part#2"]));

        let err = execute(&mut s, "delete-product 300").unwrap_err();
        assert_eq!(
            err.to_string(),
            "You cannot delete Products that has parts associated with it."
        );

        assert_eq!(
            print(&mut s, "disassociate 300 part#2"),
            "product 300 updated: Product 3 (0 parts)"
        );
        assert_eq!(print(&mut s, "delete-product 300"), "product deleted");
    }

    #[test]
    fn modify_commands_keep_ids() {
        let mut s = session();
        assert_eq!(
            print(&mut s, "modify-part 2 | outsourced | Part Two | 2.99 | 19 | 1 | 100 | Acme"),
            "part 2 updated: Part Two"
        );
        assert_eq!(
            print(&mut s, "modify-product 100 | Product One | 9.99 | 20 | 5 | 100"),
            "product 100 updated: Product One (2 parts)"
        );
    }

    #[test]
    fn unknown_id_means_nothing_selected() {
        let mut s = session();
        let err = execute(&mut s, "delete-part 42").unwrap_err();
        assert_eq!(err.to_string(), "You must select a record to delete.");
    }

    #[test]
    fn usage_errors() {
        let mut s = session();
        assert!(matches!(execute(&mut s, "frobnicate"), Err(ConsoleError::Usage(_))));
        assert!(matches!(execute(&mut s, "delete-part abc"), Err(ConsoleError::Usage(_))));
        assert!(matches!(execute(&mut s, "add-part in-house | x"), Err(ConsoleError::Usage(_))));
        assert_eq!(execute(&mut s, "quit").unwrap(), Outcome::Quit);
        assert_eq!(execute(&mut s, "   ").unwrap(), Outcome::Print(String::new()));
    }
}
