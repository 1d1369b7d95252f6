//! Operator session: the one owned inventory plus the screen currently open.
//!
//! Every screen action goes through [`Session`], which validates input, applies
//! the change to the inventory and logs it. Nothing is shared or global; the
//! front end holds the session and passes `&mut` to each action.

use thiserror::Error;
use tracing::{debug, error, info, warn};

use stockroom_core::{DomainError, Entity, PartId, ProductId};
use stockroom_inventory::Inventory;
use stockroom_parts::{Part, PartKey};
use stockroom_products::{Product, ProductKey};

use crate::forms::{FormError, PartForm, ProductForm};

/// Which action a missing selection was needed for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectionFor {
    Modify,
    Delete,
    AddPart,
    RemovePart,
}

#[derive(Debug, Error, Clone, PartialEq)]
pub enum SessionError {
    #[error(transparent)]
    Form(#[from] FormError),

    #[error("{0}")]
    NothingSelected(SelectionFor),

    #[error("You cannot delete Products that has parts associated with it.")]
    ProductHasParts,

    /// The requested screen could not be opened or saved from the current one.
    #[error("navigation failed: {0}")]
    Navigation(String),

    #[error(transparent)]
    Domain(#[from] DomainError),
}

impl core::fmt::Display for SelectionFor {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(match self {
            SelectionFor::Modify => "You must select a record to modify.",
            SelectionFor::Delete => "You must select a record to delete.",
            SelectionFor::AddPart => "You must select a part to add.",
            SelectionFor::RemovePart => "You must select a part to remove.",
        })
    }
}

pub type SessionResult<T> = Result<T, SessionError>;

/// Working copy of a product's associated parts while its screen is open.
///
/// Changes reach the product only when the product form is saved.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProductDraft {
    parts: Vec<PartKey>,
}

impl ProductDraft {
    pub fn from_product(product: &Product) -> Self {
        Self {
            parts: product.all_associated_parts().to_vec(),
        }
    }

    pub fn parts(&self) -> &[PartKey] {
        &self.parts
    }

    pub fn associate(&mut self, part: PartKey) {
        self.parts.push(part);
    }

    /// Drop the first occurrence of `part`.
    pub fn disassociate(&mut self, part: PartKey) -> bool {
        match self.parts.iter().position(|k| *k == part) {
            Some(index) => {
                self.parts.remove(index);
                true
            }
            None => false,
        }
    }

    /// Remove one candidate row per draft entry, so parts already in the draft
    /// are not offered again.
    pub fn hide_associated<T>(&self, mut candidates: Vec<(PartKey, T)>) -> Vec<(PartKey, T)> {
        for key in &self.parts {
            if let Some(index) = candidates.iter().position(|(k, _)| k == key) {
                candidates.remove(index);
            }
        }
        candidates
    }
}

/// Screen currently shown to the operator.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Screen {
    #[default]
    Main,
    AddPart,
    ModifyPart(PartKey),
    AddProduct(ProductDraft),
    ModifyProduct(ProductKey, ProductDraft),
}

/// Query typed into a search box.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchQuery<'a> {
    All,
    Id(i32),
    Name(&'a str),
}

impl<'a> SearchQuery<'a> {
    /// Blank → everything, integer → id lookup, anything else → name fragment.
    pub fn parse(text: &'a str) -> Self {
        let text = text.trim();
        if text.is_empty() {
            SearchQuery::All
        } else if let Ok(id) = text.parse::<i32>() {
            SearchQuery::Id(id)
        } else {
            SearchQuery::Name(text)
        }
    }
}

pub struct Session {
    inventory: Inventory,
    screen: Screen,
}

impl Session {
    pub fn new(inventory: Inventory) -> Self {
        info!(
            parts = inventory.part_count(),
            products = inventory.product_count(),
            "session started"
        );
        Self {
            inventory,
            screen: Screen::Main,
        }
    }

    pub fn inventory(&self) -> &Inventory {
        &self.inventory
    }

    pub fn screen(&self) -> &Screen {
        &self.screen
    }

    /// Leave the current screen without saving.
    pub fn cancel(&mut self) {
        self.screen = Screen::Main;
    }

    pub fn search_parts(&self, text: &str) -> Vec<(PartKey, &Part)> {
        let query = SearchQuery::parse(text);
        debug!(?query, "searching parts");
        match query {
            SearchQuery::All => self.inventory.all_parts().collect(),
            SearchQuery::Id(id) => u32::try_from(id)
                .ok()
                .and_then(|id| self.inventory.lookup_part(PartId::new(id)))
                .into_iter()
                .collect(),
            SearchQuery::Name(fragment) => self.inventory.lookup_part_by_name(fragment),
        }
    }

    pub fn search_products(&self, text: &str) -> Vec<(ProductKey, &Product)> {
        let query = SearchQuery::parse(text);
        debug!(?query, "searching products");
        match query {
            SearchQuery::All => self.inventory.all_products().collect(),
            SearchQuery::Id(id) => u32::try_from(id)
                .ok()
                .and_then(|id| self.inventory.lookup_product(ProductId::new(id)))
                .into_iter()
                .collect(),
            SearchQuery::Name(fragment) => self.inventory.lookup_product_by_name(fragment),
        }
    }

    pub fn open_add_part(&mut self) -> PartForm {
        self.screen = Screen::AddPart;
        PartForm::default()
    }

    pub fn open_modify_part(&mut self, selection: Option<PartKey>) -> SessionResult<PartForm> {
        let key = selection.ok_or(SessionError::NothingSelected(SelectionFor::Modify))?;
        let part = self.inventory.part(key).ok_or_else(|| {
            error!(%key, "modify part screen requested for a missing part");
            SessionError::Navigation(format!("{key} no longer exists"))
        })?;
        let form = PartForm::from_part(part);
        self.screen = Screen::ModifyPart(key);
        Ok(form)
    }

    /// Save the open add/modify part form and return to the main screen.
    pub fn save_part(&mut self, form: &PartForm) -> SessionResult<PartKey> {
        let valid = form.validate().inspect_err(|err| {
            warn!(error = %err, "part form rejected");
        })?;

        let key = match self.screen {
            Screen::AddPart => {
                let id = self.inventory.next_part_id();
                let key = self.inventory.add_part(valid.into_part(id));
                info!(%key, %id, "part added");
                key
            }
            Screen::ModifyPart(key) => {
                let id = self
                    .inventory
                    .part(key)
                    .map(|part| part.id())
                    .ok_or_else(|| self.lost(format!("{key} was removed while being edited")))?;
                self.inventory.update_part(key, valid.into_part(id));
                info!(%key, %id, "part updated");
                key
            }
            _ => return Err(self.lost("no part form is open".to_string())),
        };

        self.screen = Screen::Main;
        Ok(key)
    }

    pub fn delete_part(&mut self, selection: Option<PartKey>) -> SessionResult<()> {
        let key = selection.ok_or(SessionError::NothingSelected(SelectionFor::Delete))?;
        if !self.inventory.delete_part(Some(key)) {
            return Err(DomainError::not_found().into());
        }
        info!(%key, "part deleted");
        Ok(())
    }

    pub fn open_add_product(&mut self) -> ProductForm {
        self.screen = Screen::AddProduct(ProductDraft::default());
        ProductForm::default()
    }

    pub fn open_modify_product(
        &mut self,
        selection: Option<ProductKey>,
    ) -> SessionResult<ProductForm> {
        let key = selection.ok_or(SessionError::NothingSelected(SelectionFor::Modify))?;
        let product = self.inventory.product(key).ok_or_else(|| {
            error!(%key, "modify product screen requested for a missing product");
            SessionError::Navigation(format!("{key} no longer exists"))
        })?;
        let form = ProductForm::from_product(product);
        self.screen = Screen::ModifyProduct(key, ProductDraft::from_product(product));
        Ok(form)
    }

    fn draft(&self) -> SessionResult<&ProductDraft> {
        match &self.screen {
            Screen::AddProduct(draft) | Screen::ModifyProduct(_, draft) => Ok(draft),
            _ => Err(SessionError::Navigation("no product form is open".to_string())),
        }
    }

    fn draft_mut(&mut self) -> SessionResult<&mut ProductDraft> {
        match &mut self.screen {
            Screen::AddProduct(draft) | Screen::ModifyProduct(_, draft) => Ok(draft),
            _ => Err(SessionError::Navigation("no product form is open".to_string())),
        }
    }

    /// Parts currently associated in the open product draft.
    ///
    /// A part deleted since it was associated comes back as `None`; it stays in
    /// the draft until disassociated.
    pub fn draft_parts(&self) -> SessionResult<Vec<(PartKey, Option<&Part>)>> {
        let draft = self.draft()?;
        Ok(draft
            .parts()
            .iter()
            .map(|key| (*key, self.inventory.part(*key)))
            .collect())
    }

    /// Search results for the product screen's part table, minus drafted parts.
    pub fn available_parts(&self, text: &str) -> SessionResult<Vec<(PartKey, &Part)>> {
        let draft = self.draft()?;
        Ok(draft.hide_associated(self.search_parts(text)))
    }

    pub fn associate_part(&mut self, selection: Option<PartKey>) -> SessionResult<()> {
        let key = selection.ok_or(SessionError::NothingSelected(SelectionFor::AddPart))?;
        if self.inventory.part(key).is_none() {
            return Err(DomainError::not_found().into());
        }
        self.draft_mut()?.associate(key);
        debug!(%key, "part added to product draft");
        Ok(())
    }

    pub fn disassociate_part(&mut self, selection: Option<PartKey>) -> SessionResult<()> {
        let key = selection.ok_or(SessionError::NothingSelected(SelectionFor::RemovePart))?;
        if !self.draft_mut()?.disassociate(key) {
            return Err(DomainError::not_found().into());
        }
        debug!(%key, "part removed from product draft");
        Ok(())
    }

    /// Save the open add/modify product form, with the draft's associations.
    pub fn save_product(&mut self, form: &ProductForm) -> SessionResult<ProductKey> {
        let fields = form.validate().inspect_err(|err| {
            warn!(error = %err, "product form rejected");
        })?;

        let key = match &self.screen {
            Screen::AddProduct(draft) => {
                let id = self.inventory.next_product_id();
                let mut product = fields.into_product(id);
                product.set_associated_parts(draft.parts().iter().copied());
                let key = self.inventory.add_product(product);
                info!(%key, %id, parts = draft.parts().len(), "product added");
                key
            }
            Screen::ModifyProduct(key, draft) => {
                let key = *key;
                let id = self
                    .inventory
                    .product(key)
                    .map(|product| product.id())
                    .ok_or_else(|| self.lost(format!("{key} was removed while being edited")))?;
                let mut product = fields.into_product(id);
                product.set_associated_parts(draft.parts().iter().copied());
                let parts = draft.parts().len();
                self.inventory.update_product(key, product);
                info!(%key, %id, parts, "product updated");
                key
            }
            _ => return Err(self.lost("no product form is open".to_string())),
        };

        self.screen = Screen::Main;
        Ok(key)
    }

    /// Delete a product whose associated-parts list is empty.
    ///
    /// References to deleted parts still count; they have to be disassociated first.
    pub fn delete_product(&mut self, selection: Option<ProductKey>) -> SessionResult<()> {
        let key = selection.ok_or(SessionError::NothingSelected(SelectionFor::Delete))?;
        let product = self
            .inventory
            .product(key)
            .ok_or(SessionError::Domain(DomainError::not_found()))?;

        if product.has_associated_parts() {
            warn!(%key, "refusing to delete product with associated parts");
            return Err(SessionError::ProductHasParts);
        }

        self.inventory.delete_product(Some(key));
        info!(%key, "product deleted");
        Ok(())
    }

    fn lost(&self, reason: String) -> SessionError {
        error!(screen = ?self.screen, %reason, "navigation failed");
        SessionError::Navigation(reason)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use stockroom_core::StockLevels;
    use stockroom_parts::PartKind;

    use crate::forms::StockFields;

    fn stock_fields(name: &str) -> StockFields {
        StockFields {
            name: name.to_string(),
            stock: "5".to_string(),
            price: "2.50".to_string(),
            min: "1".to_string(),
            max: "10".to_string(),
        }
    }

    fn part_form(name: &str) -> PartForm {
        PartForm {
            fields: stock_fields(name),
            kind: PartKind::InHouse,
            identifier: "7".to_string(),
        }
    }

    fn product_form(name: &str) -> ProductForm {
        ProductForm {
            fields: stock_fields(name),
        }
    }

    fn sample() -> Session {
        Session::new(Inventory::with_sample_data())
    }

    fn part_key(session: &Session, id: u32) -> PartKey {
        session.inventory().lookup_part(PartId::new(id)).unwrap().0
    }

    fn product_key(session: &Session, id: u32) -> ProductKey {
        session.inventory().lookup_product(ProductId::new(id)).unwrap().0
    }

    #[test]
    fn search_query_parsing() {
        assert_eq!(SearchQuery::parse("   "), SearchQuery::All);
        assert_eq!(SearchQuery::parse(" 42 "), SearchQuery::Id(42));
        assert_eq!(SearchQuery::parse("-3"), SearchQuery::Id(-3));
        assert_eq!(
            SearchQuery::parse("3000000000"),
            SearchQuery::Name("3000000000")
        );
        assert_eq!(SearchQuery::parse("Part 1"), SearchQuery::Name("Part 1"));
    }

    #[test]
    fn search_by_id_name_and_blank() {
        let session = sample();
        assert_eq!(session.search_parts("").len(), 3);
        assert_eq!(session.search_parts("2").len(), 1);
        assert!(session.search_parts("-2").is_empty());
        assert!(session.search_parts("99").is_empty());
        assert_eq!(session.search_parts("Part").len(), 2);
        assert_eq!(session.search_products("200")[0].1.name(), "Product 2");
        assert_eq!(session.search_products("Product").len(), 3);
    }

    #[test]
    fn add_part_generates_next_id() {
        let mut session = sample();
        let form = session.open_add_part();
        assert_eq!(form.identifier_label(), "Machine Id");

        let key = session.save_part(&part_form("Spring")).unwrap();
        let part = session.inventory().part(key).unwrap();
        assert_eq!(part.id(), PartId::new(4));
        assert_eq!(part.machine_id(), Some(7));
        assert_eq!(session.screen(), &Screen::Main);
    }

    #[test]
    fn rejected_form_keeps_screen_and_inventory() {
        let mut session = sample();
        session.open_add_part();
        let mut form = part_form("Spring");
        form.fields.min = "50".to_string();

        let err = session.save_part(&form).unwrap_err();
        assert_eq!(err.to_string(), "Maximum must be greater than Minimum");
        assert_eq!(session.inventory().part_count(), 3);
        assert_eq!(session.screen(), &Screen::AddPart);
    }

    #[test]
    fn modify_part_keeps_id_and_may_switch_variant() {
        let mut session = sample();
        let key = part_key(&session, 1);
        let mut form = session.open_modify_part(Some(key)).unwrap();
        assert_eq!(form.fields.name, "Part 1");
        assert_eq!(form.identifier, "104");

        form.kind = PartKind::Outsourced;
        form.identifier = "Acme".to_string();
        form.fields.name = "Part One".to_string();
        assert_eq!(session.save_part(&form).unwrap(), key);

        let part = session.inventory().part(key).unwrap();
        assert_eq!(part.id(), PartId::new(1));
        assert_eq!(part.name(), "Part One");
        assert_eq!(part.company_name(), Some("Acme"));
        assert_eq!(session.inventory().position_of_part(key), Some(0));
    }

    #[test]
    fn modify_requires_selection() {
        let mut session = sample();
        let err = session.open_modify_part(None).unwrap_err();
        assert_eq!(err.to_string(), "You must select a record to modify.");
        let err = session.open_modify_product(None).unwrap_err();
        assert_eq!(err.to_string(), "You must select a record to modify.");
    }

    #[test]
    fn modify_screen_for_deleted_part_is_a_navigation_error() {
        let mut session = sample();
        let key = part_key(&session, 3);
        session.delete_part(Some(key)).unwrap();

        let err = session.open_modify_part(Some(key)).unwrap_err();
        assert!(matches!(err, SessionError::Navigation(_)));
        assert_eq!(session.screen(), &Screen::Main);
    }

    #[test]
    fn save_without_open_form_is_a_navigation_error() {
        let mut session = sample();
        let err = session.save_part(&part_form("x")).unwrap_err();
        assert!(matches!(err, SessionError::Navigation(_)));
        let err = session.save_product(&product_form("x")).unwrap_err();
        assert!(matches!(err, SessionError::Navigation(_)));
    }

    #[test]
    fn delete_part_requires_selection() {
        let mut session = sample();
        let err = session.delete_part(None).unwrap_err();
        assert_eq!(err.to_string(), "You must select a record to delete.");
        assert_eq!(session.inventory().part_count(), 3);
    }

    #[test]
    fn delete_product_with_parts_is_rejected() {
        let mut session = sample();
        let key = product_key(&session, 300);
        let err = session.delete_product(Some(key)).unwrap_err();
        assert_eq!(
            err.to_string(),
            "You cannot delete Products that has parts associated with it."
        );
        assert_eq!(session.inventory().product_count(), 3);
    }

    #[test]
    fn references_to_deleted_parts_still_block_product_deletion() {
        let mut session = sample();
        let part_2 = part_key(&session, 2);
        session.delete_part(Some(part_2)).unwrap();

        let key = product_key(&session, 300);
        let err = session.delete_product(Some(key)).unwrap_err();
        assert_eq!(err, SessionError::ProductHasParts);
        assert_eq!(session.inventory().product_count(), 3);

        let form = session.open_modify_product(Some(key)).unwrap();
        assert_eq!(session.draft_parts().unwrap(), vec![(part_2, None)]);
        session.disassociate_part(Some(part_2)).unwrap();
        session.save_product(&form).unwrap();

        session.delete_product(Some(key)).unwrap();
        assert!(session.inventory().lookup_product(ProductId::new(300)).is_none());
    }

    #[test]
    fn product_draft_hides_associated_parts() {
        let mut session = sample();
        let key = product_key(&session, 100);
        session.open_modify_product(Some(key)).unwrap();

        let available: Vec<_> = session
            .available_parts("")
            .unwrap()
            .into_iter()
            .map(|(_, p)| p.id().get())
            .collect();
        assert_eq!(available, vec![3]);

        let drafted: Vec<_> = session
            .draft_parts()
            .unwrap()
            .into_iter()
            .filter_map(|(_, p)| p.map(|p| p.id().get()))
            .collect();
        assert_eq!(drafted, vec![1, 2]);
    }

    #[test]
    fn draft_changes_apply_only_on_save() {
        let mut session = sample();
        let key = product_key(&session, 100);
        let part_1 = part_key(&session, 1);
        let form = session.open_modify_product(Some(key)).unwrap();

        session.disassociate_part(Some(part_1)).unwrap();
        assert_eq!(
            session.inventory().product(key).unwrap().all_associated_parts().len(),
            2
        );

        session.cancel();
        assert_eq!(
            session.inventory().product(key).unwrap().all_associated_parts().len(),
            2
        );

        session.open_modify_product(Some(key)).unwrap();
        session.disassociate_part(Some(part_1)).unwrap();
        session.save_product(&form).unwrap();
        assert_eq!(
            session.inventory().product(key).unwrap().all_associated_parts(),
            &[part_key(&session, 2)]
        );
    }

    #[test]
    fn add_product_copies_draft_in_order() {
        let mut session = sample();
        let part_3 = part_key(&session, 3);
        let part_1 = part_key(&session, 1);
        session.open_add_product();
        session.associate_part(Some(part_3)).unwrap();
        session.associate_part(Some(part_1)).unwrap();

        let key = session.save_product(&product_form("Kit")).unwrap();
        let product = session.inventory().product(key).unwrap();
        assert_eq!(product.id(), ProductId::new(301));
        assert_eq!(product.all_associated_parts(), &[part_3, part_1]);
        assert_eq!(product.levels(), StockLevels::new(5, 1, 10));
    }

    #[test]
    fn draft_selection_errors() {
        let mut session = sample();
        session.open_add_product();
        let err = session.associate_part(None).unwrap_err();
        assert_eq!(err.to_string(), "You must select a part to add.");
        let err = session.disassociate_part(None).unwrap_err();
        assert_eq!(err.to_string(), "You must select a part to remove.");
    }

    #[test]
    fn associate_outside_product_screen_fails() {
        let mut session = sample();
        let part_1 = part_key(&session, 1);
        let err = session.associate_part(Some(part_1)).unwrap_err();
        assert!(matches!(err, SessionError::Navigation(_)));
    }

    #[test]
    fn hide_associated_removes_one_row_per_entry() {
        let a = PartKey::from_raw(1);
        let b = PartKey::from_raw(2);
        let mut draft = ProductDraft::default();
        draft.associate(a);

        let rows = draft.hide_associated(vec![(a, "a1"), (b, "b"), (a, "a2")]);
        assert_eq!(rows, vec![(b, "b"), (a, "a2")]);
    }
}
