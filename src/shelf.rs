use crate::catalog::Product;
use serde::{Deserialize, Serialize};

/// A projection of a catalog product captured at selection time, so the
/// shelf survives catalog reloads and filter changes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SelectedProduct {
    pub id: String,
    pub name: String,
    pub brand: String,
}

impl From<&Product> for SelectedProduct {
    fn from(product: &Product) -> Self {
        Self {
            id: product.id.clone(),
            name: product.name.clone(),
            brand: product.brand.clone(),
        }
    }
}

/// The user-curated selection, in selection order. At most one entry per
/// product id.
#[derive(Debug, Clone, Default)]
pub struct Shelf {
    items: Vec<SelectedProduct>,
}

impl Shelf {
    pub fn from_items(items: Vec<SelectedProduct>) -> Self {
        Self { items }
    }

    pub fn items(&self) -> &[SelectedProduct] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn contains(&self, product_id: &str) -> bool {
        self.items.iter().any(|item| item.id == product_id)
    }

    /// Selects the product if absent, deselects it if present. Returns
    /// whether the product is selected afterwards.
    pub fn toggle(&mut self, product: &Product) -> bool {
        if let Some(index) = self.items.iter().position(|item| item.id == product.id) {
            self.items.remove(index);
            false
        } else {
            self.items.push(SelectedProduct::from(product));
            true
        }
    }

    pub fn remove(&mut self, product_id: &str) {
        self.items.retain(|item| item.id != product_id);
    }

    pub fn clear(&mut self) {
        self.items.clear();
    }

    /// "Name by Brand" for every entry, joined with commas, in selection
    /// order.
    pub fn routine_summary(&self) -> String {
        self.items
            .iter()
            .map(|item| format!("{} by {}", item.name, item.brand))
            .collect::<Vec<_>>()
            .join(", ")
    }
}
