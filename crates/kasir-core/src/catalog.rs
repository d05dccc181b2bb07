//! # Catalog
//!
//! The product catalog collaborator.
//!
//! The ledger core never looks products up itself; the presentation
//! layer resolves a scanned barcode or tapped tile into a [`Product`]
//! through the [`Catalog`] trait, builds cart lines, and only then calls
//! the checkout engine. [`InMemoryCatalog`] is the bundled implementation
//! with the management operations (add/update/delete, search) the store's
//! product screen needs; callers persist it as a whole through the
//! key/value store if they want it durable.

use serde::{Deserialize, Serialize};

use crate::error::{CoreError, CoreResult};
use crate::types::{Category, Product, ProductId};
use crate::validation;

// =============================================================================
// Collaborator Interface
// =============================================================================

/// Lookup interface the presentation layer uses to resolve a scanned or
/// typed code into a product before checkout.
pub trait Catalog {
    /// Finds a product by its id.
    fn find_by_id(&self, id: ProductId) -> Option<&Product>;

    /// Finds a product by exact barcode match.
    fn find_by_barcode(&self, barcode: &str) -> Option<&Product>;
}

// =============================================================================
// In-Memory Catalog
// =============================================================================

/// Product catalog with management operations.
///
/// Ids are assigned as `max(existing) + 1`, matching how the original
/// store allocated them. Barcodes should be unique but are not enforced;
/// lookup returns the first match.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct InMemoryCatalog {
    products: Vec<Product>,
}

impl InMemoryCatalog {
    /// Creates an empty catalog.
    pub fn new() -> Self {
        InMemoryCatalog {
            products: Vec::new(),
        }
    }

    /// Rebuilds a catalog from persisted products.
    pub fn from_products(products: Vec<Product>) -> Self {
        InMemoryCatalog { products }
    }

    /// All products, in insertion order.
    pub fn products(&self) -> &[Product] {
        &self.products
    }

    /// Adds a new product, assigning the next free id.
    ///
    /// ## Returns
    /// The assigned product id.
    pub fn add_product(
        &mut self,
        name: &str,
        price: crate::money::Money,
        category: Category,
        barcode: &str,
        image: &str,
    ) -> CoreResult<ProductId> {
        validation::validate_product_name(name)?;
        validation::validate_price(price)?;
        validation::validate_barcode(barcode)?;

        let id = self.products.iter().map(|p| p.id).max().unwrap_or(0) + 1;
        self.products.push(Product {
            id,
            name: name.trim().to_string(),
            price,
            category,
            barcode: barcode.trim().to_string(),
            image: image.to_string(),
        });
        Ok(id)
    }

    /// Replaces an existing product's fields, keyed by `product.id`.
    pub fn update_product(&mut self, product: Product) -> CoreResult<()> {
        validation::validate_product_id(product.id)?;
        validation::validate_product_name(&product.name)?;
        validation::validate_price(product.price)?;
        validation::validate_barcode(&product.barcode)?;

        match self.products.iter_mut().find(|p| p.id == product.id) {
            Some(slot) => {
                *slot = product;
                Ok(())
            }
            None => Err(CoreError::ProductNotFound(product.id)),
        }
    }

    /// Deletes a product from the catalog.
    ///
    /// Historical receipts and stock movements keep their denormalized
    /// snapshots; stock rows for the deleted id are left in place. The
    /// caller is responsible for dropping any cart line for this product.
    pub fn remove_product(&mut self, id: ProductId) -> CoreResult<()> {
        let before = self.products.len();
        self.products.retain(|p| p.id != id);

        if self.products.len() == before {
            Err(CoreError::ProductNotFound(id))
        } else {
            Ok(())
        }
    }

    /// Case-insensitive substring search on product names.
    pub fn search(&self, query: &str) -> Vec<&Product> {
        let needle = query.trim().to_lowercase();
        self.products
            .iter()
            .filter(|p| p.name.to_lowercase().contains(&needle))
            .collect()
    }

    /// Products in a category.
    pub fn by_category(&self, category: Category) -> Vec<&Product> {
        self.products
            .iter()
            .filter(|p| p.category == category)
            .collect()
    }
}

impl Catalog for InMemoryCatalog {
    fn find_by_id(&self, id: ProductId) -> Option<&Product> {
        self.products.iter().find(|p| p.id == id)
    }

    fn find_by_barcode(&self, barcode: &str) -> Option<&Product> {
        if barcode.is_empty() {
            return None;
        }
        self.products.iter().find(|p| p.barcode == barcode)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::money::Money;

    fn seeded() -> InMemoryCatalog {
        let mut catalog = InMemoryCatalog::new();
        catalog
            .add_product(
                "Susu Formula A",
                Money::from_minor(50_000),
                Category::Susu,
                "8990000000001",
                "",
            )
            .unwrap();
        catalog
            .add_product(
                "Pampers M 34",
                Money::from_minor(78_000),
                Category::Pampers,
                "8990000000002",
                "",
            )
            .unwrap();
        catalog
    }

    #[test]
    fn test_add_assigns_sequential_ids() {
        let catalog = seeded();
        assert_eq!(catalog.products()[0].id, 1);
        assert_eq!(catalog.products()[1].id, 2);
    }

    #[test]
    fn test_ids_not_reused_after_delete() {
        let mut catalog = seeded();
        catalog.remove_product(1).unwrap();

        let id = catalog
            .add_product("Baru", Money::from_minor(1_000), Category::Makanan, "", "")
            .unwrap();
        // max(existing)+1, so the live max (2) drives the next id
        assert_eq!(id, 3);
    }

    #[test]
    fn test_find_by_barcode() {
        let catalog = seeded();
        assert_eq!(
            catalog.find_by_barcode("8990000000002").map(|p| p.id),
            Some(2)
        );
        assert!(catalog.find_by_barcode("0000000000000").is_none());
        assert!(catalog.find_by_barcode("").is_none());
    }

    #[test]
    fn test_update_product() {
        let mut catalog = seeded();
        let mut product = catalog.find_by_id(1).unwrap().clone();
        product.price = Money::from_minor(55_000);

        catalog.update_product(product).unwrap();
        assert_eq!(
            catalog.find_by_id(1).unwrap().price,
            Money::from_minor(55_000)
        );
    }

    #[test]
    fn test_update_unknown_product() {
        let mut catalog = seeded();
        let ghost = Product {
            id: 99,
            name: "Ghost".to_string(),
            price: Money::from_minor(1),
            category: Category::Uncategorized,
            barcode: String::new(),
            image: String::new(),
        };
        assert_eq!(
            catalog.update_product(ghost),
            Err(CoreError::ProductNotFound(99))
        );
    }

    #[test]
    fn test_remove_unknown_product() {
        let mut catalog = seeded();
        assert_eq!(
            catalog.remove_product(99),
            Err(CoreError::ProductNotFound(99))
        );
    }

    #[test]
    fn test_search_case_insensitive() {
        let catalog = seeded();
        assert_eq!(catalog.search("susu").len(), 1);
        assert_eq!(catalog.search("PAMPERS").len(), 1);
        assert_eq!(catalog.search("").len(), 2);
        assert!(catalog.search("kosmetik").is_empty());
    }

    #[test]
    fn test_by_category() {
        let catalog = seeded();
        assert_eq!(catalog.by_category(Category::Susu).len(), 1);
        assert!(catalog.by_category(Category::Kosmetik).is_empty());
    }

    #[test]
    fn test_add_rejects_invalid_input() {
        let mut catalog = InMemoryCatalog::new();
        assert!(catalog
            .add_product("", Money::from_minor(1_000), Category::Susu, "", "")
            .is_err());
        assert!(catalog
            .add_product("X", Money::from_minor(-1), Category::Susu, "", "")
            .is_err());
        assert!(catalog
            .add_product("X", Money::from_minor(1), Category::Susu, "not-digits", "")
            .is_err());
    }
}
