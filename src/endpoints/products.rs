use crate::config;
use crate::endpoints::{ItemBody, ListBody};
use crate::error::{RepartoError, Result};
use crate::http::ApiClient;
use crate::models::{NewProduct, Product};
use crate::sale::Catalog;

pub struct ProductEndpoint<'a> {
    api: &'a ApiClient,
}

impl<'a> ProductEndpoint<'a> {
    pub fn new(api: &'a ApiClient) -> Self {
        Self { api }
    }

    pub fn list(&self) -> Result<Vec<Product>> {
        let body: ListBody<Product> = self.api.get(config::PRODUCTS_PATH)?;
        Ok(body.into_vec())
    }

    pub fn create(&self, product: &NewProduct) -> Result<Product> {
        if product.name.trim().is_empty() {
            return Err(RepartoError::Validation("product name is required".into()));
        }
        if product.price.is_sign_negative() {
            return Err(RepartoError::Validation(format!(
                "product price must not be negative, got {}",
                product.price
            )));
        }
        let body: ItemBody<Product> = self.api.post(config::PRODUCTS_PATH, product)?;
        Ok(body.into_inner())
    }

    /// Active products as a sale catalog.
    pub fn catalog(&self) -> Result<Catalog> {
        Ok(Catalog::new(self.list()?))
    }
}
