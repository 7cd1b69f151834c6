//! Resource-specific helper methods.
//!
//! Thin wrappers over [`ApiClient::request`] with fixed paths and verbs -
//! no logic beyond (de)serialization lives here.

use reqwest::Method;
use serde::Serialize;
use serde::de::DeserializeOwned;

use teahouse_core::{OrderId, ProductId, ToppingId, UserId};

use crate::models::{BannerImage, OptionItem, OptionKind, Order, Product, Topping, UserAccount};

use super::{ApiClient, ApiError, RequestOptions};

impl ApiClient {
    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        let value = self.request(path, RequestOptions::default()).await?;
        Ok(serde_json::from_value(value)?)
    }

    async fn send_json<T: DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
        body: &impl Serialize,
    ) -> Result<T, ApiError> {
        let options = RequestOptions {
            method,
            body: Some(serde_json::to_value(body)?),
            ..Default::default()
        };
        let value = self.request(path, options).await?;
        Ok(serde_json::from_value(value)?)
    }

    // =========================================================================
    // Products
    // =========================================================================

    pub async fn products(&self) -> Result<Vec<Product>, ApiError> {
        self.get_json("/products").await
    }

    pub async fn product(&self, id: &ProductId) -> Result<Product, ApiError> {
        self.get_json(&format!("/products/{id}")).await
    }

    pub async fn create_product(&self, product: &Product) -> Result<Product, ApiError> {
        self.send_json(Method::POST, "/products", product).await
    }

    pub async fn update_product(&self, id: &ProductId, product: &Product) -> Result<Product, ApiError> {
        self.send_json(Method::PUT, &format!("/products/{id}"), product)
            .await
    }

    pub async fn delete_product(&self, id: &ProductId) -> Result<(), ApiError> {
        let options = RequestOptions {
            method: Method::DELETE,
            ..Default::default()
        };
        self.request(&format!("/products/{id}"), options).await?;
        Ok(())
    }

    // =========================================================================
    // Toppings
    // =========================================================================

    pub async fn toppings(&self) -> Result<Vec<Topping>, ApiError> {
        self.get_json("/toppings").await
    }

    pub async fn topping(&self, id: &ToppingId) -> Result<Topping, ApiError> {
        self.get_json(&format!("/toppings/{id}")).await
    }

    // =========================================================================
    // Options
    // =========================================================================

    pub async fn options(&self) -> Result<Vec<OptionItem>, ApiError> {
        self.get_json("/options").await
    }

    pub async fn options_by_kind(&self, kind: OptionKind) -> Result<Vec<OptionItem>, ApiError> {
        self.get_json(&format!("/options?type={}", kind.as_str()))
            .await
    }

    // =========================================================================
    // Users
    // =========================================================================

    pub async fn users(&self) -> Result<Vec<UserAccount>, ApiError> {
        self.get_json("/users").await
    }

    pub async fn user(&self, id: &UserId) -> Result<UserAccount, ApiError> {
        self.get_json(&format!("/users/{id}")).await
    }

    pub async fn create_user(&self, user: &UserAccount) -> Result<UserAccount, ApiError> {
        self.send_json(Method::POST, "/users", user).await
    }

    pub async fn update_user(&self, id: &UserId, user: &UserAccount) -> Result<UserAccount, ApiError> {
        self.send_json(Method::PUT, &format!("/users/{id}"), user)
            .await
    }

    // =========================================================================
    // Orders
    // =========================================================================

    pub async fn orders(&self) -> Result<Vec<Order>, ApiError> {
        self.get_json("/orders").await
    }

    pub async fn order(&self, id: &OrderId) -> Result<Order, ApiError> {
        self.get_json(&format!("/orders/{id}")).await
    }

    pub async fn orders_by_user(&self, user_id: &UserId) -> Result<Vec<Order>, ApiError> {
        self.get_json(&format!("/orders?userId={user_id}")).await
    }

    pub async fn create_order(&self, order: &Order) -> Result<Order, ApiError> {
        self.send_json(Method::POST, "/orders", order).await
    }

    pub async fn update_order(&self, id: &OrderId, order: &Order) -> Result<Order, ApiError> {
        self.send_json(Method::PUT, &format!("/orders/{id}"), order)
            .await
    }

    pub async fn delete_order(&self, id: &OrderId) -> Result<(), ApiError> {
        let options = RequestOptions {
            method: Method::DELETE,
            ..Default::default()
        };
        self.request(&format!("/orders/{id}"), options).await?;
        Ok(())
    }

    // =========================================================================
    // Banner images
    // =========================================================================

    pub async fn banner_images(&self) -> Result<Vec<BannerImage>, ApiError> {
        self.get_json("/bannerImages").await
    }
}
