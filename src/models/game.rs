use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::entity::{overwrite, Entity, EntityId};

/// A store title as projected by the server
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Game {
    pub id: EntityId,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price: Option<Decimal>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub developer: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub release_date: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub screenshots: Option<Vec<String>>,
    /// Only returned for authenticated requests
    #[serde(skip_serializing_if = "Option::is_none")]
    pub owned: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub in_cart: Option<bool>,
}

impl Game {
    /// A projection holding nothing but the id
    pub fn with_id(id: impl Into<EntityId>) -> Self {
        Self {
            id: id.into(),
            name: None,
            description: None,
            price: None,
            developer: None,
            release_date: None,
            tags: None,
            screenshots: None,
            owned: None,
            in_cart: None,
        }
    }
}

impl Entity for Game {
    const KIND: &'static str = "game";

    fn id(&self) -> &EntityId {
        &self.id
    }

    fn merge(&mut self, data: Self) {
        overwrite(&mut self.name, data.name);
        overwrite(&mut self.description, data.description);
        overwrite(&mut self.price, data.price);
        overwrite(&mut self.developer, data.developer);
        overwrite(&mut self.release_date, data.release_date);
        overwrite(&mut self.tags, data.tags);
        overwrite(&mut self.screenshots, data.screenshots);
        overwrite(&mut self.owned, data.owned);
        overwrite(&mut self.in_cart, data.in_cart);
    }

    fn has_attribute(&self, attribute: &str) -> bool {
        match attribute {
            "id" => true,
            "name" => self.name.is_some(),
            "description" => self.description.is_some(),
            "price" => self.price.is_some(),
            "developer" => self.developer.is_some(),
            "releaseDate" => self.release_date.is_some(),
            "tags" => self.tags.is_some(),
            "screenshots" => self.screenshots.is_some(),
            "owned" => self.owned.is_some(),
            "inCart" => self.in_cart.is_some(),
            _ => false,
        }
    }
}
