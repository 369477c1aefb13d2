/// Public landing page
///
/// Serves the storefront payload: hero sliders (newest first) and product
/// cards for every listed inverter. No session is involved; this page is
/// reachable without logging in.

use axum::{extract::State, Json};
use rust_decimal::Decimal;
use serde::Serialize;

use solstore_shared::models::inverter::Inverter;
use solstore_shared::models::slider::HomepageSlider;

use crate::app::AppState;
use crate::error::AppResult;

/// Landing page payload
#[derive(Debug, Serialize)]
pub struct HomePage {
    pub sliders: Vec<HomepageSlider>,
    pub products: Vec<ProductCard>,
}

/// One product as shown on the landing page
#[derive(Debug, Serialize)]
pub struct ProductCard {
    pub id: i64,
    pub name: String,
    pub brand: String,
    pub model: String,
    pub power_capacity_kw: f64,
    pub input_voltage: String,
    pub output_voltage: String,
    pub price: Decimal,
    pub description: String,
    pub image: Option<String>,
    pub icon: &'static str,
}

/// Picks a display icon from the product name
///
/// Products named for a deployment segment get its icon; everything else
/// falls back to the generic energy glyph.
pub fn category_icon(name: &str) -> &'static str {
    if name.contains("Residential") {
        "\u{1F3E0}"
    } else if name.contains("Commercial") {
        "\u{1F3E2}"
    } else if name.contains("Industrial") {
        "\u{1F3ED}"
    } else {
        "\u{26A1}"
    }
}

impl From<Inverter> for ProductCard {
    fn from(inverter: Inverter) -> Self {
        let icon = category_icon(&inverter.name);
        ProductCard {
            id: inverter.id,
            name: inverter.name,
            brand: inverter.brand,
            model: inverter.model,
            power_capacity_kw: inverter.power_capacity_kw,
            input_voltage: inverter.input_voltage,
            output_voltage: inverter.output_voltage,
            price: inverter.price,
            description: inverter.description,
            image: inverter.image_ref,
            icon,
        }
    }
}

/// GET / - landing page with sliders and the product list
pub async fn index(State(state): State<AppState>) -> AppResult<Json<HomePage>> {
    let sliders = HomepageSlider::list_public(&state.db).await?;
    let products = Inverter::list(&state.db)
        .await?
        .into_iter()
        .map(ProductCard::from)
        .collect();

    Ok(Json(HomePage { sliders, products }))
}
