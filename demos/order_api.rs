//! Minimal food-ordering API demonstrating the validation middleware
//!
//! ```sh
//! cargo run --example order_api
//! curl -X POST localhost:3000/orders \
//!   -H 'content-type: application/json' \
//!   -d '{"dish": "  Couscous royal  ", "quantity": 2, "address": {"street": "1 rue de la Paix", "city": "Lyon", "postal_code": "69001"}}'
//! curl 'localhost:3000/menu/search?q=%20Pizza%20'
//! ```

use livra::prelude::*;
use regex::Regex;
use tracing_subscriber::{EnvFilter, fmt};

#[tokio::main]
async fn main() {
    fmt().with_env_filter(EnvFilter::from_default_env()).init();

    let postal_code = Regex::new(r"^\d{5}$").expect("valid pattern");
    let page_number = Regex::new(r"^\d+$").expect("valid pattern");

    let order_schema = ObjectSchema::new()
        .field(
            "dish",
            FieldSchema::required()
                .filter(trim())
                .validate(non_empty())
                .validate(string_length(1, 120)),
        )
        .field(
            "quantity",
            FieldSchema::required()
                .validate(integer())
                .validate(min_value(1.0)),
        )
        .field(
            "address",
            FieldSchema::required().nested(
                ObjectSchema::new()
                    .field(
                        "street",
                        FieldSchema::required().filter(trim()).validate(non_empty()),
                    )
                    .field(
                        "city",
                        FieldSchema::required().filter(trim()).validate(non_empty()),
                    )
                    .field(
                        "postal_code",
                        FieldSchema::required().validate(matches(postal_code)),
                    ),
            ),
        );

    let search_schema = ObjectSchema::new()
        .field(
            "q",
            FieldSchema::required()
                .filter(trim())
                .filter(lowercase())
                .validate(non_empty()),
        )
        .field("page", FieldSchema::optional().validate(matches(page_number)));

    let app = Router::new()
        .route(
            "/orders",
            post(create_order).layer(ValidateLayer::new(order_schema)),
        )
        .route(
            "/menu/search",
            get(search_menu).layer(ValidateLayer::new(search_schema).source(Source::Query)),
        );

    let listener = tokio::net::TcpListener::bind("0.0.0.0:3000")
        .await
        .expect("bind 0.0.0.0:3000");
    tracing::info!("listening on {}", listener.local_addr().expect("local addr"));
    axum::serve(listener, app).await.expect("server error");
}

async fn create_order(Validated { value, .. }: Validated) -> Json<Value> {
    Json(json!({ "success": true, "order": value }))
}

async fn search_menu(Validated { value, .. }: Validated) -> Json<Value> {
    Json(json!({ "success": true, "query": value }))
}
