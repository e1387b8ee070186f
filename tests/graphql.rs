use std::sync::Arc;

use actix_web::{test, web, App};
use async_graphql::{Request, Response};
use serde_json::{json, Value};

use shop_graphql::auth::{Identity, TokenService};
use shop_graphql::memory::MemoryStore;
use shop_graphql::middleware::AuthMiddleware;
use shop_graphql::routes;
use shop_graphql::schema::{build_schema, ShopSchema};

const SECRET: &str = "integration-secret";

fn tokens() -> TokenService {
    TokenService::new(SECRET, 1)
}

fn schema() -> ShopSchema {
    build_schema(Arc::new(MemoryStore::new()), tokens())
}

async fn run(schema: &ShopSchema, query: &str, identity: Identity) -> Response {
    schema.execute(Request::new(query).data(identity)).await
}

async fn run_ok(schema: &ShopSchema, query: &str, identity: Identity) -> Value {
    let response = run(schema, query, identity).await;
    assert!(response.errors.is_empty(), "unexpected errors: {:?}", response.errors);
    response.data.into_json().unwrap()
}

fn first_error(response: &Response) -> (String, Option<String>) {
    let error = &response.errors[0];
    let code = error
        .extensions
        .as_ref()
        .and_then(|ext| ext.get("code"))
        .and_then(|code| match code {
            async_graphql::Value::String(code) => Some(code.clone()),
            _ => None,
        });
    (error.message.clone(), code)
}

/// Decodes the JSON string payload returned by createUser/loginUser.
fn payload(data: &Value, field: &str) -> Value {
    serde_json::from_str(data[field].as_str().unwrap()).unwrap()
}

fn signed_in(user_id: &str) -> Identity {
    let token = tokens().issue(user_id, false).unwrap();
    Identity::authenticated(tokens().verify(&token).unwrap())
}

const REGISTER_ADA: &str = r#"mutation {
    createUser(username: "ada", email: "ada@example.com", password: "analytical", isAdmin: true)
}"#;

#[actix_web::test]
async fn registering_same_email_twice_fails() {
    let schema = schema();
    let data = run_ok(&schema, REGISTER_ADA, Identity::anonymous()).await;
    let created = payload(&data, "createUser");
    assert!(created["token"].is_string());
    assert_eq!(created["isAdmin"], json!(true));

    let again = run(
        &schema,
        r#"mutation { createUser(username: "ada2", email: "ada@example.com", password: "x") }"#,
        Identity::anonymous(),
    )
    .await;
    assert_eq!(
        first_error(&again),
        ("Already in db".to_string(), Some("ALREADY_EXISTS".to_string()))
    );
}

#[actix_web::test]
async fn login_returns_token_with_claims() {
    let schema = schema();
    let created = payload(&run_ok(&schema, REGISTER_ADA, Identity::anonymous()).await, "createUser");

    let data = run_ok(
        &schema,
        r#"mutation { loginUser(email: "ada@example.com", password: "analytical") }"#,
        Identity::anonymous(),
    )
    .await;
    let login = payload(&data, "loginUser");
    assert_eq!(login["userId"], created["id"]);
    assert_eq!(login["isAdmin"], json!(true));

    let claims = tokens().verify(login["token"].as_str().unwrap()).unwrap();
    assert_eq!(json!(claims.id), created["id"]);
    assert!(claims.is_admin);
}

#[actix_web::test]
async fn login_failures_report_which_part_was_wrong() {
    let schema = schema();
    run_ok(&schema, REGISTER_ADA, Identity::anonymous()).await;

    let wrong_password = run(
        &schema,
        r#"mutation { loginUser(email: "ada@example.com", password: "babbage") }"#,
        Identity::anonymous(),
    )
    .await;
    assert_eq!(first_error(&wrong_password).0, "Invalid password");

    let unknown = run(
        &schema,
        r#"mutation { loginUser(email: "nobody@example.com", password: "babbage") }"#,
        Identity::anonymous(),
    )
    .await;
    assert_eq!(first_error(&unknown).0, "Not user with that email");
}

#[actix_web::test]
async fn product_lifecycle() {
    let schema = schema();
    let data = run_ok(
        &schema,
        r#"mutation {
            createProduct(title: "Lamp", brand: "Lumen", price: 19.5, stock: 4, discountPercentage: 10.0) {
                id title price stock discountPercentage
            }
        }"#,
        Identity::anonymous(),
    )
    .await;
    let product = &data["createProduct"];
    let id = product["id"].as_str().unwrap().to_string();
    assert_eq!(product["title"], json!("Lamp"));
    assert_eq!(product["stock"], json!(4));

    let data = run_ok(
        &schema,
        &format!(r#"mutation {{ updateProduct(id: "{id}", price: 15.0) {{ title price brand }} }}"#),
        Identity::anonymous(),
    )
    .await;
    assert_eq!(data["updateProduct"], json!({ "title": "Lamp", "price": 15.0, "brand": "Lumen" }));

    let data = run_ok(
        &schema,
        &format!(r#"mutation {{ deleteProduct(id: "{id}") {{ id }} }}"#),
        Identity::anonymous(),
    )
    .await;
    assert_eq!(data["deleteProduct"]["id"], json!(id));

    let data = run_ok(
        &schema,
        &format!(r#"{{ getProduct(id: "{id}") {{ id title }} }}"#),
        Identity::anonymous(),
    )
    .await;
    assert_eq!(data["getProduct"], Value::Null);
}

#[actix_web::test]
async fn product_listing_requires_auth_but_lookup_does_not() {
    let schema = schema();
    let data = run_ok(
        &schema,
        r#"mutation { createProduct(title: "Mug") { id } }"#,
        Identity::anonymous(),
    )
    .await;
    let id = data["createProduct"]["id"].as_str().unwrap().to_string();

    let denied = run(&schema, "{ getAllProduct { title } }", Identity::anonymous()).await;
    assert_eq!(
        first_error(&denied),
        ("Unauthenticated".to_string(), Some("UNAUTHENTICATED".to_string()))
    );

    let data = run_ok(
        &schema,
        &format!(r#"{{ getProduct(id: "{id}") {{ title }} }}"#),
        Identity::anonymous(),
    )
    .await;
    assert_eq!(data["getProduct"]["title"], json!("Mug"));

    let data = run_ok(&schema, "{ getAllProduct { title } }", signed_in("someone")).await;
    assert_eq!(data["getAllProduct"], json!([{ "title": "Mug" }]));
}

#[actix_web::test]
async fn malformed_product_id_is_rejected() {
    let schema = schema();
    let response = run(&schema, r#"{ getProduct(id: "42") { id } }"#, Identity::anonymous()).await;
    assert_eq!(first_error(&response).1.as_deref(), Some("BAD_USER_INPUT"));
}

#[actix_web::test]
async fn orders_are_listed_per_user() {
    let schema = schema();
    for (user, city) in [("u1", "Oslo"), ("u2", "Lima"), ("u1", "Pune")] {
        let data = run_ok(
            &schema,
            &format!(
                r#"mutation {{ createOrder(userId: "{user}", firstName: "A", city: "{city}", totalAmount: 12.5, items: "[]") }}"#
            ),
            Identity::anonymous(),
        )
        .await;
        assert_eq!(payload(&data, "createOrder"), json!({ "message": "success" }));
    }

    let denied = run(&schema, r#"{ getAllOrders(id: "u1") { city } }"#, Identity::anonymous()).await;
    assert_eq!(first_error(&denied).0, "Unauthenticated");

    let data = run_ok(
        &schema,
        r#"{ getAllOrders(id: "u1") { userId city createdDate } }"#,
        signed_in("u2"),
    )
    .await;
    let orders = data["getAllOrders"].as_array().unwrap();
    assert_eq!(orders.len(), 2);
    assert!(orders.iter().all(|o| o["userId"] == json!("u1")));
    assert!(orders.iter().all(|o| !o["createdDate"].as_str().unwrap().is_empty()));

    let data = run_ok(&schema, "{ getAllOrders { city } }", signed_in("u2")).await;
    assert_eq!(data["getAllOrders"], json!([{ "city": "Lima" }]));
}

#[actix_web::test]
async fn http_endpoint_uses_bearer_token() {
    let schema = schema();
    let app = test::init_service(
        App::new()
            .app_data(web::Data::new(schema.clone()))
            .wrap(AuthMiddleware::new(tokens()))
            .configure(routes::configure),
    )
    .await;

    let query = json!({ "query": "{ getAllProduct { id } }" });

    let req = test::TestRequest::post()
        .uri("/graphql")
        .insert_header(("Authorization", "Bearer garbage"))
        .set_json(&query)
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["errors"][0]["message"], json!("Unauthenticated"));

    let token = tokens().issue("u1", false).unwrap();
    let req = test::TestRequest::post()
        .uri("/graphql")
        .insert_header(("Authorization", format!("Bearer {}", token)))
        .set_json(&query)
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert!(body.get("errors").is_none(), "unexpected errors: {}", body);
    assert_eq!(body["data"]["getAllProduct"], json!([]));

    let req = test::TestRequest::get().uri("/graphql").to_request();
    let resp = test::call_service(&app, req).await;
    assert!(resp.status().is_success());
}
