//! Guarded with `#[cfg(test)]` from `lib.rs`

use std::collections::BTreeSet;

use maplit::btreeset;
use serde_json::{json, Value};

use crate::listing::ListParams;
use crate::reply::{Body, Reply};


use self::junk_drawer::bar;

fn gin_body() -> Value {
    json!({
        "name": "Gin",
        "description": "juniper spirit",
        "isAlcoholic": true,
        "photoUrl": "https://example.com/gin.jpg",
    })
}

fn vermouth_body() -> Value {
    json!({
        "name": "Dry Vermouth",
        "description": "fortified wine",
        "isAlcoholic": true,
        "photoUrl": "https://example.com/vermouth.jpg",
    })
}

fn martini_body() -> Value {
    json!({
        "name": "Martini",
        "category": "classic",
        "recipe": "stir with ice, strain",
        "ingredients": [
            {"id": "gin", "amount": "6cl"},
            {"id": "vermouth", "amount": "1cl"},
        ],
    })
}

fn json_body(reply: Reply) -> Value {
    match reply.body {
        Body::Json(value) => value,
        other => panic!("expected a JSON body, got {:?}", other),
    }
}

fn params(
    limit: Option<&str>,
    offset: Option<&str>,
    order: Option<&str>,
    order_by: Option<&str>,
) -> ListParams {
    ListParams {
        limit: limit.map(String::from),
        offset: offset.map(String::from),
        order: order.map(String::from),
        order_by: order_by.map(String::from),
    }
}

fn listed_ids(reply: Reply) -> Vec<String> {
    json_body(reply)
        .as_array()
        .expect("array body")
        .iter()
        .map(|row| row["id"].as_str().expect("id").to_string())
        .collect()
}

#[test]
fn created_ingredient_reads_back_with_created_at() {
    env_logger::try_init().unwrap_or_default();
    let (ingredients, _) = bar();

    let reply = ingredients.create("gin", &gin_body());
    assert_eq!(reply, Reply::text(200, "Ingredient added successfully"));

    let record = json_body(ingredients.get("gin"));
    assert_eq!(record["name"], json!("Gin"));
    assert_eq!(record["description"], json!("juniper spirit"));
    assert_eq!(record["isAlcoholic"], json!(true));
    assert_eq!(record["photoUrl"], json!("https://example.com/gin.jpg"));
    assert!(
        record["createdAt"].is_string(),
        "createdAt should be stamped: {:?}",
        record
    );
}

#[test]
fn create_rejects_duplicate_id_regardless_of_body() {
    env_logger::try_init().unwrap_or_default();
    let (ingredients, _) = bar();

    assert_eq!(ingredients.create("gin", &gin_body()).status, 200);

    let again = ingredients.create("gin", &vermouth_body());
    assert_eq!(
        again,
        Reply::text(400, "Ingredient with given id already exists")
    );
}

#[test]
fn get_missing_ingredient_is_not_found() {
    env_logger::try_init().unwrap_or_default();
    let (ingredients, _) = bar();

    assert_eq!(
        ingredients.get("gin"),
        Reply::text(404, "Ingredient with given id not found")
    );
}

#[test]
fn invalid_ingredient_bodies_are_bad_requests() {
    env_logger::try_init().unwrap_or_default();
    let (ingredients, _) = bar();

    let mut missing_name = gin_body();
    missing_name.as_object_mut().expect("object").remove("name");
    let mut blank_description = gin_body();
    blank_description["description"] = json!("");
    let mut stringly_flag = gin_body();
    stringly_flag["isAlcoholic"] = json!("true");
    let mut shapeless_url = gin_body();
    shapeless_url["photoUrl"] = json!("a picture of gin");

    for body in &[missing_name, blank_description, stringly_flag, shapeless_url] {
        let reply = ingredients.create("gin", body);
        assert_eq!(reply, Reply::text(400, "Invalid request body"), "for {}", body);
        // Nothing may be persisted by a refused create.
        assert_eq!(ingredients.get("gin").status, 404);
    }
}

#[test]
fn update_changes_fields_but_keeps_created_at() {
    env_logger::try_init().unwrap_or_default();
    let (ingredients, _) = bar();

    assert_eq!(ingredients.create("gin", &gin_body()).status, 200);
    let created_at = json_body(ingredients.get("gin"))["createdAt"].clone();

    let mut changed = gin_body();
    changed["description"] = json!("london dry");
    let reply = ingredients.update("gin", &changed);
    assert_eq!(reply, Reply::text(200, "Ingredient changed successfully"));

    let record = json_body(ingredients.get("gin"));
    assert_eq!(record["description"], json!("london dry"));
    assert_eq!(record["createdAt"], created_at);
}

#[test]
fn update_missing_ingredient_is_bad_request() {
    env_logger::try_init().unwrap_or_default();
    let (ingredients, _) = bar();

    assert_eq!(
        ingredients.update("gin", &gin_body()),
        Reply::text(400, "Ingredient with given id does not exist")
    );
}

#[test]
fn delete_then_get_is_not_found() {
    env_logger::try_init().unwrap_or_default();
    let (ingredients, _) = bar();

    assert_eq!(ingredients.create("gin", &gin_body()).status, 200);
    assert_eq!(
        ingredients.delete("gin"),
        Reply::text(200, "Ingredient deleted successfully")
    );
    assert_eq!(ingredients.get("gin").status, 404);
}

#[test]
fn delete_missing_ingredient_is_bad_request() {
    env_logger::try_init().unwrap_or_default();
    let (ingredients, _) = bar();

    assert_eq!(
        ingredients.delete("gin"),
        Reply::text(400, "Ingredient with given id does not exist")
    );
}

#[test]
fn empty_identifier_is_bad_request() {
    env_logger::try_init().unwrap_or_default();
    let (ingredients, _) = bar();

    assert_eq!(
        ingredients.get(""),
        Reply::text(400, "Invalid identifier")
    );
}

#[test]
fn listing_orders_pages_and_limits() {
    env_logger::try_init().unwrap_or_default();
    let (ingredients, _) = bar();

    for (id, name) in &[("gin", "Gin"), ("rum", "Rum"), ("cola", "Cola"), ("tonic", "Tonic")] {
        let mut body = gin_body();
        body["name"] = json!(name);
        assert_eq!(ingredients.create(id, &body).status, 200);
    }

    let rows = listed_ids(ingredients.list(&params(None, None, None, None)));
    assert_eq!(rows, vec!["cola", "gin", "rum", "tonic"]);

    let rows = listed_ids(ingredients.list(&params(
        Some("2"),
        Some("1"),
        Some("desc"),
        Some("name"),
    )));
    assert_eq!(rows, vec!["rum", "gin"]);
}

#[test]
fn listing_rows_carry_id_and_fields() {
    env_logger::try_init().unwrap_or_default();
    let (ingredients, _) = bar();

    assert_eq!(ingredients.create("gin", &gin_body()).status, 200);

    let rows = json_body(ingredients.list(&ListParams::default()));
    let row = &rows.as_array().expect("array body")[0];
    assert_eq!(row["id"], json!("gin"));
    assert_eq!(row["name"], json!("Gin"));
    assert!(row["createdAt"].is_string());
}

#[test]
fn listing_defaults_to_ten_rows() {
    env_logger::try_init().unwrap_or_default();
    let (ingredients, _) = bar();

    for n in 0..12 {
        let id = format!("i{:02}", n);
        let mut body = gin_body();
        body["name"] = json!(format!("Ingredient {:02}", n));
        assert_eq!(ingredients.create(&id, &body).status, 200);
    }

    let rows = listed_ids(ingredients.list(&ListParams::default()));
    assert_eq!(rows.len(), 10);
    let expected: BTreeSet<String> = (0..10).map(|n| format!("i{:02}", n)).collect();
    assert_eq!(rows.into_iter().collect::<BTreeSet<_>>(), expected);
}

#[test]
fn listing_rejects_bad_parameters() {
    env_logger::try_init().unwrap_or_default();
    let (ingredients, _) = bar();

    assert_eq!(
        ingredients.list(&params(Some("0"), None, None, None)),
        Reply::text(400, "Invalid limit query parameter")
    );
    assert_eq!(
        ingredients.list(&params(Some("51"), None, None, None)),
        Reply::text(400, "Invalid limit query parameter")
    );
    assert_eq!(
        ingredients.list(&params(None, Some("-1"), None, None)),
        Reply::text(400, "Invalid offset query parameter")
    );
    assert_eq!(
        ingredients.list(&params(None, None, Some("sideways"), None)),
        Reply::text(400, "Invalid order query parameter")
    );
    assert_eq!(
        ingredients.list(&params(None, None, None, Some("proof"))),
        Reply::text(400, "Invalid orderBy query parameter")
    );
    // The boundary value is accepted.
    assert_eq!(
        ingredients.list(&params(Some("50"), None, None, None)).status,
        200
    );
}

#[test]
fn cocktail_create_requires_existing_ingredients() {
    env_logger::try_init().unwrap_or_default();
    let (ingredients, cocktails) = bar();

    assert_eq!(ingredients.create("gin", &gin_body()).status, 200);
    // "vermouth" is never stocked.
    let reply = cocktails.create("martini", &martini_body());
    assert_eq!(
        reply,
        Reply::text(401, "One or more ingredients do not exist")
    );
    assert_eq!(
        cocktails.get("martini"),
        Reply::text(404, "Cocktail with given id not found")
    );
}

#[test]
fn cocktail_round_trips_with_ingredient_order() {
    env_logger::try_init().unwrap_or_default();
    let (ingredients, cocktails) = bar();

    assert_eq!(ingredients.create("gin", &gin_body()).status, 200);
    assert_eq!(ingredients.create("vermouth", &vermouth_body()).status, 200);

    let reply = cocktails.create("martini", &martini_body());
    assert_eq!(reply, Reply::text(200, "Cocktail added successfully"));

    let record = json_body(cocktails.get("martini"));
    assert_eq!(record["name"], json!("Martini"));
    assert_eq!(record["category"], json!("classic"));
    assert_eq!(
        record["ingredients"],
        json!([
            {"id": "gin", "amount": "6cl"},
            {"id": "vermouth", "amount": "1cl"},
        ])
    );
    assert!(record["createdAt"].is_string());
}

#[test]
fn duplicated_ingredient_reference_is_rejected() {
    env_logger::try_init().unwrap_or_default();
    let (ingredients, cocktails) = bar();

    assert_eq!(ingredients.create("gin", &gin_body()).status, 200);

    // Both entries name an ingredient that exists, but the existence lookup
    // collapses the pair to one id and the counts can never match.
    let mut body = martini_body();
    body["ingredients"] = json!([
        {"id": "gin", "amount": "3cl"},
        {"id": "gin", "amount": "3cl"},
    ]);
    assert_eq!(
        cocktails.create("double-gin", &body),
        Reply::text(401, "One or more ingredients do not exist")
    );
    assert_eq!(cocktails.get("double-gin").status, 404);
}

#[test]
fn cocktail_update_replaces_ingredients_and_keeps_created_at() {
    env_logger::try_init().unwrap_or_default();
    let (ingredients, cocktails) = bar();

    assert_eq!(ingredients.create("gin", &gin_body()).status, 200);
    assert_eq!(ingredients.create("vermouth", &vermouth_body()).status, 200);
    assert_eq!(cocktails.create("martini", &martini_body()).status, 200);
    let created_at = json_body(cocktails.get("martini"))["createdAt"].clone();

    let mut changed = martini_body();
    changed["ingredients"] = json!([{"id": "gin", "amount": "7cl"}]);
    assert_eq!(
        cocktails.update("martini", &changed),
        Reply::text(200, "Cocktail changed successfully")
    );

    let record = json_body(cocktails.get("martini"));
    assert_eq!(
        record["ingredients"],
        json!([{"id": "gin", "amount": "7cl"}])
    );
    assert_eq!(record["createdAt"], created_at);
}

#[test]
fn cocktail_update_checks_references_too() {
    env_logger::try_init().unwrap_or_default();
    let (ingredients, cocktails) = bar();

    assert_eq!(ingredients.create("gin", &gin_body()).status, 200);
    assert_eq!(ingredients.create("vermouth", &vermouth_body()).status, 200);
    assert_eq!(cocktails.create("martini", &martini_body()).status, 200);

    let mut changed = martini_body();
    changed["ingredients"] = json!([{"id": "absinthe", "amount": "1cl"}]);
    assert_eq!(
        cocktails.update("martini", &changed),
        Reply::text(401, "One or more ingredients do not exist")
    );

    // The stored record is untouched by the refused update.
    let record = json_body(cocktails.get("martini"));
    assert_eq!(
        record["ingredients"],
        json!([
            {"id": "gin", "amount": "6cl"},
            {"id": "vermouth", "amount": "1cl"},
        ])
    );
}

#[test]
fn missing_cocktail_delete_is_not_found() {
    env_logger::try_init().unwrap_or_default();
    let (_, cocktails) = bar();

    assert_eq!(
        cocktails.delete("martini"),
        Reply::text(404, "Cocktail with given id does not exist")
    );
    assert_eq!(
        cocktails.update("martini", &martini_body()),
        Reply::text(400, "Cocktail with given id does not exist")
    );
}

#[test]
fn cocktail_listing_orders_by_category() {
    env_logger::try_init().unwrap_or_default();
    let (ingredients, cocktails) = bar();

    assert_eq!(ingredients.create("gin", &gin_body()).status, 200);
    assert_eq!(ingredients.create("vermouth", &vermouth_body()).status, 200);

    let mut martini = martini_body();
    martini["category"] = json!("classic");
    assert_eq!(cocktails.create("martini", &martini).status, 200);

    let mut negroni = martini_body();
    negroni["name"] = json!("Negroni");
    negroni["category"] = json!("aperitivo");
    assert_eq!(cocktails.create("negroni", &negroni).status, 200);

    let rows = listed_ids(cocktails.list(&params(None, None, None, Some("category"))));
    assert_eq!(rows, vec!["negroni", "martini"]);

    let all: BTreeSet<String> = listed_ids(cocktails.list(&ListParams::default()))
        .into_iter()
        .collect();
    assert_eq!(
        all,
        btreeset! {"martini".to_string(), "negroni".to_string()}
    );
}
