mod common;

use anyhow::Result;
use axum::http::{HeaderValue, StatusCode, header};
use serde_json::{Value, json};
use vitrine_core::{Product, ProductPage};

use common::{build_test_app, create_product};

#[tokio::test]
async fn create_then_get_round_trips_the_product() -> Result<()> {
    let app = build_test_app().await?;

    let response = app
        .server
        .post("/api/produtos")
        .json(&json!({
            "nome": "Shirt",
            "codigo": "SH01",
            "descricao": "cotton",
            "preco": 19.99
        }))
        .await;
    response.assert_status_ok();

    let created = response.json::<Value>();
    assert_eq!(created["nome"], "Shirt");
    assert_eq!(created["codigo"], "SH01");
    assert_eq!(created["preco"], 19.99);
    assert_eq!(created["imagens"], json!([]));
    assert!(created["createdAt"].is_string());
    assert!(created["updatedAt"].is_string());

    let id = created["id"].as_i64().expect("numeric id");
    let fetched = app.server.get(&format!("/api/produtos/{id}")).await;
    fetched.assert_status_ok();
    let fetched = fetched.json::<Product>();
    assert_eq!(fetched.id, id);
    assert_eq!(fetched.descricao.as_deref(), Some("cotton"));
    assert!(fetched.imagens.is_empty());

    Ok(())
}

#[tokio::test]
async fn duplicate_codigo_is_rejected_without_a_second_row() -> Result<()> {
    let app = build_test_app().await?;
    create_product(&app.server, "Shirt", "SH01", 19.99).await;

    let response = app
        .server
        .post("/api/produtos")
        .json(&json!({ "nome": "Other shirt", "codigo": "SH01", "preco": 5.0 }))
        .await;
    response.assert_status(StatusCode::INTERNAL_SERVER_ERROR);

    let body = response.json::<Value>();
    assert_eq!(body["message"], "Erro ao criar produto");
    assert!(body["error"].is_string());

    let page = app.server.get("/api/produtos").await.json::<ProductPage>();
    assert_eq!(page.total, 1);
    assert_eq!(page.products[0].nome, "Shirt");

    Ok(())
}

#[tokio::test]
async fn missing_required_field_fails_creation() -> Result<()> {
    let app = build_test_app().await?;

    let response = app
        .server
        .post("/api/produtos")
        .json(&json!({ "nome": "No code", "preco": 1.0 }))
        .await;
    response.assert_status(StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(response.json::<Value>()["message"], "Erro ao criar produto");

    let page = app.server.get("/api/produtos").await.json::<ProductPage>();
    assert_eq!(page.total, 0);

    Ok(())
}

#[tokio::test]
async fn numeric_string_price_is_accepted_on_create() -> Result<()> {
    let app = build_test_app().await?;

    let response = app
        .server
        .post("/api/produtos")
        .json(&json!({ "nome": "Shirt", "codigo": "SH01", "preco": "19.99" }))
        .await;
    response.assert_status_ok();
    assert_eq!(response.json::<Product>().preco, 19.99);

    Ok(())
}

#[tokio::test]
async fn undecodable_create_bodies_answer_with_json_errors() -> Result<()> {
    let app = build_test_app().await?;

    let bad_price = app
        .server
        .post("/api/produtos")
        .json(&json!({ "nome": "Shirt", "codigo": "SH01", "preco": "cheap" }))
        .await;
    bad_price.assert_status(StatusCode::INTERNAL_SERVER_ERROR);
    let body = bad_price.json::<Value>();
    assert_eq!(body["message"], "Erro ao criar produto");
    assert!(body["error"].is_string());

    let not_json = app
        .server
        .post("/api/produtos")
        .text("nome=Shirt&codigo=SH01")
        .await;
    not_json.assert_status(StatusCode::INTERNAL_SERVER_ERROR);
    let body = not_json.json::<Value>();
    assert_eq!(body["message"], "Erro ao criar produto");
    assert!(body["error"].is_string());

    let page = app.server.get("/api/produtos").await.json::<ProductPage>();
    assert_eq!(page.total, 0);

    Ok(())
}

#[tokio::test]
async fn undecodable_update_body_leaves_product_untouched() -> Result<()> {
    let app = build_test_app().await?;
    let shirt = create_product(&app.server, "Shirt", "SH01", 19.99).await;

    let response = app
        .server
        .put(&format!("/api/produtos/{}", shirt.id))
        .json(&json!({ "preco": "abc" }))
        .await;
    response.assert_status(StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(
        response.json::<Value>()["message"],
        "Erro ao atualizar produto"
    );

    let fetched = app
        .server
        .get(&format!("/api/produtos/{}", shirt.id))
        .await
        .json::<Product>();
    assert_eq!(fetched, shirt);

    Ok(())
}

#[tokio::test]
async fn malformed_id_wins_over_malformed_update_body() -> Result<()> {
    let app = build_test_app().await?;

    let response = app
        .server
        .put("/api/produtos/abc")
        .json(&json!({ "preco": "abc" }))
        .await;
    response.assert_status(StatusCode::NOT_FOUND);
    assert_eq!(response.json::<Value>()["message"], "Produto não encontrado");

    Ok(())
}

#[tokio::test]
async fn unknown_and_malformed_ids_are_not_found() -> Result<()> {
    let app = build_test_app().await?;

    for path in ["/api/produtos/999", "/api/produtos/abc"] {
        let response = app.server.get(path).await;
        response.assert_status(StatusCode::NOT_FOUND);
        assert_eq!(
            response.json::<Value>(),
            json!({ "message": "Produto não encontrado" })
        );
    }

    Ok(())
}

#[tokio::test]
async fn search_matches_codigo_and_reports_total() -> Result<()> {
    let app = build_test_app().await?;
    let shirt = create_product(&app.server, "Shirt", "SH01", 19.99).await;
    create_product(&app.server, "Hat", "HT01", 9.5).await;

    let page = app
        .server
        .get("/api/produtos")
        .add_query_param("search", "SH01")
        .await
        .json::<ProductPage>();

    assert_eq!(page.total, 1);
    assert_eq!(page.products, vec![shirt]);

    Ok(())
}

#[tokio::test]
async fn pagination_slices_in_insertion_order() -> Result<()> {
    let app = build_test_app().await?;
    for i in 0..5 {
        create_product(&app.server, &format!("Item {i}"), &format!("IT{i}"), 1.0)
            .await;
    }

    let page = app
        .server
        .get("/api/produtos")
        .add_query_param("page", 2)
        .add_query_param("limit", 2)
        .await
        .json::<ProductPage>();

    assert_eq!(page.total, 5);
    let codes: Vec<_> = page.products.iter().map(|p| p.codigo.as_str()).collect();
    assert_eq!(codes, vec!["IT2", "IT3"]);

    Ok(())
}

#[tokio::test]
async fn malformed_paging_params_fall_back_to_defaults() -> Result<()> {
    let app = build_test_app().await?;
    for i in 0..12 {
        create_product(&app.server, &format!("Item {i}"), &format!("IT{i:02}"), 1.0)
            .await;
    }

    let page = app
        .server
        .get("/api/produtos")
        .add_query_param("page", "zero")
        .add_query_param("limit", "-3")
        .add_query_param("minPrice", "cheap")
        .await
        .json::<ProductPage>();

    assert_eq!(page.total, 12);
    assert_eq!(page.products.len(), 10);
    assert_eq!(page.products[0].codigo, "IT00");

    Ok(())
}

#[tokio::test]
async fn price_range_is_inclusive() -> Result<()> {
    let app = build_test_app().await?;
    create_product(&app.server, "Cheap", "C1", 5.0).await;
    create_product(&app.server, "Middle", "M1", 10.0).await;
    create_product(&app.server, "Pricey", "P1", 20.0).await;
    create_product(&app.server, "Luxury", "L1", 20.01).await;

    let page = app
        .server
        .get("/api/produtos")
        .add_query_param("minPrice", 5)
        .add_query_param("maxPrice", 20)
        .await
        .json::<ProductPage>();

    assert_eq!(page.total, 3);
    let names: Vec<_> = page.products.iter().map(|p| p.nome.as_str()).collect();
    assert_eq!(names, vec!["Cheap", "Middle", "Pricey"]);

    Ok(())
}

#[tokio::test]
async fn update_changes_fields_and_replaces_images() -> Result<()> {
    let app = build_test_app().await?;
    let shirt = create_product(&app.server, "Shirt", "SH01", 19.99).await;

    let response = app
        .server
        .put(&format!("/api/produtos/{}", shirt.id))
        .json(&json!({
            "preco": 24.5,
            "imagens": ["a.png", "b.png"]
        }))
        .await;
    response.assert_status_ok();

    let updated = response.json::<Product>();
    assert_eq!(updated.nome, "Shirt");
    assert_eq!(updated.preco, 24.5);
    assert_eq!(updated.imagens, vec!["a.png", "b.png"]);

    let fetched = app
        .server
        .get(&format!("/api/produtos/{}", shirt.id))
        .await
        .json::<Product>();
    assert_eq!(fetched, updated);

    Ok(())
}

#[tokio::test]
async fn update_can_clear_descricao() -> Result<()> {
    let app = build_test_app().await?;
    let created = app
        .server
        .post("/api/produtos")
        .json(&json!({ "nome": "Hat", "codigo": "HT01", "descricao": "wool", "preco": 3.0 }))
        .await
        .json::<Product>();

    let updated = app
        .server
        .put(&format!("/api/produtos/{}", created.id))
        .json(&json!({ "descricao": null }))
        .await
        .json::<Product>();

    assert_eq!(updated.descricao, None);
    assert_eq!(updated.preco, 3.0);

    Ok(())
}

#[tokio::test]
async fn update_of_unknown_product_is_not_found() -> Result<()> {
    let app = build_test_app().await?;

    let response = app
        .server
        .put("/api/produtos/404")
        .json(&json!({ "nome": "Ghost" }))
        .await;
    response.assert_status(StatusCode::NOT_FOUND);
    assert_eq!(response.json::<Value>()["message"], "Produto não encontrado");

    Ok(())
}

#[tokio::test]
async fn update_with_seven_images_changes_nothing() -> Result<()> {
    let app = build_test_app().await?;
    let shirt = create_product(&app.server, "Shirt", "SH01", 19.99).await;
    let seven: Vec<String> = (0..7).map(|i| format!("{i}.png")).collect();

    let response = app
        .server
        .put(&format!("/api/produtos/{}", shirt.id))
        .json(&json!({ "nome": "Renamed", "imagens": seven }))
        .await;
    response.assert_status(StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(
        response.json::<Value>()["message"],
        "Erro ao atualizar produto"
    );

    let fetched = app
        .server
        .get(&format!("/api/produtos/{}", shirt.id))
        .await
        .json::<Product>();
    assert_eq!(fetched, shirt);

    Ok(())
}

#[tokio::test]
async fn delete_removes_the_product_once() -> Result<()> {
    let app = build_test_app().await?;
    let shirt = create_product(&app.server, "Shirt", "SH01", 19.99).await;
    let hat = create_product(&app.server, "Hat", "HT01", 9.5).await;
    let path = format!("/api/produtos/{}", shirt.id);

    let response = app.server.delete(&path).await;
    response.assert_status_ok();
    assert_eq!(
        response.json::<Value>(),
        json!({ "message": "Produto deletado com sucesso" })
    );

    app.server.get(&path).await.assert_status(StatusCode::NOT_FOUND);
    app.server.delete(&path).await.assert_status(StatusCode::NOT_FOUND);

    let page = app.server.get("/api/produtos").await.json::<ProductPage>();
    assert_eq!(page.products, vec![hat]);

    Ok(())
}

#[tokio::test]
async fn health_reports_store_status() -> Result<()> {
    let app = build_test_app().await?;

    let response = app.server.get("/health").await;
    response.assert_status_ok();
    assert_eq!(response.json::<Value>()["status"], "healthy");

    Ok(())
}

#[tokio::test]
async fn configured_origin_is_allowed_by_cors() -> Result<()> {
    let app = build_test_app().await?;

    let response = app
        .server
        .get("/api/produtos")
        .add_header(
            header::ORIGIN,
            HeaderValue::from_static("http://localhost:3000"),
        )
        .await;
    response.assert_status_ok();
    assert_eq!(
        response.headers().get(header::ACCESS_CONTROL_ALLOW_ORIGIN),
        Some(&HeaderValue::from_static("http://localhost:3000"))
    );

    Ok(())
}
