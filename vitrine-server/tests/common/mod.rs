#![allow(dead_code)]

use std::{io::Cursor, path::PathBuf, sync::Arc};

use anyhow::{Context, Result, anyhow};
use axum_test::TestServer;
use image::{ImageBuffer, ImageFormat, Rgb};
use serde_json::json;
use tempfile::TempDir;
use vitrine_core::{Product, SqliteDatabase};
use vitrine_server::{AppState, create_app, infra::config::Config};

pub struct TestApp {
    pub server: TestServer,
    pub state: AppState,
    pub uploads_dir: PathBuf,
    _tempdir: TempDir,
}

pub async fn build_test_app() -> Result<TestApp> {
    build_test_app_with(|_| {}).await
}

pub async fn build_test_app_with(
    customize: impl FnOnce(&mut Config),
) -> Result<TestApp> {
    let tempdir =
        tempfile::tempdir().context("failed to create temporary directory")?;
    let uploads_dir = tempdir.path().join("public").join("uploads");

    let mut config = Config {
        server_host: "127.0.0.1".into(),
        server_port: 0,
        database_url: "sqlite::memory:".into(),
        uploads_dir: uploads_dir.clone(),
        cors_allowed_origins: vec!["http://localhost:3000".into()],
        ..Config::default()
    };
    customize(&mut config);
    config.ensure_directories()?;

    let database = SqliteDatabase::in_memory()
        .await
        .context("failed to open in-memory catalog")?;
    let state = AppState::new(Arc::new(config), database.products());

    let server = TestServer::new(create_app(state.clone()))
        .map_err(|err| anyhow!(err.to_string()))?;

    Ok(TestApp {
        server,
        state,
        uploads_dir,
        _tempdir: tempdir,
    })
}

pub async fn create_product(
    server: &TestServer,
    nome: &str,
    codigo: &str,
    preco: f64,
) -> Product {
    let response = server
        .post("/api/produtos")
        .json(&json!({ "nome": nome, "codigo": codigo, "preco": preco }))
        .await;
    response.assert_status_ok();
    response.json::<Product>()
}

pub fn png_bytes(width: u32, height: u32) -> Vec<u8> {
    let img = ImageBuffer::from_pixel(width, height, Rgb([30u8, 120, 200]));
    let mut bytes = Cursor::new(Vec::new());
    img.write_to(&mut bytes, ImageFormat::Png)
        .expect("encode png");
    bytes.into_inner()
}

/// Names of the files currently in the uploads directory, sorted.
pub fn uploaded_files(app: &TestApp) -> Vec<String> {
    let mut names: Vec<String> = std::fs::read_dir(&app.uploads_dir)
        .expect("uploads dir")
        .filter_map(|entry| entry.ok())
        .filter_map(|entry| entry.file_name().to_str().map(str::to_string))
        .collect();
    names.sort();
    names
}
